//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(INSTITUTIONS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(DEPARTMENTS_SQL).await?;
        db.execute_unprepared(PROJECTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS transactions;
            DROP TABLE IF EXISTS projects;
            DROP TABLE IF EXISTS departments;
            DROP TABLE IF EXISTS users;
            DROP TABLE IF EXISTS institutions;
            DROP FUNCTION IF EXISTS set_updated_at();
            DROP TYPE IF EXISTS recurring_frequency;
            DROP TYPE IF EXISTS transaction_type;
            DROP TYPE IF EXISTS transaction_status;
            DROP TYPE IF EXISTS project_status;
            DROP TYPE IF EXISTS institution_type;
            DROP TYPE IF EXISTS user_role;
            ",
        )
        .await?;

        Ok(())
    }
}

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'admin',
    'institution_admin',
    'department_head',
    'project_manager',
    'viewer'
);

-- Institution kinds
CREATE TYPE institution_type AS ENUM (
    'government',
    'university',
    'school',
    'ngo',
    'hospital',
    'municipality'
);

-- Project lifecycle
CREATE TYPE project_status AS ENUM (
    'planning',
    'active',
    'on_hold',
    'completed',
    'cancelled'
);

-- Transaction workflow states
CREATE TYPE transaction_status AS ENUM (
    'pending',
    'approved',
    'rejected',
    'completed'
);

-- Transaction kinds
CREATE TYPE transaction_type AS ENUM (
    'expense',
    'income',
    'transfer',
    'adjustment'
);

-- Recurring transaction cadence (metadata only)
CREATE TYPE recurring_frequency AS ENUM (
    'daily',
    'weekly',
    'monthly',
    'quarterly',
    'yearly'
);
";

const INSTITUTIONS_SQL: &str = r"
CREATE TABLE institutions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL UNIQUE,
    institution_type institution_type NOT NULL,
    description TEXT,
    fiscal_year_start DATE NOT NULL,
    fiscal_year_end DATE NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    allow_public_viewing BOOLEAN NOT NULL DEFAULT false,
    require_approval BOOLEAN NOT NULL DEFAULT true,
    address TEXT,
    city VARCHAR(100),
    country VARCHAR(100),
    website VARCHAR(255),
    contact_email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_institutions_public ON institutions(allow_public_viewing)
    WHERE is_active = true;
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(200) NOT NULL,
    role user_role NOT NULL DEFAULT 'viewer',
    institution_id UUID REFERENCES institutions(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
CREATE INDEX idx_users_institution ON users(institution_id);
";

const DEPARTMENTS_SQL: &str = r"
CREATE TABLE departments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    institution_id UUID NOT NULL REFERENCES institutions(id),
    name VARCHAR(150) NOT NULL,
    code VARCHAR(20),
    description TEXT,
    head_user_id UUID REFERENCES users(id),
    budget_allocated NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (budget_allocated >= 0),
    budget_spent NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (budget_spent >= 0),
    budget_remaining NUMERIC(19, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    UNIQUE (institution_id, name)
);

CREATE INDEX idx_departments_institution ON departments(institution_id);
";

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    institution_id UUID NOT NULL REFERENCES institutions(id),
    department_id UUID REFERENCES departments(id) ON DELETE SET NULL,
    name VARCHAR(200) NOT NULL,
    description TEXT,
    status project_status NOT NULL DEFAULT 'planning',
    manager_user_id UUID REFERENCES users(id),
    budget_allocated NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (budget_allocated >= 0),
    budget_spent NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (budget_spent >= 0),
    budget_remaining NUMERIC(19, 4) NOT NULL DEFAULT 0,
    start_date DATE,
    end_date DATE,
    actual_start_date DATE,
    actual_end_date DATE,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
    is_public BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_projects_institution ON projects(institution_id);
CREATE INDEX idx_projects_department ON projects(department_id);
CREATE INDEX idx_projects_status ON projects(institution_id, status);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    institution_id UUID NOT NULL REFERENCES institutions(id),
    department_id UUID REFERENCES departments(id),
    project_id UUID REFERENCES projects(id),
    transaction_type transaction_type NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount >= 0),
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    category VARCHAR(100) NOT NULL,
    description TEXT NOT NULL,
    vendor_name VARCHAR(200),
    vendor_contact VARCHAR(255),
    reference VARCHAR(100),
    transaction_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    status transaction_status NOT NULL DEFAULT 'pending',
    created_by UUID NOT NULL REFERENCES users(id),
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    attachments JSONB NOT NULL DEFAULT '[]'::jsonb,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
    is_recurring BOOLEAN NOT NULL DEFAULT false,
    recurring_frequency recurring_frequency,
    recurring_next_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_institution_status
    ON transactions(institution_id, status);
CREATE INDEX idx_transactions_institution_date
    ON transactions(institution_id, transaction_date);
CREATE INDEX idx_transactions_department ON transactions(department_id);
CREATE INDEX idx_transactions_project ON transactions(project_id);
CREATE INDEX idx_transactions_category ON transactions(institution_id, category);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on every row update
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_institutions_updated_at
BEFORE UPDATE ON institutions
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_users_updated_at
BEFORE UPDATE ON users
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_departments_updated_at
BEFORE UPDATE ON departments
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_projects_updated_at
BEFORE UPDATE ON projects
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_transactions_updated_at
BEFORE UPDATE ON transactions
FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";
