//! Database seeder for Fiscora development and testing.
//!
//! Seeds a demo institution with one user per role, two departments, a
//! project, and transactions in every workflow state. Amounts are chosen
//! so department/project spent counters match the seeded expenses.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use fiscora_core::auth::hash_password;
use fiscora_db::entities::{
    departments, institutions, projects,
    sea_orm_active_enums::{
        InstitutionType, ProjectStatus, TransactionStatus, TransactionType, UserRole,
    },
    transactions, users,
};

/// Demo institution ID (consistent for all seeds)
const DEMO_INSTITUTION_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Global admin user ID
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Institution admin user ID
const INSTITUTION_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Department head user ID
const DEPARTMENT_HEAD_ID: &str = "00000000-0000-0000-0000-000000000004";
/// Project manager user ID
const PROJECT_MANAGER_ID: &str = "00000000-0000-0000-0000-000000000005";
/// Viewer user ID
const VIEWER_USER_ID: &str = "00000000-0000-0000-0000-000000000006";
/// Public works department ID
const PUBLIC_WORKS_ID: &str = "00000000-0000-0000-0000-000000000011";
/// Education department ID
const EDUCATION_ID: &str = "00000000-0000-0000-0000-000000000012";
/// Road resurfacing project ID
const ROAD_PROJECT_ID: &str = "00000000-0000-0000-0000-000000000021";

/// Shared password for all demo accounts.
const DEMO_PASSWORD: &str = "fiscora-demo";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = fiscora_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo institution...");
    seed_institution(&db).await;

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding departments...");
    seed_departments(&db).await;

    println!("Seeding project...");
    seed_project(&db).await;

    println!("Seeding transactions...");
    seed_transactions(&db).await;

    println!("Seeding complete!");
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

async fn seed_institution(db: &DatabaseConnection) {
    if institutions::Entity::find_by_id(id(DEMO_INSTITUTION_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo institution already exists, skipping...");
        return;
    }

    let year = Utc::now().year();
    let institution = institutions::ActiveModel {
        id: Set(id(DEMO_INSTITUTION_ID)),
        name: Set("City of Demoville".to_string()),
        institution_type: Set(InstitutionType::Municipality),
        description: Set(Some(
            "Demonstration municipality for local development".to_string(),
        )),
        fiscal_year_start: Set(NaiveDate::from_ymd_opt(year, 1, 1).unwrap()),
        fiscal_year_end: Set(NaiveDate::from_ymd_opt(year, 12, 31).unwrap()),
        currency: Set("USD".to_string()),
        allow_public_viewing: Set(true),
        require_approval: Set(true),
        address: Set(Some("1 Civic Plaza".to_string())),
        city: Set(Some("Demoville".to_string())),
        country: Set(Some("US".to_string())),
        website: Set(Some("https://demoville.example".to_string())),
        contact_email: Set(Some("clerk@demoville.example".to_string())),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = institution.insert(db).await {
        eprintln!("Failed to insert demo institution: {e}");
    } else {
        println!("  Created institution: City of Demoville");
    }
}

async fn seed_users(db: &DatabaseConnection) {
    let password_hash = hash_password(DEMO_PASSWORD).expect("Failed to hash demo password");

    let accounts: [(&str, &str, &str, UserRole, Option<Uuid>); 5] = [
        (
            ADMIN_USER_ID,
            "admin@fiscora.dev",
            "Site Administrator",
            UserRole::Admin,
            None,
        ),
        (
            INSTITUTION_ADMIN_ID,
            "mayor@demoville.example",
            "Dana Mayor",
            UserRole::InstitutionAdmin,
            Some(id(DEMO_INSTITUTION_ID)),
        ),
        (
            DEPARTMENT_HEAD_ID,
            "works@demoville.example",
            "Pat Works",
            UserRole::DepartmentHead,
            Some(id(DEMO_INSTITUTION_ID)),
        ),
        (
            PROJECT_MANAGER_ID,
            "roads@demoville.example",
            "Sam Roads",
            UserRole::ProjectManager,
            Some(id(DEMO_INSTITUTION_ID)),
        ),
        (
            VIEWER_USER_ID,
            "resident@demoville.example",
            "Riley Resident",
            UserRole::Viewer,
            Some(id(DEMO_INSTITUTION_ID)),
        ),
    ];

    for (user_id, email, full_name, role, institution_id) in accounts {
        if users::Entity::find_by_id(id(user_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  User {email} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id(user_id)),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.clone()),
            full_name: Set(full_name.to_string()),
            role: Set(role),
            institution_id: Set(institution_id),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {email}: {e}");
        } else {
            println!("  Created user: {email}");
        }
    }
}

async fn seed_departments(db: &DatabaseConnection) {
    // spent figures below match the seeded expense transactions
    let rows: [(&str, &str, &str, Option<Uuid>, Decimal, Decimal); 2] = [
        (
            PUBLIC_WORKS_ID,
            "Public Works",
            "PW",
            Some(id(DEPARTMENT_HEAD_ID)),
            dec!(500_000),
            dec!(64_500),
        ),
        (
            EDUCATION_ID,
            "Education",
            "EDU",
            None,
            dec!(300_000),
            dec!(12_000),
        ),
    ];

    for (dept_id, name, code, head, allocated, spent) in rows {
        if departments::Entity::find_by_id(id(dept_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Department {name} already exists, skipping...");
            continue;
        }

        let department = departments::ActiveModel {
            id: Set(id(dept_id)),
            institution_id: Set(id(DEMO_INSTITUTION_ID)),
            name: Set(name.to_string()),
            code: Set(Some(code.to_string())),
            description: Set(None),
            head_user_id: Set(head),
            budget_allocated: Set(allocated),
            budget_spent: Set(spent),
            budget_remaining: Set(allocated - spent),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = department.insert(db).await {
            eprintln!("Failed to insert department {name}: {e}");
        } else {
            println!("  Created department: {name}");
        }
    }
}

async fn seed_project(db: &DatabaseConnection) {
    if projects::Entity::find_by_id(id(ROAD_PROJECT_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Road project already exists, skipping...");
        return;
    }

    let allocated = dec!(150_000);
    let spent = dec!(52_500);
    let today = Utc::now().date_naive();

    let project = projects::ActiveModel {
        id: Set(id(ROAD_PROJECT_ID)),
        institution_id: Set(id(DEMO_INSTITUTION_ID)),
        department_id: Set(Some(id(PUBLIC_WORKS_ID))),
        name: Set("Main Street Resurfacing".to_string()),
        description: Set(Some("Resurface Main Street between 1st and 9th".to_string())),
        status: Set(ProjectStatus::Active),
        manager_user_id: Set(Some(id(PROJECT_MANAGER_ID))),
        budget_allocated: Set(allocated),
        budget_spent: Set(spent),
        budget_remaining: Set(allocated - spent),
        start_date: Set(Some(today - Duration::days(60))),
        end_date: Set(Some(today + Duration::days(120))),
        actual_start_date: Set(Some(today - Duration::days(55))),
        actual_end_date: Set(None),
        tags: Set(serde_json::json!(["roads", "infrastructure"])),
        is_public: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = project.insert(db).await {
        eprintln!("Failed to insert road project: {e}");
    } else {
        println!("  Created project: Main Street Resurfacing");
    }
}

struct SeedTransaction {
    department_id: Option<Uuid>,
    project_id: Option<Uuid>,
    transaction_type: TransactionType,
    amount: Decimal,
    category: &'static str,
    description: &'static str,
    vendor_name: Option<&'static str>,
    status: TransactionStatus,
    days_ago: i64,
}

async fn seed_transactions(db: &DatabaseConnection) {
    let existing = transactions::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Transactions already exist, skipping...");
        return;
    }

    let rows = [
        SeedTransaction {
            department_id: Some(id(PUBLIC_WORKS_ID)),
            project_id: Some(id(ROAD_PROJECT_ID)),
            transaction_type: TransactionType::Expense,
            amount: dec!(45_000),
            category: "construction",
            description: "Asphalt delivery and paving crew, phase one",
            vendor_name: Some("Granite Paving Co"),
            status: TransactionStatus::Approved,
            days_ago: 40,
        },
        SeedTransaction {
            department_id: Some(id(PUBLIC_WORKS_ID)),
            project_id: Some(id(ROAD_PROJECT_ID)),
            transaction_type: TransactionType::Expense,
            amount: dec!(7_500),
            category: "equipment",
            description: "Traffic control signage rental",
            vendor_name: Some("SafeLane Rentals"),
            status: TransactionStatus::Completed,
            days_ago: 32,
        },
        SeedTransaction {
            department_id: Some(id(PUBLIC_WORKS_ID)),
            project_id: None,
            transaction_type: TransactionType::Expense,
            amount: dec!(9_000),
            category: "maintenance",
            description: "Storm drain clearing, north district",
            vendor_name: Some("ClearFlow Services"),
            status: TransactionStatus::Pending,
            days_ago: 3,
        },
        SeedTransaction {
            department_id: Some(id(PUBLIC_WORKS_ID)),
            project_id: None,
            transaction_type: TransactionType::Expense,
            amount: dec!(3_000),
            category: "supplies",
            description: "Replacement street sign inventory",
            vendor_name: None,
            status: TransactionStatus::Rejected,
            days_ago: 10,
        },
        SeedTransaction {
            department_id: Some(id(EDUCATION_ID)),
            project_id: None,
            transaction_type: TransactionType::Expense,
            amount: dec!(12_000),
            category: "supplies",
            description: "Classroom materials for fall term",
            vendor_name: Some("Scholastic Supply"),
            status: TransactionStatus::Approved,
            days_ago: 20,
        },
        SeedTransaction {
            department_id: None,
            project_id: None,
            transaction_type: TransactionType::Income,
            amount: dec!(250_000),
            category: "grants",
            description: "State infrastructure grant, quarterly disbursement",
            vendor_name: None,
            status: TransactionStatus::Completed,
            days_ago: 45,
        },
    ];

    for row in rows {
        let when = Utc::now() - Duration::days(row.days_ago);
        let approved = matches!(
            row.status,
            TransactionStatus::Approved | TransactionStatus::Completed | TransactionStatus::Rejected
        );

        let transaction = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            institution_id: Set(id(DEMO_INSTITUTION_ID)),
            department_id: Set(row.department_id),
            project_id: Set(row.project_id),
            transaction_type: Set(row.transaction_type),
            amount: Set(row.amount),
            currency: Set("USD".to_string()),
            category: Set(row.category.to_string()),
            description: Set(row.description.to_string()),
            vendor_name: Set(row.vendor_name.map(str::to_string)),
            vendor_contact: Set(None),
            reference: Set(None),
            transaction_date: Set(when.into()),
            status: Set(row.status),
            created_by: Set(id(DEPARTMENT_HEAD_ID)),
            approved_by: Set(approved.then(|| id(INSTITUTION_ADMIN_ID))),
            approved_at: Set(approved.then(|| (when + Duration::days(1)).into())),
            attachments: Set(serde_json::json!([])),
            tags: Set(serde_json::json!([])),
            is_recurring: Set(false),
            recurring_frequency: Set(None),
            recurring_next_date: Set(None),
            created_at: Set(when.into()),
            updated_at: Set(when.into()),
        };

        if let Err(e) = transaction.insert(db).await {
            eprintln!("Failed to insert transaction '{}': {e}", row.description);
        } else {
            println!("  Created transaction: {}", row.description);
        }
    }
}
