//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod department;
pub mod institution;
pub mod project;
pub mod report;
pub mod transaction;
pub mod user;

pub use department::{CreateDepartmentInput, DepartmentError, DepartmentRepository,
    UpdateDepartmentInput};
pub use institution::{CreateInstitutionInput, InstitutionError, InstitutionRepository,
    InstitutionSummary, UpdateInstitutionInput};
pub use project::{CreateProjectInput, ProjectError, ProjectRepository, UpdateProjectInput};
pub use report::{ReportError, ReportRepository};
pub use transaction::{CreateTransactionInput, TransactionError, TransactionFilter,
    TransactionRepository, UpdateTransactionInput};
pub use user::{UserError, UserRepository};
