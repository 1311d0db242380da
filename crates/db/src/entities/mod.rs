//! `SeaORM` entity definitions.

pub mod departments;
pub mod institutions;
pub mod projects;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
