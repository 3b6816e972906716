//! `SeaORM` entity definitions.

pub mod expenses;
pub mod groups;
pub mod sea_orm_active_enums;
pub mod settlements;
pub mod users;

pub use sea_orm_active_enums::SplitType;
