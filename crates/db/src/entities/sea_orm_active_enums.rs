//! Postgres enum types mapped to Rust enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How an expense was divided among its participants.
///
/// Informational only: the stored split amounts are authoritative and the
/// balance math never re-derives them from this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "split_type")]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Divided evenly across participants.
    #[sea_orm(string_value = "equal")]
    Equal,
    /// Divided by per-participant percentages.
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// Amounts entered per participant.
    #[sea_orm(string_value = "exact")]
    Exact,
}
