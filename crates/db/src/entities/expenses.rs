//! `SeaORM` Entity for the expenses table.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{ExpenseId, UserId};

use super::sea_orm_active_enums::SplitType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: DateTimeWithTimeZone,
    pub paid_by_user_id: Uuid,
    pub split_type: SplitType,
    pub splits: SplitsJson,
    pub group_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

/// JSONB split list, ordered as submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SplitsJson(pub Vec<SplitRecord>);

/// One participant's share of an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub paid: bool,
}

impl From<&Model> for divvy_core::ledger::Expense {
    fn from(model: &Model) -> Self {
        Self {
            id: ExpenseId::from_uuid(model.id),
            paid_by: UserId::from_uuid(model.paid_by_user_id),
            date: model.date.to_utc(),
            splits: model
                .splits
                .0
                .iter()
                .map(|s| divvy_core::ledger::Split {
                    user_id: UserId::from_uuid(s.user_id),
                    amount: s.amount,
                    paid: s.paid,
                })
                .collect(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PaidByUserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Groups,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
