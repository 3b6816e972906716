//! `SeaORM` Entity for the settlements table.
//!
//! `related_expense_ids` is advisory: it links a settlement to the
//! expenses it paid off so the deletion cascade can prune it, but it is
//! not a foreign key and may reference expenses that no longer exist.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{SettlementId, UserId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub amount: Decimal,
    pub note: Option<String>,
    pub date: DateTimeWithTimeZone,
    pub paid_by_user_id: Uuid,
    pub received_by_user_id: Uuid,
    pub related_expense_ids: RelatedExpenseIdsJson,
    pub created_at: DateTimeWithTimeZone,
}

/// JSONB list of expense ids this settlement paid toward.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct RelatedExpenseIdsJson(pub Vec<Uuid>);

impl From<&Model> for divvy_core::ledger::Settlement {
    fn from(model: &Model) -> Self {
        Self {
            id: SettlementId::from_uuid(model.id),
            paid_by: UserId::from_uuid(model.paid_by_user_id),
            received_by: UserId::from_uuid(model.received_by_user_id),
            amount: model.amount,
            date: model.date.to_utc(),
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
