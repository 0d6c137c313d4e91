//! `SeaORM` Entity for `period_closings` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ClosingStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "period_closings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub period_start: Date,
    pub period_end: Date,
    pub status: ClosingStatus,
    pub notes: Option<String>,
    pub closed_by: Uuid,
    pub closed_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::opening_balances::Entity")]
    OpeningBalances,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::opening_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpeningBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
