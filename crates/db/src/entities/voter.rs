//! Voter (domain record) entity.
//!
//! Census-like data distinct from login identity. `user_id` is a weak
//! back-reference: voters recorded by canvassing have none, voters created
//! through the approval workflow always do.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Political leaning recorded against a voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum VoterCategory {
    #[sea_orm(string_value = "supporter")]
    #[default]
    Supporter,
    #[sea_orm(string_value = "neutral")]
    Neutral,
    #[sea_orm(string_value = "opponent")]
    Opponent,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Credential record owning this voter row, if any.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub ward: Option<String>,

    #[sea_orm(nullable)]
    pub booth: Option<String>,

    pub category: VoterCategory,

    /// Free text; carries the externally supplied voter-ID for
    /// self-registered voters.
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
