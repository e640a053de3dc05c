//! Voter registration request entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::volunteer_request::RequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voter_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub email: String,

    #[sea_orm(nullable)]
    pub mobile: Option<String>,

    /// Hashed at intake; the approval workflow copies it verbatim.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Externally issued voter-ID (EPIC) as submitted; embedded into the
    /// Voter record's notes on approval.
    #[sea_orm(nullable)]
    pub voter_id_number: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub ward: Option<String>,

    #[sea_orm(nullable)]
    pub area: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    pub status: RequestStatus,

    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewedBy",
        to = "super::user::Column::Id"
    )]
    Reviewer,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
