//! Login audit entity.
//!
//! Stores identifying fields encrypted at rest and the source address as a
//! salted hash; nothing here can be read back without the data key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "login_audit")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// AES-256-GCM ciphertext, base64.
    #[sea_orm(column_type = "Text", nullable)]
    pub phone_encrypted: Option<String>,

    /// AES-256-GCM ciphertext of the voter-ID, base64.
    #[sea_orm(column_type = "Text", nullable)]
    pub epic_encrypted: Option<String>,

    /// SHA-256 of salt + source IP, hex.
    #[sea_orm(nullable)]
    pub ip_hash: Option<String>,

    pub success: bool,

    pub created_at: DateTimeWithTimeZone,
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
