//! User (credential record) entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role granted to a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "volunteer")]
    Volunteer,
    #[sea_orm(string_value = "voter")]
    #[default]
    Voter,
}

impl Role {
    /// Wire/display name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Volunteer => "volunteer",
            Self::Voter => "voter",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(nullable)]
    pub mobile: Option<String>,

    pub role: Role,

    /// bcrypt hash; never serialized out of the db layer as-is.
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Volunteers start unapproved; voters are auto-approved at creation.
    #[sea_orm(default_value = false)]
    pub is_approved: bool,

    /// Admin who approved this account.
    #[sea_orm(nullable)]
    pub approved_by: Option<String>,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub last_login_at: Option<DateTimeWithTimeZone>,

    /// Deactivation is a flag flip; rows are never hard-deleted.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    // Gamification counters. All monotonic increments.
    #[sea_orm(default_value = 0)]
    pub points: i32,

    #[sea_orm(default_value = 1)]
    pub level: i32,

    #[sea_orm(default_value = 0)]
    pub tasks_completed: i32,

    #[sea_orm(default_value = 0)]
    pub complaints_resolved: i32,

    #[sea_orm(default_value = 0)]
    pub collaborations: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,

    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,

    #[sea_orm(has_many = "super::badge::Entity")]
    Badges,
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaints.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::badge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Badges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
