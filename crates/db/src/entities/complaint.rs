//! Complaint (work item) entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Complaint lifecycle status.
///
/// `pending -> in_progress -> resolved`, with `flagged` reachable from any
/// non-resolved state. Reverting to `pending` is admin-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "flagged")]
    Flagged,
}

/// Work item priority, shared with tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    #[default]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    pub status: ComplaintStatus,

    pub priority: Priority,

    /// Assigned volunteer, if any.
    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,

    pub created_by: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_notes: Option<String>,

    /// Proof photo path, stored as submitted.
    #[sea_orm(nullable)]
    pub resolution_photo: Option<String>,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,

    /// Second gate, independent of `resolved`: only admin-approved
    /// resolutions appear in the public showcase.
    #[sea_orm(default_value = false)]
    pub approved_by_admin: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedTo",
        to = "super::user::Column::Id"
    )]
    Assignee,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
