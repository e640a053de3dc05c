//! Task (work item) entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task lifecycle status. Linear; no flagged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum TaskStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub status: TaskStatus,

    pub priority: super::complaint::Priority,

    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,

    pub created_by: String,

    #[sea_orm(nullable)]
    pub due_date: Option<DateTimeWithTimeZone>,

    /// Points granted to the assignee on completion.
    pub points_reward: i32,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeWithTimeZone>,

    /// User IDs of accepted collaborators (JSON array of strings).
    pub collaborators: Json,

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
