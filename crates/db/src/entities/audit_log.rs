//! Administrative audit log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Actor performing the action.
    pub actor_id: String,

    /// Machine-readable action name, e.g. `request.approve`.
    pub action: String,

    /// Entity kind the action touched, e.g. `complaint`.
    #[sea_orm(nullable)]
    pub target_kind: Option<String>,

    #[sea_orm(nullable)]
    pub target_id: Option<String>,

    /// Extra context as a JSON object.
    #[sea_orm(nullable)]
    pub detail: Option<Json>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ActorId",
        to = "super::user::Column::Id"
    )]
    Actor,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
