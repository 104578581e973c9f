use sea_orm::entity::prelude::*;

/// SeaORM entity for audit_events table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub actor_id: Option<String>,
    pub event_type: String,
    pub event_time: String,
    pub target_id: Option<String>,
    pub target_type: Option<String>,
    /// JSON `{"old_data": .., "new_data": ..}`, only for UPDATE_DATA
    pub change: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
