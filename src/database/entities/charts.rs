use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user-authored visualization definition. `mapping`, `viz_options` and
/// `applied_filters` hold serialized JSON; `dataset_id` is an opaque
/// reference with no foreign key, matching the document-store lifecycle.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub viz_type: String,
    pub owner: String,
    pub dataset_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub mapping: String,
    #[sea_orm(column_type = "Text")]
    pub viz_options: String,
    #[sea_orm(column_type = "Text")]
    pub applied_filters: String,
    pub public: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
