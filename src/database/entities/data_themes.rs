use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A data theme: tabs of mixed text and visualization blocks, stored as
/// serialized JSON in `tabs`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_themes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub owner: String,
    #[sea_orm(column_type = "Text")]
    pub tabs: String,
    pub public: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
