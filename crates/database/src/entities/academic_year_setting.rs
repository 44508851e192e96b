use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// History of current-term settings; the latest `set_at` wins
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "academic_year_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub academic_year: String,
    pub registration_start: Option<DateTimeUtc>,
    pub registration_end: Option<DateTimeUtc>,
    pub set_at: DateTimeUtc,
    pub set_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
