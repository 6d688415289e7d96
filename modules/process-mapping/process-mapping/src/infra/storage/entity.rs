use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_process_mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub api_path: Option<String>,
    pub http_method: Option<String>,
    pub process_id: String,
    pub process_version: Option<String>,
    pub priority: i32,
    pub effective_from: Option<TimeDateTimeWithTimeZone>,
    pub effective_to: Option<TimeDateTimeWithTimeZone>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
