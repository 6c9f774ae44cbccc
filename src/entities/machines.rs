use sea_orm::entity::prelude::*;

/// Virtual machine attributes. Sizes are free-form text as typed by the client.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub client_id: String,
    pub ram_size: String,
    pub cpu_count: String,
    pub hdd_size: String,
    pub hdd_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
