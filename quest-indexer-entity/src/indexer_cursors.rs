use sea_orm::entity::prelude::*;

/// Singleton ingestion cursor: the last block fully processed for the
/// configured contract, i.e. the ingestion low-watermark.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "indexer_cursors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub last_processed_block: i64,
    pub contract_address: Vec<u8>,
    pub contract_deploy_block: i64,
    pub last_updated: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
