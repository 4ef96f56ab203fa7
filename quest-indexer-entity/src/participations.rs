use sea_orm::entity::prelude::*;

/// One row per (quest id, claimant address) pair. Repeat writes for the same
/// key overwrite the row (last write wins).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "participations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub quest_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_address: Vec<u8>,
    pub amount: String,
    pub claimed_at: i64,
    pub transaction_hash: Vec<u8>,
    pub block_number: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
