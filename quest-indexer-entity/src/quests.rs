use super::sea_orm_active_enums::{QuestSource, QuestStatus};
use sea_orm::entity::prelude::*;

/// One row per on-chain quest id. Reward amounts are decimal strings of the
/// smallest currency unit; timestamps are epoch milliseconds.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "quests")]
pub struct Model {
    /// Decimal rendering of the on-chain `uint256` quest id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sponsor: Vec<u8>,
    pub title: String,
    pub description: String,
    pub quest_type: String,
    pub total_rewards: String,
    pub reward_per_user: String,
    pub max_participants: i32,
    pub participant_count: i32,
    pub start_time: i64,
    pub end_time: i64,
    pub claim_deadline: i64,
    pub status: QuestStatus,
    pub vesting: bool,
    pub vesting_duration: i64,
    pub verification_metadata: Option<String>,
    pub source: QuestSource,
    pub transaction_hash: Vec<u8>,
    pub block_number: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
