//! Shared fixtures for the test suite: an in-memory SQLite store run through
//! the real migrations, a mocked RPC transport, and model builders.

use alloy::{
    network::Ethereum,
    primitives::{address, Address, B256, LogData, U256},
    providers::{mock::Asserter, DynProvider, Provider, ProviderBuilder},
    rpc::types::Log,
};
use chrono::Utc;
use entity::{
    participations, quests,
    sea_orm_active_enums::{QuestSource, QuestStatus},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};

use crate::{
    client::ChainClient,
    events::{LogMeta, QuestInfo},
};

pub async fn init_db() -> DatabaseConnection {
    // one pooled connection, otherwise every connection gets its own
    // private in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None).await.expect("failed to run migrations");
    db
}

pub fn contract_address() -> Address {
    address!("0x4C36d2919e407f0Cc2Ee3c993ccF8ac26d9CE64e")
}

pub fn mocked_client(asserter: &Asserter) -> ChainClient {
    let provider: DynProvider<Ethereum> = ProviderBuilder::new()
        .connect_mocked_client(asserter.clone())
        .erased();
    ChainClient::with_provider(provider, contract_address())
}

pub fn rpc_log(data: LogData, block_number: u64) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address: contract_address(),
            data,
        },
        block_hash: None,
        block_number: Some(block_number),
        block_timestamp: None,
        transaction_hash: Some(B256::repeat_byte(0xab)),
        transaction_index: Some(0),
        log_index: Some(0),
        removed: false,
    }
}

pub fn log_meta(block_number: u64) -> LogMeta {
    LogMeta {
        block_number,
        transaction_hash: B256::repeat_byte(0xab),
    }
}

pub fn quest_info(start_ms: i64, end_ms: i64) -> QuestInfo {
    QuestInfo {
        sponsor: address!("0x8ba1f109551bD432803012645ac136c22C929B00"),
        title: "test quest".to_string(),
        description: "a quest".to_string(),
        questType: "social".to_string(),
        totalRewards: U256::from(10_000),
        rewardPerUser: U256::from(1_000),
        maxParticipants: 10,
        startTime: start_ms as u64,
        endTime: end_ms as u64,
        claimDeadline: end_ms as u64 + 86_400_000,
        vesting: false,
        vestingDuration: 0,
        verificationMetadata: String::new(),
    }
}

pub fn quest_model(id: &str, start_ms: i64, end_ms: i64, claim_deadline_ms: i64) -> quests::Model {
    let now_ms = Utc::now().timestamp_millis();
    quests::Model {
        id: id.to_string(),
        sponsor: vec![0x11; 20],
        title: "test quest".to_string(),
        description: "a quest".to_string(),
        quest_type: "social".to_string(),
        total_rewards: "10000".to_string(),
        reward_per_user: "1000".to_string(),
        max_participants: 10,
        participant_count: 0,
        start_time: start_ms,
        end_time: end_ms,
        claim_deadline: claim_deadline_ms,
        status: QuestStatus::Pending,
        vesting: false,
        vesting_duration: 0,
        verification_metadata: None,
        source: QuestSource::Confirmed,
        transaction_hash: vec![0xab; 32],
        block_number: 1,
        created_at: now_ms,
        updated_at: now_ms,
    }
}

pub fn quest_active_model(
    id: &str,
    start_ms: i64,
    end_ms: i64,
    claim_deadline_ms: i64,
) -> quests::ActiveModel {
    let model = quest_model(id, start_ms, end_ms, claim_deadline_ms);
    quests::ActiveModel {
        id: Set(model.id),
        sponsor: Set(model.sponsor),
        title: Set(model.title),
        description: Set(model.description),
        quest_type: Set(model.quest_type),
        total_rewards: Set(model.total_rewards),
        reward_per_user: Set(model.reward_per_user),
        max_participants: Set(model.max_participants),
        participant_count: Set(model.participant_count),
        start_time: Set(model.start_time),
        end_time: Set(model.end_time),
        claim_deadline: Set(model.claim_deadline),
        status: Set(model.status),
        vesting: Set(model.vesting),
        vesting_duration: Set(model.vesting_duration),
        verification_metadata: Set(model.verification_metadata),
        source: Set(model.source),
        transaction_hash: Set(model.transaction_hash),
        block_number: Set(model.block_number),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

pub fn participation_active_model(
    quest_id: &str,
    user_address: &[u8],
    amount: &str,
    block_number: i64,
) -> participations::ActiveModel {
    let now_ms = Utc::now().timestamp_millis();
    participations::ActiveModel {
        quest_id: Set(quest_id.to_string()),
        user_address: Set(user_address.to_vec()),
        amount: Set(amount.to_string()),
        claimed_at: Set(now_ms),
        transaction_hash: Set(vec![0xab; 32]),
        block_number: Set(block_number),
        created_at: Set(now_ms),
        updated_at: Set(now_ms),
    }
}
