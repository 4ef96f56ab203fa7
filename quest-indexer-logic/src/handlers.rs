//! State transitions applied to the store, one per contract event. Handlers
//! are invoked in on-chain order within a batch; they own all quest and
//! participation writes.

use alloy::primitives::{Address, U256};
use chrono::Utc;
use entity::{
    participations, quests,
    sea_orm_active_enums::{QuestSource, QuestStatus},
};
use sea_orm::{ActiveValue::Set, DatabaseConnection};

use crate::{
    client::ChainClient,
    error::IndexerError,
    events::{LogMeta, QuestEvent, QuestInfo},
    repository,
    retry::RetryPolicy,
    status::{calculate_status, status_for_window},
};

/// Window applied to a degraded record when the contract read failed and the
/// event arguments are all we have.
pub const DEGRADED_QUEST_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const DEGRADED_MAX_PARTICIPANTS: i32 = 100;

pub async fn apply_event(
    db: &DatabaseConnection,
    client: &ChainClient,
    retry: &RetryPolicy,
    event: QuestEvent,
    meta: LogMeta,
) -> Result<(), IndexerError> {
    match event {
        QuestEvent::Created { quest_id, sponsor } => {
            handle_quest_created(db, client, retry, quest_id, sponsor, meta).await
        }
        QuestEvent::RewardClaimed {
            quest_id,
            recipient,
            amount,
        } => handle_reward_claimed(db, quest_id, recipient, amount, meta).await,
        QuestEvent::VestingRewardClaimed {
            quest_id,
            recipient,
            amount,
        } => handle_vesting_reward_claimed(db, quest_id, recipient, amount, meta).await,
        QuestEvent::Canceled { quest_id } => {
            force_terminal_status(db, quest_id, QuestStatus::Canceled).await
        }
        QuestEvent::RemainingRewardsWithdrawn { quest_id, .. } => {
            force_terminal_status(db, quest_id, QuestStatus::Closed).await
        }
    }
}

async fn handle_quest_created(
    db: &DatabaseConnection,
    client: &ChainClient,
    retry: &RetryPolicy,
    quest_id: U256,
    sponsor: Address,
    meta: LogMeta,
) -> Result<(), IndexerError> {
    let now_ms = Utc::now().timestamp_millis();

    let quest = match retry
        .run(|| client.quest_info(quest_id), IndexerError::is_retryable)
        .await
    {
        Ok(info) => confirmed_quest_model(quest_id, info, &meta, now_ms),
        Err(err) => {
            tracing::warn!(
                quest_id = %quest_id,
                error = %err,
                "contract read failed, storing degraded quest record"
            );
            degraded_quest_model(quest_id, sponsor, &meta, now_ms)
        }
    };

    repository::quests::upsert(db, quest).await?;
    tracing::info!(quest_id = %quest_id, block = meta.block_number, "quest created");
    Ok(())
}

async fn handle_reward_claimed(
    db: &DatabaseConnection,
    quest_id: U256,
    recipient: Address,
    amount: U256,
    meta: LogMeta,
) -> Result<(), IndexerError> {
    let id = quest_id.to_string();
    let now_ms = Utc::now().timestamp_millis();

    repository::participations::upsert(
        db,
        participation_model(&id, recipient, amount, &meta, now_ms),
    )
    .await?;

    let affected = repository::quests::increment_participant_count(db, &id).await?;
    if affected == 0 {
        tracing::warn!(quest_id = %id, "reward claimed for unknown quest");
        return Ok(());
    }

    // the claim may have filled the quest; persist the status only if it moved
    if let Some(quest) = repository::quests::find_by_id(db, &id).await? {
        let next = calculate_status(&quest, now_ms);
        if next != quest.status {
            repository::quests::set_status(db, &id, next).await?;
        }
    }

    Ok(())
}

async fn handle_vesting_reward_claimed(
    db: &DatabaseConnection,
    quest_id: U256,
    recipient: Address,
    amount: U256,
    meta: LogMeta,
) -> Result<(), IndexerError> {
    let id = quest_id.to_string();
    let now_ms = Utc::now().timestamp_millis();

    // the initial claim already counted this participant
    repository::participations::upsert(
        db,
        participation_model(&id, recipient, amount, &meta, now_ms),
    )
    .await?;

    Ok(())
}

async fn force_terminal_status(
    db: &DatabaseConnection,
    quest_id: U256,
    status: QuestStatus,
) -> Result<(), IndexerError> {
    let id = quest_id.to_string();
    let affected = repository::quests::set_status(db, &id, status.clone()).await?;
    if affected == 0 {
        tracing::warn!(quest_id = %id, ?status, "terminal status for unknown quest");
    } else {
        tracing::info!(quest_id = %id, ?status, "quest reached terminal status");
    }
    Ok(())
}

/// Recomputes the stored status of every quest at `now_ms` and persists the
/// ones that moved. Terminal quests never move. Returns the update count.
pub async fn refresh_quest_statuses(
    db: &DatabaseConnection,
    now_ms: i64,
) -> Result<u64, IndexerError> {
    let mut updated = 0;
    for quest in repository::quests::all(db).await? {
        let next = calculate_status(&quest, now_ms);
        if next != quest.status {
            updated += repository::quests::set_status(db, &quest.id, next).await?;
        }
    }
    Ok(updated)
}

pub(crate) fn confirmed_quest_model(
    quest_id: U256,
    info: QuestInfo,
    meta: &LogMeta,
    now_ms: i64,
) -> quests::ActiveModel {
    quests::ActiveModel {
        id: Set(quest_id.to_string()),
        sponsor: Set(info.sponsor.as_slice().to_vec()),
        title: Set(info.title),
        description: Set(info.description),
        quest_type: Set(info.questType),
        total_rewards: Set(info.totalRewards.to_string()),
        reward_per_user: Set(info.rewardPerUser.to_string()),
        max_participants: Set(info.maxParticipants as i32),
        participant_count: Set(0),
        start_time: Set(info.startTime as i64),
        end_time: Set(info.endTime as i64),
        claim_deadline: Set(info.claimDeadline as i64),
        status: Set(status_for_window(
            info.startTime as i64,
            info.endTime as i64,
            now_ms,
        )),
        vesting: Set(info.vesting),
        vesting_duration: Set(info.vestingDuration as i64),
        verification_metadata: Set(
            (!info.verificationMetadata.is_empty()).then_some(info.verificationMetadata)
        ),
        source: Set(QuestSource::Confirmed),
        transaction_hash: Set(meta.transaction_hash.as_slice().to_vec()),
        block_number: Set(meta.block_number as i64),
        created_at: Set(now_ms),
        updated_at: Set(now_ms),
    }
}

pub(crate) fn degraded_quest_model(
    quest_id: U256,
    sponsor: Address,
    meta: &LogMeta,
    now_ms: i64,
) -> quests::ActiveModel {
    let end_time = now_ms + DEGRADED_QUEST_WINDOW_MS;
    quests::ActiveModel {
        id: Set(quest_id.to_string()),
        sponsor: Set(sponsor.as_slice().to_vec()),
        title: Set(format!("quest-{quest_id}")),
        description: Set(String::new()),
        quest_type: Set(String::new()),
        total_rewards: Set("0".to_string()),
        reward_per_user: Set("0".to_string()),
        max_participants: Set(DEGRADED_MAX_PARTICIPANTS),
        participant_count: Set(0),
        start_time: Set(now_ms),
        end_time: Set(end_time),
        claim_deadline: Set(end_time + DEGRADED_QUEST_WINDOW_MS),
        status: Set(QuestStatus::Active),
        vesting: Set(false),
        vesting_duration: Set(0),
        verification_metadata: Set(None),
        source: Set(QuestSource::Degraded),
        transaction_hash: Set(meta.transaction_hash.as_slice().to_vec()),
        block_number: Set(meta.block_number as i64),
        created_at: Set(now_ms),
        updated_at: Set(now_ms),
    }
}

fn participation_model(
    quest_id: &str,
    user: Address,
    amount: U256,
    meta: &LogMeta,
    now_ms: i64,
) -> participations::ActiveModel {
    participations::ActiveModel {
        quest_id: Set(quest_id.to_string()),
        user_address: Set(user.as_slice().to_vec()),
        amount: Set(amount.to_string()),
        claimed_at: Set(now_ms),
        transaction_hash: Set(meta.transaction_hash.as_slice().to_vec()),
        block_number: Set(meta.block_number as i64),
        created_at: Set(now_ms),
        updated_at: Set(now_ms),
    }
}
