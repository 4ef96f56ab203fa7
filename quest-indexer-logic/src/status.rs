//! Pure, time-driven derivations over stored quests: lifecycle status,
//! read-side metrics, and the creation-time timing rule set. No I/O here;
//! callers decide whether to persist a recomputed status.

use alloy::primitives::U256;
use anyhow::Context;
use entity::{quests, sea_orm_active_enums::QuestStatus};
use thiserror::Error;

pub const MIN_QUEST_DURATION_MS: i64 = 60 * 60 * 1000;
pub const MAX_QUEST_DURATION_MS: i64 = 30 * 24 * 60 * 60 * 1000;
pub const MIN_CLAIM_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Status implied by the quest time window alone, ignoring terminal states.
pub fn status_for_window(start_ms: i64, end_ms: i64, now_ms: i64) -> QuestStatus {
    if now_ms < start_ms {
        QuestStatus::Pending
    } else if now_ms < end_ms {
        QuestStatus::Active
    } else {
        QuestStatus::Ended
    }
}

/// Lifecycle status of a stored quest at `now_ms`. Terminal statuses
/// (`canceled`, `closed`) are sticky and returned unchanged.
pub fn calculate_status(quest: &quests::Model, now_ms: i64) -> QuestStatus {
    if quest.status.is_terminal() {
        quest.status.clone()
    } else {
        status_for_window(quest.start_time, quest.end_time, now_ms)
    }
}

/// The read contract exposed to the API layer, computed on demand since
/// every field is time-dependent.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestMetrics {
    pub status: QuestStatus,
    pub can_participate: bool,
    pub can_claim_rewards: bool,
    pub progress_percentage: f64,
    pub participation_percentage: f64,
    pub remaining_spots: u32,
    /// Decimal string in the smallest currency unit; computed with integer
    /// arithmetic only.
    pub remaining_rewards: String,
}

pub fn quest_metrics(quest: &quests::Model, now_ms: i64) -> anyhow::Result<QuestMetrics> {
    let status = calculate_status(quest, now_ms);
    let max_participants = quest.max_participants.max(0) as u32;
    let participant_count = quest.participant_count.max(0) as u32;
    let remaining_spots = max_participants.saturating_sub(participant_count);

    let reward_per_user: U256 = quest
        .reward_per_user
        .parse()
        .with_context(|| format!("invalid reward_per_user for quest {}", quest.id))?;
    let remaining_rewards = reward_per_user
        .checked_mul(U256::from(remaining_spots))
        .context("remaining rewards overflow")?;

    let progress_percentage = if now_ms <= quest.start_time {
        0.0
    } else if now_ms >= quest.end_time {
        100.0
    } else {
        (now_ms - quest.start_time) as f64 / (quest.end_time - quest.start_time) as f64 * 100.0
    };

    let participation_percentage = if max_participants == 0 {
        0.0
    } else {
        (participant_count as f64 / max_participants as f64 * 100.0).clamp(0.0, 100.0)
    };

    Ok(QuestMetrics {
        can_participate: status == QuestStatus::Active && participant_count < max_participants,
        can_claim_rewards: status == QuestStatus::Ended && now_ms <= quest.claim_deadline,
        status,
        progress_percentage,
        participation_percentage,
        remaining_spots,
        remaining_rewards: remaining_rewards.to_string(),
    })
}

/// Timing rules checked when a quest is created through the API layer.
/// Not applied during ingestion: the chain is authoritative there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimingRule {
    #[error("start time must be in the future")]
    StartInPast,
    #[error("end time must be after start time")]
    EndBeforeStart,
    #[error("claim deadline must be after end time")]
    ClaimDeadlineBeforeEnd,
    #[error("quest duration must be at least one hour")]
    DurationTooShort,
    #[error("quest duration must be at most thirty days")]
    DurationTooLong,
    #[error("claim window must be at least one day")]
    ClaimWindowTooShort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingValidation {
    pub valid: bool,
    pub violations: Vec<TimingRule>,
}

pub fn validate_timing(
    start_ms: i64,
    end_ms: i64,
    claim_deadline_ms: i64,
    now_ms: i64,
) -> TimingValidation {
    let mut violations = Vec::new();

    if start_ms <= now_ms {
        violations.push(TimingRule::StartInPast);
    }
    if end_ms <= start_ms {
        violations.push(TimingRule::EndBeforeStart);
    }
    if claim_deadline_ms <= end_ms {
        violations.push(TimingRule::ClaimDeadlineBeforeEnd);
    }

    let duration = end_ms - start_ms;
    if duration > 0 {
        if duration < MIN_QUEST_DURATION_MS {
            violations.push(TimingRule::DurationTooShort);
        }
        if duration > MAX_QUEST_DURATION_MS {
            violations.push(TimingRule::DurationTooLong);
        }
    }
    if claim_deadline_ms > end_ms && claim_deadline_ms - end_ms < MIN_CLAIM_WINDOW_MS {
        violations.push(TimingRule::ClaimWindowTooShort);
    }

    TimingValidation {
        valid: violations.is_empty(),
        violations,
    }
}
