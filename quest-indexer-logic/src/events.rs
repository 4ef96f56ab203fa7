use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::Log,
    sol,
    sol_types::SolEvent,
};

use crate::error::IndexerError;

sol! {
    /// Canonical quest data as returned by the contract's `quests` view.
    struct QuestInfo {
        address sponsor;
        string title;
        string description;
        string questType;
        uint256 totalRewards;
        uint256 rewardPerUser;
        uint32 maxParticipants;
        uint64 startTime;
        uint64 endTime;
        uint64 claimDeadline;
        bool vesting;
        uint64 vestingDuration;
        string verificationMetadata;
    }

    interface IQuestBoard {
        function quests(uint256 questId) external view returns (QuestInfo memory);

        event QuestCreated(uint256 indexed questId, address indexed sponsor);
        event RewardClaimed(uint256 indexed questId, address indexed recipient, uint256 amount);
        event QuestCanceled(uint256 indexed questId);
        event VestingRewardClaimed(uint256 indexed questId, address indexed recipient, uint256 amount);
        event RemainingRewardsWithdrawn(uint256 indexed questId, address indexed sponsor, uint256 amount);
    }
}

/// On-chain provenance of a decoded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogMeta {
    pub block_number: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestEvent {
    Created {
        quest_id: U256,
        sponsor: Address,
    },
    RewardClaimed {
        quest_id: U256,
        recipient: Address,
        amount: U256,
    },
    Canceled {
        quest_id: U256,
    },
    VestingRewardClaimed {
        quest_id: U256,
        recipient: Address,
        amount: U256,
    },
    RemainingRewardsWithdrawn {
        quest_id: U256,
        sponsor: Address,
        amount: U256,
    },
}

/// Decodes a raw log against the known event signatures. Unknown events
/// yield `Ok(None)` and are ignored for forward compatibility; malformed
/// payloads yield an error that skips only this log, never the batch.
pub fn decode(log: &Log) -> Result<Option<(QuestEvent, LogMeta)>, IndexerError> {
    let meta = LogMeta {
        block_number: log
            .block_number
            .ok_or_else(|| IndexerError::Decode("log is missing a block number".to_string()))?,
        transaction_hash: log
            .transaction_hash
            .ok_or_else(|| IndexerError::Decode("log is missing a transaction hash".to_string()))?,
    };

    let event = match log.topic0() {
        Some(&IQuestBoard::QuestCreated::SIGNATURE_HASH) => {
            let event = decode_inner::<IQuestBoard::QuestCreated>(log)?;
            QuestEvent::Created {
                quest_id: event.questId,
                sponsor: event.sponsor,
            }
        }
        Some(&IQuestBoard::RewardClaimed::SIGNATURE_HASH) => {
            let event = decode_inner::<IQuestBoard::RewardClaimed>(log)?;
            QuestEvent::RewardClaimed {
                quest_id: event.questId,
                recipient: event.recipient,
                amount: event.amount,
            }
        }
        Some(&IQuestBoard::QuestCanceled::SIGNATURE_HASH) => {
            let event = decode_inner::<IQuestBoard::QuestCanceled>(log)?;
            QuestEvent::Canceled {
                quest_id: event.questId,
            }
        }
        Some(&IQuestBoard::VestingRewardClaimed::SIGNATURE_HASH) => {
            let event = decode_inner::<IQuestBoard::VestingRewardClaimed>(log)?;
            QuestEvent::VestingRewardClaimed {
                quest_id: event.questId,
                recipient: event.recipient,
                amount: event.amount,
            }
        }
        Some(&IQuestBoard::RemainingRewardsWithdrawn::SIGNATURE_HASH) => {
            let event = decode_inner::<IQuestBoard::RemainingRewardsWithdrawn>(log)?;
            QuestEvent::RemainingRewardsWithdrawn {
                quest_id: event.questId,
                sponsor: event.sponsor,
                amount: event.amount,
            }
        }
        topic0 => {
            tracing::trace!(?topic0, "ignoring unknown event");
            return Ok(None);
        }
    };

    Ok(Some((event, meta)))
}

fn decode_inner<E: SolEvent>(log: &Log) -> Result<E, IndexerError> {
    log.log_decode::<E>()
        .map(|log| log.inner.data)
        .map_err(|err| IndexerError::Decode(err.to_string()))
}
