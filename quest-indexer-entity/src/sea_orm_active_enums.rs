use sea_orm::entity::prelude::*;

/// Quest lifecycle status. `Canceled` and `Closed` are terminal: once set
/// they are never overwritten by time-based recomputation.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum QuestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "ended")]
    Ended,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl QuestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuestStatus::Canceled | QuestStatus::Closed)
    }
}

/// Provenance of a quest record: `Confirmed` records were built from the
/// authoritative contract read, `Degraded` ones from bare event arguments
/// after that read failed. Degraded records are candidates for a later
/// reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum QuestSource {
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "degraded")]
    Degraded,
}
