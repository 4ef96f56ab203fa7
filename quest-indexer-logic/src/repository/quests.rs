use chrono::Utc;
use entity::{
    quests::{self, Entity as Quests},
    sea_orm_active_enums::QuestStatus,
};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<quests::Model>, DbErr> {
    Quests::find_by_id(id).one(db).await
}

pub async fn all(db: &DatabaseConnection) -> Result<Vec<quests::Model>, DbErr> {
    Quests::find().all(db).await
}

/// Upsert keyed by quest id; a replayed creation event overwrites the row.
/// `created_at` survives the overwrite.
pub async fn upsert(db: &DatabaseConnection, quest: quests::ActiveModel) -> Result<(), DbErr> {
    Quests::insert(quest)
        .on_conflict(
            OnConflict::column(quests::Column::Id)
                .update_columns([
                    quests::Column::Sponsor,
                    quests::Column::Title,
                    quests::Column::Description,
                    quests::Column::QuestType,
                    quests::Column::TotalRewards,
                    quests::Column::RewardPerUser,
                    quests::Column::MaxParticipants,
                    quests::Column::StartTime,
                    quests::Column::EndTime,
                    quests::Column::ClaimDeadline,
                    quests::Column::Status,
                    quests::Column::Vesting,
                    quests::Column::VestingDuration,
                    quests::Column::VerificationMetadata,
                    quests::Column::Source,
                    quests::Column::TransactionHash,
                    quests::Column::BlockNumber,
                    quests::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Unconditional status write; returns the number of affected rows so the
/// caller can notice a write against an unknown quest.
pub async fn set_status(
    db: &DatabaseConnection,
    id: &str,
    status: QuestStatus,
) -> Result<u64, DbErr> {
    let result = Quests::update_many()
        .col_expr(quests::Column::Status, Expr::value(status))
        .col_expr(
            quests::Column::UpdatedAt,
            Expr::value(Utc::now().timestamp_millis()),
        )
        .filter(quests::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Mirrors the on-chain claim count; deliberately no check against
/// `max_participants` (the contract is the enforcement point).
pub async fn increment_participant_count(db: &DatabaseConnection, id: &str) -> Result<u64, DbErr> {
    let result = Quests::update_many()
        .col_expr(
            quests::Column::ParticipantCount,
            Expr::col(quests::Column::ParticipantCount).add(1),
        )
        .col_expr(
            quests::Column::UpdatedAt,
            Expr::value(Utc::now().timestamp_millis()),
        )
        .filter(quests::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
