use entity::participations::{self, Entity as Participations};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Upsert keyed by (quest id, claimant address). A repeat claim for the same
/// key overwrites the row: last write wins, by design, pending product
/// clarification on repeat/vesting claims.
pub async fn upsert(
    db: &DatabaseConnection,
    participation: participations::ActiveModel,
) -> Result<(), DbErr> {
    Participations::insert(participation)
        .on_conflict(
            OnConflict::columns([
                participations::Column::QuestId,
                participations::Column::UserAddress,
            ])
            .update_columns([
                participations::Column::Amount,
                participations::Column::ClaimedAt,
                participations::Column::TransactionHash,
                participations::Column::BlockNumber,
                participations::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

pub async fn find(
    db: &DatabaseConnection,
    quest_id: &str,
    user_address: &[u8],
) -> Result<Option<participations::Model>, DbErr> {
    Participations::find_by_id((quest_id.to_string(), user_address.to_vec()))
        .one(db)
        .await
}

pub async fn list_by_quest(
    db: &DatabaseConnection,
    quest_id: &str,
) -> Result<Vec<participations::Model>, DbErr> {
    Participations::find()
        .filter(participations::Column::QuestId.eq(quest_id))
        .order_by_asc(participations::Column::ClaimedAt)
        .all(db)
        .await
}
