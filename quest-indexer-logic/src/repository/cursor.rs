use chrono::Utc;
use entity::indexer_cursors::{self, Entity as IndexerCursors};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

/// The cursor is a singleton row; the indexer is its only writer.
const CURSOR_ID: i32 = 1;

pub async fn get(db: &DatabaseConnection) -> Result<Option<indexer_cursors::Model>, DbErr> {
    IndexerCursors::find_by_id(CURSOR_ID).one(db).await
}

/// Creates the cursor row if it does not exist yet; idempotent.
pub async fn init(
    db: &DatabaseConnection,
    contract_address: Vec<u8>,
    deploy_block: u64,
) -> Result<(), DbErr> {
    let model = indexer_cursors::ActiveModel {
        id: Set(CURSOR_ID),
        last_processed_block: Set(deploy_block as i64 - 1),
        contract_address: Set(contract_address),
        contract_deploy_block: Set(deploy_block as i64),
        last_updated: Set(Utc::now().timestamp_millis()),
    };

    let result = IndexerCursors::insert(model)
        .on_conflict(
            OnConflict::column(indexer_cursors::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(err) => Err(err),
    }
}

pub async fn advance(db: &DatabaseConnection, block: u64) -> Result<(), DbErr> {
    set_last_processed(db, block as i64).await
}

pub async fn rewind(db: &DatabaseConnection, block: i64) -> Result<(), DbErr> {
    set_last_processed(db, block).await
}

async fn set_last_processed(db: &DatabaseConnection, block: i64) -> Result<(), DbErr> {
    IndexerCursors::update_many()
        .col_expr(indexer_cursors::Column::LastProcessedBlock, Expr::value(block))
        .col_expr(
            indexer_cursors::Column::LastUpdated,
            Expr::value(Utc::now().timestamp_millis()),
        )
        .filter(indexer_cursors::Column::Id.eq(CURSOR_ID))
        .exec(db)
        .await?;
    Ok(())
}
