use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("participations_quest_id_index")
                    .table(Participations::Table)
                    .col(Participations::QuestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("quests_status_index")
                    .table(Quests::Table)
                    .col(Quests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("quests_sponsor_index")
                    .table(Quests::Table)
                    .col(Quests::Sponsor)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("quests_sponsor_index")
                    .table(Quests::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("quests_status_index")
                    .table(Quests::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("participations_quest_id_index")
                    .table(Participations::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Quests {
    Table,
    Status,
    Sponsor,
}

#[derive(DeriveIden)]
enum Participations {
    Table,
    QuestId,
}
