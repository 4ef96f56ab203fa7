use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Schema is written with the portable DSL rather than raw SQL so the same
// migrations run on Postgres in production and on SQLite in the test suite.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quests::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Quests::Sponsor).binary().not_null())
                    .col(ColumnDef::new(Quests::Title).string().not_null())
                    .col(ColumnDef::new(Quests::Description).string().not_null())
                    .col(ColumnDef::new(Quests::QuestType).string().not_null())
                    .col(ColumnDef::new(Quests::TotalRewards).string().not_null())
                    .col(ColumnDef::new(Quests::RewardPerUser).string().not_null())
                    .col(ColumnDef::new(Quests::MaxParticipants).integer().not_null())
                    .col(ColumnDef::new(Quests::ParticipantCount).integer().not_null())
                    .col(ColumnDef::new(Quests::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Quests::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Quests::ClaimDeadline).big_integer().not_null())
                    .col(ColumnDef::new(Quests::Status).string().not_null())
                    .col(ColumnDef::new(Quests::Vesting).boolean().not_null())
                    .col(ColumnDef::new(Quests::VestingDuration).big_integer().not_null())
                    .col(ColumnDef::new(Quests::VerificationMetadata).string())
                    .col(ColumnDef::new(Quests::Source).string().not_null())
                    .col(ColumnDef::new(Quests::TransactionHash).binary().not_null())
                    .col(ColumnDef::new(Quests::BlockNumber).big_integer().not_null())
                    .col(ColumnDef::new(Quests::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Quests::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Participations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Participations::QuestId).string().not_null())
                    .col(ColumnDef::new(Participations::UserAddress).binary().not_null())
                    .col(ColumnDef::new(Participations::Amount).string().not_null())
                    .col(ColumnDef::new(Participations::ClaimedAt).big_integer().not_null())
                    .col(ColumnDef::new(Participations::TransactionHash).binary().not_null())
                    .col(ColumnDef::new(Participations::BlockNumber).big_integer().not_null())
                    .col(ColumnDef::new(Participations::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Participations::UpdatedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Participations::QuestId)
                            .col(Participations::UserAddress),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IndexerCursors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IndexerCursors::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IndexerCursors::LastProcessedBlock)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IndexerCursors::ContractAddress).binary().not_null())
                    .col(
                        ColumnDef::new(IndexerCursors::ContractDeployBlock)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IndexerCursors::LastUpdated).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IndexerCursors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Quests {
    Table,
    Id,
    Sponsor,
    Title,
    Description,
    QuestType,
    TotalRewards,
    RewardPerUser,
    MaxParticipants,
    ParticipantCount,
    StartTime,
    EndTime,
    ClaimDeadline,
    Status,
    Vesting,
    VestingDuration,
    VerificationMetadata,
    Source,
    TransactionHash,
    BlockNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Participations {
    Table,
    QuestId,
    UserAddress,
    Amount,
    ClaimedAt,
    TransactionHash,
    BlockNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IndexerCursors {
    Table,
    Id,
    LastProcessedBlock,
    ContractAddress,
    ContractDeployBlock,
    LastUpdated,
}
