//! Catch-up and polling orchestration. Owns the cursor and sequences the
//! chain client, decoder, handlers and status refresh.

pub mod settings;

use alloy::primitives::Address;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::time::sleep;
use tracing::instrument;

use crate::{
    client::ChainClient, error::IndexerError, events, handlers, repository, retry::RetryPolicy,
};
use settings::IndexerSettings;

/// Operational status probe, computed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerStatus {
    pub running: bool,
    pub polling: bool,
    pub last_processed_block: Option<i64>,
    pub current_height: Option<u64>,
    pub contract_address: Address,
    pub deployment_block: u64,
}

/// One instance per process, constructed at startup with its dependencies as
/// fields. Mutual exclusion between catch-up runs is a compare-and-swap flag
/// scoped to this process: running two instances against the same persisted
/// cursor is unsafe and needs an external lock keyed on the contract address.
pub struct QuestIndexer {
    client: ChainClient,
    db: Arc<DatabaseConnection>,
    settings: IndexerSettings,
    retry: RetryPolicy,
    running: AtomicBool,
    polling: AtomicBool,
}

impl QuestIndexer {
    pub fn new(client: ChainClient, db: Arc<DatabaseConnection>, settings: IndexerSettings) -> Self {
        let retry = settings.retry.policy();
        Self {
            client,
            db,
            settings,
            retry,
            running: AtomicBool::new(false),
            polling: AtomicBool::new(false),
        }
    }

    /// Persists the indexer configuration as the cursor row; idempotent.
    pub async fn initialize(&self) -> Result<(), IndexerError> {
        if self.settings.contract_address == Address::ZERO {
            return Err(IndexerError::Configuration(
                "contract address is not set".to_string(),
            ));
        }
        repository::cursor::init(
            &self.db,
            self.settings.contract_address.as_slice().to_vec(),
            self.settings.deployment_block,
        )
        .await?;
        tracing::info!(
            contract_address = %self.settings.contract_address,
            deployment_block = self.settings.deployment_block,
            "indexer initialized"
        );
        Ok(())
    }

    /// One sequential ingestion pass from the cursor to the chain head,
    /// followed by a status refresh. A no-op if a run is already in flight.
    #[instrument(name = "quest_indexer::catch_up", skip_all)]
    pub async fn catch_up(&self) -> Result<(), IndexerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::info!("catch-up already in progress, skipping");
            return Ok(());
        }

        let result = self.run_catch_up().await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Spawns the repeating poll tick. Each tick runs the same guarded
    /// catch-up; a tick that finds the guard held skips, nothing queues.
    pub fn start_polling(self: Arc<Self>) {
        if self.polling.swap(true, Ordering::SeqCst) {
            tracing::info!("polling is already active");
            return;
        }

        let interval = self.settings.polling_interval;
        tracing::info!(?interval, "polling started");
        tokio::spawn(async move {
            loop {
                sleep(interval).await;
                if !self.polling.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(err) = self.catch_up().await {
                    tracing::error!(error = %err, "poll tick failed");
                }
            }
        });
    }

    /// Prevents future ticks; an in-flight tick runs to completion.
    pub fn stop_polling(&self) {
        if self.polling.swap(false, Ordering::SeqCst) {
            tracing::info!("polling stopped");
        }
    }

    /// Rewinds the cursor to `block - 1` and re-ingests from there.
    pub async fn reindex_from_block(&self, block: u64) -> Result<(), IndexerError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(IndexerError::Busy);
        }
        tracing::info!(block, "rewinding cursor for reindex");
        repository::cursor::rewind(&self.db, block as i64 - 1).await?;
        self.catch_up().await
    }

    /// Recomputes every stored quest's status at the current clock.
    pub async fn update_quest_statuses(&self) -> Result<u64, IndexerError> {
        handlers::refresh_quest_statuses(&self.db, Utc::now().timestamp_millis()).await
    }

    pub async fn status(&self) -> IndexerStatus {
        let cursor = repository::cursor::get(&self.db).await.ok().flatten();
        let current_height = self.client.current_height().await.ok();
        IndexerStatus {
            running: self.running.load(Ordering::SeqCst),
            polling: self.polling.load(Ordering::SeqCst),
            last_processed_block: cursor.map(|cursor| cursor.last_processed_block),
            current_height,
            contract_address: self.settings.contract_address,
            deployment_block: self.settings.deployment_block,
        }
    }

    async fn run_catch_up(&self) -> Result<(), IndexerError> {
        let cursor = repository::cursor::get(&self.db).await?.ok_or_else(|| {
            IndexerError::Configuration("indexer cursor is not initialized".to_string())
        })?;

        let head = self
            .retry
            .run(|| self.client.current_height(), IndexerError::is_retryable)
            .await?;

        let mut from_block = (cursor.last_processed_block + 1).max(cursor.contract_deploy_block) as u64;
        if from_block > head {
            tracing::debug!(head, "cursor is at the chain head");
        }

        while from_block <= head {
            let to_block = (from_block + self.settings.batch_size - 1).min(head);
            self.process_batch(from_block, to_block).await;
            // the cursor advances even past a skipped batch: availability
            // over completeness
            repository::cursor::advance(&self.db, to_block).await?;
            from_block = to_block + 1;
        }

        let updated =
            handlers::refresh_quest_statuses(&self.db, Utc::now().timestamp_millis()).await?;
        if updated > 0 {
            tracing::info!(updated, "quest statuses refreshed");
        }

        Ok(())
    }

    async fn process_batch(&self, from_block: u64, to_block: u64) {
        let logs = match self
            .retry
            .run(
                || self.client.logs(from_block, to_block),
                IndexerError::is_retryable,
            )
            .await
        {
            Ok(logs) => logs,
            Err(err) => {
                tracing::error!(
                    from_block,
                    to_block,
                    error = %err,
                    "log fetch retries exhausted, skipping batch"
                );
                return;
            }
        };

        for log in &logs {
            match events::decode(log) {
                Ok(Some((event, meta))) => {
                    if let Err(err) =
                        handlers::apply_event(&self.db, &self.client, &self.retry, event, meta)
                            .await
                    {
                        tracing::error!(
                            block = log.block_number,
                            error = %err,
                            "failed to apply event"
                        );
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(block = log.block_number, error = %err, "skipping undecodable log");
                }
            }
        }

        tracing::info!(from_block, to_block, count = logs.len(), "processed batch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::IQuestBoard,
        repository,
        test_utils::{contract_address, init_db, mocked_client, quest_active_model, rpc_log},
    };
    use alloy::{
        primitives::{address, U256},
        providers::mock::Asserter,
        sol_types::SolEvent,
    };
    use entity::{quests, sea_orm_active_enums::QuestStatus};
    use pretty_assertions::assert_eq;
    use sea_orm::EntityTrait;

    fn test_settings() -> IndexerSettings {
        IndexerSettings {
            contract_address: contract_address(),
            deployment_block: 100,
            ..Default::default()
        }
    }

    async fn test_indexer(asserter: &Asserter) -> QuestIndexer {
        let db = init_db().await;
        let indexer = QuestIndexer::new(
            mocked_client(asserter),
            Arc::new(db),
            test_settings(),
        );
        indexer.initialize().await.unwrap();
        indexer
    }

    fn push_height(asserter: &Asserter, height: u64) {
        asserter.push_success(&height);
    }

    #[tokio::test]
    async fn single_batch_covers_a_short_gap() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        // deployment 100, head 105, batch size 100: exactly one batch [100, 105]
        push_height(&asserter, 105);
        let recipient = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        let logs = vec![rpc_log(
            IQuestBoard::RewardClaimed {
                questId: U256::from(7),
                recipient,
                amount: U256::from(1000),
            }
            .encode_log_data(),
            101,
        )];
        asserter.push_success(&logs);

        indexer.catch_up().await.unwrap();

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 105);

        // the single pushed response served the whole range
        let rows = repository::participations::list_by_quest(indexer.db.as_ref(), "7")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn wide_gap_is_split_into_fixed_size_batches() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        // head 250: batches [100, 199] and [200, 250]
        push_height(&asserter, 250);
        asserter.push_success(&Vec::<alloy::rpc::types::Log>::new());
        asserter.push_success(&Vec::<alloy::rpc::types::Log>::new());

        indexer.catch_up().await.unwrap();

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 250);
    }

    #[tokio::test]
    async fn catch_up_is_a_no_op_at_the_chain_head() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        repository::cursor::advance(indexer.db.as_ref(), 105).await.unwrap();
        push_height(&asserter, 105);

        indexer.catch_up().await.unwrap();

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 105);
    }

    #[tokio::test]
    async fn exhausted_log_fetch_skips_the_batch_but_advances_the_cursor() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;
        // Pause only after the DB pool is established: the sqlite connection is
        // set up on a real worker thread, and tokio's auto-advancing virtual
        // clock would otherwise race it to the acquire timeout (PoolTimedOut).
        tokio::time::pause();

        push_height(&asserter, 105);
        for _ in 0..5 {
            asserter.push_failure_msg("rate limited");
        }

        indexer.catch_up().await.unwrap();

        // the batch was lost, the watermark still moved past it
        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 105);
    }

    #[tokio::test]
    async fn degraded_quest_record_when_the_contract_read_keeps_failing() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;
        // Pause only after the DB pool is established: the sqlite connection is
        // set up on a real worker thread, and tokio's auto-advancing virtual
        // clock would otherwise race it to the acquire timeout (PoolTimedOut).
        tokio::time::pause();

        push_height(&asserter, 105);
        let sponsor = address!("0x8ba1f109551bD432803012645ac136c22C929B00");
        let logs = vec![rpc_log(
            IQuestBoard::QuestCreated {
                questId: U256::from(7),
                sponsor,
            }
            .encode_log_data(),
            101,
        )];
        asserter.push_success(&logs);
        // every quests() read attempt fails
        for _ in 0..5 {
            asserter.push_failure_msg("rate limited");
        }

        indexer.catch_up().await.unwrap();

        let quest = repository::quests::find_by_id(indexer.db.as_ref(), "7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quest.source, entity::sea_orm_active_enums::QuestSource::Degraded);
        assert_eq!(quest.sponsor, sponsor.as_slice().to_vec());

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 105);
    }

    #[tokio::test]
    async fn catch_up_refreshes_stored_statuses() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        // a quest whose window has long elapsed, still marked pending
        quests::Entity::insert(quest_active_model("9", 1_000, 10_000, 20_000))
            .exec(indexer.db.as_ref())
            .await
            .unwrap();

        repository::cursor::advance(indexer.db.as_ref(), 105).await.unwrap();
        push_height(&asserter, 105);

        indexer.catch_up().await.unwrap();

        let quest = repository::quests::find_by_id(indexer.db.as_ref(), "9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quest.status, QuestStatus::Ended);
    }

    #[tokio::test]
    async fn concurrent_catch_up_is_skipped() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        indexer.running.store(true, Ordering::SeqCst);
        // no responses pushed: a real run would fail loudly
        indexer.catch_up().await.unwrap();

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 99);
    }

    #[tokio::test]
    async fn reindex_is_rejected_while_a_run_is_in_flight() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        indexer.running.store(true, Ordering::SeqCst);
        let result = indexer.reindex_from_block(100).await;
        assert!(matches!(result, Err(IndexerError::Busy)));
    }

    #[tokio::test]
    async fn reindex_rewinds_and_reprocesses() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        repository::cursor::advance(indexer.db.as_ref(), 300).await.unwrap();

        push_height(&asserter, 250);
        asserter.push_success(&Vec::<alloy::rpc::types::Log>::new());
        asserter.push_success(&Vec::<alloy::rpc::types::Log>::new());

        indexer.reindex_from_block(100).await.unwrap();

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 250);
    }

    #[tokio::test]
    async fn initialize_rejects_a_missing_contract_address() {
        let asserter = Asserter::new();
        let db = init_db().await;
        let indexer = QuestIndexer::new(
            mocked_client(&asserter),
            Arc::new(db),
            IndexerSettings::default(),
        );

        let result = indexer.initialize().await;
        assert!(matches!(result, Err(IndexerError::Configuration(_))));
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let asserter = Asserter::new();
        let indexer = test_indexer(&asserter).await;

        repository::cursor::advance(indexer.db.as_ref(), 300).await.unwrap();
        indexer.initialize().await.unwrap();

        let cursor = repository::cursor::get(indexer.db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cursor.last_processed_block, 300);
        assert_eq!(cursor.contract_deploy_block, 100);
    }

    #[tokio::test]
    async fn status_reports_the_probe_surface() {
        let asserter = Asserter::new();
        let indexer = Arc::new(test_indexer(&asserter).await);

        push_height(&asserter, 123);
        let status = indexer.status().await;
        assert_eq!(status.running, false);
        assert_eq!(status.polling, false);
        assert_eq!(status.last_processed_block, Some(99));
        assert_eq!(status.current_height, Some(123));
        assert_eq!(status.contract_address, contract_address());
        assert_eq!(status.deployment_block, 100);

        indexer.clone().start_polling();
        assert!(indexer.status().await.polling);
        indexer.stop_polling();
        assert!(!indexer.status().await.polling);
    }
}
