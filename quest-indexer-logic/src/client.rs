use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Filter, Log, TransactionRequest},
    sol_types::SolCall,
};

use crate::{
    error::IndexerError,
    events::{IQuestBoard, QuestInfo},
};

/// Boundary to the chain log source: current head, ordered event logs for a
/// block range, and the authoritative `quests` contract read.
pub struct ChainClient {
    provider: DynProvider<Ethereum>,
    contract_address: Address,
}

impl ChainClient {
    pub fn new(rpc_url: &str, contract_address: Address) -> Result<Self, IndexerError> {
        let url = rpc_url
            .parse()
            .map_err(|err| IndexerError::Configuration(format!("invalid rpc url: {err}")))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self {
            provider,
            contract_address,
        })
    }

    pub fn with_provider(provider: DynProvider<Ethereum>, contract_address: Address) -> Self {
        Self {
            provider,
            contract_address,
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub async fn current_height(&self) -> Result<u64, IndexerError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Logs emitted by the contract in `[from_block, to_block]`, in on-chain
    /// order.
    pub async fn logs(&self, from_block: u64, to_block: u64) -> Result<Vec<Log>, IndexerError> {
        let filter = Filter::new()
            .address(self.contract_address)
            .from_block(from_block)
            .to_block(to_block);
        Ok(self.provider.get_logs(&filter).await?)
    }

    /// Reads the canonical quest data from the contract. Transport failures
    /// are transient (retryable); an undecodable return is a contract-read
    /// failure and triggers the degraded-record fallback upstream.
    pub async fn quest_info(&self, quest_id: U256) -> Result<QuestInfo, IndexerError> {
        let call = IQuestBoard::questsCall { questId: quest_id };
        let request = TransactionRequest::default()
            .with_to(self.contract_address)
            .with_input(call.abi_encode());
        let output = self.provider.call(request).await?;
        IQuestBoard::questsCall::abi_decode_returns(&output)
            .map_err(|err| IndexerError::ContractRead(err.to_string()))
    }
}
