use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Network or rate-limit failure of an RPC call. The only retryable
    /// class: everything the transport reports is treated as transient.
    #[error("transient rpc failure: {0}")]
    TransientFetch(#[from] alloy::transports::TransportError),

    #[error("failed to decode log: {0}")]
    Decode(String),

    /// The authoritative contract read on quest creation failed. Triggers
    /// the degraded-record fallback, never a batch failure.
    #[error("contract read failed: {0}")]
    ContractRead(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("indexer run already in progress")]
    Busy,

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl IndexerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexerError::TransientFetch(_))
    }
}
