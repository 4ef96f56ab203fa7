pub mod client;
pub mod error;
pub mod events;
pub mod handlers;
pub mod indexer;
pub mod repository;
pub mod retry;
pub mod status;

#[cfg(test)]
pub mod test_utils;
