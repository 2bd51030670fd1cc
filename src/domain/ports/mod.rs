pub mod clock;
pub mod embedding_port;
pub mod retriever;
pub mod snapshot_store;
