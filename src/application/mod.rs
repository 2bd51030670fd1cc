pub mod document_store;
pub mod ingest;
pub mod rate_limit;
pub mod retrieve;
