pub mod clock;
pub mod embeddings;
pub mod persistence;
pub mod seed;
