pub mod document;
pub mod rate_limit;
