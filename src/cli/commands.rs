use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ragdesk", about = "Semantic document store and rate-limited retrieval for chat backends")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed and store a document
    Add {
        /// Document text
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        source: Option<String>,
        /// Extra metadata as a JSON object
        #[arg(long)]
        meta: Option<String>,
    },
    /// Rank stored documents against a query
    Search {
        query: String,
        /// Defaults to RAGDESK_TOP_K
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Rate-limited retrieval on behalf of a user
    Ask {
        /// Caller key (user id)
        user: String,
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print every stored document
    List,
    /// Print the number of stored documents
    Count,
    /// Remove every document
    Clear,
    /// Bulk-load `{title, content}` records
    Ingest {
        /// JSON array of records; the built-in cricket knowledge base when omitted
        #[arg(long)]
        file: Option<String>,
        /// Value stored in each record's `source` metadata
        #[arg(long)]
        source: Option<String>,
    },
}
