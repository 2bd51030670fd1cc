use clap::Parser;
use ragdesk::application::ingest::IngestRecord;
use ragdesk::cli::commands::{Cli, Commands};
use ragdesk::config::Config;
use ragdesk::domain::entities::document::Metadata;
use ragdesk::infrastructure::seed::{cricket_knowledge_base, CRICKET_SOURCE};
use ragdesk::RagDesk;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragdesk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let desk = match Config::from_env().and_then(|cfg| RagDesk::new(&cfg)) {
        Ok(desk) => desk,
        Err(e) => {
            eprintln!("Error initializing ragdesk: {e}");
            std::process::exit(1);
        }
    };

    let cleanup = desk.start_cleanup();
    let result = run_command(&desk, cli.command).await;
    cleanup.stop().await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(desk: &RagDesk, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Add {
            content,
            title,
            source,
            meta,
        } => {
            let metadata = build_metadata(title, source, meta)?;
            let outcome = desk.add_document(content, metadata).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Search { query, top_k } => {
            let results = desk
                .search(&query, top_k.unwrap_or(desk.default_top_k()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Ask { user, query, top_k } => {
            let response = desk
                .retrieve(&user, &query, top_k.unwrap_or(desk.default_top_k()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::List => {
            println!("{}", serde_json::to_string_pretty(&desk.list_documents())?);
        }
        Commands::Count => {
            println!("{}", desk.count());
        }
        Commands::Clear => {
            desk.clear()?;
            println!("Cleared all documents");
        }
        Commands::Ingest { file, source } => {
            let records: Vec<IngestRecord> = match &file {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => cricket_knowledge_base(),
            };
            let source = source.unwrap_or_else(|| match file {
                Some(_) => "file".to_string(),
                None => CRICKET_SOURCE.to_string(),
            });
            let report = desk.ingest(&records, &source).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn build_metadata(
    title: Option<String>,
    source: Option<String>,
    meta: Option<String>,
) -> Result<Option<Metadata>, Box<dyn std::error::Error>> {
    let mut metadata = match meta {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw)? {
            serde_json::Value::Object(map) => map,
            _ => return Err("--meta must be a JSON object".into()),
        },
        None => Metadata::new(),
    };
    if let Some(title) = title {
        metadata.insert("title".into(), title.into());
    }
    if let Some(source) = source {
        metadata.insert("source".into(), source.into());
    }
    Ok((!metadata.is_empty()).then_some(metadata))
}
