use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::sync::watch;

use nyaya_core::config::{Config, ProviderKind};
use nyaya_core::query::QueryPipeline;
use nyaya_core::summarize::Summarizer;
#[cfg(feature = "pdf")]
use nyaya_corpus::PdfLoader;
use nyaya_corpus::{
    CsvLoader, DocumentLoader, DocxLoader, IngestionPipeline, TextLoader, TextSplitter,
};
use nyaya_gateway::GatewayServer;
use nyaya_index::{FlatIndex, Retriever};
use nyaya_llm::LlmProvider;
use nyaya_llm::any::AnyProvider;
use nyaya_llm::gemini::GeminiProvider;
use nyaya_llm::together::TogetherProvider;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Ingest,
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = resolve_config_path(&args);
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    match parse_command(&args)? {
        Command::Ingest => ingest(&config).await,
        Command::Serve => serve(&config).await,
    }
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 2,
            flag if flag.starts_with("--") => i += 1,
            "ingest" => return Ok(Command::Ingest),
            "serve" => return Ok(Command::Serve),
            other => bail!("unknown command: {other} (expected 'ingest' or 'serve')"),
        }
    }
    Ok(Command::Serve)
}

/// Priority: CLI `--config` > `NYAYA_CONFIG` env > `config/default.toml`
fn resolve_config_path(args: &[String]) -> PathBuf {
    if let Some(path) = args.windows(2).find(|w| w[0] == "--config").map(|w| &w[1]) {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("NYAYA_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

/// Build the retrieval index from the configured corpus and write the
/// snapshot, replacing any previous one.
async fn ingest(config: &Config) -> anyhow::Result<()> {
    let provider = create_embedding_provider(config)?;
    let splitter = TextSplitter::new(config.chunker.splitter());
    let mut pipeline = IngestionPipeline::new(splitter, Box::new(provider.embed_fn()));

    let text = TextLoader::default();
    let docx = DocxLoader::default();
    let csv = CsvLoader::default();
    #[cfg(feature = "pdf")]
    let pdf = PdfLoader::default();

    let mut loaders: Vec<&dyn DocumentLoader> = vec![&text, &docx];
    #[cfg(feature = "pdf")]
    loaders.push(&pdf);

    let mut total = pipeline
        .ingest_dir(&config.corpus.dir, &loaders)
        .await
        .with_context(|| format!("ingesting corpus directory {}", config.corpus.dir.display()))?;

    for dataset in &config.corpus.datasets {
        let count = pipeline
            .load_and_ingest(&csv, dataset)
            .await
            .with_context(|| format!("ingesting dataset {}", dataset.display()))?;
        tracing::info!(path = %dataset.display(), chunks = count, "ingested dataset");
        total += count;
    }

    let index = pipeline.into_index();
    index
        .save(&config.index.snapshot_path)
        .with_context(|| format!("writing snapshot {}", config.index.snapshot_path.display()))?;

    tracing::info!(
        chunks = total,
        snapshot = %config.index.snapshot_path.display(),
        "ingestion complete"
    );
    Ok(())
}

/// Load the snapshot and serve HTTP until ctrl-c.
async fn serve(config: &Config) -> anyhow::Result<()> {
    let index = FlatIndex::load(&config.index.snapshot_path).with_context(|| {
        format!(
            "loading snapshot {} (run `nyaya ingest` first)",
            config.index.snapshot_path.display()
        )
    })?;
    let chunks = index.len();

    let generator = Arc::new(create_provider(config)?);
    let embedder = if matches!(generator.as_ref(), AnyProvider::Gemini(_)) {
        Arc::clone(&generator)
    } else {
        Arc::new(create_embedding_provider(config)?)
    };
    tracing::info!(provider = generator.name(), chunks, "query service ready");

    let retriever =
        Retriever::new(Arc::new(index), Arc::clone(&embedder)).with_top_k(config.index.top_k);
    let pipeline = QueryPipeline::new(retriever, Arc::clone(&generator));
    let summarizer = Summarizer::new(generator, embedder);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    GatewayServer::new(
        &config.server.host,
        config.server.port,
        pipeline,
        summarizer,
        shutdown_rx,
    )
    .with_chunk_count(chunks)
    .with_max_body_size(config.server.max_body_bytes)
    .serve()
    .await?;

    Ok(())
}

fn create_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    match config.llm.provider {
        ProviderKind::Gemini => {
            let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY not set")?;
            Ok(AnyProvider::Gemini(GeminiProvider::new(
                api_key,
                config.llm.model.clone(),
                config.llm.embedding_model.clone(),
            )))
        }
        ProviderKind::Together => {
            let api_key = std::env::var("TOGETHER_API_KEY").context("TOGETHER_API_KEY not set")?;
            Ok(AnyProvider::Together(TogetherProvider::new(
                api_key,
                config.llm.model.clone(),
                config.llm.max_tokens,
            )))
        }
    }
}

/// Embeddings always go through Gemini; Together exposes no embedding
/// endpoint.
fn create_embedding_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .context("GEMINI_API_KEY not set (embeddings require Gemini)")?;
    Ok(AnyProvider::Gemini(GeminiProvider::new(
        api_key,
        config.llm.model.clone(),
        config.llm.embedding_model.clone(),
    )))
}
