//! Interactive chatbot over the violation catalog.
//!
//! Startup embeds every catalog description once, then the loop answers
//! questions until an exit keyword. Provider selection prefers a configured
//! remote endpoint, then a local ONNX model, then the hashed fallback.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trafficlaw_ai::{EmbeddingProvider, HashingEmbedder};
use trafficlaw_query::{DEFAULT_MIN_TOKENS, DEFAULT_THRESHOLD, MatchConfig, QueryEngine};
use trafficlaw_store::{CatalogIndex, load_catalog};

mod display;
mod repl;

/// Hỏi đáp vi phạm giao thông đường bộ.
#[derive(Parser)]
#[command(name = "trafficlaw")]
#[command(about = "Tra cứu mức phạt vi phạm giao thông từ câu hỏi tự do")]
#[command(version)]
struct Args {
    /// Violation catalog JSON file
    #[arg(
        long,
        env = "TRAFFICLAW_CATALOG",
        default_value = "data/violations.json"
    )]
    catalog: PathBuf,

    /// Directory containing model.onnx and tokenizer.json
    #[cfg(feature = "onnx")]
    #[arg(long, env = "TRAFFICLAW_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Base URL of a remote embedding endpoint
    #[cfg(feature = "http")]
    #[arg(long, env = "TRAFFICLAW_EMBED_ENDPOINT")]
    endpoint: Option<String>,

    /// Embedding dimension served by the remote endpoint
    #[cfg(feature = "http")]
    #[arg(long, default_value_t = 768)]
    endpoint_dim: usize,

    /// Minimum cosine similarity for an answer
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Minimum whitespace-separated tokens in a question
    #[arg(long, default_value_t = DEFAULT_MIN_TOKENS)]
    min_tokens: usize,
}

#[cfg_attr(not(any(feature = "onnx", feature = "http")), allow(unused_variables))]
fn select_provider(args: &Args) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    #[cfg(feature = "http")]
    if let Some(endpoint) = &args.endpoint {
        let remote = trafficlaw_ai::RemoteEmbedder::new(endpoint, args.endpoint_dim)
            .context("configuring embedding endpoint")?;
        return Ok(Box::new(remote));
    }

    #[cfg(feature = "onnx")]
    if let Some(model_dir) = &args.model_dir {
        let embedder =
            trafficlaw_ai::Embedder::load(model_dir).context("loading onnx embedding model")?;
        return Ok(Box::new(embedder));
    }

    tracing::warn!("no embedding model configured, using hashed bag-of-words fallback");
    Ok(Box::new(HashingEmbedder::default()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut provider = select_provider(&args)?;
    info!(
        provider = provider.name(),
        dim = provider.dim(),
        "embedding provider ready"
    );

    let records = load_catalog(&args.catalog).context("loading violation catalog")?;

    eprintln!("Đang tạo embedding mô tả vi phạm...");
    let index = CatalogIndex::build(records, &mut provider).context("building catalog index")?;
    eprintln!("Đã tạo xong embedding.");

    let config = MatchConfig {
        threshold: args.threshold,
        min_tokens: args.min_tokens,
    };
    let mut engine = QueryEngine::with_config(index, provider, config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run(&mut engine, stdin.lock(), &mut stdout)
}
