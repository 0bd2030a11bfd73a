//! mnemo - index a directory of documents into an embedding store.
//!
//! Usage:
//!
//! ```text
//! mnemo <root-dir> [paths...]
//! ```
//!
//! With no paths, every document under the root is indexed. The Voyage API
//! key is read from the `VOYAGE_API_KEY` environment variable.

use std::sync::Arc;

use anyhow::{bail, Context};

use mnemo::chunking::FixedSizeChunker;
use mnemo::config;
use mnemo::domain::DocumentPath;
use mnemo::providers::documents::FilesystemSource;
use mnemo::providers::embedding::VoyageEmbedder;
use mnemo::services::IndexService;
use mnemo::storage::ChunkStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("indexing failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let root = match args.next() {
        Some(root) => root,
        None => bail!("usage: mnemo <root-dir> [paths...]"),
    };
    let requested: Vec<DocumentPath> = args.map(DocumentPath::new).collect();

    let settings_path = config::default_settings_path()?;
    let settings = config::load_settings(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;
    let api_key = config::api_key_from_env()?;

    let db_path = match &settings.storage.db_path {
        Some(path) => path.clone(),
        None => config::default_db_path()?,
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let embedder = VoyageEmbedder::custom(&settings.embedding.base_url, &api_key)
        .with_model(&settings.embedding.model)
        .with_batch_size(settings.embedding.batch_size)
        .with_max_concurrency(settings.embedding.max_concurrency)
        .with_max_retries(settings.embedding.max_retries)
        .with_client(
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(
                    settings.embedding.request_timeout_secs,
                ))
                .build()
                .context("building HTTP client")?,
        );

    let source = FilesystemSource::new(&root);
    let store = ChunkStore::open(&db_path)
        .await
        .with_context(|| format!("opening store at {}", db_path.display()))?;

    let service = IndexService::new(
        Arc::new(FixedSizeChunker::new(settings.chunking.chunk_size)),
        Arc::new(embedder),
        store.clone(),
    )
    .with_fail_fast(false);

    let outcome = if requested.is_empty() {
        service.index_all(&source).await?
    } else {
        service.index_paths(&source, &requested).await?
    };

    tracing::info!(
        indexed = outcome.documents_indexed,
        skipped = outcome.documents_skipped,
        chunks = outcome.chunks_written,
        duration_ms = outcome.duration_ms,
        "done"
    );
    for (path, error) in &outcome.failures {
        tracing::warn!(path = %path, error = %error, "document not indexed");
    }

    store.close().await?;

    if !outcome.is_clean() {
        bail!("{} document(s) failed to index", outcome.failures.len());
    }
    Ok(())
}
