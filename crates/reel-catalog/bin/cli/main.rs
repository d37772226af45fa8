mod cli;

use crate::cli::{Command, StoreBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use reel_catalog::CatalogService;
use reel_core::{Catalog, DocumentStore, MovieId, MovieRecord};
use reel_keygen::{PushIdGenerator, PushIdSettings};
use reel_store::{InMemoryStore, RedisStore};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(
        store_backend = %config.store,
        node_id = config.node_id,
        "starting reel"
    );

    let generator = PushIdGenerator::new(PushIdSettings::builder().node_id(config.node_id).build())
        .context("invalid node id")?;

    match config.store {
        StoreBackendArg::InMemory => {
            let store = InMemoryStore::with_generator(generator);
            run(CatalogService::new(store), config.command).await
        }
        StoreBackendArg::Redis => {
            let url = config
                .redis_url
                .context("redis url is required when store backend is redis")?;
            let store = RedisStore::connect(&url)
                .await?
                .with_prefix(config.key_prefix)
                .with_generator(generator);
            run(CatalogService::new(store), config.command).await
        }
    }
}

async fn run<S: DocumentStore>(catalog: CatalogService<S>, command: Command) -> anyhow::Result<()> {
    let output = match command {
        Command::List => serde_json::to_value(catalog.fetch_movie_entries().await?)?,
        Command::Get { id } => {
            let id = MovieId::new(id)?;
            serde_json::to_value(catalog.fetch_movie_by_id(&id).await?)?
        }
        Command::Add { genre, fields } => {
            let movie = fields
                .into_iter()
                .fold(MovieRecord::new(genre), |movie, (key, raw)| {
                    let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                    movie.with_field(key, value)
                });
            serde_json::to_value(catalog.add_movie(movie).await?)?
        }
        Command::Genres => serde_json::to_value(catalog.fetch_genres().await?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
