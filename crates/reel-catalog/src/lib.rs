//! Movie catalog facade.
//!
//! [`CatalogService`] implements [`reel_core::Catalog`] on top of any
//! [`reel_core::DocumentStore`]. The store handle is injected, so the same
//! service runs against Redis, the in-memory store, or a test double.
//!
//! ```rust
//! use reel_catalog::CatalogService;
//! use reel_core::{Catalog, MovieRecord};
//! use reel_store::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = CatalogService::new(InMemoryStore::new());
//!
//! let id = catalog.add_movie(MovieRecord::new("Action").with_field("title", "Heat")).await?;
//! let movie = catalog.fetch_movie_by_id(&id).await?;
//! assert_eq!(movie.map(|m| m.id), Some(id));
//! # Ok(())
//! # }
//! ```

pub mod service;

pub use service::CatalogService;
