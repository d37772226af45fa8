//! Core types and traits for the Reel movie catalog.
//!
//! This crate provides the domain types shared by the catalog facade and
//! the store backends, along with the [`DocumentStore`] transport seam.

pub mod catalog;
pub mod error;
pub mod movie;
pub mod movie_id;
pub mod path;
pub mod store;

pub use catalog::Catalog;
pub use error::{CatalogError, CoreError, StoreError};
pub use movie::{Movie, MovieRecord};
pub use movie_id::MovieId;
pub use path::DbPath;
pub use store::DocumentStore;
