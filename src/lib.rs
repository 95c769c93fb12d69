//! # Repokeeper
//!
//! Repository records plus the user⇄repository star and watch relations, with
//! the denormalized counters on both sides kept consistent under concurrent
//! writers. Usable as a library and as a small administrative binary.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! repokeeper = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use repokeeper::store::{Repositories, RepositoriesStore, SqliteStore, Store};
//! use repokeeper::types::CreateRepoOptions;
//!
//! let store = Arc::new(SqliteStore::new("./data/repokeeper.db").unwrap());
//! store.initialize().unwrap();
//!
//! let repos = Repositories::new(store.clone());
//! let repo = repos
//!     .create(1, CreateRepoOptions { name: "demo".into(), ..Default::default() })
//!     .unwrap();
//! repos.star(2, repo.id).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod access;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod validation;
