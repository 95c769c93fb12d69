mod access;
mod commands;
mod repo;
mod user;

pub use access::run_access_grant;
pub use commands::{AccessCommands, RepoCommands, UserCommands};
pub use repo::{
    run_repo_collaborator, run_repo_create, run_repo_find, run_repo_forked_by, run_repo_get,
    run_repo_star, run_repo_touch, run_repo_watch, run_repo_watchers,
};
pub use user::{run_user_add, run_user_get};

use std::fs;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::store::{Repositories, SqliteStore, Store};

/// Store handles shared by every command. Built once per invocation.
pub struct Context {
    pub store: Arc<SqliteStore>,
    pub repos: Repositories,
    pub json: bool,
}

/// Creates the data directory and database schema.
pub fn run_init(config: &Config) -> anyhow::Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    let db_path = config.db_path();
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    tracing::info!("Initialized database at {}", db_path.display());
    println!("Initialized database at {}", db_path.display());
    Ok(())
}

/// Opens the store from the configured data directory, checking it exists.
pub fn init_context(config: &Config, json: bool) -> anyhow::Result<Context> {
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'repokeeper init' first.",
            db_path.display()
        );
    }

    let store = Arc::new(SqliteStore::new(&db_path)?);
    let repos = Repositories::new(store.clone());
    Ok(Context { store, repos, json })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
