use crate::store::{RepositoriesStore, Store};
use crate::types::{Access, AccessMode};

use super::{Context, print_json};

pub fn run_access_grant(ctx: &Context, user: i64, repo_id: i64, mode: String) -> anyhow::Result<()> {
    let mode: AccessMode = mode.parse().map_err(anyhow::Error::msg)?;
    let repo = ctx.repos.get_by_id(repo_id)?;

    let access = Access {
        user_id: user,
        repo_id: repo.id,
        mode,
    };
    ctx.store.set_access(&access)?;

    if ctx.json {
        return print_json(&access);
    }
    println!("Granted {} access on '{}' to user {}", mode, repo.name, user);
    Ok(())
}
