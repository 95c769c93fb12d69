use serde_json::json;

use crate::store::{RepositoriesStore, Store};
use crate::types::{CreateRepoOptions, RepoOrder, Repository, WatchRepositoryOptions};

use super::{Context, print_json};

fn print_repo(ctx: &Context, repo: &Repository) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(repo);
    }

    let visibility = if repo.is_private { "private" } else { "public" };
    println!("{} (id {}, owner {}, {})", repo.name, repo.id, repo.owner_id, visibility);
    if !repo.description.is_empty() {
        println!("  {}", repo.description);
    }
    if repo.is_fork {
        println!("  fork of: {}", repo.fork_id);
    }
    println!(
        "  stars: {}  watches: {}  forks: {}",
        repo.num_stars, repo.num_watches, repo.num_forks
    );
    println!("  bare:    {}", repo.is_bare);
    println!("  updated: {}", repo.updated().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

pub fn run_repo_create(
    ctx: &Context,
    owner: i64,
    name: String,
    description: String,
    default_branch: String,
    private: bool,
    fork_of: Option<i64>,
) -> anyhow::Result<()> {
    let fork_id = match fork_of {
        Some(id) => ctx.repos.get_by_id(id)?.id,
        None => 0,
    };

    let repo = ctx.repos.create(
        owner,
        CreateRepoOptions {
            name,
            description,
            default_branch,
            private,
            enable_issues: true,
            enable_pulls: true,
            fork: fork_of.is_some(),
            fork_id,
            ..Default::default()
        },
    )?;

    print_repo(ctx, &repo)
}

pub fn run_repo_get(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let repo = ctx.repos.get_by_id(id)?;
    print_repo(ctx, &repo)
}

pub fn run_repo_find(ctx: &Context, owner: i64, name: String) -> anyhow::Result<()> {
    let repo = ctx.repos.get_by_name(owner, &name)?;
    print_repo(ctx, &repo)
}

pub fn run_repo_touch(ctx: &Context, id: i64) -> anyhow::Result<()> {
    ctx.repos.touch(id)?;
    let repo = ctx.repos.get_by_id(id)?;
    print_repo(ctx, &repo)
}

pub fn run_repo_star(ctx: &Context, user: i64, repo_id: i64) -> anyhow::Result<()> {
    if ctx.store.get_user(user)?.is_none() {
        anyhow::bail!("User {} not found", user);
    }
    let repo = ctx.repos.get_by_id(repo_id)?;

    ctx.repos.star(user, repo.id)?;

    let repo = ctx.repos.get_by_id(repo.id)?;
    if ctx.json {
        return print_json(&json!({ "repo_id": repo.id, "num_stars": repo.num_stars }));
    }
    println!("'{}' now has {} star(s)", repo.name, repo.num_stars);
    Ok(())
}

pub fn run_repo_watch(ctx: &Context, user: i64, repo_id: i64) -> anyhow::Result<()> {
    let repo = ctx.repos.get_by_id(repo_id)?;

    ctx.repos.watch(WatchRepositoryOptions {
        user_id: user,
        repo_id: repo.id,
        repo_owner_id: repo.owner_id,
        repo_is_private: repo.is_private,
    })?;

    let repo = ctx.repos.get_by_id(repo.id)?;
    if ctx.json {
        return print_json(&json!({ "repo_id": repo.id, "num_watches": repo.num_watches }));
    }
    println!("'{}' now has {} watcher(s)", repo.name, repo.num_watches);
    Ok(())
}

pub fn run_repo_watchers(ctx: &Context, repo_id: i64) -> anyhow::Result<()> {
    let watches = ctx.repos.list_watches(repo_id)?;

    if ctx.json {
        return print_json(&watches);
    }
    if watches.is_empty() {
        println!("No watchers.");
        return Ok(());
    }
    for watch in watches {
        println!("{}", watch.user_id);
    }
    Ok(())
}

pub fn run_repo_forked_by(ctx: &Context, repo_id: i64, user: i64) -> anyhow::Result<()> {
    let forked = ctx.repos.has_forked_by(repo_id, user);

    if ctx.json {
        return print_json(&json!({ "repo_id": repo_id, "user_id": user, "forked": forked }));
    }
    println!("{forked}");
    Ok(())
}

pub fn run_repo_collaborator(
    ctx: &Context,
    user: i64,
    limit: usize,
    order: String,
    with_mode: bool,
) -> anyhow::Result<()> {
    if with_mode {
        let repos = ctx.repos.get_by_collaborator_id_with_access_mode(user)?;
        if ctx.json {
            return print_json(&repos);
        }
        for entry in repos {
            println!("{}\t{}\t{}", entry.repo.id, entry.repo.name, entry.mode);
        }
        return Ok(());
    }

    let order = RepoOrder::parse(&order)
        .ok_or_else(|| anyhow::anyhow!("Invalid order '{}'", order))?;
    let repos = ctx.repos.get_by_collaborator_id(user, limit, order)?;
    if ctx.json {
        return print_json(&repos);
    }
    for repo in repos {
        println!("{}\t{}", repo.id, repo.name);
    }
    Ok(())
}
