use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::AccessMode;

fn local_time(unix: i64) -> DateTime<Local> {
    Local
        .timestamp_opt(unix, 0)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub owner_id: i64,
    pub lower_name: String,
    pub name: String,
    pub description: String,
    pub website: String,
    pub default_branch: String,
    pub size: i64,

    pub num_watches: i64,
    pub num_stars: i64,
    pub num_forks: i64,
    pub num_open_issues: i64,

    pub is_private: bool,
    pub is_bare: bool,
    pub is_mirror: bool,

    pub enable_wiki: bool,
    pub enable_issues: bool,
    pub enable_pulls: bool,

    pub is_fork: bool,
    /// Source repository of a fork, 0 when this is not a fork.
    pub fork_id: i64,

    pub created_unix: i64,
    pub updated_unix: i64,
}

impl Repository {
    /// Local-time projection of `created_unix`.
    pub fn created(&self) -> DateTime<Local> {
        local_time(self.created_unix)
    }

    /// Local-time projection of `updated_unix`.
    pub fn updated(&self) -> DateTime<Local> {
        local_time(self.updated_unix)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateRepoOptions {
    pub name: String,
    pub description: String,
    pub default_branch: String,
    pub private: bool,
    pub mirror: bool,
    pub enable_wiki: bool,
    pub enable_issues: bool,
    pub enable_pulls: bool,
    pub fork: bool,
    pub fork_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub user_id: i64,
    pub repo_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
    pub user_id: i64,
    pub repo_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct WatchRepositoryOptions {
    pub user_id: i64,
    pub repo_id: i64,
    pub repo_owner_id: i64,
    pub repo_is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub lower_name: String,
    pub name: String,
    pub num_stars: i64,
    pub created_unix: i64,
}

impl User {
    pub fn created(&self) -> DateTime<Local> {
        local_time(self.created_unix)
    }
}

/// An access grant linking a collaborator to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub user_id: i64,
    pub repo_id: i64,
    pub mode: AccessMode,
}

/// Ownership and visibility facts the access oracle needs about a repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessModeOptions {
    pub owner_id: i64,
    pub private: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryWithAccess {
    #[serde(flatten)]
    pub repo: Repository,
    pub mode: AccessMode,
}

/// Sort keys accepted by collaborator listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoOrder {
    #[default]
    UpdatedDesc,
    UpdatedAsc,
    CreatedDesc,
    CreatedAsc,
    NameAsc,
    StarsDesc,
}

impl RepoOrder {
    pub(crate) const fn as_sql(self) -> &'static str {
        match self {
            RepoOrder::UpdatedDesc => "repository.updated_unix DESC, repository.id DESC",
            RepoOrder::UpdatedAsc => "repository.updated_unix ASC, repository.id ASC",
            RepoOrder::CreatedDesc => "repository.created_unix DESC, repository.id DESC",
            RepoOrder::CreatedAsc => "repository.created_unix ASC, repository.id ASC",
            RepoOrder::NameAsc => "repository.lower_name ASC, repository.id ASC",
            RepoOrder::StarsDesc => "repository.num_stars DESC, repository.id ASC",
        }
    }

    /// Converts a CLI or config string to an ordering.
    pub fn parse(s: &str) -> Option<RepoOrder> {
        match s {
            "updated-desc" | "updated" => Some(RepoOrder::UpdatedDesc),
            "updated-asc" => Some(RepoOrder::UpdatedAsc),
            "created-desc" | "created" => Some(RepoOrder::CreatedDesc),
            "created-asc" => Some(RepoOrder::CreatedAsc),
            "name-asc" | "name" => Some(RepoOrder::NameAsc),
            "stars-desc" | "stars" => Some(RepoOrder::StarsDesc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_projection_matches_unix() {
        let repo_created = 1_700_000_000;
        assert_eq!(local_time(repo_created).timestamp(), repo_created);
    }

    #[test]
    fn test_parse_repo_order() {
        assert_eq!(RepoOrder::parse("stars"), Some(RepoOrder::StarsDesc));
        assert_eq!(RepoOrder::parse("name-asc"), Some(RepoOrder::NameAsc));
        assert_eq!(RepoOrder::parse("id; DROP TABLE repository"), None);
    }
}
