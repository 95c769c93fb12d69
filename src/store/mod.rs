mod repositories;
mod schema;
mod sqlite;

pub use repositories::Repositories;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the entity-level database interface: schema, users and access grants.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, name: &str) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_name(&self, name: &str) -> Result<Option<User>>;

    // Access grant operations
    fn set_access(&self, access: &Access) -> Result<()>;
    fn get_access(&self, user_id: i64, repo_id: i64) -> Result<Option<AccessMode>>;
}

/// RepositoriesStore is the persistent interface for repositories and their
/// star and watch relations.
pub trait RepositoriesStore: Send + Sync {
    /// Creates a new repository owned by `owner_id` and makes the owner watch it.
    /// Fails with `NameNotAllowed` for a rejected name and `AlreadyExists` when
    /// the owner already has a repository with the same name in any case.
    fn create(&self, owner_id: i64, opts: CreateRepoOptions) -> Result<Repository>;

    /// Returns repositories the collaborator can read through an access grant,
    /// excluding those the collaborator owns.
    fn get_by_collaborator_id(
        &self,
        collaborator_id: i64,
        limit: usize,
        order: RepoOrder,
    ) -> Result<Vec<Repository>>;

    /// Same as `get_by_collaborator_id` without limit or ordering, paired with
    /// the collaborator's access mode.
    fn get_by_collaborator_id_with_access_mode(
        &self,
        collaborator_id: i64,
    ) -> Result<Vec<RepositoryWithAccess>>;

    /// Fails with `NotFound` when no repository has the given ID.
    fn get_by_id(&self, id: i64) -> Result<Repository>;

    /// Case-insensitive lookup; fails with `NotFound` when absent.
    fn get_by_name(&self, owner_id: i64, name: &str) -> Result<Repository>;

    /// Marks the user to star the repository. Starring twice is a no-op.
    fn star(&self, user_id: i64, repo_id: i64) -> Result<()>;

    /// Clears the bare state and refreshes the updated time.
    fn touch(&self, id: i64) -> Result<()>;

    fn list_watches(&self, repo_id: i64) -> Result<Vec<Watch>>;

    /// Marks the user to watch the repository. Watching twice is a no-op.
    fn watch(&self, opts: WatchRepositoryOptions) -> Result<()>;

    /// Returns true if the user owns a fork of the repository.
    fn has_forked_by(&self, repo_id: i64, user_id: i64) -> bool;
}
