use std::sync::Arc;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, warn};

use super::{RepositoriesStore, SqliteStore};
use crate::access::{AccessOracle, PermsStore};
use crate::error::{Args, Error, Result, StageExt};
use crate::types::*;
use crate::validation::{DefaultNameValidator, NameValidator};

const REPOSITORY_COLUMNS: &str = "repository.id, repository.owner_id, repository.lower_name, \
     repository.name, repository.description, repository.website, repository.default_branch, \
     repository.size, repository.num_watches, repository.num_stars, repository.num_forks, \
     repository.num_open_issues, repository.is_private, repository.is_bare, repository.is_mirror, \
     repository.enable_wiki, repository.enable_issues, repository.enable_pulls, \
     repository.is_fork, repository.fork_id, repository.created_unix, repository.updated_unix";

const REPOSITORY_COLUMN_COUNT: usize = 22;

fn repository_from_row(row: &Row<'_>) -> rusqlite::Result<Repository> {
    Ok(Repository {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        lower_name: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        website: row.get(5)?,
        default_branch: row.get(6)?,
        size: row.get(7)?,
        num_watches: row.get(8)?,
        num_stars: row.get(9)?,
        num_forks: row.get(10)?,
        num_open_issues: row.get(11)?,
        is_private: row.get(12)?,
        is_bare: row.get(13)?,
        is_mirror: row.get(14)?,
        enable_wiki: row.get(15)?,
        enable_issues: row.get(16)?,
        enable_pulls: row.get(17)?,
        is_fork: row.get(18)?,
        fork_id: row.get(19)?,
        created_unix: row.get(20)?,
        updated_unix: row.get(21)?,
    })
}

fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Repository>> {
    conn.query_row(
        &format!("SELECT {REPOSITORY_COLUMNS} FROM repository WHERE id = ?1"),
        params![id],
        repository_from_row,
    )
    .optional()
    .map_err(Error::from)
}

fn insert_repository(conn: &Connection, repo: &Repository) -> Result<i64> {
    conn.execute(
        "INSERT INTO repository (
            owner_id, lower_name, name, description, website, default_branch, size,
            num_watches, num_stars, num_forks, num_open_issues,
            is_private, is_bare, is_mirror, enable_wiki, enable_issues, enable_pulls,
            is_fork, fork_id, created_unix, updated_unix)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
        params![
            repo.owner_id,
            repo.lower_name,
            repo.name,
            repo.description,
            repo.website,
            repo.default_branch,
            repo.size,
            repo.num_watches,
            repo.num_stars,
            repo.num_forks,
            repo.num_open_issues,
            repo.is_private,
            repo.is_bare,
            repo.is_mirror,
            repo.enable_wiki,
            repo.enable_issues,
            repo.enable_pulls,
            repo.is_fork,
            repo.fork_id,
            repo.created_unix,
            repo.updated_unix,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Recomputes both sides of the star relation from live counts.
fn recount_stars(conn: &Connection, user_id: i64, repo_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE repository
         SET num_stars = (SELECT COUNT(*) FROM star WHERE repo_id = ?1),
             updated_unix = ?2
         WHERE id = ?1",
        params![repo_id, Utc::now().timestamp()],
    )
    .stage(r#"update "repository.num_stars""#)?;

    conn.execute(
        r#"UPDATE "user"
         SET num_stars = (SELECT COUNT(*) FROM star WHERE user_id = ?1)
         WHERE id = ?1"#,
        params![user_id],
    )
    .stage(r#"update "user.num_stars""#)?;
    Ok(())
}

fn recount_watches(conn: &Connection, repo_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE repository
         SET num_watches = (SELECT COUNT(*) FROM watch WHERE repo_id = ?1),
             updated_unix = ?2
         WHERE id = ?1",
        params![repo_id, Utc::now().timestamp()],
    )
    .stage(r#"update "repository.num_watches""#)?;
    Ok(())
}

/// Inserts the watch relation if absent and recomputes the watch counter when
/// a row was actually created. Callers decide whether the access gate applies.
fn watch_in(conn: &Connection, user_id: i64, repo_id: i64) -> Result<()> {
    let inserted = conn
        .execute(
            "INSERT INTO watch (user_id, repo_id) VALUES (?1, ?2)
             ON CONFLICT (user_id, repo_id) DO NOTHING",
            params![user_id, repo_id],
        )
        .stage("upsert")?;
    if inserted == 0 {
        debug!(user_id, repo_id, "Watch already exists");
        return Ok(());
    }

    recount_watches(conn, repo_id)
}

/// SQLite implementation of [`RepositoriesStore`].
pub struct Repositories {
    store: Arc<SqliteStore>,
    perms: Arc<dyn AccessOracle>,
    names: Arc<dyn NameValidator>,
}

impl Repositories {
    /// Builds the repositories store with the grant-table access oracle and the
    /// default name rules.
    pub fn new(store: Arc<SqliteStore>) -> Self {
        let perms = Arc::new(PermsStore::new(store.clone()));
        Self {
            store,
            perms,
            names: Arc::new(DefaultNameValidator),
        }
    }

    #[must_use]
    pub fn with_access_oracle(mut self, perms: Arc<dyn AccessOracle>) -> Self {
        self.perms = perms;
        self
    }

    #[must_use]
    pub fn with_name_validator(mut self, names: Arc<dyn NameValidator>) -> Self {
        self.names = names;
        self
    }

    fn query_collaborator_repos<T, F>(
        &self,
        sql: &str,
        collaborator_id: i64,
        limit: Option<usize>,
        map: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.store.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = match limit {
                Some(limit) => stmt.query_map(
                    params![
                        collaborator_id,
                        AccessMode::Read.as_i64(),
                        i64::try_from(limit).unwrap_or(i64::MAX)
                    ],
                    map,
                )?,
                None => stmt.query_map(
                    params![collaborator_id, AccessMode::Read.as_i64()],
                    map,
                )?,
            };
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::from)
        })
    }
}

impl RepositoriesStore for Repositories {
    fn create(&self, owner_id: i64, opts: CreateRepoOptions) -> Result<Repository> {
        self.names.is_name_allowed(&opts.name)?;

        match self.get_by_name(owner_id, &opts.name) {
            Ok(_) => {
                return Err(Error::AlreadyExists {
                    args: Args::new().with("ownerID", owner_id).with("name", &opts.name),
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let now = Utc::now().timestamp();
        let mut repo = Repository {
            id: 0,
            owner_id,
            lower_name: opts.name.to_lowercase(),
            name: opts.name,
            description: opts.description,
            website: String::new(),
            default_branch: opts.default_branch,
            size: 0,
            num_watches: 0,
            num_stars: 0,
            num_forks: 0,
            num_open_issues: 0,
            is_private: opts.private,
            is_bare: true,
            is_mirror: opts.mirror,
            enable_wiki: opts.enable_wiki,
            enable_issues: opts.enable_issues,
            enable_pulls: opts.enable_pulls,
            is_fork: opts.fork,
            fork_id: opts.fork_id,
            created_unix: now,
            updated_unix: now,
        };

        let created = self.store.transaction(|tx| {
            repo.id = match insert_repository(tx, &repo) {
                Ok(id) => id,
                // Lost a race with a concurrent create of the same name.
                Err(e) if e.is_constraint_violation() => {
                    return Err(Error::AlreadyExists {
                        args: Args::new()
                            .with("ownerID", owner_id)
                            .with("name", &repo.name),
                    });
                }
                Err(e) => return Err(e).stage("create"),
            };

            // The owner trivially has access, so the watch gate is skipped.
            watch_in(tx, owner_id, repo.id).stage("watch")?;

            find_by_id(tx, repo.id)?.ok_or_else(|| Error::NotFound {
                args: Args::new().with("repoID", repo.id),
            })
        })?;

        info!(
            repo_id = created.id,
            owner_id,
            name = %created.name,
            "Created repository"
        );
        Ok(created)
    }

    fn get_by_collaborator_id(
        &self,
        collaborator_id: i64,
        limit: usize,
        order: RepoOrder,
    ) -> Result<Vec<Repository>> {
        let sql = format!(
            "SELECT {REPOSITORY_COLUMNS} FROM repository
             JOIN access ON access.repo_id = repository.id AND access.user_id = ?1
             WHERE access.mode >= ?2 AND repository.owner_id != ?1
             ORDER BY {}
             LIMIT ?3",
            order.as_sql()
        );
        self.query_collaborator_repos(&sql, collaborator_id, Some(limit), repository_from_row)
    }

    fn get_by_collaborator_id_with_access_mode(
        &self,
        collaborator_id: i64,
    ) -> Result<Vec<RepositoryWithAccess>> {
        let sql = format!(
            "SELECT {REPOSITORY_COLUMNS}, access.mode FROM repository
             JOIN access ON access.repo_id = repository.id AND access.user_id = ?1
             WHERE access.mode >= ?2 AND repository.owner_id != ?1
             ORDER BY repository.id"
        );
        self.query_collaborator_repos(&sql, collaborator_id, None, |row| {
            Ok(RepositoryWithAccess {
                repo: repository_from_row(row)?,
                mode: AccessMode::from(row.get::<_, i64>(REPOSITORY_COLUMN_COUNT)?),
            })
        })
    }

    fn get_by_id(&self, id: i64) -> Result<Repository> {
        self.store
            .with_conn(|conn| find_by_id(conn, id))?
            .ok_or_else(|| Error::NotFound {
                args: Args::new().with("repoID", id),
            })
    }

    fn get_by_name(&self, owner_id: i64, name: &str) -> Result<Repository> {
        let lower_name = name.to_lowercase();
        self.store
            .with_conn(|conn| {
                conn.query_row(
                    &format!(
                        "SELECT {REPOSITORY_COLUMNS} FROM repository
                         WHERE owner_id = ?1 AND lower_name = ?2"
                    ),
                    params![owner_id, lower_name],
                    repository_from_row,
                )
                .optional()
                .map_err(Error::from)
            })?
            .ok_or_else(|| Error::NotFound {
                args: Args::new().with("ownerID", owner_id).with("name", name),
            })
    }

    fn star(&self, user_id: i64, repo_id: i64) -> Result<()> {
        self.store.transaction(|tx| {
            let inserted = tx
                .execute(
                    "INSERT INTO star (user_id, repo_id) VALUES (?1, ?2)
                     ON CONFLICT (user_id, repo_id) DO NOTHING",
                    params![user_id, repo_id],
                )
                .stage("upsert")?;
            if inserted == 0 {
                debug!(user_id, repo_id, "Star already exists");
                return Ok(());
            }

            recount_stars(tx, user_id, repo_id)
        })
    }

    fn touch(&self, id: i64) -> Result<()> {
        self.store.with_conn(|conn| {
            conn.execute(
                "UPDATE repository SET is_bare = 0, updated_unix = ?1 WHERE id = ?2",
                params![Utc::now().timestamp(), id],
            )?;
            Ok(())
        })
    }

    fn list_watches(&self, repo_id: i64) -> Result<Vec<Watch>> {
        self.store.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, repo_id FROM watch WHERE repo_id = ?1 ORDER BY user_id",
            )?;
            let rows = stmt.query_map(params![repo_id], |row| {
                Ok(Watch {
                    user_id: row.get(0)?,
                    repo_id: row.get(1)?,
                })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::from)
        })
    }

    fn watch(&self, opts: WatchRepositoryOptions) -> Result<()> {
        // Make sure the user has access to the private repository
        if opts.repo_is_private
            && opts.user_id != opts.repo_owner_id
            && !self.perms.authorize(
                opts.user_id,
                opts.repo_id,
                AccessMode::Read,
                AccessModeOptions {
                    owner_id: opts.repo_owner_id,
                    private: true,
                },
            )
        {
            return Err(Error::Unauthorized);
        }

        self.store
            .transaction(|tx| watch_in(tx, opts.user_id, opts.repo_id))
    }

    fn has_forked_by(&self, repo_id: i64, user_id: i64) -> bool {
        let count = self.store.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM repository
                 WHERE owner_id = ?1 AND is_fork = 1 AND fork_id = ?2",
                params![user_id, repo_id],
                |row| row.get::<_, i64>(0),
            )
            .map_err(Error::from)
        });
        match count {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(repo_id, user_id, "Failed to count forks: {e}");
                false
            }
        }
    }
}
