//! Concurrency tests for relation establishment.
//!
//! Duplicate star and watch requests race on a shared store; the counters must
//! converge to the true relation count.

use std::sync::Arc;

use repokeeper::error::Error;
use repokeeper::store::{Repositories, RepositoriesStore, SqliteStore, Store};
use repokeeper::types::{Access, AccessMode, CreateRepoOptions, WatchRepositoryOptions};
use tempfile::TempDir;

struct Harness {
    temp: TempDir,
    store: Arc<SqliteStore>,
    repos: Arc<Repositories>,
}

fn harness() -> Harness {
    let temp = TempDir::new().expect("create temp dir");
    let store = Arc::new(SqliteStore::new(temp.path().join("relations.db")).expect("open store"));
    store.initialize().expect("initialize schema");
    let repos = Arc::new(Repositories::new(store.clone()));
    Harness {
        temp,
        store,
        repos,
    }
}

fn count_rows(store: &SqliteStore, table: &str, repo_id: i64) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE repo_id = ?1");
    store
        .with_conn(|conn| {
            conn.query_row(&sql, [repo_id], |row| row.get(0))
                .map_err(Error::from)
        })
        .expect("count rows")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_watches_converge() {
    let h = harness();
    let repo = h
        .repos
        .create(
            1,
            CreateRepoOptions {
                name: "demo".to_string(),
                private: true,
                ..Default::default()
            },
        )
        .expect("create repo");

    for user_id in [2, 3] {
        h.store
            .set_access(&Access {
                user_id,
                repo_id: repo.id,
                mode: AccessMode::Read,
            })
            .expect("grant access");
    }

    let mut handles = Vec::new();
    for i in 0..16 {
        let repos = h.repos.clone();
        let user_id = if i % 2 == 0 { 2 } else { 3 };
        handles.push(tokio::task::spawn_blocking(move || {
            repos.watch(WatchRepositoryOptions {
                user_id,
                repo_id: repo.id,
                repo_owner_id: 1,
                repo_is_private: true,
            })
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("watch");
    }

    let repo = h.repos.get_by_id(repo.id).expect("get repo");
    assert_eq!(repo.num_watches, 3);
    assert_eq!(repo.num_watches, count_rows(&h.store, "watch", repo.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_stars_converge() {
    let h = harness();
    let repo = h
        .repos
        .create(
            1,
            CreateRepoOptions {
                name: "demo".to_string(),
                ..Default::default()
            },
        )
        .expect("create repo");
    let fan = h.store.create_user("fan").expect("create user");

    let mut handles = Vec::new();
    for _ in 0..16 {
        let repos = h.repos.clone();
        let user_id = fan.id;
        handles.push(tokio::task::spawn_blocking(move || repos.star(user_id, repo.id)));
    }
    for handle in handles {
        handle.await.expect("join").expect("star");
    }

    let repo = h.repos.get_by_id(repo.id).expect("get repo");
    assert_eq!(repo.num_stars, 1);
    assert_eq!(repo.num_stars, count_rows(&h.store, "star", repo.id));
    let fan = h.store.get_user(fan.id).expect("get user").expect("user exists");
    assert_eq!(fan.num_stars, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_of_same_name_yield_one_repository() {
    let h = harness();

    let mut handles = Vec::new();
    for i in 0..8 {
        let repos = h.repos.clone();
        let name = if i % 2 == 0 { "Demo" } else { "demo" };
        handles.push(tokio::task::spawn_blocking(move || {
            repos.create(
                1,
                CreateRepoOptions {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.expect("join") {
            Ok(_) => created += 1,
            Err(e) => assert!(e.is_already_exists(), "unexpected error: {e}"),
        }
    }
    assert_eq!(created, 1);

    let repo = h.repos.get_by_name(1, "DEMO").expect("get repo");
    assert_eq!(repo.num_watches, 1);
    assert_eq!(h.repos.list_watches(repo.id).expect("list watches").len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn separate_store_handles_share_one_database() {
    let h = harness();
    let repo = h
        .repos
        .create(
            1,
            CreateRepoOptions {
                name: "demo".to_string(),
                ..Default::default()
            },
        )
        .expect("create repo");

    let db_path = h.temp.path().join("relations.db");
    let mut handles = Vec::new();
    for user_id in 10..14 {
        let db_path = db_path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let store = Arc::new(SqliteStore::new(&db_path)?);
            let repos = Repositories::new(store);
            repos.star(user_id, repo.id)?;
            repos.star(user_id, repo.id)
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("star");
    }

    let repo = h.repos.get_by_id(repo.id).expect("get repo");
    assert_eq!(repo.num_stars, 4);
}
