pub const SCHEMA: &str = r#"
-- Users are referenced, not owned; only the cached star count is written here
CREATE TABLE IF NOT EXISTS "user" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lower_name TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    num_stars INTEGER NOT NULL DEFAULT 0,
    created_unix INTEGER NOT NULL DEFAULT 0
);

-- Repositories
CREATE TABLE IF NOT EXISTS repository (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL,
    lower_name TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    website TEXT NOT NULL DEFAULT '',
    default_branch TEXT NOT NULL DEFAULT '',
    size INTEGER NOT NULL DEFAULT 0,

    -- Cached counters, recomputed from the relation tables
    num_watches INTEGER NOT NULL DEFAULT 0,
    num_stars INTEGER NOT NULL DEFAULT 0,
    num_forks INTEGER NOT NULL DEFAULT 0,
    num_open_issues INTEGER NOT NULL DEFAULT 0,

    is_private INTEGER NOT NULL DEFAULT 0,
    is_bare INTEGER NOT NULL DEFAULT 0,
    is_mirror INTEGER NOT NULL DEFAULT 0,

    enable_wiki INTEGER NOT NULL DEFAULT 0,
    enable_issues INTEGER NOT NULL DEFAULT 0,
    enable_pulls INTEGER NOT NULL DEFAULT 0,

    is_fork INTEGER NOT NULL DEFAULT 0,
    fork_id INTEGER NOT NULL DEFAULT 0,

    created_unix INTEGER NOT NULL DEFAULT 0,
    updated_unix INTEGER NOT NULL DEFAULT 0,

    UNIQUE(owner_id, lower_name)
);

-- Stars (many-to-many between users and repositories)
CREATE TABLE IF NOT EXISTS star (
    user_id INTEGER NOT NULL,
    repo_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, repo_id)
);

-- Watches (many-to-many between users and repositories)
CREATE TABLE IF NOT EXISTS watch (
    user_id INTEGER NOT NULL,
    repo_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, repo_id)
);

-- Access grants: effective mode a collaborator holds on a repository
CREATE TABLE IF NOT EXISTS access (
    user_id INTEGER NOT NULL,
    repo_id INTEGER NOT NULL,
    mode INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, repo_id)
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_repository_owner ON repository(owner_id);
CREATE INDEX IF NOT EXISTS idx_repository_fork ON repository(fork_id);
CREATE INDEX IF NOT EXISTS idx_star_repo ON star(repo_id);
CREATE INDEX IF NOT EXISTS idx_watch_repo ON watch(repo_id);
CREATE INDEX IF NOT EXISTS idx_access_repo ON access(repo_id);
"#;
