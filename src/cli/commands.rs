use clap::Subcommand;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user
    Add {
        /// Username for the new user
        name: String,
    },

    /// Show a user and their star count
    Get {
        /// User ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum RepoCommands {
    /// Create a repository; the owner automatically watches it
    Create {
        /// Owner user ID
        #[arg(long)]
        owner: i64,

        /// Repository name
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "main")]
        default_branch: String,

        /// Only the owner and collaborators with access can see it
        #[arg(long)]
        private: bool,

        /// Repository ID this one is forked from
        #[arg(long)]
        fork_of: Option<i64>,
    },

    /// Show a repository by ID
    Get { id: i64 },

    /// Find a repository by owner and name (case-insensitive)
    Find {
        /// Owner user ID
        #[arg(long)]
        owner: i64,

        name: String,
    },

    /// Mark a repository as no longer bare
    Touch { id: i64 },

    /// Star a repository
    Star {
        /// User ID
        #[arg(long)]
        user: i64,

        repo_id: i64,
    },

    /// Watch a repository
    Watch {
        /// User ID
        #[arg(long)]
        user: i64,

        repo_id: i64,
    },

    /// List watchers of a repository
    Watchers { repo_id: i64 },

    /// Check whether a user has forked a repository
    ForkedBy {
        repo_id: i64,

        /// User ID
        #[arg(long)]
        user: i64,
    },

    /// List repositories a user collaborates on
    Collaborator {
        /// Collaborator user ID
        user: i64,

        /// Maximum number of repositories to return
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Sort order (updated-desc, updated-asc, created-desc, created-asc, name-asc, stars-desc)
        #[arg(long, default_value = "updated-desc")]
        order: String,

        /// Include the access mode for each repository (ignores limit and order)
        #[arg(long)]
        with_mode: bool,
    },
}

#[derive(Subcommand)]
pub enum AccessCommands {
    /// Grant a user an access mode on a repository
    Grant {
        /// User ID
        #[arg(long)]
        user: i64,

        repo_id: i64,

        /// Access mode (none, read, write, admin, owner)
        mode: String,
    },
}
