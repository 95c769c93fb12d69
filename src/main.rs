use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repokeeper::cli::{self, AccessCommands, RepoCommands, UserCommands};
use repokeeper::config::Config;

#[derive(Parser)]
#[command(name = "repokeeper")]
#[command(about = "Repository records with star and watch relations", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./repokeeper.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for the database (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage repositories and their stars and watches
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Manage collaborator access grants
    Access {
        #[command(subcommand)]
        command: AccessCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut config = Config::discover(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_filter.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let json = args.json;
    let ctx = || cli::init_context(&config, json);

    match args.command {
        Commands::Init => cli::run_init(&config),
        Commands::User { command } => match command {
            UserCommands::Add { name } => cli::run_user_add(&ctx()?, name),
            UserCommands::Get { id } => cli::run_user_get(&ctx()?, id),
        },
        Commands::Repo { command } => match command {
            RepoCommands::Create {
                owner,
                name,
                description,
                default_branch,
                private,
                fork_of,
            } => cli::run_repo_create(
                &ctx()?,
                owner,
                name,
                description,
                default_branch,
                private,
                fork_of,
            ),
            RepoCommands::Get { id } => cli::run_repo_get(&ctx()?, id),
            RepoCommands::Find { owner, name } => cli::run_repo_find(&ctx()?, owner, name),
            RepoCommands::Touch { id } => cli::run_repo_touch(&ctx()?, id),
            RepoCommands::Star { user, repo_id } => cli::run_repo_star(&ctx()?, user, repo_id),
            RepoCommands::Watch { user, repo_id } => cli::run_repo_watch(&ctx()?, user, repo_id),
            RepoCommands::Watchers { repo_id } => cli::run_repo_watchers(&ctx()?, repo_id),
            RepoCommands::ForkedBy { repo_id, user } => {
                cli::run_repo_forked_by(&ctx()?, repo_id, user)
            }
            RepoCommands::Collaborator {
                user,
                limit,
                order,
                with_mode,
            } => cli::run_repo_collaborator(&ctx()?, user, limit, order, with_mode),
        },
        Commands::Access { command } => match command {
            AccessCommands::Grant {
                user,
                repo_id,
                mode,
            } => cli::run_access_grant(&ctx()?, user, repo_id, mode),
        },
    }
}
