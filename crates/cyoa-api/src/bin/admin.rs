//! Administrative CLI: schema management and story loading.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cyoa_api::config::Config;
use cyoa_api::error::AppError;
use cyoa_core::repository::StoryRepository;
use cyoa_store::pg_story_repository::PgStoryRepository;
use cyoa_store::schema;
use cyoa_stories::application::loader::load_story_file;
use cyoa_stories::domain::definition::is_definition_file;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cyoa-admin")]
#[command(about = "Manage the adventure story database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the story tables
    Init,
    /// Drop every story table and recreate the schema
    Reset {
        /// Confirm that all stories should be deleted
        #[arg(long)]
        yes: bool,
    },
    /// Import story definition files
    Load {
        /// Definition files (.json, .yaml, .yml); defaults to every definition
        /// file in the stories directory
        files: Vec<PathBuf>,
        /// Directory scanned when no files are given
        #[arg(long, env = "STORIES_DIR", default_value = "stories")]
        stories_dir: PathBuf,
    },
    /// List loaded stories
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), AppError> {
    if let Commands::Reset { yes: false } = command {
        return Err(AppError::Config(
            "reset deletes every story; pass --yes to confirm".to_owned(),
        ));
    }

    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;

    let result = dispatch(command, &pool).await;
    pool.close().await;
    result
}

async fn dispatch(command: Commands, pool: &PgPool) -> Result<(), AppError> {
    match command {
        Commands::Init => {
            schema::create_schema(pool).await?;
            println!("Created database tables");
        }
        Commands::Reset { .. } => {
            schema::reset_schema(pool).await?;
            println!("Reset database tables");
        }
        Commands::Load { files, stories_dir } => {
            let files = if files.is_empty() {
                definition_files_in(&stories_dir).await?
            } else {
                files
            };
            let repo = PgStoryRepository::new(pool.clone());
            for path in &files {
                let summary = load_story_file(path, &repo).await?;
                println!(
                    "Loaded {} as story {} ({} pages, {} choices)",
                    path.display(),
                    summary.story_id,
                    summary.pages,
                    summary.choices
                );
            }
            println!("Stories loaded: {}", files.len());
        }
        Commands::List => {
            let repo = PgStoryRepository::new(pool.clone());
            for story in repo.list_stories().await? {
                println!("{:>5}  {}  -  {}", story.story_id, story.title, story.description);
            }
        }
    }
    Ok(())
}

/// Definition files directly inside `dir`, sorted by file name.
async fn definition_files_in(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_definition_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(AppError::Config(format!(
            "no story definition files found in {}",
            dir.display()
        )));
    }
    Ok(files)
}
