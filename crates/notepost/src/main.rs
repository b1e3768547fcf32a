//! notepost CLI - post a notes file to X as paced threads.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notepost::notes::load_notes;
use notepost::pipeline::{Pipeline, RunOutcome};
use notepost::progress::{window, CursorFile};
use notepost::{Config, ParseMode};

/// notepost - post a notes file to X as paced, threaded batches.
#[derive(Parser)]
#[command(name = "notepost")]
#[command(about = "Post a notes file to X as paced, threaded batches")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    notes: NotesArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command (override the environment).
#[derive(Args)]
struct NotesArgs {
    /// Notes file (env: NOTES_FILE)
    #[arg(long, global = true)]
    notes: Option<PathBuf>,

    /// Block parsing mode: paragraph or line (env: NOTES_MODE)
    #[arg(long, global = true)]
    mode: Option<ParseMode>,

    /// Max characters per post (env: CHUNK_LIMIT)
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Cursor file for resuming across runs (env: CURSOR_FILE)
    #[arg(long, global = true)]
    cursor_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Post the next batch of notes (for scheduled use)
    Post {
        /// Print posts instead of sending them (env: DRY_RUN)
        #[arg(long)]
        dry_run: bool,

        /// Max posts this run (env: MAX_PER_RUN)
        #[arg(long)]
        max_per_run: Option<usize>,

        /// Seconds to pause between posts (env: PAUSE_SEC)
        #[arg(long)]
        pause: Option<f64>,

        /// Commit and push the cursor file after posting (env: PUSH_PROGRESS)
        #[arg(long)]
        push: bool,

        /// Give up on a post after this many rate-limit retries (env: MAX_RATE_LIMIT_RETRIES)
        #[arg(long)]
        max_rate_limit_retries: Option<u32>,
    },

    /// Show how the notes file is split into posts
    Preview,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env from the working directory if present
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("notepost=debug,info")
    } else {
        EnvFilter::new("notepost=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match &dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => tracing::debug!("No .env file"),
        Err(e) => tracing::warn!(error = %e, "Failed to load .env"),
    }

    let mut config = Config::from_env();
    apply_notes_args(&mut config, cli.notes);

    match cli.command {
        Commands::Post {
            dry_run,
            max_per_run,
            pause,
            push,
            max_rate_limit_retries,
        } => {
            config.dry_run |= dry_run;
            config.push_progress |= push;
            if let Some(max) = max_per_run {
                config.max_per_run = max;
            }
            if let Some(secs) = pause {
                config.pause = std::time::Duration::try_from_secs_f64(secs)
                    .map_err(|e| anyhow::anyhow!("Invalid --pause {secs}: {e}"))?;
            }
            if max_rate_limit_retries.is_some() {
                config.max_rate_limit_retries = max_rate_limit_retries;
            }

            tracing::info!(
                notes = %config.notes_file.display(),
                mode = %config.notes_mode,
                max_per_run = config.max_per_run,
                pause_secs = config.pause.as_secs_f64(),
                dry_run = config.dry_run,
                cursor_file = ?config.cursor_file,
                push = config.push_progress,
                "Starting run"
            );
            run_post(config).await
        }
        Commands::Preview => run_preview(&config),
    }
}

fn apply_notes_args(config: &mut Config, args: NotesArgs) {
    if let Some(notes) = args.notes {
        config.notes_file = notes;
    }
    if let Some(mode) = args.mode {
        config.notes_mode = mode;
    }
    if let Some(limit) = args.limit.filter(|l| *l > 0) {
        config.chunk_limit = limit;
    }
    if let Some(cursor_file) = args.cursor_file {
        config.cursor_file = Some(cursor_file);
    }
}

async fn run_post(config: Config) -> Result<()> {
    let pipeline = Pipeline::new(config);

    match pipeline.run().await? {
        RunOutcome::NothingToPost => {
            println!("nothing to post");
        }
        RunOutcome::CaughtUp { cursor, queued } => {
            println!("nothing to post: all {queued} post(s) already delivered (cursor {cursor})");
        }
        RunOutcome::Completed {
            report,
            cursor,
            dry_run,
        } => {
            if report.rate_limit_waits > 0 {
                println!("   Rate-limit waits: {}", report.rate_limit_waits);
            }
            if let Some(id) = &report.last_post_id {
                println!("   Last post: {id}");
            }
            match cursor {
                Some(cursor) if dry_run => println!("   Cursor unchanged (dry run): {cursor}"),
                Some(cursor) => println!("   Cursor: {cursor}"),
                None => {}
            }
        }
    }

    Ok(())
}

fn run_preview(config: &Config) -> Result<()> {
    let queue = load_notes(&config.notes_file, config.notes_mode, config.chunk_limit)?;

    if queue.is_empty() {
        println!("nothing to post");
        return Ok(());
    }

    let cursor = config
        .cursor_file
        .as_ref()
        .map_or(0, |path| CursorFile::new(path).read());
    let next_batch = window(&queue, cursor, config.max_per_run).len();

    println!(
        "{} {} ({} mode, {} chars max)\n",
        "Notes:".bold(),
        config.notes_file.display(),
        config.notes_mode,
        config.chunk_limit
    );

    for (i, post) in queue.iter().enumerate() {
        let len = post.chars().count();
        let header = format!("#{i:<4} [{len:>3}]");
        let header = if len > config.chunk_limit {
            header.red()
        } else if i < cursor {
            header.dimmed()
        } else if i < cursor + next_batch {
            header.green()
        } else {
            header.normal()
        };

        if i < cursor {
            println!("{header} {}", post.dimmed());
        } else {
            println!("{header} {post}");
        }
    }

    println!(
        "\nTotal: {} post(s), {} delivered, {} in next run",
        queue.len(),
        cursor.min(queue.len()),
        next_batch
    );

    Ok(())
}
