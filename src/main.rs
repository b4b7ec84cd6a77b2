// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use blog_mirror::utils::logging::{format_error, format_info, format_success, format_warning};
use blog_mirror::{
    Config, ContentSource, DiskMirror, GitHubClient, MirrorError, PostTransformer, Scheduler,
    SnapshotCache, SyncService,
};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "blog_mirror")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Mirrors markdown posts from a GitHub repository into a rendered cache", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore the disk mirror, then sync on a fixed interval until ctrl-c
    Run,

    /// Run a single sync pass and update the disk mirror
    Sync,

    /// List posts stored in the disk mirror
    List,

    /// Print the rendered HTML of a mirrored post
    Show {
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    blog_mirror::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Blog Mirror");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Run => cmd_run(&config).await?,
        Commands::Sync => cmd_sync(&config).await?,
        Commands::List => cmd_list(&config).await?,
        Commands::Show { slug } => cmd_show(&config, &slug).await?,
    }

    Ok(())
}

fn build_service(config: &Config) -> Result<Arc<SyncService>> {
    let client = GitHubClient::from_config(config).context("Failed to create GitHub client")?;
    let source: Arc<dyn ContentSource> = Arc::new(client);
    info!("Remote source: {}", source.label());

    let cache = Arc::new(SnapshotCache::new());
    Ok(Arc::new(SyncService::from_config(config, source, cache)))
}

fn mirror_for(config: &Config) -> DiskMirror {
    DiskMirror::new(config.mirror.dir.clone(), config.remote.label())
}

async fn cmd_run(config: &Config) -> Result<()> {
    let service = build_service(config)?;

    let restored = service.restore_from_mirror().await;
    if restored > 0 {
        println!(
            "{}",
            format_info(&format!("Serving {} posts from disk mirror", restored))
        );
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let scheduler = Scheduler::new(Arc::clone(&service), config.scheduler.interval());
    let handle = scheduler.spawn(shutdown_rx);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    info!("Received ctrl-c, shutting down");
    let _ = shutdown_tx.send(());

    handle.await.context("Scheduler task panicked")?;

    let cache = service.cache();
    println!(
        "{} {} ({} posts)",
        cache.health().icon(),
        cache.status().summary(),
        cache.snapshot().len()
    );
    Ok(())
}

async fn cmd_sync(config: &Config) -> Result<()> {
    let service = build_service(config)?;

    match service.run_pass().await {
        Ok(stats) => {
            stats.log_summary(&config.remote.label());
            println!(
                "{}",
                format_success(&format!(
                    "Rendered {} of {} posts in {} ms",
                    stats.posts_rendered, stats.files_listed, stats.duration_ms
                ))
            );
            if stats.files_failed() > 0 {
                println!(
                    "{}",
                    format_warning(&format!("{} files were skipped", stats.files_failed()))
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", format_error(&e.to_string()));
            Err(e).context("Sync pass failed")
        }
    }
}

async fn cmd_list(config: &Config) -> Result<()> {
    let transformer = PostTransformer::from_config(&config.remote, &config.content);
    let mirror = mirror_for(config);

    let contents = match mirror.load(&transformer).await {
        Ok(contents) => contents,
        Err(MirrorError::MirrorNotFound(dir)) => {
            println!(
                "{}",
                format_warning(&format!(
                    "No disk mirror at {}; run `sync` first",
                    dir.display()
                ))
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load disk mirror"),
    };

    println!(
        "\n{} ({} posts, generated {})\n",
        contents.repository.bold(),
        contents.posts.len(),
        contents.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for post in &contents.posts {
        println!("  {}  {}", post.slug.cyan(), post.title);
        if !post.excerpt.is_empty() {
            println!("      {}", post.excerpt.dimmed());
        }
    }
    if contents.skipped > 0 {
        println!(
            "\n{}",
            format_warning(&format!("{} entries could not be restored", contents.skipped))
        );
    }

    Ok(())
}

async fn cmd_show(config: &Config, slug: &str) -> Result<()> {
    let transformer = PostTransformer::from_config(&config.remote, &config.content);
    let snapshot = mirror_for(config)
        .load(&transformer)
        .await
        .context("Failed to load disk mirror")?
        .into_snapshot();

    match snapshot.get(slug) {
        Some(post) => {
            println!("{}", post.html);
            Ok(())
        }
        None => Err(anyhow::anyhow!("Post not found: {}", slug)),
    }
}
