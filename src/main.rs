mod columns;
mod config;
mod markdown;
mod reddit;
mod report;
mod store;

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::reddit::RedditClient;
use crate::store::Store;

#[derive(Parser)]
#[command(name = "bestof_report", about = "Nomination report generator for subreddit best-of awards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the index thread and print one nomination table per category
    Report {
        /// Award year the index thread must mention
        #[arg(short, long)]
        year: u16,
        /// URL of the year's index thread
        #[arg(short, long)]
        index_url: String,
        /// Path to the read-only archive database
        #[arg(long, default_value = "data/archive.sqlite")]
        db: String,
    },
    /// List the configured categories and their columns
    Categories,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report { year, index_url, db } => run_report(year, &index_url, &db),
        Commands::Categories => {
            for category in config::default_categories()? {
                let columns: Vec<&str> =
                    category.columns.iter().map(|c| c.header()).collect();
                println!(
                    "{:<12} {:<26} {}",
                    category.keyword,
                    category.header,
                    columns.join(" | ")
                );
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// End-to-end flow: index thread → matched nomination threads → one markdown
/// table each → joined report on stdout.
fn run_report(year: u16, index_url: &str, db: &str) -> Result<()> {
    let categories = config::default_categories()?;
    let client = RedditClient::new()?;
    let store = Store::open(db)?;

    let index = client.fetch_thread(index_url)?;
    let post = reddit::parse_post(&index)?;
    reddit::check_index_title(&post, year)?;

    let links = markdown::extract_links(&post.selftext);
    let nominations = config::match_links(links, &categories);
    if nominations.is_empty() {
        println!("No nomination threads matched in the index.");
        return Ok(());
    }
    info!("Matched {} nomination threads", nominations.len());

    let pb = ProgressBar::new(nominations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut tables = Vec::with_capacity(nominations.len());
    for nomination in &nominations {
        pb.set_message(nomination.category.header.clone());
        let thread = client.fetch_thread(&nomination.link.url)?;
        let comments = reddit::parse_comments(&thread)?;
        info!(
            "{}: {} comments from {}",
            nomination.category.header,
            comments.len(),
            nomination.link.url
        );
        tables.push(report::render_thread(nomination.category, &comments, &store)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("{}", tables.join(report::TABLE_SEPARATOR));
    Ok(())
}
