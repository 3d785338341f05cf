//! CLI entry point for blog-front

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_front::fetch::ListQuery;
use blog_front::helpers::{format_display_date, slugify, DisplayZone};

#[derive(Parser)]
#[command(name = "blog-front")]
#[command(version)]
#[command(about = "Front end for a personal blog backed by a remote posts API", long_about = None)]
struct Cli {
    /// Directory holding _config.yml (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the blog pages
    #[command(aliases = ["server", "s"])]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts published between two dates
    List {
        /// Earliest creation date
        #[arg(long, default_value = "2000-01-01")]
        from: String,

        /// Latest creation date
        #[arg(long, default_value = "2030-10-01")]
        to: String,

        /// Page number (0-indexed)
        #[arg(long, default_value = "0")]
        page: u32,

        /// Posts per page
        #[arg(long, default_value = "2000")]
        page_size: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single post
    Show {
        /// Post id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the slug for a title
    Slug {
        title: String,
    },

    /// Format a raw API date for display
    Date {
        raw: String,

        /// IANA time zone (defaults to the local zone)
        #[arg(short, long, default_value = "")]
        timezone: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_front=debug,info"
    } else {
        "blog_front=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let front = blog_front::BlogFront::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            front.serve(&ip, port).await?;
        }

        Commands::List {
            from,
            to,
            page,
            page_size,
            json,
        } => {
            let front = blog_front::BlogFront::new(&base_dir)?;
            let query = ListQuery {
                from,
                to,
                page,
                page_size,
            };
            blog_front::commands::list::run(&front, query, json).await?;
        }

        Commands::Show { id, json } => {
            let front = blog_front::BlogFront::new(&base_dir)?;
            blog_front::commands::show::run(&front, &id, json).await?;
        }

        Commands::Slug { title } => {
            println!("{}", slugify(&title));
        }

        Commands::Date { raw, timezone } => {
            let zone: DisplayZone = timezone.parse()?;
            println!("{}", format_display_date(&raw, zone)?);
        }

        Commands::Version => {
            println!("blog-front version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
