// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::commands;
use cmd::config::SiteConfig;
use content::Category;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.yaml (defaults to ./site.yaml when present)
    #[arg(long, global = true, env = "SITE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless SITE_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Override server.listen
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// List items of a category, newest first
    List {
        /// article (blog), comparison (compare) or faq
        category: Category,
    },
    /// Print one item's rendered HTML
    Show { category: Category, slug: String },
    /// Register an email address
    Signup { email: String },
    /// Print the signup counter
    Count,
    /// Print every registered address with its metadata
    Signups,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init(if cli.verbose { "debug" } else { "info" });

    let config = SiteConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { listen } => commands::serve_command(&config, listen).await,
        Commands::List { category } => commands::list_command(&config, category).await,
        Commands::Show { category, slug } => {
            commands::show_command(&config, category, &slug).await
        }
        Commands::Signup { email } => commands::signup_command(&config, &email).await,
        Commands::Count => commands::count_command(&config).await,
        Commands::Signups => commands::signups_command(&config).await,
    }
}
