//! teabreak: command-line client for the TeaBreak paper-sharing backend.
//!
//! Every command prints its result as pretty JSON on stdout; logs go to
//! stderr.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use teabreak_app::logging::init_tracing;
use teabreak_app::{AdminTab, App, EmailLookup, FriendsTab, PaperFilters};
use teabreak_client::ClientConfig;
use teabreak_core::defaults::{
    API_URL, ENV_API_URL, ENV_EMAIL, ENV_PASSWORD, ENV_TIMEOUT_SECS, PAGE_SIZE, PAGE_SIZE_OPTIONS,
    REQUEST_TIMEOUT_SECS,
};
use teabreak_core::RecordKey;
use teabreak_pipeline::PageRequest;

#[derive(Parser)]
#[command(name = "teabreak")]
#[command(author, version, about = "Browse TeaBreak papers, friends and administration lists")]
#[command(propagate_version = true)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = ENV_API_URL, default_value = API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Sign in with this email before running the command
    #[arg(long, global = true, env = ENV_EMAIL)]
    email: Option<String>,

    /// Password for --email
    #[arg(long, global = true, env = ENV_PASSWORD, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Paging {
    /// One-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Items per page (10, 20, 50 or 100)
    #[arg(long, default_value_t = PAGE_SIZE, value_parser = parse_page_size)]
    page_size: usize,
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {:?}", PAGE_SIZE_OPTIONS))
    }
}

impl Paging {
    fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List papers with optional search and facets
    Papers {
        /// Text matched against title, conference and author names
        #[arg(short, long, default_value = "")]
        search: String,

        /// Conference substring ("all" for any)
        #[arg(long, default_value = "all")]
        conference: String,

        /// Exact publication year ("all" for any)
        #[arg(long, default_value = "all")]
        year: String,

        /// Also print the values offered by the facet selectors
        #[arg(long)]
        facets: bool,

        #[command(flatten)]
        paging: Paging,
    },

    /// Show one paper with its counters and comments
    Paper {
        /// Paper id
        id: String,
    },

    /// List one tab of the friends page
    Friends {
        #[arg(long, value_enum, default_value = "friends")]
        tab: FriendsTab,

        /// Text matched against username and email
        #[arg(short, long, default_value = "")]
        search: String,

        #[command(flatten)]
        paging: Paging,
    },

    /// List one administration tab (administrators only)
    Admin {
        #[arg(long, value_enum, default_value = "papers")]
        tab: AdminTab,

        #[arg(short, long, default_value = "")]
        search: String,

        #[command(flatten)]
        paging: Paging,
    },

    /// Show the signed-in user's profile and uploaded papers
    Profile {
        #[command(flatten)]
        paging: Paging,
    },

    /// Look a user up by email address
    FindUser {
        email: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::new(cli.api_url).with_timeout_secs(cli.timeout_secs);
    let mut app = App::new(config).context("Failed to create backend client")?;

    match (cli.email.as_deref(), cli.password.as_deref()) {
        (Some(email), Some(password)) => {
            app.sign_in(email, password)
                .await
                .with_context(|| format!("Sign-in as {} failed", email))?;
            info!(subsystem = "app", email, "Signed in");
        }
        (Some(_), None) => anyhow::bail!("--password is required with --email"),
        _ => {
            app.refresh_session().await.context("Failed to read session")?;
        }
    }
    let session = app.session().clone();

    match cli.command {
        Commands::Papers {
            search,
            conference,
            year,
            facets,
            paging,
        } => {
            let filters = PaperFilters::default()
                .with_text(search)
                .with_conference(conference)
                .with_year(year);
            let screen = app.papers();
            let view = screen.load(&session, &filters, paging.request()).await?;
            print(&view)?;
            if facets {
                print(&screen.filter_options().await)?;
            }
        }

        Commands::Paper { id } => {
            let detail = app.paper(RecordKey::new(id)).load(&session).await?;
            print(&detail)?;
        }

        Commands::Friends {
            tab,
            search,
            paging,
        } => {
            let view = app
                .friends()
                .load(&session, tab, &search, paging.request())
                .await?;
            print(&view)?;
        }

        Commands::Admin {
            tab,
            search,
            paging,
        } => {
            let view = app
                .admin()
                .load(&session, tab, &search, paging.request())
                .await?;
            print(&view)?;
        }

        Commands::Profile { paging } => {
            let profile = app.profile().load(&session, paging.request()).await?;
            print(&profile)?;
        }

        Commands::FindUser { email } => {
            let lookup = app.email_search().search(&email).await;
            if let EmailLookup::Failed(message) = &lookup {
                anyhow::bail!("Lookup failed: {}", message);
            }
            print(&lookup)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_accepts_offered_sizes() {
        for size in PAGE_SIZE_OPTIONS {
            assert_eq!(parse_page_size(&size.to_string()), Ok(size));
        }
    }

    #[test]
    fn test_page_size_rejects_other_values() {
        assert!(parse_page_size("15").is_err());
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_cli_rejects_unoffered_page_size() {
        assert!(Cli::try_parse_from(["teabreak", "papers", "--page-size", "20"]).is_ok());
        assert!(Cli::try_parse_from(["teabreak", "papers", "--page-size", "7"]).is_err());
    }
}
