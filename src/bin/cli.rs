//! Expense Dash CLI
//!
//! Command-line front end for the expense-approval dashboard:
//! - Log in and out
//! - Show the dashboard (KPIs, charts or status tables)
//! - Review, approve and reject pending expenses
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expense_dash::{
    generate_default_config, logout, Config, DashboardController, Decision, ExpenseClient,
    FilterControl, FilterState, LoggingConfig, OutputFormat, PendingApprovalsController,
    PendingLoad, PieDimension, RowState, TerminalView, TokenFile, TopN,
};

#[derive(Parser)]
#[command(name = "expense-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expense approval dashboard client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to confirmations
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the dashboard for the logged-in user
    Dashboard {
        /// Filter by user id
        #[arg(long)]
        user: Option<String>,
        /// Filter by office name
        #[arg(long)]
        office: Option<String>,
        /// Filter by expense head
        #[arg(long)]
        head: Option<String>,
        /// Filter by expense subhead
        #[arg(long)]
        subhead: Option<String>,
        /// Filter by expense date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: Option<String>,
        /// Slices in the head-wise pie
        #[arg(long)]
        head_top: Option<TopN>,
        /// Slices in the office-wise pie
        #[arg(long)]
        office_top: Option<TopN>,
    },

    /// List expenses awaiting approval
    Pending,

    /// Approve a pending expense
    Approve {
        /// Pending expense id
        id: i64,
    },

    /// Reject a pending expense
    Reject {
        /// Pending expense id
        id: i64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_date(s: &str) -> Result<String, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("Invalid date {:?}: {}", s, e))
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("expense_dash={}", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);
    tracing::debug!(api = %config.api.base_url, "Expense Dash v{}", env!("CARGO_PKG_VERSION"));

    let token_file = TokenFile::new(config.session.token_path());
    let view = || TerminalView::new(cli.format).assume_yes(cli.yes);
    let client = || -> anyhow::Result<ExpenseClient> {
        let token = token_file.load()?;
        Ok(ExpenseClient::new(&config.api)?.with_token(token))
    };

    match cli.command {
        Commands::Login { ref email, ref password } => {
            let mut client = ExpenseClient::new(&config.api)?;
            let token = client.login(email, password).await.context("Login failed")?;
            token_file.save(&token)?;
            println!("Logged in as {}", email);
        }

        Commands::Logout => {
            logout(&token_file, &view())?;
            println!("Logged out");
        }

        Commands::Dashboard {
            ref user,
            ref office,
            ref head,
            ref subhead,
            ref date,
            head_top,
            office_top,
        } => {
            let mut filters = FilterState::default();
            for (control, value) in [
                (FilterControl::User, user),
                (FilterControl::Office, office),
                (FilterControl::Head, head),
                (FilterControl::Subhead, subhead),
                (FilterControl::Date, date),
            ] {
                if let Some(value) = value {
                    filters.set(control, value.clone());
                }
            }

            let default_top = config.dashboard.top_n();
            let view = view()
                .with_filters(filters)
                .with_top(PieDimension::Head, Some(head_top.unwrap_or(default_top)))
                .with_top(PieDimension::Office, Some(office_top.unwrap_or(default_top)));

            let dashboard = DashboardController::new(client()?, view)
                .with_policy(config.dashboard.refresh_policy);
            dashboard.load().await.context("Failed to load dashboard")?;
            dashboard.view().finish();
        }

        Commands::Pending => {
            let pending = PendingApprovalsController::new(client()?, view(), view());
            if let PendingLoad::Redirected | PendingLoad::Failed = pending.load().await {
                std::process::exit(1);
            }
            pending.view().finish();
        }

        Commands::Approve { id } | Commands::Reject { id } => {
            let decision = match cli.command {
                Commands::Approve { .. } => Decision::Approve,
                _ => Decision::Reject,
            };

            let pending = PendingApprovalsController::new(client()?, view(), view());
            match pending.load().await {
                PendingLoad::Loaded(_) => {}
                PendingLoad::Empty => anyhow::bail!("No pending expenses"),
                PendingLoad::Redirected | PendingLoad::Failed => std::process::exit(1),
            }

            match pending.decide(id, decision).await? {
                RowState::Removed => {
                    pending.view().status(&format!("Expense #{} {}", id, decision.past_tense()));
                    pending.view().finish();
                }
                RowState::Rendered => pending.view().status("Cancelled"),
                _ => std::process::exit(1),
            }
        }

        Commands::Config { ref output } => {
            let content = generate_default_config();

            if let Some(path) = output {
                std::fs::write(path, &content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", content);
            }
        }
    }

    Ok(())
}
