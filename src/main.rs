use clap::{Parser, Subcommand};
use chrono::{DateTime, Utc};
use grants_core::{
    config::Settings,
    models::{AddressClaim, InputType, RoundStatus, RoundWindow},
    resolver::AddressResolver,
    rounds::RoundStore,
    verification::SubmissionVerifier,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "grants")]
#[clap(about = "Grant round status and address resolution", long_about = None)]
struct Cli {
    /// Settings file (defaults to config/default + config/local + GRANTS__* env)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the status of a round window
    Status {
        /// Start date (YYYY-MM-DD)
        #[clap(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[clap(long)]
        end: String,

        /// Effective start date overriding --start
        #[clap(long)]
        effective_start: Option<String>,

        /// Effective end date overriding --end
        #[clap(long)]
        effective_end: Option<String>,

        /// Evaluate at this RFC 3339 instant instead of now
        #[clap(long)]
        at: Option<String>,
    },

    /// List rounds in the content store
    Rounds {
        /// Only show rounds with this status (upcoming, active, closed)
        #[clap(short, long)]
        status: Option<String>,

        /// Rounds directory, overriding content.rounds_dir
        #[clap(long)]
        dir: Option<PathBuf>,
    },

    /// Show a single round
    Show {
        /// Round identifier
        id: String,

        /// Rounds directory, overriding content.rounds_dir
        #[clap(long)]
        dir: Option<PathBuf>,
    },

    /// Resolve an address or ENS name
    Resolve {
        /// Address or name to resolve
        input: String,
    },

    /// Re-verify an address claimed by a client
    Verify {
        /// What the applicant typed
        #[clap(short, long)]
        input: String,

        /// Address the client resolved
        #[clap(short, long)]
        address: String,

        /// Input type the client reported (address, ens)
        #[clap(short = 't', long, default_value = "ens")]
        input_type: String,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new().unwrap_or_else(|e| {
            eprintln!("Using default settings ({})", e);
            Settings::default()
        }),
    };

    settings.validate().map_err(|e| anyhow::anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}

fn parse_instant(value: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match value {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| anyhow::anyhow!("Invalid instant {}: {}", s, e))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Status { start, end, effective_start, effective_end, at } => {
            let now = parse_instant(at.as_deref())?;
            let window = RoundWindow::parse(&start, &end, effective_start.as_deref(), effective_end.as_deref())?;

            println!("Opens:  {}", window.opens_at().to_rfc3339());
            println!("Closes: {}", window.closes_at().to_rfc3339());
            println!("Status: {}", window.status_at(now));
        }

        Commands::Rounds { status, dir } => {
            let store = RoundStore::new(dir.unwrap_or_else(|| settings.content.rounds_dir.clone()));
            let now = Utc::now();

            let filter = match status.as_deref() {
                Some(s) => Some(RoundStatus::from_str(s)
                    .ok_or_else(|| anyhow::anyhow!("Invalid status: {}", s))?),
                None => None,
            };

            let rounds = match filter {
                Some(status) => store.rounds_with_status(status, now)?,
                None => store.load_all()?,
            };

            info!("Loaded {} rounds from {}", rounds.len(), store.root().display());

            for round in rounds {
                let status = match round.frontmatter.window() {
                    Ok(window) => window.status_at(now).to_string(),
                    Err(e) => format!("invalid dates ({})", e),
                };
                println!("{:<24} {:<10} {} -> {}  {}",
                    round.id,
                    status,
                    round.frontmatter.start_date,
                    round.frontmatter.end_date,
                    round.frontmatter.name);
            }
        }

        Commands::Show { id, dir } => {
            let store = RoundStore::new(dir.unwrap_or_else(|| settings.content.rounds_dir.clone()));
            let round = store.load_round(&id)?;
            let window = round.frontmatter.window()?;

            println!("{} ({})", round.frontmatter.name, round.id);
            if let Some(tag) = &round.frontmatter.tag {
                println!("Tag: {}", tag);
            }
            println!("Dates: {} -> {}", round.frontmatter.start_date, round.frontmatter.end_date);
            if window.effective_start_date.is_some() || window.effective_end_date.is_some() {
                println!("Effective: {} -> {}", window.status_start(), window.status_end());
            }
            println!("Status: {}", window.status());
            if let Some(description) = &round.frontmatter.description {
                println!("\n{}", description);
            }
        }

        Commands::Resolve { input } => {
            let resolver = AddressResolver::from_settings(&settings)?;
            let result = resolver.resolve(&input).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }

        Commands::Verify { input, address, input_type } => {
            let input_type = InputType::from_str(&input_type)
                .ok_or_else(|| anyhow::anyhow!("Invalid input type: {}", input_type))?;
            let resolver = Arc::new(AddressResolver::from_settings(&settings)?);
            let verifier = SubmissionVerifier::new(resolver);

            let claim = AddressClaim { input, address, input_type };
            match verifier.verify(&claim).await {
                Ok(address) => println!("Verified: {}", address),
                Err(e) => {
                    error!("Verification failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
