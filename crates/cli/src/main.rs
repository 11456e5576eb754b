use clap::{Parser, Subcommand};
use medsafe_core::config::config_from_env_values;
use medsafe_core::{SafetyError, SafetyService};
use medsafe_types::DrugName;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medsafe")]
#[command(about = "Medication safety checks against RxNav and openFDA")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a medication list for pairwise interactions
    Interactions {
        /// Drug names, e.g. Aspirin Warfarin
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show labeling precautions for each drug
    Precautions {
        /// Drug names (brand names match best)
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Identify a pill by drug name
    Identify {
        /// Drug name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medsafe_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = Arc::new(config_from_env_values(
        std::env::var("RXNAV_BASE_URL").ok(),
        std::env::var("OPENFDA_BASE_URL").ok(),
        std::env::var("UPSTREAM_TIMEOUT_MS").ok(),
        std::env::var("UPSTREAM_MAX_CONCURRENCY").ok(),
        std::env::var("UPSTREAM_SPACING_MS").ok(),
    )?);
    let service = SafetyService::new(cfg)?;

    match cli.command {
        Commands::Interactions { names } => {
            let warnings = service.check_interactions(&drug_names(names)).await?;
            if warnings.is_empty() {
                eprintln!("No known interactions.");
            }
            println!("{}", serde_json::to_string_pretty(&warnings)?);
        }
        Commands::Precautions { names } => {
            let entries = service.get_precautions(&drug_names(names)).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::Identify { name } => match service.identify_pill(&DrugName::from(name)).await {
            Ok(pill) => println!("{}", serde_json::to_string_pretty(&pill)?),
            Err(SafetyError::Unresolved(name)) => {
                eprintln!("Not found: {name}");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}

fn drug_names(names: Vec<String>) -> Vec<DrugName> {
    names.into_iter().map(DrugName::from).collect()
}
