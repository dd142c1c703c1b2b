#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the stray map.
//!
//! ```text
//! stray_map_cli animals [--status S]... [--fed any|fed|not-fed] [--medical-only] [--search TERM] [--json]
//! stray_map_cli region [--id calabria] [--json]
//! stray_map_cli serve
//! ```
//!
//! Running with no subcommand enters interactive mode.

mod interactive;
mod output;

use clap::{Parser, Subcommand};
use stray_map_animal::filter::filter_records;
use stray_map_animal::store::RecordStore;
use stray_map_animal_models::{AnimalStatus, FedMode, FilterCriteria};
use stray_map_geography::registry::{DEFAULT_REGION_ID, load_region};
use stray_map_server::ServerConfig;
use stray_map_server_models::{ApiAnimal, ApiRegion};

#[derive(Parser)]
#[command(
    name = "stray_map_cli",
    about = "Browse stray animal sightings and serve the map"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List sightings matching the given filters
    Animals {
        /// Status to include (repeatable; all statuses when omitted)
        #[arg(long = "status")]
        statuses: Vec<AnimalStatus>,
        /// Fed state: any, fed or not-fed
        #[arg(long, default_value = "any")]
        fed: FedMode,
        /// Only animals that need medical attention
        #[arg(long)]
        medical_only: bool,
        /// Case-insensitive search over species, status, notes, volunteer and location
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Describe the region geometry
    Region {
        /// Region identifier
        #[arg(long, default_value = DEFAULT_REGION_ID)]
        id: String,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Start the web server (configured from the environment)
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Animals {
            statuses,
            fed,
            medical_only,
            search,
            json,
        } => {
            let criteria = criteria(&statuses, fed, medical_only, search);
            list_animals(&criteria, json)?;
        }
        Commands::Region { id, json } => describe_region(&id, json)?,
        Commands::Serve => serve(ServerConfig::from_env()).await?,
    }

    Ok(())
}

/// Builds filter criteria from command-line selections. An empty status
/// list means every status.
fn criteria(
    statuses: &[AnimalStatus],
    fed_mode: FedMode,
    medical_only: bool,
    search: Option<String>,
) -> FilterCriteria {
    let mut criteria = FilterCriteria {
        fed_mode,
        medical_only,
        search_term: search.unwrap_or_default(),
        ..FilterCriteria::default()
    };
    if !statuses.is_empty() {
        criteria.statuses = FilterCriteria::none().statuses;
        for status in statuses {
            if !criteria.set_status(*status, true) {
                log::warn!("Ignoring status {status}");
            }
        }
    }
    criteria
}

fn list_animals(criteria: &FilterCriteria, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = RecordStore::seed()?;
    let visible = filter_records(store.records(), criteria);
    log::debug!("{} of {} animals match {criteria:?}", visible.len(), store.len());

    if json {
        let animals: Vec<ApiAnimal> = visible.into_iter().map(ApiAnimal::from).collect();
        println!("{}", serde_json::to_string_pretty(&animals)?);
    } else {
        print!("{}", output::animal_table(&visible, store.len()));
    }
    Ok(())
}

fn describe_region(id: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (definition, geometry) = load_region(id)?;

    if json {
        let region = ApiRegion::new(&definition, &geometry);
        println!("{}", serde_json::to_string_pretty(&region)?);
    } else {
        let store = RecordStore::seed()?;
        print!(
            "{}",
            output::region_summary(&definition, &geometry, store.records())
        );
    }
    Ok(())
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so it runs on a blocking task
    // to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(stray_map_server::run_server(config))
    })
    .await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn animals_flags_parse() {
        let cli = Cli::try_parse_from([
            "stray_map_cli",
            "animals",
            "--status",
            "reported",
            "--status",
            "needs-medical",
            "--fed",
            "not-fed",
            "--search",
            "dog",
        ])
        .unwrap();

        let Some(Commands::Animals {
            statuses,
            fed,
            medical_only,
            search,
            json,
        }) = cli.command
        else {
            panic!("expected animals subcommand");
        };
        assert_eq!(statuses, [AnimalStatus::Reported, AnimalStatus::NeedsMedical]);
        assert_eq!(fed, FedMode::NotFed);
        assert!(!medical_only);
        assert_eq!(search.as_deref(), Some("dog"));
        assert!(!json);
    }

    #[test]
    fn unknown_status_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["stray_map_cli", "animals", "--status", "lost"]).is_err());
    }

    #[test]
    fn no_statuses_means_all() {
        let criteria = criteria(&[], FedMode::Any, false, None);
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn explicit_statuses_replace_defaults() {
        let criteria = criteria(
            &[AnimalStatus::Rescued, AnimalStatus::Unrecognized],
            FedMode::Fed,
            true,
            Some("cat".to_string()),
        );

        assert_eq!(
            criteria.statuses.into_iter().collect::<Vec<_>>(),
            [AnimalStatus::Rescued]
        );
        assert_eq!(criteria.fed_mode, FedMode::Fed);
        assert!(criteria.medical_only);
        assert_eq!(criteria.search_term, "cat");
    }
}
