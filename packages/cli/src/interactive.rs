//! Interactive menu shown when no subcommand is given.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use stray_map_animal_models::{AnimalStatus, FedMode};
use stray_map_geography::registry::all_regions;

/// Top-level actions.
enum Tool {
    BrowseAnimals,
    DescribeRegion,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::BrowseAnimals, Self::DescribeRegion, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::BrowseAnimals => "Browse animals",
            Self::DescribeRegion => "Describe region",
            Self::Server => "Start server",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the chosen action fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Stray Map");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::BrowseAnimals => browse_animals()?,
        Tool::DescribeRegion => describe_region()?,
        Tool::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(stray_map_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}

fn browse_animals() -> Result<(), Box<dyn std::error::Error>> {
    let statuses = AnimalStatus::all();
    let status_labels: Vec<String> = statuses.iter().map(ToString::to_string).collect();
    let defaults = vec![true; statuses.len()];
    let selected = MultiSelect::new()
        .with_prompt("Statuses to show (space=toggle, enter=confirm)")
        .items(&status_labels)
        .defaults(&defaults)
        .interact()?;

    let fed_modes = FedMode::all();
    let fed_labels: Vec<String> = fed_modes.iter().map(ToString::to_string).collect();
    let fed_idx = Select::new()
        .with_prompt("Fed state")
        .items(&fed_labels)
        .default(0)
        .interact()?;

    let medical_only = Confirm::new()
        .with_prompt("Only animals needing medical attention?")
        .default(false)
        .interact()?;

    let search: String = Input::new()
        .with_prompt("Search (empty for none)")
        .allow_empty(true)
        .interact_text()?;

    let chosen: Vec<AnimalStatus> = selected.iter().map(|&i| statuses[i]).collect();
    let mut criteria = crate::criteria(&chosen, fed_modes[fed_idx], medical_only, Some(search));
    if chosen.is_empty() {
        criteria.statuses.clear();
    }

    crate::list_animals(&criteria, false)
}

fn describe_region() -> Result<(), Box<dyn std::error::Error>> {
    let regions = all_regions();
    let labels: Vec<String> = regions
        .iter()
        .map(|r| format!("{} \u{2014} {}", r.id, r.name))
        .collect();

    let idx = Select::new()
        .with_prompt("Region")
        .items(&labels)
        .default(0)
        .interact()?;

    crate::describe_region(&regions[idx].id, false)
}
