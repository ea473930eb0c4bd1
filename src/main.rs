use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use profile_desk::config::{ConfigLoader, default_config_path};
use profile_desk::models::{FieldValue, Profile, ProfileField};
use profile_desk::observability::init_tracing;
use profile_desk::services::{
    DeleteOutcome, FieldChange, LoadOutcome, Navigator, ProfileDesk, SaveOutcome, TracingObserver,
};
use profile_desk::storage::create_profile_store;
use profile_desk::validation::{NAME_MIN_LENGTH, meets_name_min_length};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Prints a hint whenever the collection is empty
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn show_create_surface(&self) {
        println!("No profiles yet. Add one with: profile-desk add <name> <email> [age]");
    }
}

/// Profile Desk CLI
#[derive(Parser, Debug)]
#[command(name = "profile-desk")]
#[command(about = "Manage the remote profile list", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PROFILE_DESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// List all profiles
    List,
    /// Create a profile
    Add {
        name: String,
        email: String,
        /// Age in years (0-119)
        #[arg(allow_negative_numbers = true)]
        age: Option<String>,
    },
    /// Change fields of an existing profile
    Edit {
        id: String,
        /// Field assignments such as `name=Ann` or `age=31`
        #[arg(required = true, value_parser = parse_assignment)]
        changes: Vec<(ProfileField, String)>,
    },
    /// Delete a profile
    Delete { id: String },
}

/// Parse a single `<field>=<value>` assignment
fn parse_assignment(raw: &str) -> Result<(ProfileField, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <field>=<value>, got '{}'", raw))?;
    Ok((field.parse::<ProfileField>()?, value.to_string()))
}

fn print_profiles(profiles: &[Profile]) {
    println!("{:<16} {:<24} {:<32} {:>4}", "ID", "NAME", "EMAIL", "AGE");
    for profile in profiles {
        let age = profile
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<16} {:<24} {:<32} {:>4}",
            profile.id, profile.name, profile.email, age
        );
    }
}

fn apply_field(desk: &ProfileDesk, field: ProfileField, value: &str) -> anyhow::Result<()> {
    if field == ProfileField::Name && !meets_name_min_length(value) {
        bail!("name must be at least {} characters", NAME_MIN_LENGTH);
    }
    match desk.set_field(field, FieldValue::from(value)) {
        FieldChange::Applied => Ok(()),
        FieldChange::Rejected => bail!("{} value '{}' is out of range", field, value),
        FieldChange::Ignored => bail!("{} cannot be changed", field),
    }
}

fn report_save(outcome: SaveOutcome) -> anyhow::Result<()> {
    match outcome {
        SaveOutcome::Saved(profile) => {
            println!("Saved profile {} ({})", profile.id, profile.name);
            Ok(())
        }
        SaveOutcome::Rejected(err) => bail!("{}", err),
        SaveOutcome::Failed(err) => bail!("{}: {}", err, err.reason()),
        SaveOutcome::Disabled => bail!("nothing to save"),
        SaveOutcome::ListUnavailable => bail!("profile list is not loaded"),
        SaveOutcome::InFlight | SaveOutcome::Superseded => bail!("save did not complete"),
    }
}

async fn run(desk: &ProfileDesk, command: Command) -> anyhow::Result<()> {
    match desk.load().await {
        LoadOutcome::Loaded(count) => info!("Loaded {} profiles", count),
        LoadOutcome::Failed(err) => bail!("{}: {}", err, err.reason()),
        LoadOutcome::Superseded => bail!("profile list changed while loading"),
    }

    match command {
        Command::List => {
            print_profiles(&desk.snapshot().collection);
            Ok(())
        }
        Command::Add { name, email, age } => {
            desk.open_editor(None);
            apply_field(desk, ProfileField::Name, &name)?;
            apply_field(desk, ProfileField::Email, &email)?;
            if let Some(age) = age {
                apply_field(desk, ProfileField::Age, &age)?;
            }
            report_save(desk.save().await)
        }
        Command::Edit { id, changes } => {
            if !desk.open_editor_by_id(&id) {
                bail!("no profile with ID {}", id);
            }
            for (field, value) in changes {
                apply_field(desk, field, &value)?;
            }
            report_save(desk.save().await)
        }
        Command::Delete { id } => {
            let snapshot = desk.snapshot();
            let Some(profile) = snapshot.collection.iter().find(|p| p.id == id) else {
                bail!("no profile with ID {}", id);
            };
            desk.request_delete(profile.id.clone(), profile.name.clone());
            match desk.confirm_delete().await {
                DeleteOutcome::Deleted(id) => {
                    println!("Deleted profile {}", id);
                    Ok(())
                }
                DeleteOutcome::Failed(err) => bail!("{}: {}", err, err.reason()),
                DeleteOutcome::NoIntent | DeleteOutcome::InFlight | DeleteOutcome::Superseded => {
                    bail!("delete did not complete")
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ConfigLoader::load_from(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    ConfigLoader::validate(&config).context("invalid configuration")?;
    ConfigLoader::require_persistent_backend(&config).context("invalid configuration")?;
    let _guard = init_tracing(&config.logging)?;
    info!(
        "Starting {} ({}) against {} backend",
        config.app_name, config.environment, config.api.backend
    );

    let store = create_profile_store(&config.api)?;
    let desk = ProfileDesk::new(store, Arc::new(ConsoleNavigator))
        .with_observer(Arc::new(TracingObserver));

    run(&desk, cli.command).await
}
