//! geoloc: command-line front end for `geoloc_core`.
//!
//! Bootstrap parameters mirror the web front end's query string:
//! `--txt` and `--min-rate` seed the session filter, `--loc-id` only marks
//! a record as selected when listing.
//!
//! Usage examples
//! --------------
//!
//! - Seed an empty database and list it, best first
//!   $ geoloc --db places.db seed
//!   $ geoloc --db places.db --sort rate --desc list
//!
//! - Filter by name and rating
//!   $ geoloc --db places.db --txt beach --min-rate 3 list
//!
//! - Add, update and inspect
//!   $ geoloc --db places.db add --name "Tokyo Tower" --rate 4 --lat 35.6586 --lng 139.7454
//!   $ geoloc --db places.db update <id> --rate 5
//!   $ geoloc --db places.db stats
mod args;
mod render;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context, Result};
use clap::Parser;
use geoloc_core::db::{open_db, open_db_in_memory};
use geoloc_core::{
    demo_locations, init_logging, Clock, EngineConfig, FilterCriteria, Geo, LocationDraft,
    LocationId, LocationPatch, LocationService, LocationStore, SortCriteria, SqliteLocationStore,
    SystemClock,
};
use log::{info, warn};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = resolve_config(&args)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let conn = match &config.db_path {
        Some(path) => {
            open_db(path).with_context(|| format!("failed to open `{}`", path.display()))?
        }
        None => open_db_in_memory().context("failed to open in-memory store")?,
    };
    let store = SqliteLocationStore::try_new(&conn)?;

    let filter = FilterCriteria::from_params(args.txt.as_deref(), args.min_rate.as_deref());
    let mut service = LocationService::new(store)
        .with_filter(filter)
        .with_policies(config.rating_bands, config.recency);
    if let Some(field) = &args.sort {
        let sort = SortCriteria::parse(field, args.desc)
            .with_context(|| format!("unknown sort field `{field}`"))?;
        service.set_sort(Some(sort));
    }

    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&args.command)
    );
    run(&args, &service)
}

fn resolve_config(args: &CliArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if args.memory {
        config.db_path = None;
    } else if let Some(db) = &args.db {
        config.db_path = Some(db.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &args.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn run<S: LocationStore>(args: &CliArgs, service: &LocationService<S>) -> Result<()> {
    let now_ms = SystemClock.now_ms();

    match &args.command {
        Commands::List => {
            let locations = service.query()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&locations)?);
                return Ok(());
            }
            if locations.is_empty() {
                println!("No locs to show");
            }
            let selected = args.loc_id.as_deref().and_then(selected_id);
            for location in &locations {
                println!("{}", render::location_line(location, selected, now_ms));
            }
        }
        Commands::Add { name, rate, geo } => {
            let draft = LocationDraft::new(
                name.as_str(),
                *rate,
                Geo::new(geo.lat, geo.lng, geo.address.as_str(), geo.zoom),
            );
            let saved = service.save(draft)?;
            print_saved(args.json, "Added", &saved)?;
        }
        Commands::Update {
            id,
            name,
            rate,
            lat,
            lng,
            address,
            zoom,
        } => {
            let id = parse_id(id)?;
            let existing = service.get_by_id(id)?;
            let patch = LocationPatch {
                name: name.clone(),
                rate: *rate,
                geo: merge_geo(&existing.geo, *lat, *lng, address.as_deref(), *zoom),
            };
            if patch.is_empty() {
                bail!("nothing to update for {id}; pass at least one field");
            }
            let merged = patch.apply_to(&existing)?;
            let draft = LocationDraft::new(merged.name, merged.rate, merged.geo).with_id(id);
            let saved = service.save(draft)?;
            print_saved(args.json, "Updated", &saved)?;
        }
        Commands::Remove { id } => {
            service.remove(parse_id(id)?)?;
            println!("Location removed");
        }
        Commands::Show { id } => {
            let location = service.get_by_id(parse_id(id)?)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&location)?);
            } else {
                println!("{}", render::location_detail(&location));
            }
        }
        Commands::Stats => {
            let stats = service.stats()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::stats_block(&stats));
            }
        }
        Commands::Seed => {
            let created = service.seed_if_empty(&demo_locations())?;
            if created == 0 {
                println!("Store already has locations; nothing seeded");
            } else {
                println!("Seeded {created} locations");
            }
        }
    }

    Ok(())
}

fn merge_geo(
    current: &Geo,
    lat: Option<f64>,
    lng: Option<f64>,
    address: Option<&str>,
    zoom: Option<u32>,
) -> Option<Geo> {
    if lat.is_none() && lng.is_none() && address.is_none() && zoom.is_none() {
        return None;
    }
    Some(Geo {
        lat: lat.unwrap_or(current.lat),
        lng: lng.unwrap_or(current.lng),
        address: address.map_or_else(|| current.address.clone(), str::to_string),
        zoom: zoom.unwrap_or(current.zoom),
    })
}

fn print_saved(json: bool, verb: &str, saved: &geoloc_core::Location) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(saved)?);
    } else {
        println!("{verb} Location (id: {})", saved.id);
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<LocationId> {
    LocationId::parse_str(raw.trim()).with_context(|| format!("invalid location id `{raw}`"))
}

/// Pre-selection is cosmetic: an id that does not parse selects nothing.
fn selected_id(raw: &str) -> Option<LocationId> {
    let parsed = LocationId::parse_str(raw.trim()).ok();
    if parsed.is_none() {
        warn!("event=cli_select module=cli status=ignored loc_id={raw:?}");
    }
    parsed
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List => "list",
        Commands::Add { .. } => "add",
        Commands::Update { .. } => "update",
        Commands::Remove { .. } => "remove",
        Commands::Show { .. } => "show",
        Commands::Stats => "stats",
        Commands::Seed => "seed",
    }
}
