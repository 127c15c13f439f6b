//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pagestore_core` linkage by paging over a seeded in-memory
//!   repository.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `pagestore_cli [page_number] [page_size]`

use pagestore_core::{
    core_version, City, CityRepository, CityService, CoreConfig, InMemoryCityRepository,
    ListParameters, ObjectCopier, PointOfInterest,
};
use std::process::ExitCode;

const SAMPLE_CITIES: &[(i64, &str, &str)] = &[
    (1, "New York City", "The one with that big park."),
    (2, "Antwerp", "The one with the cathedral that was never really finished."),
    (3, "Paris", "The one with that big tower."),
    (4, "Berlin", "The one with the wall that came down."),
    (5, "Lisbon", "The one with the yellow trams."),
];

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("pagestore_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let params = ListParameters {
        page_number: parse_arg(args.first(), "page_number")?,
        page_size: parse_arg(args.get(1), "page_size")?,
    };

    let config = CoreConfig::default();
    let mut repo =
        InMemoryCityRepository::new(ObjectCopier::new(&config.copy)).map_err(|err| err.to_string())?;
    for (id, name, description) in SAMPLE_CITIES {
        let city = City::new(*id, *name)
            .with_description(*description)
            .with_point_of_interest(PointOfInterest::new(1, format!("{name} city hall")));
        repo.add_city(&city).map_err(|err| err.to_string())?;
    }

    let service = CityService::new(repo, config.paging);
    let page = service.list_cities(&params).map_err(|err| err.to_string())?;

    println!("pagestore_core version={}", core_version());
    let metadata = serde_json::to_string(&page.metadata()).map_err(|err| err.to_string())?;
    println!("pagination={metadata}");
    let items = serde_json::to_string_pretty(page.items()).map_err(|err| err.to_string())?;
    println!("{items}");
    Ok(())
}

fn parse_arg(raw: Option<&String>, name: &str) -> Result<Option<u32>, String> {
    raw.map(|value| {
        value
            .parse::<u32>()
            .map_err(|err| format!("{name} must be a non-negative integer: {err}"))
    })
    .transpose()
}
