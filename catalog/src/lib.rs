#[macro_use]
extern crate log;

mod entry;
pub mod trains;

use std::collections::{BTreeMap, BTreeSet};

use gtfs::{normalize, orig, GTFS};

pub use entry::CatalogEntry;
pub use trains::{RouteIdentifier, TrainError};

/// Builds the train catalog: reconcile the feed's trips into canonical lines,
/// then emit one entry per line. `feed` is the PTNA feed identifier, e.g.
/// "IL-MOT".
pub fn build(gtfs: &GTFS, feed: &str) -> Vec<CatalogEntry> {
    let routes = trains::reconcile(gtfs);

    // Several route_ids usually back one line (directions, schedule periods).
    // Routes running the identical service (same normalized sequence, same
    // direction) are listed once; route_ids are visited in sorted order, so
    // which one represents its duplicates is reproducible.
    let mut routes_by_identifier: BTreeMap<RouteIdentifier, Vec<orig::RouteID>> = BTreeMap::new();
    let mut seen: BTreeMap<RouteIdentifier, BTreeSet<&(trains::Sequence, bool)>> = BTreeMap::new();
    for (route_id, identifier) in &routes.identifier_by_route {
        let service = &routes.sequence_by_route[route_id];
        if seen.entry(identifier.clone()).or_default().insert(service) {
            routes_by_identifier
                .entry(identifier.clone())
                .or_default()
                .push(route_id.clone());
        }
    }

    // RouteIdentifier orders by (ref, from, to), which is exactly the catalog
    // order, so iterating the map emits entries already sorted
    let mut entries = Vec::new();
    for (identifier, route_ids) in routes_by_identifier {
        let mut operators: BTreeSet<String> = route_ids
            .iter()
            .filter_map(|id| gtfs.routes.get(id))
            .filter_map(|route| gtfs.agencies.get(&route.agency_id))
            .map(|name| normalize::fix_name(name))
            .collect();
        if operators.len() > 1 {
            warn!("Different operators for {identifier}: {operators:?}");
        }
        let operator = operators.pop_first().unwrap_or_default();

        for id in &route_ids {
            if let Some(route) = gtfs.routes.get(id) {
                if !route.is_rail() {
                    warn!(
                        "Route {:?} reconciled as a train but has route_type {}",
                        id, route.route_type
                    );
                }
            }
        }

        let summary = &routes.numbers[&identifier];
        entries.push(CatalogEntry {
            route_type: "train".to_string(),
            line_ref: identifier.line_ref.to_string(),
            comment: format!("מספרי רכבות: {}", summary.ranges),
            from: identifier.from.clone(),
            to: identifier.to.clone(),
            operator,
            gtfs_feed: feed.to_string(),
            route_id: route_ids
                .iter()
                .map(|id| id.0.clone())
                .collect::<Vec<_>>()
                .join(";"),
            train_numbers: summary.ranges.clone(),
            train_numbers_full: summary.full.clone(),
        });
    }
    info!("{} catalog entries", entries.len());
    entries
}
