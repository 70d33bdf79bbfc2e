//! Reconstructs canonical railway-line identities from per-trip stop
//! sequences. The feed has no table saying which trips belong to the same
//! physical line, so the pipeline rebuilds that: collect one sequence per
//! trip, orient them consistently, merge them per line family into canonical
//! routes, name each route by its endpoints, and summarize which train
//! numbers run it.
//!
//! Each line family (ref bucket) stands alone: a contract violation inside
//! one family drops that family from the output and nothing else.

mod collect;
mod error;
mod identify;
mod merge;
mod ranges;

use std::collections::{BTreeMap, BTreeSet};

use gtfs::{orig, GTFS};

pub use collect::{Sequence, TrainNumber, TrainTrip};
pub use error::TrainError;
pub use identify::RouteIdentifier;
pub use merge::{Group, Merger};
pub use ranges::NumberSummary;

use collect::Collection;

pub struct TrainRoutes {
    /// Every train route in the feed, mapped to its canonical line.
    pub identifier_by_route: BTreeMap<orig::RouteID, RouteIdentifier>,
    /// Per canonical line, the train numbers that run it.
    pub numbers: BTreeMap<RouteIdentifier, NumberSummary>,
    /// Each route's direction-normalized sequence and direction flag, for
    /// de-duplicating routes that run the identical service.
    pub sequence_by_route: BTreeMap<orig::RouteID, (Sequence, bool)>,
}

pub fn reconcile(gtfs: &GTFS) -> TrainRoutes {
    let Collection {
        trips,
        mut poisoned,
    } = collect::collect(gtfs);

    let mut sequences_by_ref: BTreeMap<u8, BTreeSet<Sequence>> = BTreeMap::new();
    for trip in &trips {
        sequences_by_ref
            .entry(trip.line_ref)
            .or_default()
            .insert(trip.sequence.clone());
    }

    let mut identifiers_by_ref: BTreeMap<u8, BTreeMap<Sequence, RouteIdentifier>> = BTreeMap::new();
    for (line_ref, sequences) in sequences_by_ref {
        if poisoned.contains(&line_ref) {
            warn!("Trains with ref {line_ref}: skipping {} sequences", sequences.len());
            continue;
        }
        let total = sequences.len();
        let result = Merger::new(sequences)
            .run()
            .and_then(|groups| identify::assign(gtfs, line_ref, groups));
        match result {
            Ok(by_sequence) => {
                let routes: BTreeSet<&RouteIdentifier> = by_sequence.values().collect();
                info!(
                    "Trains with ref {line_ref}: mapped {total} sequences down to {} routes",
                    routes.len()
                );
                identifiers_by_ref.insert(line_ref, by_sequence);
            }
            Err(err) => {
                error!("Trains with ref {line_ref}: {err}");
                poisoned.insert(line_ref);
            }
        }
    }

    let mut identifier_by_number: BTreeMap<TrainNumber, RouteIdentifier> = BTreeMap::new();
    let mut identifier_by_route = BTreeMap::new();
    let mut sequence_by_route = BTreeMap::new();
    for trip in &trips {
        if poisoned.contains(&trip.line_ref) {
            continue;
        }
        // Every collected sequence of a surviving ref belongs to some group
        let identifier = identifiers_by_ref[&trip.line_ref][&trip.sequence].clone();
        if let Some(prev) = identifier_by_number.insert(trip.number, identifier.clone()) {
            if prev != identifier {
                warn!(
                    "Train number {} runs both {prev} and {identifier}",
                    trip.number
                );
            }
        }
        if let Some(prev) = identifier_by_route.insert(trip.route.clone(), identifier.clone()) {
            if prev != identifier {
                warn!("Route {:?} has trips on both {prev} and {identifier}", trip.route);
            }
        }
        sequence_by_route.insert(trip.route.clone(), (trip.sequence.clone(), trip.outbound));
    }

    TrainRoutes {
        identifier_by_route,
        numbers: ranges::summarize(&identifier_by_number),
        sequence_by_route,
    }
}
