#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod agency;
mod ids;
pub mod normalize;
mod routes;
mod stop_times;
mod stops;
mod trips;

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::Result;

pub use ids::{orig, CheapID, IDMapping, StopID, TripID};
pub use routes::{Route, ROUTE_TYPE_RAIL};
pub use stop_times::StopTime;
pub use stops::Stop;
pub use trips::Trip;

pub struct GTFS {
    pub stops: BTreeMap<StopID, Stop>,
    pub routes: BTreeMap<orig::RouteID, Route>,
    pub trips: Vec<Trip>,
    pub agencies: BTreeMap<orig::AgencyID, String>,
}

impl GTFS {
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let (stops, stop_ids) = stops::load(open(dir, "stops.txt")?)?;
        let routes = routes::load(open(dir, "routes.txt")?)?;
        let agencies = agency::load(open(dir, "agency.txt")?)?;

        let (mut trips, trip_ids) = trips::load(open(dir, "trips.txt")?)?;
        let mut stop_times = stop_times::load(open(dir, "stop_times.txt")?, &stop_ids, &trip_ids)?;

        for trip in &mut trips {
            trip.stop_times = match stop_times.remove(&trip.id) {
                Some(list) => list,
                None => bail!("Trip {:?} has no stop times", trip.orig_id),
            };
        }

        info!(
            "Loaded {} stops, {} routes, {} trips, {} agencies",
            stops.len(),
            routes.len(),
            trips.len(),
            agencies.len()
        );

        Ok(Self {
            stops,
            routes,
            trips,
            agencies,
        })
    }

    /// Panics on an unknown ID; trips only refer to stops from the same load.
    pub fn stop(&self, id: StopID) -> &Stop {
        &self.stops[&id]
    }
}

// Adds the path in the error message
fn open(dir: &Path, name: &str) -> Result<File> {
    let path = dir.join(name);
    File::open(&path).map_err(|err| anyhow!("{}: {err}", path.display()))
}
