use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::{orig, IDMapping, StopID, TripID};

pub struct StopTime {
    /// Non-negative, unique per trip -- but uniqueness is enforced downstream,
    /// where a duplicate becomes a per-trip data-contract error instead of
    /// aborting the whole load.
    pub stop_sequence: u32,
    pub stop_id: StopID,
}

pub fn load<R: std::io::Read>(
    reader: R,
    stop_ids: &IDMapping<orig::StopID, StopID>,
    trip_ids: &IDMapping<orig::TripID, TripID>,
) -> Result<BTreeMap<TripID, Vec<StopTime>>> {
    let mut stop_times: BTreeMap<TripID, Vec<StopTime>> = BTreeMap::new();
    let mut unknown_trips = 0;
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        let trip_id = match trip_ids.lookup(&rec.trip_id) {
            Ok(id) => id,
            Err(_) => {
                unknown_trips += 1;
                continue;
            }
        };
        stop_times.entry(trip_id).or_insert_with(Vec::new).push(StopTime {
            stop_sequence: rec.stop_sequence,
            stop_id: stop_ids.lookup(&rec.stop_id)?,
        });
    }
    if unknown_trips > 0 {
        warn!("{unknown_trips} stop_times belong to trips not in trips.txt");
    }
    Ok(stop_times)
}

#[derive(Deserialize)]
struct Record {
    trip_id: orig::TripID,
    stop_sequence: u32,
    stop_id: orig::StopID,
}
