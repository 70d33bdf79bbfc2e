use anyhow::Result;
use serde::Deserialize;

use crate::{orig, IDMapping, StopTime, TripID};

pub struct Trip {
    pub id: TripID,
    pub orig_id: orig::TripID,
    pub route_id: orig::RouteID,
    pub headsign: Option<String>,
    /// true is 0 in GTFS, false is 1. Inbound/outbound are arbitrary.
    pub outbound_direction: bool,

    /// In raw file order. Sorting by stop_sequence (and rejecting duplicate
    /// positions) happens downstream, when per-trip stop sequences are built.
    pub stop_times: Vec<StopTime>,
}

pub fn load<R: std::io::Read>(reader: R) -> Result<(Vec<Trip>, IDMapping<orig::TripID, TripID>)> {
    let mut trips = Vec::new();
    let mut ids = IDMapping::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        let id = ids.insert_new(rec.trip_id.clone())?;
        trips.push(Trip {
            id,
            orig_id: rec.trip_id,
            route_id: rec.route_id,
            headsign: rec.trip_headsign,
            outbound_direction: match rec.direction_id {
                Some(0) => true,
                Some(1) => false,
                // outbound_direction is just used for grouping, so if there's no direction, that's
                // fine
                None => true,
                x => bail!("Unknown direction_id {:?}", x),
            },

            stop_times: Vec::new(),
        });
    }
    Ok((trips, ids))
}

#[derive(Deserialize)]
struct Record {
    trip_id: orig::TripID,
    route_id: orig::RouteID,
    trip_headsign: Option<String>,
    direction_id: Option<usize>,
}
