use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::orig;

/// GTFS route_type code for heavy rail
pub const ROUTE_TYPE_RAIL: u16 = 2;

pub struct Route {
    pub route_id: orig::RouteID,
    pub agency_id: orig::AgencyID,
    /// Kept as the raw GTFS code. The Israel feed uses nonstandard values
    /// (8 for share taxis, 715 for flexible service), so an exhaustive enum
    /// would reject real data.
    pub route_type: u16,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
}

impl Route {
    pub fn is_rail(&self) -> bool {
        self.route_type == ROUTE_TYPE_RAIL
    }
}

pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<orig::RouteID, Route>> {
    let mut routes = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if routes.contains_key(&rec.route_id) {
            bail!("Duplicate {:?}", rec.route_id);
        }
        routes.insert(
            rec.route_id.clone(),
            Route {
                route_id: rec.route_id,
                agency_id: rec.agency_id,
                route_type: rec.route_type,
                short_name: rec.route_short_name,
                long_name: rec.route_long_name,
                description: rec.route_desc,
            },
        );
    }
    Ok(routes)
}

#[derive(Deserialize)]
struct Record {
    route_id: orig::RouteID,
    agency_id: orig::AgencyID,
    route_type: u16,
    route_short_name: Option<String>,
    route_long_name: Option<String>,
    route_desc: Option<String>,
}
