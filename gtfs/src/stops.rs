use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::normalize;
use crate::{orig, IDMapping, StopID};

pub struct Stop {
    pub id: StopID,
    pub orig_id: orig::StopID,
    /// Already passed through normalize::fix_name
    pub name: String,
    pub description: String,
}

impl Stop {
    /// In the Israel MOT feed, heavy-rail stations are the stops with an empty
    /// stop_desc; every street stop carries a "רחוב: ... עיר: ..." description.
    pub fn is_train_station(&self) -> bool {
        self.description.is_empty()
    }
}

pub fn load<R: std::io::Read>(
    reader: R,
) -> Result<(BTreeMap<StopID, Stop>, IDMapping<orig::StopID, StopID>)> {
    let mut stops = BTreeMap::new();
    let mut ids = IDMapping::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        let id = ids.insert_new(rec.stop_id.clone())?;
        stops.insert(
            id,
            Stop {
                id,
                orig_id: rec.stop_id,
                name: normalize::fix_name(&rec.stop_name),
                description: rec.stop_desc.unwrap_or_default(),
            },
        );
    }
    Ok((stops, ids))
}

#[derive(Deserialize)]
struct Record {
    stop_id: orig::StopID,
    stop_name: String,
    stop_desc: Option<String>,
}
