use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::orig;

pub fn load<R: std::io::Read>(reader: R) -> Result<BTreeMap<orig::AgencyID, String>> {
    let mut agencies = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        if agencies.contains_key(&rec.agency_id) {
            bail!("Duplicate {:?}", rec.agency_id);
        }
        agencies.insert(rec.agency_id, rec.agency_name);
    }
    Ok(agencies)
}

#[derive(Deserialize)]
struct Record {
    agency_id: orig::AgencyID,
    agency_name: String,
}
