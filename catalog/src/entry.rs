use serde::Serialize;

/// One route in the output catalog, shaped the way PTNA's CSV injection
/// expects it. Train numbers appear twice: the compact ranges for humans, the
/// full list for tooling.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub route_type: String,
    #[serde(rename = "ref")]
    pub line_ref: String,
    pub comment: String,
    pub from: String,
    pub to: String,
    pub operator: String,
    pub gtfs_feed: String,
    /// Semicolon-joined GTFS route_ids backing this entry
    pub route_id: String,
    pub train_numbers: String,
    pub train_numbers_full: String,
}
