//! Seed snapshot compiled into the crate

use tracing::warn;

use super::parse_line;
use crate::datatype::DatatypeId;
use crate::property_id::PropertyId;

pub const SEED_SNAPSHOT: &str = include_str!("../../data/property_types.tsv");

/// Entries of the embedded seed. Bad lines are logged and skipped.
pub fn seed_entries() -> Vec<(PropertyId, DatatypeId)> {
    SEED_SNAPSHOT
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match parse_line(idx + 1, line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping seed snapshot entry");
                None
            }
        })
        .collect()
}
