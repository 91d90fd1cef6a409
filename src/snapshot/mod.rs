//! Snapshot text format
//!
//! One `P<digits>\t<TOKEN>` pair per line, ordered by the numeric property
//! id. Blank lines and `#` comments are ignored on read. The seed shipped
//! with the crate (`data/property_types.tsv`) uses the same format, so an
//! export can replace it directly.

mod seed;

use std::io::{Read, Write};

use crate::datatype::DatatypeId;
use crate::error::SnapshotError;
use crate::property_id::PropertyId;

pub use seed::{seed_entries, SEED_SNAPSHOT};

pub const HEADER: &str = "# Known property datatypes, one \"<property id>\\t<datatype>\" pair per line,\n\
# ordered by numeric property id. Regenerate with `property_types export`.\n";

/// Parse one line; `Ok(None)` for blanks and comments
pub fn parse_line(
    line_no: usize,
    line: &str,
) -> Result<Option<(PropertyId, DatatypeId)>, SnapshotError> {
    let line = line.trim_end();
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason: String| SnapshotError::Malformed {
        line: line_no,
        reason,
    };

    let (id, token) = line
        .split_once('\t')
        .ok_or_else(|| malformed(format!("expected '<property id>\\t<datatype>', got '{}'", line)))?;
    let property: PropertyId = id.trim().parse().map_err(|e| malformed(format!("{}", e)))?;
    let datatype: DatatypeId = token
        .trim()
        .parse()
        .map_err(|e| malformed(format!("{}", e)))?;

    Ok(Some((property, datatype)))
}

/// Strict parse: the first bad line fails the whole snapshot
pub fn parse_snapshot(text: &str) -> Result<Vec<(PropertyId, DatatypeId)>, SnapshotError> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(entry) = parse_line(idx + 1, line)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

pub fn read_snapshot<R: Read>(
    mut reader: R,
) -> Result<Vec<(PropertyId, DatatypeId)>, SnapshotError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_snapshot(&text)
}

/// Write `entries` sorted by numeric property id, header first
pub fn write_snapshot<'a, W, I>(sink: &mut W, entries: I) -> Result<usize, SnapshotError>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = (&'a PropertyId, DatatypeId)>,
{
    let mut entries: Vec<(&PropertyId, DatatypeId)> = entries.into_iter().collect();
    entries.sort_by_key(|(property, _)| property.numeric_id());

    sink.write_all(HEADER.as_bytes())?;
    for (property, datatype) in &entries {
        writeln!(sink, "{}\t{}", property, datatype)?;
    }
    sink.flush()?;

    Ok(entries.len())
}
