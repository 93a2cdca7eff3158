// DexTracker - core/export.rs
//
// CSV and JSON export of entries.
// Core layer: writes to any Write trait object.

use crate::core::model::Entry;
use crate::core::stats::stat_total;
use crate::util::constants;
use crate::util::error::ExportError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;
use std::path::Path;

/// Export entries to CSV.
///
/// Writes: NUM, NAME, TYPE, the six stats, BST.
pub fn export_csv<W: Write>(
    entries: &[&Entry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_limit(entries.len())?;
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![constants::FIELD_NUM, constants::FIELD_NAME, constants::FIELD_TYPE];
    header.extend_from_slice(constants::STAT_FIELDS);
    header.push(constants::FIELD_BST);
    csv_writer.write_record(&header).map_err(csv_err)?;

    for entry in entries {
        let bst = stat_total(entry).to_string();
        let mut record = vec![
            entry.get(constants::FIELD_NUM),
            entry.name(),
            entry.get(constants::FIELD_TYPE),
        ];
        record.extend(constants::STAT_FIELDS.iter().map(|f| entry.get(f)));
        record.push(&bst);
        csv_writer.write_record(&record).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries.len())
}

/// One exported JSON object: all entry fields plus the computed total.
///
/// A `BST` column carried by the log itself is replaced by the computed
/// total so each object has a single `BST` key.
struct JsonRecord<'a> {
    entry: &'a Entry,
    bst: i64,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, value) in self.entry.fields() {
            if field != constants::FIELD_BST {
                map.serialize_entry(field, value)?;
            }
        }
        map.serialize_entry(constants::FIELD_BST, &self.bst)?;
        map.end()
    }
}

/// Export entries to JSON format (array of objects).
pub fn export_json<W: Write>(
    entries: &[&Entry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_limit(entries.len())?;
    let records: Vec<JsonRecord<'_>> = entries
        .iter()
        .map(|&entry| JsonRecord {
            entry,
            bst: stat_total(entry),
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.len())
}

fn check_limit(count: usize) -> Result<(), ExportError> {
    if count > constants::MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count,
            max: constants::MAX_EXPORT_ENTRIES,
        });
    }
    Ok(())
}
