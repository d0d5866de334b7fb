//! Compile a MeCab-style lexicon CSV into an [`FstDictionary`].
//!
//! Row layout (IPADIC): `surface,left_id,right_id,cost,pos1,pos2,pos3,pos4,
//! conj_type,conj_form,base,reading,pronunciation`. A literal `*` marks an
//! absent field. Conjugation columns are parsed but not retained.

use std::collections::HashMap;
use std::io;

use tracing::debug;

use super::{DictError, FstDictionary, PosTable, WordEntry};

/// A field is absent when the lexicon writes `*` or leaves it empty.
fn field(s: &str) -> Option<&str> {
    if s.is_empty() || s == "*" {
        None
    } else {
        Some(s)
    }
}

/// Parse lexicon CSV from `reader` and build a dictionary.
///
/// Rows with unparsable connection IDs or cost are skipped and counted, not
/// fatal: real lexicons carry the odd malformed line. A structurally broken
/// CSV stream (bad quoting, I/O failure) is an error.
pub fn build_from_lexicon<R: io::Read>(reader: R) -> Result<FstDictionary, DictError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pos_table = PosTable::new();
    let mut entries: HashMap<String, Vec<WordEntry>> = HashMap::new();
    let mut total = 0u64;
    let mut skipped = 0u64;

    for record in csv_reader.records() {
        let record = record.map_err(|e| DictError::Parse(e.to_string()))?;
        total += 1;

        let Some(surface) = record.get(0).and_then(field) else {
            skipped += 1;
            continue;
        };
        let Some((left_id, right_id, cost)) = parse_id_cost(&record) else {
            skipped += 1;
            continue;
        };

        let pos_path: Vec<&str> = (4..8)
            .filter_map(|i| record.get(i).and_then(field))
            .collect();
        let pos_id = pos_table.intern(&pos_path);

        let base_form = record.get(10).and_then(field).map(str::to_string);
        let reading = record.get(11).and_then(field).map(str::to_string);

        entries.entry(surface.to_string()).or_default().push(WordEntry {
            pos_id,
            base_form,
            reading,
            cost,
            left_id,
            right_id,
        });
    }

    debug!(total, skipped, surfaces = entries.len());
    FstDictionary::from_entries(entries, pos_table)
}

/// Parse fields `[1]`, `[2]`, `[3]` as `(left_id: u16, right_id: u16, cost: i16)`.
///
/// Returns `None` if any field fails to parse — callers should skip the row.
fn parse_id_cost(record: &csv::StringRecord) -> Option<(u16, u16, i16)> {
    let left_id: u16 = record.get(1)?.trim().parse().ok()?;
    let right_id: u16 = record.get(2)?.trim().parse().ok()?;
    let cost: i16 = record.get(3)?.trim().parse().ok()?;
    Some((left_id, right_id, cost))
}
