//! Raw extract row -> normalized organization document.

use std::collections::BTreeMap;

use crate::codes::{CodeTable, NteeCodebook};
use crate::models::{OrganizationRecord, RawRow};

/// Subsection code for 501(c)(3) charitable organizations.
pub const CHARITABLE_SUBSECTION: &str = "03";

fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map(|v| v.trim()).unwrap_or("")
}

/// Normalize one row. Returns the document plus the identifier to upsert under,
/// or `None` when the row has no EIN and should be appended instead.
///
/// A malformed `ASSET_AMT` becomes 0, while a malformed `RULING` is left out of
/// the document entirely so "unknown" stays distinct from zero.
pub fn normalize_row(row: &RawRow) -> (OrganizationRecord, Option<String>) {
    let ein = field(row, "EIN").to_string();

    let asset_amt = field(row, "ASSET_AMT").parse::<i64>().unwrap_or(0);
    let ruling = field(row, "RULING").parse::<i32>().ok();

    let record = OrganizationRecord {
        ein: ein.clone(),
        name: field(row, "NAME").to_string(),
        city: field(row, "CITY").to_string(),
        state: field(row, "STATE").to_uppercase(),
        ntee: field(row, "NTEE_CD").to_uppercase(),
        subsection: field(row, "SUBSECTION").to_string(),
        deductibility: field(row, "DEDUCTIBILITY").to_string(),
        asset_amt,
        ruling,
        raw: row.clone(),
        labels: None,
    };

    let id = if ein.is_empty() { None } else { Some(ein) };
    (record, id)
}

/// Row predicate restricting ingestion to a single subsection code.
pub fn subsection_is(code: &str) -> impl Fn(&RawRow) -> bool + '_ {
    move |row: &RawRow| row.get("SUBSECTION").map(String::as_str) == Some(code)
}

/// Attach human-readable labels for every code table column present in the raw
/// row, plus the NTEE title when the codebook knows the code.
pub fn enrich(record: &mut OrganizationRecord, ntee: &NteeCodebook) {
    let mut labels = BTreeMap::new();

    for table in CodeTable::ALL {
        if let Some(code) = record.raw.get(table.raw_field()) {
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            labels.insert(
                table.label_key().to_string(),
                crate::codes::lookup(table, code),
            );
        }
    }

    if let Some(entry) = ntee.get_entry(&record.ntee) {
        labels.insert("ntee".to_string(), entry.title.clone());
    }

    record.labels = Some(labels);
}
