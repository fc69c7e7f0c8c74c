//! Raw dataset records in the `@unitedstates` and GovTrack formats.

#![allow(dead_code)]

use std::fmt::Write;

use serde_json::{json, Value};

/// A `legislators-current.json` record with one term of type `sen` or `rep`.
pub fn raw_legislator(bioguide: &str, term_type: &str, state: &str) -> Value {
    json!({
        "id": {"bioguide": bioguide, "govtrack": 400_000},
        "name": {"first": "Pat", "last": format!("Member{bioguide}")},
        "bio": {"gender": "F"},
        "terms": [{
            "type": term_type,
            "start": "2023-01-03",
            "end": "2025-01-03",
            "state": state,
            "party": "Independent",
            "district": 1
        }]
    })
}

/// A `governors-current.json` record.
pub fn raw_governor(state: &str, first: &str, last: &str, party: &str) -> Value {
    json!({
        "name": {"first": first, "last": last},
        "bio": {"gender": "M"},
        "terms": [{"type": "gov", "start": "2023-01-02", "state": state, "party": party}],
        "id_external": {"twitter": "prior"}
    })
}

/// A `committees-current.json` record.
pub fn raw_committee(thomas_id: &str, name: &str, subcommittees: &[(&str, &str)]) -> Value {
    let subs: Vec<Value> = subcommittees
        .iter()
        .map(|(id, name)| json!({"thomas_id": id, "name": name}))
        .collect();
    json!({
        "thomas_id": thomas_id,
        "name": name,
        "type": "senate",
        "subcommittees": subs
    })
}

/// A GovTrack sponsorship analysis file with the given `(id, ideology, leadership)` rows.
pub fn sponsorship_csv(rows: &[(i64, f64, f64)]) -> String {
    let mut text = String::from("ID, ideology, leadership, name, party, description, introduced_bills_115, cosponsored_bills_115, unique_cosponsors_115, total_cosponsors_115\n");
    for (id, ideology, leadership) in rows {
        let _ = writeln!(
            text,
            "{id}, {ideology}, {leadership}, Someone, Democrat, Senator, 10, 20, 30, 40"
        );
    }
    text
}
