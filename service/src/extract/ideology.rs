//! GovTrack sponsorship-analysis CSV.
//!
//! Columns used: `ID` (GovTrack id), `ideology`, `leadership`, `name`,
//! `party`, `description`. Blank scores decode as `None`.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SponsorshipScore {
    #[serde(rename = "ID")]
    pub govtrack_id: i64,
    pub ideology: Option<f64>,
    pub leadership: Option<f64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub description: String,
}

/// Parse a sponsorship-analysis file.
///
/// Rows that do not decode are logged and skipped.
///
/// # Errors
/// Returns an error when the header row cannot be read.
pub fn parse_sponsorship_csv(text: &str) -> Result<Vec<SponsorshipScore>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    reader.headers()?;

    let mut scores = Vec::new();
    for (line, row) in reader.deserialize::<SponsorshipScore>().enumerate() {
        match row {
            Ok(score) => scores.push(score),
            Err(err) => tracing::warn!(row = line + 1, error = %err, "Skipping sponsorship row"),
        }
    }
    Ok(scores)
}
