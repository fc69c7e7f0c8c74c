//! Bulk dataset importers.
//!
//! Every import follows the same run: read the raw dataset (fatal on
//! failure), extract each record (skips are counted, never fatal), clear the
//! target according to a [`ClearScope`], then write each document under its
//! identifier. Re-running with a clear fully replaces the data; without one
//! it upserts.
//!
//! Legislation and news refreshes reuse the services behind the API and are
//! driven directly by the `civic-import` binary.

pub mod sources;

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    extract::{
        build_memberships, extract_committee, extract_governor, extract_legislator,
        parse_sponsorship_csv, Extracted, RawSeat,
    },
    models::{Chamber, Committee, CommitteeMembership, Person},
    store::{self, collections, DocumentStore, FieldFilter, StoreError},
};

pub use sources::{DatasetSource, SourceReader};

/// Congress the ideology scores are read for when none is given.
pub const DEFAULT_CONGRESS: u32 = 118;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("failed to parse {location}: {reason}")]
    Parse { location: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Counts for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Raw records read from the source
    pub found: usize,
    pub imported: usize,
    pub skipped: usize,
    /// Documents removed before writing
    pub cleared: u64,
    pub by_party: BTreeMap<String, usize>,
    pub by_chamber: BTreeMap<String, usize>,
}

impl ImportReport {
    fn log(&self, dataset: &str) {
        tracing::info!(
            dataset,
            found = self.found,
            imported = self.imported,
            skipped = self.skipped,
            cleared = self.cleared,
            by_party = ?self.by_party,
            by_chamber = ?self.by_chamber,
            "Import finished"
        );
    }
}

/// What to delete from the target collection before writing.
#[derive(Debug, Clone, PartialEq)]
pub enum ClearScope {
    None,
    All,
    /// Only documents matching every filter
    Matching(Vec<FieldFilter>),
}

impl ClearScope {
    async fn apply(&self, store: &dyn DocumentStore, collection: &str) -> Result<u64, StoreError> {
        match self {
            Self::None => Ok(0),
            Self::All => store.delete_where(collection, &[]).await,
            Self::Matching(filters) => store.delete_where(collection, filters).await,
        }
    }
}

/// A document an importer can write.
pub trait ImportDocument: Serialize + Send + Sync {
    fn document_id(&self) -> &str;

    /// Add this document to the report's breakdowns.
    fn tally(&self, _report: &mut ImportReport) {}
}

impl ImportDocument for Person {
    fn document_id(&self) -> &str {
        &self.bioguide_id
    }

    fn tally(&self, report: &mut ImportReport) {
        let party = self.party.clone().unwrap_or_else(|| "Unknown".to_string());
        *report.by_party.entry(party).or_default() += 1;
        *report
            .by_chamber
            .entry(self.chamber.as_str().to_string())
            .or_default() += 1;
    }
}

impl ImportDocument for Committee {
    fn document_id(&self) -> &str {
        &self.thomas_id
    }

    fn tally(&self, report: &mut ImportReport) {
        *report
            .by_chamber
            .entry(self.committee_type.clone())
            .or_default() += 1;
    }
}

impl ImportDocument for CommitteeMembership {
    fn document_id(&self) -> &str {
        &self.bioguide_id
    }
}

/// Extract, clear and write one collection.
///
/// # Errors
/// Store failures abort the run. Records that fail extraction are skipped.
pub async fn import_records<T, F>(
    store: &dyn DocumentStore,
    collection: &str,
    raw: &[Value],
    extract: F,
    clear: &ClearScope,
) -> Result<ImportReport, ImportError>
where
    T: ImportDocument,
    F: Fn(&Value) -> Extracted<T>,
{
    let mut report = ImportReport {
        found: raw.len(),
        ..ImportReport::default()
    };

    let mut documents = Vec::with_capacity(raw.len());
    for record in raw {
        match extract(record) {
            Extracted::Document(doc) => documents.push(doc),
            Extracted::Skip(reason) => {
                tracing::debug!(collection, %reason, "Skipping record");
                report.skipped += 1;
            }
        }
    }

    write_documents(store, collection, documents, clear, report).await
}

async fn write_documents<T: ImportDocument>(
    store: &dyn DocumentStore,
    collection: &str,
    documents: Vec<T>,
    clear: &ClearScope,
    mut report: ImportReport,
) -> Result<ImportReport, ImportError> {
    report.cleared = clear.apply(store, collection).await?;
    if report.cleared > 0 {
        tracing::info!(collection, cleared = report.cleared, "Cleared existing documents");
    }

    for doc in documents {
        store::put_as(store, collection, doc.document_id(), &doc).await?;
        doc.tally(&mut report);
        report.imported += 1;
    }
    Ok(report)
}

fn clear_scope(clear: bool, scope: ClearScope) -> ClearScope {
    if clear {
        scope
    } else {
        ClearScope::None
    }
}

/// Runs each dataset import against one store.
pub struct Importer {
    store: Arc<dyn DocumentStore>,
    reader: SourceReader,
}

impl Importer {
    pub fn new(store: Arc<dyn DocumentStore>, reader: SourceReader) -> Self {
        Self { store, reader }
    }

    /// Current members of Congress. A clear replaces the whole person collection.
    ///
    /// # Errors
    /// Read, parse and store failures.
    pub async fn legislators(
        &self,
        source: &DatasetSource,
        clear: bool,
    ) -> Result<ImportReport, ImportError> {
        let raw: Vec<Value> = self.reader.read_json(source).await?;
        let report = import_records(
            self.store.as_ref(),
            collections::PERSONS,
            &raw,
            extract_legislator,
            &clear_scope(clear, ClearScope::All),
        )
        .await?;
        report.log("legislators");
        Ok(report)
    }

    /// Current governors. A clear only removes governor documents.
    ///
    /// # Errors
    /// Read, parse and store failures.
    pub async fn governors(
        &self,
        source: &DatasetSource,
        clear: bool,
    ) -> Result<ImportReport, ImportError> {
        let raw: Vec<Value> = self.reader.read_json(source).await?;
        let scope = ClearScope::Matching(vec![FieldFilter::equals(
            "chamber",
            Chamber::Governor.as_str(),
        )]);
        let report = import_records(
            self.store.as_ref(),
            collections::PERSONS,
            &raw,
            extract_governor,
            &clear_scope(clear, scope),
        )
        .await?;
        report.log("governors");
        Ok(report)
    }

    /// Committees, then per-person memberships built from the committee list.
    ///
    /// Both datasets are read before either collection is touched.
    ///
    /// # Errors
    /// Read, parse and store failures.
    pub async fn committees(
        &self,
        committees_source: &DatasetSource,
        membership_source: &DatasetSource,
        clear: bool,
    ) -> Result<(ImportReport, ImportReport), ImportError> {
        let raw: Vec<Value> = self.reader.read_json(committees_source).await?;
        let seats: BTreeMap<String, Vec<RawSeat>> =
            self.reader.read_json(membership_source).await?;

        let committees: Vec<Committee> = raw
            .iter()
            .filter_map(|record| extract_committee(record).document())
            .collect();
        let memberships = build_memberships(&committees, &seats);

        let committee_report = import_records(
            self.store.as_ref(),
            collections::COMMITTEES,
            &raw,
            extract_committee,
            &clear_scope(clear, ClearScope::All),
        )
        .await?;
        committee_report.log("committees");

        let membership_report = write_documents(
            self.store.as_ref(),
            collections::MEMBERSHIPS,
            memberships,
            &clear_scope(clear, ClearScope::All),
            ImportReport {
                found: seats.len(),
                ..ImportReport::default()
            },
        )
        .await?;
        membership_report.log("committee_memberships");

        Ok((committee_report, membership_report))
    }

    /// Merge GovTrack ideology and leadership scores into stored people.
    ///
    /// Reads both chamber files for `congress`. People are matched on
    /// `external_ids.govtrack`; people without a scored match are counted as
    /// skipped.
    ///
    /// # Errors
    /// Read, parse and store failures.
    pub async fn ideology(
        &self,
        govtrack_base: &str,
        congress: u32,
    ) -> Result<ImportReport, ImportError> {
        let base = govtrack_base.trim_end_matches('/');
        let mut scores = HashMap::new();
        for chamber in ["h", "s"] {
            let source =
                DatasetSource::parse(&format!("{base}/{congress}/sponsorshipanalysis_{chamber}.txt"));
            let text = self.reader.read_text(&source).await?;
            let rows = parse_sponsorship_csv(&text).map_err(|err| ImportError::Parse {
                location: source.to_string(),
                reason: err.to_string(),
            })?;
            tracing::info!(source = %source, rows = rows.len(), "Read sponsorship analysis");
            for row in rows {
                if let Some(ideology) = row.ideology {
                    scores.insert(row.govtrack_id, (ideology, row.leadership));
                }
            }
        }

        let mut report = ImportReport {
            found: scores.len(),
            ..ImportReport::default()
        };
        let people = self.store.query(collections::PERSONS, &[]).await?;
        for doc in people {
            let Ok(person) = store::decode::<Person>(doc) else {
                continue;
            };
            let Some(govtrack) = person.external_ids.govtrack else {
                continue;
            };
            let Some((ideology, leadership)) = scores.get(&govtrack) else {
                report.skipped += 1;
                continue;
            };

            let mut fields = Map::new();
            fields.insert("ideology_score".into(), Value::from(*ideology));
            fields.insert(
                "leadership_score".into(),
                leadership.map_or(Value::Null, Value::from),
            );
            self.store
                .merge(collections::PERSONS, &person.bioguide_id, &fields)
                .await?;
            person.tally(&mut report);
            report.imported += 1;
        }

        report.log("ideology");
        Ok(report)
    }
}
