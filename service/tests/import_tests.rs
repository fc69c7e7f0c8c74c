//! Dataset imports read over HTTP into an in-memory store.

mod common;

use std::sync::Arc;

use civicdata_api::{
    import::{DatasetSource, ImportError, Importer, SourceReader},
    models::{Chamber, CommitteeMembership, Person},
    store::{collections, get_as, memory::InMemoryStore, DocumentStore},
};
use common::{
    factories::{raw_committee, raw_governor, raw_legislator, sponsorship_csv, PersonFactory},
    http_mock::MockHttpServer,
};
use serde_json::{json, Value};

fn importer(store: &Arc<InMemoryStore>) -> Importer {
    Importer::new(store.clone(), SourceReader::new(5).expect("reader"))
}

async fn serve_json(server: &MockHttpServer, route: &'static str, body: Value) -> DatasetSource {
    server.expect_get(route).respond_with_json(body).mount().await;
    DatasetSource::parse(&format!("{}{route}", server.url()))
}

#[tokio::test]
async fn legislator_import_replaces_previous_roster() {
    let store = Arc::new(InMemoryStore::new());
    for _ in 0..100 {
        PersonFactory::senator("ZZ").create(store.as_ref()).await;
    }

    let records: Vec<Value> = (0..90)
        .map(|n| {
            let kind = if n % 3 == 0 { "sen" } else { "rep" };
            raw_legislator(&format!("N{n:06}"), kind, "OH")
        })
        .collect();
    let server = MockHttpServer::start().await;
    let source = serve_json(&server, "/legislators-current.json", json!(records)).await;

    let report = importer(&store)
        .legislators(&source, true)
        .await
        .expect("import");

    assert_eq!(report.found, 90);
    assert_eq!(report.imported, 90);
    assert_eq!(report.cleared, 100);
    assert_eq!(report.by_chamber["Senate"], 30);
    assert_eq!(report.by_chamber["House"], 60);
    assert_eq!(report.by_party["Independent"], 90);
    assert_eq!(store.count(collections::PERSONS), 90);
}

#[tokio::test]
async fn legislator_import_without_clear_upserts() {
    let store = Arc::new(InMemoryStore::new());
    PersonFactory::senator("ZZ")
        .with_id("OLD0001")
        .create(store.as_ref())
        .await;

    let server = MockHttpServer::start().await;
    let source = serve_json(
        &server,
        "/legislators.json",
        json!([raw_legislator("N000001", "rep", "OH"), {"id": {"bioguide": "X"}, "terms": []}]),
    )
    .await;

    let report = importer(&store)
        .legislators(&source, false)
        .await
        .expect("import");

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.cleared, 0);
    assert!(store.peek(collections::PERSONS, "OLD0001").is_some());
    assert_eq!(store.count(collections::PERSONS), 2);
}

#[tokio::test]
async fn odd_optional_field_does_not_drop_legislator() {
    let store = Arc::new(InMemoryStore::new());
    let mut record = raw_legislator("N000002", "rep", "WY");
    record["bio"]["birthday"] = json!("1950");
    record["terms"][0]["district"] = json!("at-large");

    let server = MockHttpServer::start().await;
    let source = serve_json(&server, "/legislators-current.json", json!([record])).await;

    let report = importer(&store)
        .legislators(&source, true)
        .await
        .expect("import");

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 0);
    let person: Person = get_as(store.as_ref(), collections::PERSONS, "N000002")
        .await
        .expect("store")
        .expect("person");
    assert_eq!(person.state.as_deref(), Some("WY"));
    assert_eq!(person.district, None);
}

#[tokio::test]
async fn governor_clear_keeps_members_of_congress() {
    let store = Arc::new(InMemoryStore::new());
    PersonFactory::senator("OH")
        .with_id("S000001")
        .create(store.as_ref())
        .await;
    PersonFactory::governor("WY").create(store.as_ref()).await;

    let server = MockHttpServer::start().await;
    let source = serve_json(
        &server,
        "/governors-current.json",
        json!([
            raw_governor("OH", "Mike", "DeWine", "Republican"),
            raw_governor("NY", "Kathy", "Hochul", "Democrat"),
            {"name": {"first": "No", "last": "State"}, "terms": [{"type": "gov"}]}
        ]),
    )
    .await;

    let report = importer(&store)
        .governors(&source, true)
        .await
        .expect("import");

    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.cleared, 1);
    assert_eq!(report.by_chamber["Governor"], 2);
    assert!(store.peek(collections::PERSONS, "S000001").is_some());
    assert!(store.peek(collections::PERSONS, "GOV-WY").is_none());

    let ohio: Person = get_as(store.as_ref(), collections::PERSONS, "GOV-OH")
        .await
        .expect("store")
        .expect("governor");
    assert_eq!(ohio.chamber, Chamber::Governor);
    assert_eq!(ohio.full_name.as_deref(), Some("Mike DeWine"));
    assert_eq!(ohio.external_ids.twitter, None);
}

#[tokio::test]
async fn committees_and_memberships_are_linked() {
    let store = Arc::new(InMemoryStore::new());
    let server = MockHttpServer::start().await;
    let committees = serve_json(
        &server,
        "/committees-current.json",
        json!([
            raw_committee("SSJU", "Senate Committee on the Judiciary", &[("01", "Antitrust")]),
            raw_committee("SSFI", "Senate Committee on Finance", &[]),
        ]),
    )
    .await;
    let memberships = serve_json(
        &server,
        "/committee-membership-current.json",
        json!({
            "SSJU": [
                {"bioguide": "P000145", "rank": 7, "party": "majority"},
                {"bioguide": "C001056", "rank": 1, "title": "Ranking Member", "party": "minority"}
            ],
            "SSJU01": [{"bioguide": "P000145", "rank": 2, "party": "majority"}],
            "SSFI": [{"rank": 3}]
        }),
    )
    .await;

    let (committee_report, membership_report) = importer(&store)
        .committees(&committees, &memberships, true)
        .await
        .expect("import");

    assert_eq!(committee_report.imported, 2);
    assert_eq!(membership_report.found, 3);
    assert_eq!(membership_report.imported, 2);
    assert_eq!(store.count(collections::COMMITTEES), 2);

    let padilla: CommitteeMembership = get_as(store.as_ref(), collections::MEMBERSHIPS, "P000145")
        .await
        .expect("store")
        .expect("membership");
    assert_eq!(padilla.committees.len(), 2);
    assert!(!padilla.committees[0].is_subcommittee);
    let sub = &padilla.committees[1];
    assert_eq!(sub.committee_id, "SSJU01");
    assert_eq!(sub.parent_committee_id.as_deref(), Some("SSJU"));
    assert_eq!(
        sub.parent_committee_name.as_deref(),
        Some("Senate Committee on the Judiciary")
    );
}

#[tokio::test]
async fn failed_membership_download_leaves_committees_untouched() {
    let store = Arc::new(InMemoryStore::new());
    for id in ["HSAG", "HSAP", "HSAS"] {
        store
            .put(collections::COMMITTEES, id, &json!({"thomas_id": id, "name": id}))
            .await
            .expect("seed committee");
    }

    let server = MockHttpServer::start().await;
    let committees = serve_json(
        &server,
        "/committees-current.json",
        json!([raw_committee("SSJU", "Senate Committee on the Judiciary", &[])]),
    )
    .await;
    server
        .expect_get("/committee-membership-current.json")
        .respond_with_status(500)
        .mount()
        .await;
    let memberships =
        DatasetSource::parse(&format!("{}/committee-membership-current.json", server.url()));

    let err = importer(&store)
        .committees(&committees, &memberships, true)
        .await
        .expect_err("should fail");

    assert!(matches!(err, ImportError::Fetch { .. }));
    assert_eq!(store.count(collections::COMMITTEES), 3);
    assert!(store.peek(collections::COMMITTEES, "SSJU").is_none());
}

#[tokio::test]
async fn ideology_scores_merge_by_govtrack_id() {
    let store = Arc::new(InMemoryStore::new());
    PersonFactory::senator("NY")
        .with_id("S000148")
        .with_govtrack(300_087)
        .create(store.as_ref())
        .await;
    PersonFactory::representative("NC", 12)
        .with_id("A000370")
        .with_govtrack(412_607)
        .create(store.as_ref())
        .await;
    PersonFactory::representative("OH", 1)
        .with_id("U000001")
        .with_govtrack(999_999)
        .create(store.as_ref())
        .await;
    PersonFactory::governor("OH").create(store.as_ref()).await;

    let server = MockHttpServer::start().await;
    server
        .expect_get("/118/sponsorshipanalysis_s.txt")
        .respond_with_body(sponsorship_csv(&[(300_087, 0.62, 0.91)]))
        .mount()
        .await;
    server
        .expect_get("/118/sponsorshipanalysis_h.txt")
        .respond_with_body(sponsorship_csv(&[(412_607, 0.14, 0.33)]))
        .mount()
        .await;

    let report = importer(&store)
        .ideology(&format!("{}/", server.url()), 118)
        .await
        .expect("import");

    assert_eq!(report.found, 2);
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);

    let schumer: Person = get_as(store.as_ref(), collections::PERSONS, "S000148")
        .await
        .expect("store")
        .expect("person");
    assert_eq!(schumer.ideology_score, Some(0.62));
    assert_eq!(schumer.leadership_score, Some(0.91));

    let unscored: Person = get_as(store.as_ref(), collections::PERSONS, "U000001")
        .await
        .expect("store")
        .expect("person");
    assert_eq!(unscored.ideology_score, None);
}

#[tokio::test]
async fn failed_download_is_fatal_and_writes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    PersonFactory::senator("OH").create(store.as_ref()).await;

    let server = MockHttpServer::start().await;
    server
        .expect_get("/legislators-current.json")
        .respond_with_status(500)
        .mount()
        .await;
    let source = DatasetSource::parse(&format!("{}/legislators-current.json", server.url()));

    let err = importer(&store)
        .legislators(&source, true)
        .await
        .expect_err("should fail");

    assert!(matches!(err, ImportError::Fetch { .. }));
    assert_eq!(store.count(collections::PERSONS), 1);
}

#[tokio::test]
async fn non_json_dataset_is_a_parse_error() {
    let store = Arc::new(InMemoryStore::new());
    let server = MockHttpServer::start().await;
    server
        .expect_get("/legislators-current.json")
        .respond_with_body("not json")
        .mount()
        .await;
    let source = DatasetSource::parse(&format!("{}/legislators-current.json", server.url()));

    let err = importer(&store)
        .legislators(&source, true)
        .await
        .expect_err("should fail");

    assert!(matches!(err, ImportError::Parse { .. }));
}

#[tokio::test]
async fn missing_file_is_a_fetch_error() {
    let store = Arc::new(InMemoryStore::new());
    let source = DatasetSource::parse("/nonexistent/legislators-current.json");

    let err = importer(&store)
        .legislators(&source, true)
        .await
        .expect_err("should fail");

    assert!(matches!(err, ImportError::Fetch { location, .. } if location.contains("nonexistent")));
}
