//! End-to-end tests: upload a project, open its results, change selections
//! and export reports.

mod common;

use regex::Regex;
use rust_decimal::Decimal;

use autolight::db::{project_repo, report_repo};
use autolight::error::{AutolightError, ReferenceError};
use autolight::export::{self, ExportTable};
use autolight::repository::{CatalogRepository, FixtureRepository, ProjectRepository};
use autolight::selection::MAX_RECOMMENDATIONS;
use autolight::{ReportFormat, ResultsSession};
use common::{FixtureBuilder, ModelBuilder, TestHarness};

#[test]
fn test_upload_then_open_results() {
    let harness = TestHarness::with_sample_catalog();
    let outcome = harness.upload("Head Office", 11);

    let session = ResultsSession::open(&harness.db, &harness.owner, &outcome.project.id).unwrap();
    assert_eq!(session.selection().len(), outcome.fixtures.len());
    assert_eq!(session.total_cost(), outcome.project.total_cost);

    for entry in session.selection().entries() {
        let selected = entry.selected_model.as_ref().unwrap();
        assert!(entry.recommendations.len() <= MAX_RECOMMENDATIONS);
        for rec in &entry.recommendations {
            assert_ne!(rec.id, selected.id);
            assert_eq!(rec.fixture_type, selected.fixture_type);
        }
    }
}

#[test]
fn test_selection_updates_total_and_store() {
    let harness = TestHarness::new();
    let a = harness
        .db
        .insert_model(&ModelBuilder::new("LP-A").price_cents(4599).build())
        .unwrap();
    let b = harness
        .db
        .insert_model(&ModelBuilder::new("LP-B").price_cents(2499).build())
        .unwrap();
    let down = harness
        .db
        .insert_model(
            &ModelBuilder::new("DL-A")
                .fixture_type("Downlight")
                .price_cents(1299)
                .build(),
        )
        .unwrap();

    let project = harness
        .db
        .create_project(
            &harness.owner,
            &autolight::model::NewProject {
                name: "Office".to_string(),
                source_file_name: "office.dwg".to_string(),
                source_file_type: autolight::SourceFileType::Dwg,
            },
        )
        .unwrap();
    let fixtures = harness
        .db
        .insert_fixtures(
            &harness.owner,
            &project.id,
            &[
                FixtureBuilder::new("LT-01").model(&a.id).quantity(2).build(),
                FixtureBuilder::new("LT-02").room("Lobby").model(&down.id).quantity(1).build(),
            ],
        )
        .unwrap();
    harness.db.refresh_aggregates(&harness.owner, &project.id).unwrap();

    let mut session = ResultsSession::open(&harness.db, &harness.owner, &project.id).unwrap();
    assert_eq!(session.total_cost(), Decimal::new(10497, 2));

    let before = session.total_cost();
    session.apply_selection(&harness.db, &fixtures[0].id, &b.id).unwrap();
    let after = session.total_cost();
    assert_eq!(after - before, (b.unit_price - a.unit_price) * Decimal::from(2));

    let stored = project_repo::find_by_id(&harness.db, &harness.owner, &project.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_cost, after);

    let listed = harness.db.list_fixtures(&harness.owner, &project.id).unwrap();
    assert_eq!(listed[0].selected_model_id.as_deref(), Some(b.id.as_str()));
    assert_eq!(listed[1], fixtures[1]);
}

#[test]
fn test_unknown_model_is_rejected() {
    let harness = TestHarness::with_sample_catalog();
    let outcome = harness.upload("Warehouse", 5);
    let mut session =
        ResultsSession::open(&harness.db, &harness.owner, &outcome.project.id).unwrap();
    let total = session.total_cost();

    let fixture_id = outcome.fixtures[0].id.clone();
    let result = session.apply_selection(&harness.db, &fixture_id, "no-such-model");
    assert!(matches!(
        result,
        Err(AutolightError::Reference(ReferenceError::UnknownModel(_)))
    ));
    assert_eq!(session.total_cost(), total);
}

#[test]
fn test_toggle_is_local() {
    let harness = TestHarness::with_sample_catalog();
    let outcome = harness.upload("Studio", 3);
    let mut session =
        ResultsSession::open(&harness.db, &harness.owner, &outcome.project.id).unwrap();
    let id = outcome.fixtures[0].id.clone();

    assert_eq!(session.toggle_recommendations(&id), Some(true));
    let reopened = ResultsSession::open(&harness.db, &harness.owner, &outcome.project.id).unwrap();
    assert!(!reopened.selection().get(&id).unwrap().recommendations_visible);
    assert_eq!(session.toggle_recommendations(&id), Some(false));
}

#[test]
fn test_export_both_formats() {
    let harness = TestHarness::with_sample_catalog();
    let outcome = harness.upload("Head Office", 21);
    let session = ResultsSession::open(&harness.db, &harness.owner, &outcome.project.id).unwrap();

    let table = ExportTable::build(session.project(), session.selection(), chrono::Utc::now());
    assert_eq!(table.rows.len(), outcome.fixtures.len() + 1);
    let money = Regex::new(r"^\$\d+\.\d{2}$").unwrap();
    assert!(table.money_cells().all(|cell| money.is_match(cell)));

    let pdf = export::write_report(&harness.db, &session, ReportFormat::Pdf, &harness.export_dir)
        .unwrap();
    let csv = export::write_report(&harness.db, &session, ReportFormat::Csv, &harness.export_dir)
        .unwrap();

    let name = Regex::new(r"^lighting_report_head-office_\d{8}_\d{6}\.(pdf|csv)$").unwrap();
    assert!(name.is_match(&pdf.report.file_name));
    assert!(name.is_match(&csv.report.file_name));

    assert!(lopdf::Document::load(&pdf.path).is_ok());
    let csv_text = std::fs::read_to_string(&csv.path).unwrap();
    assert_eq!(csv_text.lines().count(), outcome.fixtures.len() + 2);

    let reports =
        report_repo::list_for_project(&harness.db, &harness.owner, &outcome.project.id).unwrap();
    assert_eq!(reports.len(), 2);
}

#[test]
fn test_export_uses_in_memory_state() {
    let harness = TestHarness::with_sample_catalog();
    let outcome = harness.upload("Gallery", 8);
    let session = ResultsSession::open(&harness.db, &harness.owner, &outcome.project.id).unwrap();

    // Deleting the project does not affect a snapshot already loaded.
    harness.db.delete_project(&harness.owner, &outcome.project.id).unwrap();
    let file = export::render_session(&session, ReportFormat::Csv, chrono::Utc::now()).unwrap();
    let text = String::from_utf8(file.bytes).unwrap();
    assert_eq!(text.lines().count(), outcome.fixtures.len() + 2);
}

#[test]
fn test_catalog_seed_is_visible() {
    let harness = TestHarness::with_sample_catalog();
    assert_eq!(
        harness.db.count_models().unwrap() as usize,
        autolight::catalog::sample_models().len()
    );
}
