//! Settings persistence and application state.

mod common;

use autolight::config::{load_settings, load_settings_from_str};
use autolight::state::{AppState, Page};
use autolight::Theme;
use common::TestHarness;

struct SettingsCase {
    name: &'static str,
    json: &'static str,
    should_succeed: bool,
}

const CASES: &[SettingsCase] = &[
    SettingsCase {
        name: "minimal",
        json: r#"{"version": "1.0"}"#,
        should_succeed: true,
    },
    SettingsCase {
        name: "dark_theme",
        json: r#"{"version": "1.0", "theme": "dark", "log_format": "json"}"#,
        should_succeed: true,
    },
    SettingsCase {
        name: "unknown_theme",
        json: r#"{"version": "1.0", "theme": "sepia"}"#,
        should_succeed: false,
    },
    SettingsCase {
        name: "missing_version",
        json: r#"{"theme": "dark"}"#,
        should_succeed: false,
    },
    SettingsCase {
        name: "empty_export_directory",
        json: r#"{"version": "1.0", "export_directory": "  "}"#,
        should_succeed: false,
    },
];

#[test]
fn test_settings_cases() {
    for case in CASES {
        let result = load_settings_from_str(case.json);
        assert_eq!(
            result.is_ok(),
            case.should_succeed,
            "case '{}' returned {:?}",
            case.name,
            result
        );
    }
}

#[test]
fn test_app_state_round_trip() {
    let harness = TestHarness::with_sample_catalog();
    let outcome = harness.upload("Office", 12);
    let mut state = AppState::new(harness.settings.clone(), Some(harness.settings_path.clone()));

    state.toggle_theme().unwrap();
    assert_eq!(load_settings(&harness.settings_path).unwrap().theme, Theme::Dark);

    let session = state
        .open_results(&harness.db, &harness.owner, &outcome.project.id)
        .unwrap();
    assert_eq!(session.project().id, outcome.project.id);
    assert_eq!(state.page, Page::Results(outcome.project.id.clone()));
}
