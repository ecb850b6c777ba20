//! Script replay over the fixture page

use folio::app::{FormPhase, ThemeMode};
use folio::script::{Script, Step, replay};
use folio::Config;

#[test]
fn test_menu_session() -> Result<(), Box<dyn std::error::Error>> {
    let script = Script {
        steps: vec![
            Step::Click {
                selector: ".mobile-menu-btn".to_string(),
                index: 0,
            },
            Step::Snapshot,
            Step::Key {
                key: "Escape".to_string(),
            },
        ],
        ..Script::default()
    };
    let snapshots = replay(&script, Config::default())?;
    assert_eq!(snapshots.len(), 2);
    assert!(snapshots[0].menu_open);
    assert!(!snapshots[1].menu_open);
    Ok(())
}

#[test]
fn test_stored_theme_survives_os_change() -> Result<(), Box<dyn std::error::Error>> {
    let script = Script {
        prefers_dark: false,
        stored_theme: Some(ThemeMode::Dark),
        steps: vec![Step::SystemTheme { dark: false }],
    };
    let snapshots = replay(&script, Config::default())?;
    let last = snapshots.last().ok_or("no snapshot")?;
    assert_eq!(last.theme, ThemeMode::Dark);
    assert_eq!(last.stored_theme, Some(ThemeMode::Dark));
    Ok(())
}

#[test]
fn test_custom_latency_is_honored() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config {
        submit_latency_ms: 50,
        ..Config::default()
    };
    let script: Script = serde_json::from_str(
        r#"{"steps": [
            {"type": "type", "field": "name", "value": "Al"},
            {"type": "type", "field": "email", "value": "al@example.com"},
            {"type": "type", "field": "message", "value": "Hello there friend"},
            {"type": "submit"},
            {"type": "wait", "ms": 50}
        ]}"#,
    )?;
    let snapshots = replay(&script, config)?;
    let last = snapshots.last().ok_or("no snapshot")?;
    assert_eq!(last.form_phase, FormPhase::Idle);
    assert_eq!(last.at_ms, 50);
    Ok(())
}
