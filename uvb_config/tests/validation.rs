use rstest::rstest;
use uvb_config::{Config, EventKind, load_toml};

#[test]
fn empty_file_uses_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.store.path, "uvb_store.toml");
    assert!(cfg.simulation.connected);
    assert!(cfg.simulation.events.is_empty());
    assert_eq!(cfg.simulation.max_ticks, None);
}

#[test]
fn parses_events() {
    let toml = r#"
[simulation]
uv_voltage = 0.02
start_ms = 4294967000
max_ticks = 50

[[simulation.events]]
at_ms = 1000
kind = "button-a"

[[simulation.events]]
at_ms = 2000
kind = "uv"
value = 0.11

[[simulation.events]]
at_ms = 3000
kind = "power-long"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid");
    let kinds: Vec<EventKind> = cfg.simulation.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [EventKind::ButtonA, EventKind::Uv, EventKind::PowerLong]
    );
    assert_eq!(cfg.simulation.events[1].value, Some(0.11));
    assert_eq!(cfg.simulation.start_ms, 4_294_967_000);
}

#[test]
fn unknown_event_kind_fails_to_parse() {
    let toml = r#"
[[simulation.events]]
at_ms = 10
kind = "button-c"
"#;
    assert!(load_toml(toml).is_err());
}

#[rstest]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
#[case("[store]\npath = \"\"\n", "store.path")]
#[case("[simulation]\naccel_noise_g = -0.1\n", "accel_noise_g")]
#[case("[simulation]\nnoise_counts = 5000\n", "noise_counts")]
#[case("[simulation]\nmax_ticks = 0\n", "max_ticks")]
#[case(
    "[[simulation.events]]\nat_ms = 5\nkind = \"uv\"\n",
    "requires value"
)]
#[case(
    "[[simulation.events]]\nat_ms = 5\nkind = \"shake\"\nvalue = 1.0\n",
    "does not take a value"
)]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "error {err} should mention {needle}"
    );
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uvb.toml");
    std::fs::write(&path, "[store]\npath = \"cal.toml\"\n").unwrap();
    let cfg = Config::from_path(&path).unwrap();
    assert_eq!(cfg.store.path, "cal.toml");
}

#[test]
fn from_path_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_path(&dir.path().join("nope.toml")).unwrap_err();
    assert!(format!("{err}").contains("read config"));
}
