use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ITEMS: &str = r#"[
    {"key": "WEB-1", "summary": "Login", "status": "In Progress",
     "startDate": "2024-01-08", "dueDate": "2024-01-12",
     "originalEstimate": 24, "remainingEstimate": 24, "assignee": "ana",
     "blocks": ["WEB-2"]},
    {"key": "WEB-2", "summary": "Profile", "status": "To Do",
     "startDate": "2024-01-15", "dueDate": "2024-01-19",
     "originalEstimate": 32, "remainingEstimate": 32, "assignee": "bo"}
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(capacity_name: &str, capacity: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("items.json"), ITEMS).unwrap();
        fs::write(dir.path().join(capacity_name), capacity).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, capacity_name: &str, extra: &[&str]) -> anyhow::Result<String> {
        let items = self.path("items.json");
        let capacity = self.path(capacity_name);
        let (subcommand, rest) = extra.split_first().unwrap();
        let mut args = vec![
            "burndown".to_string(),
            (*subcommand).to_string(),
            "--items".to_string(),
            items.display().to_string(),
            "--capacity".to_string(),
            capacity.display().to_string(),
            "--today".to_string(),
            "2024-01-10".to_string(),
        ];
        args.extend(rest.iter().map(|s| (*s).to_string()));
        let matches = bb_cli::command().try_get_matches_from(args).unwrap();
        bb_cli::run(&matches)
    }
}

#[test]
fn test_analyze_summary() {
    let ws = Workspace::new("capacity.toml", "team_hours = 40.0\n");
    let output = ws.run("capacity.toml", &["analyze"]).unwrap();
    assert!(output.starts_with("Feasibility score: 100/100 (forecast: on_track)"));
    assert!(output.contains("Window: 2024-01-08 .. 2024-01-19 (10 business days)"));
    assert!(output.contains("critical path WEB-1 -> WEB-2"));
}

#[test]
fn test_analyze_json_is_machine_readable() {
    let ws = Workspace::new("capacity.json", r#"{"team_hours": 20}"#);
    let output = ws.run("capacity.json", &["analyze", "--format", "json"]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["summary"]["total_items"], 2);
    assert_eq!(json["envelope"]["totals"]["total_capacity"], 40.0);
}

#[test]
fn test_report_format() {
    let ws = Workspace::new("capacity.toml", "team_hours = 40.0\n");
    let output = ws.run("capacity.toml", &["analyze", "--format", "report"]).unwrap();
    // WEB-2 starting in the second week reads as scope growth
    assert!(output.starts_with("Status as of 2024-01-10: amber"));
    assert!(output.contains("Progress"));
    assert!(output.contains("Scope growth"));
}

#[test]
fn test_what_if_adds_developers() {
    let ws = Workspace::new("capacity.toml", "team_hours = 20.0\n");
    let output = ws
        .run("capacity.toml", &["what-if", "--add-devs", "1", "--json"])
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["combined"]["delta"]["capacity"], 80.0);
    assert_eq!(json["combined"]["outcome"]["feasibility_score"], 100);
}

#[test]
fn test_what_if_accepts_negative_changes() {
    let ws = Workspace::new("capacity.toml", "team_hours = 40.0\n");
    let output = ws
        .run("capacity.toml", &["what-if", "--add-devs", "-1", "--extend-weeks", "-1"])
        .unwrap();
    assert!(output.starts_with("Baseline score: 100"));
    assert!(output.contains("Combined:"));
}

#[test]
fn test_what_if_without_changes_fails() {
    let ws = Workspace::new("capacity.toml", "team_hours = 40.0\n");
    let err = ws.run("capacity.toml", &["what-if"]).unwrap_err();
    assert!(err.to_string().contains("no change requested"));
}

#[test]
fn test_envelope_weekly_table() {
    let ws = Workspace::new("capacity.toml", "team_hours = 40.0\n");
    let output = ws.run("capacity.toml", &["envelope", "--granularity", "week"]).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2024-01-08"));
    assert!(lines[2].starts_with("2024-01-15"));
}

#[test]
fn test_invalid_capacity_is_an_error() {
    let ws = Workspace::new("capacity.toml", "period = \"week\"\n");
    let err = ws.run("capacity.toml", &["analyze"]).unwrap_err();
    assert!(format!("{err:#}").to_lowercase().contains("capacity"));
}

#[test]
fn test_bad_date_is_rejected_by_parser() {
    let result = bb_cli::command().try_get_matches_from([
        "burndown", "analyze", "--items", "a.json", "--capacity", "c.toml", "--today", "someday",
    ]);
    assert!(result.is_err());
}
