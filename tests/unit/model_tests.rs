use chrono::Utc;
use dumpdock::models::analysis::{AnalysisReport, AnalysisStatus};
use dumpdock::models::dump::{DumpArtifact, DumpInfo};

fn artifact(name: &str) -> DumpArtifact {
    DumpArtifact {
        name: name.to_owned(),
        path: std::path::PathBuf::from(format!("/var/crashdumps/{name}")),
        modified: Utc::now(),
    }
}

#[test]
fn dump_info_builds_self_and_analyze_links() {
    let info = DumpInfo::from_artifact(&artifact("w3wp-9.dmp"), "http://host/api/dumps");

    assert_eq!(info.name, "w3wp-9.dmp");
    assert_eq!(info.self_link, "http://host/api/dumps/w3wp-9.dmp");
    assert_eq!(info.analyze_link, "http://host/api/dumps/w3wp-9.dmp/analyze");
}

#[test]
fn dump_info_trims_trailing_slash_on_base() {
    let info = DumpInfo::from_artifact(&artifact("a.dmp"), "http://host/dumps/");

    assert_eq!(info.self_link, "http://host/dumps/a.dmp");
}

#[test]
fn report_serializes_status_snake_case() {
    let report = AnalysisReport {
        succeeded: false,
        status: AnalysisStatus::LaunchFailed,
        output: String::new(),
        error: "tool missing".into(),
        elapsed_ms: 0,
    };

    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["status"], "launch_failed");
    assert_eq!(json["succeeded"], false);
    assert_eq!(json["error"], "tool missing");
}

#[test]
fn timestamp_survives_serialization() {
    let artifact = artifact("t.dmp");
    let info = DumpInfo::from_artifact(&artifact, "http://host/dumps");

    let json = serde_json::to_value(&info).expect("serialize");
    let round: chrono::DateTime<Utc> =
        serde_json::from_value(json["timestamp"].clone()).expect("parse");

    assert_eq!(round, artifact.modified);
}
