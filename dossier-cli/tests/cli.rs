use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("dossier-render")
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn render_plain_response_to_html() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("render").arg(fixture_path("response_plain.json"));

    let output = predicate::str::starts_with("<!DOCTYPE html>")
        .and(predicate::str::contains("report-references"))
        .and(predicate::str::contains("(Credibility Score: 9.5)"))
        .and(predicate::str::contains("主要结论"));

    cmd.assert().success().stdout(output);
}

#[test]
fn render_embedded_response_omits_separate_list() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("render")
        .arg(fixture_path("response_embedded.json"))
        .arg("--to")
        .arg("fragment");

    cmd.assert().success().stdout(
        predicate::str::starts_with(r#"<div class="report-page">"#)
            .and(predicate::str::contains("report-references").not()),
    );
}

#[test]
fn render_reads_stdin_and_emits_tree() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("render")
        .arg("-")
        .arg("--to")
        .arg("tree")
        .write_stdin(r##"{"detailed_analysis": {"full_report": "# Title"}}"##);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""class": "report-h1""#));
}

#[test]
fn render_writes_output_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("page.json");

    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("render")
        .arg(fixture_path("response_plain.json"))
        .arg("--output")
        .arg(&target);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&target).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["class"], "report-page");
}

#[test]
fn render_rejects_unknown_format() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("render")
        .arg(fixture_path("response_plain.json"))
        .arg("--to")
        .arg("pdf");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("format 'pdf' not found"));
}

#[test]
fn render_rejects_invalid_json() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("render").arg("-").write_stdin("not json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid research response"));
}

#[test]
fn detect_reports_marker() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg("-")
        .write_stdin("# Report\n\n## References\n\n1. a\n");

    cmd.assert()
        .success()
        .stdout("suppress\nmarker: ## references\n");
}

#[test]
fn detect_heading_strictness_uses_configured_numbering() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg("-")
        .arg("--strictness")
        .arg("heading")
        .write_stdin("# Report\n\n## 8. 参考文献\n");
    cmd.assert().success().stdout("show\n");

    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg("-")
        .arg("--strictness")
        .arg("heading")
        .write_stdin("# Report\n\n## 9. 参考文献\n");
    cmd.assert()
        .success()
        .stdout("suppress\nmarker: 9. 参考文献\n");
}

#[test]
fn detect_plain_report_shows_list() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect").arg(fixture_path("report.md"));

    cmd.assert().success().stdout("show\n");
}

#[test]
fn detect_heading_strictness_ignores_body_mentions() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg("-")
        .arg("--strictness")
        .arg("heading")
        .write_stdin("# Report\n\n更多参考资料见附录。\n");
    cmd.assert().success().stdout("show\n");

    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg("-")
        .write_stdin("# Report\n\n更多参考资料见附录。\n");
    cmd.assert()
        .success()
        .stdout("suppress\nmarker: 参考资料\n");
}

#[test]
fn config_file_extends_markers() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("dossier.toml");
    fs::write(
        &config,
        r#"
[detection]
numbering_prefixes = []
markers = [
  { language = "en", term = "Sources", heading_levels = [2], numbered = false, bare = false },
]
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg("-")
        .arg("--config")
        .arg(&config)
        .write_stdin("# Report\n\n## Sources\n");
    cmd.assert()
        .success()
        .stdout("suppress\nmarker: ## sources\n");
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("detect")
        .arg(fixture_path("report.md"))
        .arg("--config")
        .arg("/nonexistent/dossier.toml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn inspect_prints_outline() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("inspect").arg("-").write_stdin("## Scope\n\nBody\n");

    cmd.assert().success().stdout(
        predicate::str::starts_with("document\n  heading h2\n")
            .and(predicate::str::contains("  paragraph\n    text \"Body\"\n")),
    );
}

#[test]
fn request_prints_validated_body() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("request")
        .arg("--topic")
        .arg("固态电池")
        .arg("--focus")
        .arg("成本")
        .arg("--focus")
        .arg("安全性");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["topic"], "固态电池");
    assert_eq!(value["depth"], 3);
    assert_eq!(value["language"], "zh");
    assert_eq!(value["focus_areas"], serde_json::json!(["成本", "安全性"]));
}

#[test]
fn request_rejects_bad_depth_and_duplicates() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("request").arg("--topic").arg("x").arg("--depth").arg("9");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("depth 9"));

    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("request")
        .arg("--topic")
        .arg("x")
        .arg("--focus")
        .arg("a")
        .arg("--focus")
        .arg("a");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("listed twice"));
}

#[test]
fn formats_lists_registry() {
    let mut cmd = cargo_bin_cmd!("dossier");
    cmd.arg("formats");

    cmd.assert().success().stdout(
        predicate::str::contains("html")
            .and(predicate::str::contains("fragment"))
            .and(predicate::str::contains("treeviz")),
    );
}
