use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use vulnsift::cli::commands::filter_changes;
use vulnsift::config::FilterConfig;

const CHANGES: &str = r#"{
  "vulnerable_changes": [
    {"package": "lodash", "ecosystem": "npm", "version": "4.17.20", "vuln_id": "GHSA-35jh", "severity": "low"},
    {"package": "minimist", "ecosystem": "npm", "version": "1.2.5", "vuln_id": "GHSA-xvch", "severity": "critical"},
    {"package": "jackson-databind", "group": "com.fasterxml.jackson.core", "ecosystem": "maven",
     "version": "2.9.8", "vuln_id": "CVE-2019-12384", "severity": "high", "introduced_by": "pom.xml"}
  ]
}"#;

fn config(min_severity: &str, allowlist: Option<PathBuf>) -> FilterConfig {
    FilterConfig {
        min_severity: min_severity.to_string(),
        allowlist,
    }
}

#[test]
fn test_severity_filter_writes_summary() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    let output = dir.path().join("out/nested/filtered.json");
    fs::write(&input, CHANGES)?;

    let outcome = filter_changes(&input, &output, &config("high", None))?;
    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.filtered, 2);

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(written["summary"]["total"], 3);
    assert_eq!(written["summary"]["filtered"], 2);
    assert_eq!(written["summary"]["min_severity"], "high");
    assert_eq!(written["summary"]["allowlist_entries"], 0);

    let kept = written["vulnerable_changes"].as_array().unwrap();
    assert_eq!(kept[0]["package"], "minimist");
    assert_eq!(kept[1]["package"], "jackson-databind");
    // Fields outside the known schema are carried through.
    assert_eq!(kept[1]["introduced_by"], "pom.xml");
    Ok(())
}

#[test]
fn test_empty_and_unrated_thresholds_keep_every_entry() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    fs::write(&input, CHANGES)?;

    for (name, min_severity) in [("empty", ""), ("unrated", "not rated")] {
        let output = dir.path().join(format!("{}.json", name));
        let outcome = filter_changes(&input, &output, &config(min_severity, None))?;
        assert_eq!(outcome.summary.total, 3);
        assert_eq!(outcome.summary.filtered, 3);

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
        assert_eq!(written["summary"]["min_severity"], min_severity);
        assert_eq!(written["vulnerable_changes"].as_array().unwrap().len(), 3);
    }
    Ok(())
}

#[test]
fn test_explicit_nulls_are_written_back() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    let output = dir.path().join("filtered.json");
    fs::write(
        &input,
        r#"{"vulnerable_changes": [{"package": "lodash", "group": null, "severity": null, "note": null}]}"#,
    )?;

    filter_changes(&input, &output, &config("none", None))?;

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    let kept = &written["vulnerable_changes"][0];
    assert_eq!(kept["package"], "lodash");
    for key in ["group", "severity", "note"] {
        assert!(kept.get(key).is_some_and(serde_json::Value::is_null), "{} dropped", key);
    }
    Ok(())
}

#[test]
fn test_allowlist_overrides_severity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    let output = dir.path().join("filtered.json");
    let allowlist = dir.path().join("allowlist.txt");
    fs::write(&input, CHANGES)?;
    fs::write(
        &allowlist,
        "# accepted for now\nnpm:lodash\n\nmaven:com.fasterxml.jackson.core:jackson-databind\n",
    )?;

    let outcome = filter_changes(&input, &output, &config("critical", Some(allowlist)))?;
    let names: Vec<_> = outcome
        .vulnerable_changes
        .iter()
        .map(|e| e.display_name().to_string())
        .collect();
    assert_eq!(names, vec!["lodash", "jackson-databind"]);
    assert_eq!(outcome.summary.allowlist_entries, 5);
    Ok(())
}

#[test]
fn test_missing_allowlist_falls_back_to_severity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    let output = dir.path().join("filtered.json");
    fs::write(&input, CHANGES)?;

    let missing = dir.path().join("no-such-allowlist.txt");
    let outcome = filter_changes(&input, &output, &config("critical", Some(missing)))?;
    assert_eq!(outcome.summary.filtered, 1);
    assert_eq!(outcome.vulnerable_changes[0].package(), Some("minimist"));
    Ok(())
}

#[test]
fn test_refiltering_output_is_stable() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    fs::write(&input, CHANGES)?;

    let cfg = config("high", None);
    let once = filter_changes(&input, &first, &cfg)?;
    let twice = filter_changes(&first, &second, &cfg)?;
    assert_eq!(once.vulnerable_changes, twice.vulnerable_changes);
    assert_eq!(twice.summary.total, twice.summary.filtered);
    Ok(())
}

#[test]
fn test_empty_changes() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("changes.json");
    let output = dir.path().join("filtered.json");
    fs::write(&input, r#"{"vulnerable_changes": []}"#)?;

    let outcome = filter_changes(&input, &output, &config("critical", None))?;
    assert_eq!(outcome.summary.total, 0);
    assert_eq!(outcome.summary.filtered, 0);
    Ok(())
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("absent.json");
    let output = dir.path().join("filtered.json");

    let result = filter_changes(&input, &output, &config("critical", None));
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_malformed_input_is_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("changes.json");
    let output = dir.path().join("filtered.json");
    fs::write(&input, "{\"vulnerable_changes\": [").unwrap();

    assert!(filter_changes(&input, &output, &config("critical", None)).is_err());
    assert!(!output.exists());
}
