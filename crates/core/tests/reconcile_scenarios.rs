//! End-to-end reconciliation scenarios: manifest JSON and resolver JSON in,
//! classified report out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use deplock_core::{
    Artifacts, Error, LockConfig, LockedDependencies, Outcome, OutcomeKind, Reconciler,
    ResolvedDependency, VersionMatching,
};

const MANIFEST: &str = r#"{
  "dependencies": [
    {
      "groupId": "com.x",
      "artifactId": "lib",
      "version": "1.2.3",
      "scope": "compile",
      "optional": false,
      "checksum": "sha256:abc"
    }
  ]
}"#;

fn resolved(json: &str, config: &LockConfig) -> Artifacts {
    let records: Vec<ResolvedDependency> = serde_json::from_str(json).unwrap();
    Artifacts::from_resolved(&records, config.integrity_checking).unwrap()
}

fn reconcile(manifest: &str, resolved_json: &str, config: &LockConfig) -> deplock_core::Report {
    let manifest = LockedDependencies::from_json_str(manifest, config).unwrap();
    let artifacts = resolved(resolved_json, config);
    Reconciler::new(config).reconcile(&manifest, &artifacts)
}

#[test]
fn identical_dependency_matches() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
             "scope": "compile", "checksum": "sha256:abc"}]"#,
        &LockConfig::with_integrity(),
    );
    assert!(report.is_clean());
    assert_eq!(report.count(OutcomeKind::Match), 1);
    assert!(report.into_result().is_ok());
}

#[test]
fn checksum_only_difference_is_checksum_mismatch() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
             "scope": "compile", "checksum": "sha256:def"}]"#,
        &LockConfig::with_integrity(),
    );
    assert_eq!(report.findings().len(), 1);
    assert_eq!(
        report.findings()[0].outcome.kind(),
        OutcomeKind::ChecksumMismatch
    );
}

#[test]
fn version_bump_is_general_mismatch() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.4",
             "scope": "compile", "checksum": "sha256:abc"}]"#,
        &LockConfig::with_integrity(),
    );
    match &report.findings()[0].outcome {
        Outcome::GeneralMismatch { divergences } => {
            let fields: Vec<_> = divergences.iter().map(|d| d.field()).collect();
            assert_eq!(fields, ["version"]);
        }
        other => panic!("expected a general mismatch, got {other:?}"),
    }
}

#[test]
fn version_bump_with_new_checksum_is_general_mismatch() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.4",
             "scope": "compile", "checksum": "sha256:fff"}]"#,
        &LockConfig::with_integrity(),
    );
    assert_eq!(report.count(OutcomeKind::GeneralMismatch), 1);
    assert_eq!(report.count(OutcomeKind::ChecksumMismatch), 0);
}

#[test]
fn scope_and_optional_changes_are_reported() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
             "scope": "test", "optional": true, "checksum": "sha256:abc"}]"#,
        &LockConfig::with_integrity(),
    );
    let text = report.to_string();
    assert!(text.contains("scope locked as compile, resolved as test"));
    assert!(text.contains("optional locked as false, resolved as true"));
}

#[test]
fn unresolved_lock_entry_is_missing() {
    let report = reconcile(MANIFEST, "[]", &LockConfig::with_integrity());
    assert_eq!(report.count(OutcomeKind::Missing), 1);
}

#[test]
fn unlocked_resolved_artifact_is_extra() {
    let report = reconcile(
        MANIFEST,
        r#"[
            {"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
             "scope": "compile", "checksum": "sha256:abc"},
            {"groupId": "org.other", "artifactId": "surprise", "version": "0.1",
             "scope": "runtime", "checksum": "sha256:123"}
        ]"#,
        &LockConfig::with_integrity(),
    );
    assert_eq!(report.count(OutcomeKind::Match), 1);
    assert_eq!(report.count(OutcomeKind::Extra), 1);
    assert_eq!(
        report.findings()[1].identifier.to_string(),
        "org.other:surprise:jar"
    );
}

#[test]
fn classifier_makes_a_different_identity() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "classifier": "sources",
             "version": "1.2.3", "scope": "compile", "checksum": "sha256:abc"}]"#,
        &LockConfig::with_integrity(),
    );
    assert_eq!(report.count(OutcomeKind::Missing), 1);
    assert_eq!(report.count(OutcomeKind::Extra), 1);
}

#[test]
fn permissive_mode_ignores_manifest_checksums() {
    let report = reconcile(
        MANIFEST,
        r#"[{"groupId": "com.x", "artifactId": "lib", "version": "1.2.3",
             "scope": "compile", "checksum": "sha256:def"}]"#,
        &LockConfig::default(),
    );
    assert!(report.is_clean());
}

#[test]
fn every_problem_is_collected() {
    let manifest = r#"[
        {"groupId": "g", "artifactId": "a", "version": "1", "scope": "compile"},
        {"groupId": "g", "artifactId": "b", "version": "1", "scope": "compile"},
        {"groupId": "g", "artifactId": "c", "version": "1", "scope": "compile"}
    ]"#;
    let report = reconcile(
        manifest,
        r#"[
            {"groupId": "g", "artifactId": "a", "version": "2", "scope": "compile"},
            {"groupId": "g", "artifactId": "d", "version": "1", "scope": "compile"}
        ]"#,
        &LockConfig::default(),
    );
    assert_eq!(report.summary(), "2 MISSING, 1 EXTRA, 1 GENERAL_MISMATCH");

    match report.into_result() {
        Err(Error::LockMismatch { divergences, .. }) => assert_eq!(divergences.len(), 4),
        other => panic!("expected a lock mismatch, got {other:?}"),
    }
}

#[test]
fn version_pattern_locks_a_range() {
    let manifest = r#"[{"groupId": "g", "artifactId": "a", "version": "4\\.1\\.[0-9]+",
                        "scope": "compile"}]"#;
    for version in ["4.1.0", "4.1.7", "4.1.100"] {
        let resolved_json = format!(
            r#"[{{"groupId": "g", "artifactId": "a", "version": "{version}", "scope": "compile"}}]"#
        );
        let report = reconcile(manifest, &resolved_json, &LockConfig::default());
        assert!(report.is_clean(), "{version} should match");
    }
}

#[test]
fn regex_mode_reproduces_wildcard_dots() {
    let manifest = r#"[{"groupId": "g", "artifactId": "a", "version": "1.0", "scope": "compile"}]"#;
    let resolved_json = r#"[{"groupId": "g", "artifactId": "a", "version": "1-0", "scope": "compile"}]"#;

    let auto = reconcile(manifest, resolved_json, &LockConfig::default());
    assert_eq!(auto.count(OutcomeKind::GeneralMismatch), 1);

    let regex = LockConfig::default().version_matching(VersionMatching::Regex);
    assert!(reconcile(manifest, resolved_json, &regex).is_clean());
}

#[test]
fn unsupported_checksum_aborts_the_whole_load() {
    let manifest = r#"[
        {"groupId": "g", "artifactId": "a", "version": "1", "scope": "compile",
         "checksum": "sha256:abc"},
        {"groupId": "g", "artifactId": "b", "version": "1", "scope": "compile",
         "checksum": "sha3-256:abc"}
    ]"#;
    let result = LockedDependencies::from_json_str(manifest, &LockConfig::with_integrity());
    match result {
        Err(Error::UnsupportedChecksumFormat { value, context }) => {
            assert_eq!(value, "sha3-256:abc");
            assert!(context.contains("later version"));
        }
        other => panic!("expected an unsupported checksum error, got {other:?}"),
    }

    // the same manifest loads when integrity checking is off
    assert_eq!(
        LockedDependencies::from_json_str(manifest, &LockConfig::default())
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn fresh_manifest_reconciles_cleanly() {
    let config = LockConfig::with_integrity();
    let artifacts = resolved(
        r#"[
            {"groupId": "g", "artifactId": "b", "version": "2.0", "scope": "runtime",
             "checksum": "sha512:aa"},
            {"groupId": "g", "artifactId": "a", "version": "1.0", "scope": "compile",
             "optional": true, "type": "pom", "checksum": "sha256:bb"}
        ]"#,
        &config,
    );
    let manifest = LockedDependencies::from_artifacts(&artifacts, &config).unwrap();
    let reloaded = LockedDependencies::from_json_str(&manifest.to_json_string().unwrap(), &config)
        .unwrap();

    let report = Reconciler::new(&config).reconcile(&reloaded, &artifacts);
    assert!(report.is_clean());
    assert_eq!(report.count(OutcomeKind::Match), 2);
}
