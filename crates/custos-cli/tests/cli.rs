//! Integration tests for the custos CLI.
//!
//! Each test writes policy fixtures into a temporary directory, invokes the
//! `custos` binary via `assert_cmd`, and checks outputs and exit codes.

#![allow(deprecated)] // cargo_bin deprecation: macro replacement not yet stable

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const DIGEST: &str = "sha256:4f8c0e2a9d";

/// A `Command` for the `custos` binary, isolated from any user config.
fn custos(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("custos").expect("custos binary not found");
    cmd.env("XDG_CONFIG_HOME", home.join("xdg"));
    cmd
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    /// Organization with two releasers, one project `web` owning
    /// `pkg:docker/acme/web` for dev and prod at level 3.
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let fixture = Self { dir };

        fixture.write(
            "org.json",
            &serde_json::json!({
                "format": 1,
                "roots": { "release": [
                    { "id": "https://github.com/acme/releaser-l2", "build": { "maxSlsaLevel": 2 } },
                    { "id": "https://github.com/acme/releaser-l3", "build": { "maxSlsaLevel": 3 } }
                ] }
            })
            .to_string(),
        );
        std::fs::create_dir(fixture.path("projects")).expect("mkdir");
        fixture.write(
            "projects/web.json",
            &serde_json::json!({
                "format": 1,
                "principal": { "uri": "https://github.com/acme/web" },
                "buildRequirements": { "requireSlsaLevel": 3 },
                "packages": [
                    { "uri": "pkg:docker/acme/web", "environment": { "anyOf": ["dev", "prod"] } }
                ]
            })
            .to_string(),
        );
        fixture.evidence("https://github.com/acme/releaser-l3", "prod");
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path(name), content).expect("write fixture");
    }

    fn evidence(&self, releaser: &str, environment: &str) {
        self.write(
            "evidence.json",
            &serde_json::json!({
                "releases": [{
                    "releaserId": releaser,
                    "packageUri": "pkg:docker/acme/web",
                    "digest": { "sha256": "4f8c0e2a9d" },
                    "environment": environment
                }]
            })
            .to_string(),
        );
    }

    fn cmd(&self) -> Command {
        custos(self.dir.path())
    }

    fn evaluate(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("evaluate")
            .arg("--org")
            .arg(self.path("org.json"))
            .arg("--projects")
            .arg(self.path("projects"))
            .args(["--project", "web", "--package", "pkg:docker/acme/web"])
            .args(["--digest", DIGEST])
            .arg("--evidence")
            .arg(self.path("evidence.json"))
            .args(["--creator-id", "https://ci.acme.dev/custos"]);
        cmd
    }

    /// Evaluate with the default fixtures and write `attestation.json`.
    fn attest(&self) -> PathBuf {
        let out = self.path("attestation.json");
        self.evaluate()
            .args(["--creator-version", "1.0.0"])
            .arg("--output")
            .arg(&out)
            .assert()
            .success();
        out
    }

    fn verify(&self, attestation: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("verify")
            .arg(attestation)
            .args(["--creator-id", "https://ci.acme.dev/custos"])
            .args(["--digest", DIGEST]);
        cmd
    }

    fn policy_flag(&self, name: &str, file: &str) -> String {
        format!("{name}={}", self.path(file).display())
    }
}

// ─── validate ───────────────────────────────────────────────

#[test]
fn validate_reports_loaded_policies() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("validate")
        .arg("--org")
        .arg(fx.path("org.json"))
        .arg("--projects")
        .arg(fx.path("projects"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 release root(s)"))
        .stdout(predicate::str::contains(
            "web: principal https://github.com/acme/web, 1 package(s)",
        ))
        .stdout(predicate::str::contains("Policy VALID"));
}

#[test]
fn validate_rejects_duplicate_roots() {
    let fx = Fixture::new();
    fx.write(
        "org.json",
        r#"{"format":1,"roots":{"release":[
            {"id":"r","build":{"maxSlsaLevel":1}},
            {"id":"r","build":{"maxSlsaLevel":2}}]}}"#,
    );
    fx.cmd()
        .arg("validate")
        .arg("--org")
        .arg(fx.path("org.json"))
        .arg("--projects")
        .arg(fx.path("projects"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Policy INVALID"));
}

#[test]
fn validate_without_org_fails() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("validate")
        .arg("--projects")
        .arg(fx.path("projects"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no organization policy"));
}

// ─── evaluate ───────────────────────────────────────────────

#[test]
fn evaluate_prints_attestation() {
    let fx = Fixture::new();
    let output = fx.evaluate().assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("attestation json");

    assert_eq!(json["_type"], "https://in-toto.io/Statement/v1");
    assert_eq!(json["predicateType"], "https://slsa.dev/deployment/v0.1");
    assert_eq!(json["subjects"][0]["digest"]["sha256"], "4f8c0e2a9d");
    assert_eq!(
        json["predicate"]["context"]["principal"],
        "https://github.com/acme/web"
    );
    assert_eq!(json["predicate"]["creator"]["id"], "https://ci.acme.dev/custos");
    assert!(json["predicate"]["creator"].get("version").is_none());
    assert!(json["predicate"]["policy"]["org"]["digest"]["sha256"].is_string());
    assert!(json["predicate"]["policy"]["project"]["uri"]
        .as_str()
        .is_some_and(|uri| uri.ends_with("web.json")));
}

#[test]
fn evaluate_denies_disallowed_environment() {
    let fx = Fixture::new();
    fx.evidence("https://github.com/acme/releaser-l3", "staging");
    fx.evaluate()
        .assert()
        .failure()
        .stdout(predicate::str::contains("Evaluation DENIED"));
}

#[test]
fn evaluate_denies_insufficient_level() {
    let fx = Fixture::new();
    fx.evidence("https://github.com/acme/releaser-l2", "prod");
    fx.evaluate()
        .assert()
        .failure()
        .stdout(predicate::str::contains("Evaluation DENIED"))
        .stdout(predicate::str::contains("releaser-l2"));
}

#[test]
fn evaluate_unknown_project_is_error() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("evaluate")
        .arg("--org")
        .arg(fx.path("org.json"))
        .arg("--projects")
        .arg(fx.path("projects"))
        .args(["--project", "api", "--package", "pkg:docker/acme/web"])
        .args(["--digest", DIGEST])
        .arg("--evidence")
        .arg(fx.path("evidence.json"))
        .args(["--creator-id", "ci"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("evaluation failed"));
}

#[test]
fn evaluate_rejects_malformed_digest() {
    let fx = Fixture::new();
    let mut cmd = fx.cmd();
    cmd.arg("evaluate")
        .arg("--org")
        .arg(fx.path("org.json"))
        .arg("--projects")
        .arg(fx.path("projects"))
        .args(["--project", "web", "--package", "pkg:docker/acme/web"])
        .args(["--digest", "no-separator"])
        .arg("--evidence")
        .arg(fx.path("evidence.json"))
        .args(["--creator-id", "ci"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid --digest"));
}

#[test]
fn evaluate_uses_config_file() {
    let fx = Fixture::new();
    fx.write(
        "custos.toml",
        &format!(
            "creator_id = \"from-config\"\ncreator_version = \"9.9.9\"\norg_policy = {:?}\nprojects_dir = {:?}\n",
            fx.path("org.json").display().to_string(),
            fx.path("projects").display().to_string(),
        ),
    );
    let output = fx
        .cmd()
        .arg("--config")
        .arg(fx.path("custos.toml"))
        .arg("evaluate")
        .args(["--project", "web", "--package", "pkg:docker/acme/web"])
        .args(["--digest", DIGEST])
        .arg("--evidence")
        .arg(fx.path("evidence.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("attestation json");
    assert_eq!(json["predicate"]["creator"]["id"], "from-config");
    assert_eq!(json["predicate"]["creator"]["version"], "9.9.9");
}

// ─── verify ─────────────────────────────────────────────────

#[test]
fn verify_accepts_fresh_attestation() {
    let fx = Fixture::new();
    let att = fx.attest();
    fx.verify(&att)
        .args(["--principal", "https://github.com/acme/web"])
        .args(["--creator-version", "1.0.0"])
        .arg("--policy")
        .arg(fx.policy_flag("org", "org.json"))
        .arg("--policy")
        .arg(fx.policy_flag("project", "projects/web.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification PASSED"));
}

#[test]
fn verify_rejects_wrong_principal() {
    let fx = Fixture::new();
    let att = fx.attest();
    fx.verify(&att)
        .args(["--principal", "https://github.com/acme/other"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Verification FAILED"));
}

#[test]
fn verify_rejects_wrong_digest() {
    let fx = Fixture::new();
    let att = fx.attest();
    fx.cmd()
        .arg("verify")
        .arg(&att)
        .args(["--creator-id", "https://ci.acme.dev/custos"])
        .args(["--digest", "sha256:0000"])
        .args(["--principal", "https://github.com/acme/web"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("subject digests mismatch"));
}

#[test]
fn verify_detects_changed_policy_file() {
    let fx = Fixture::new();
    let att = fx.attest();
    fx.write("org.json", r#"{"format":1,"roots":{"release":[]}}"#);
    fx.verify(&att)
        .args(["--principal", "https://github.com/acme/web"])
        .arg("--policy")
        .arg(fx.policy_flag("org", "org.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Verification FAILED"));
}

#[test]
fn verify_rejects_missing_policy_excerpt() {
    let fx = Fixture::new();
    let att = fx.attest();
    fx.write("extra.json", "{}");
    fx.verify(&att)
        .args(["--principal", "https://github.com/acme/web"])
        .arg("--policy")
        .arg(fx.policy_flag("extra", "extra.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("policy `extra`"));
}

#[test]
fn verify_malformed_attestation_is_error() {
    let fx = Fixture::new();
    fx.write("bogus.json", r#"{"_type":"x"}"#);
    fx.verify(&fx.path("bogus.json"))
        .args(["--principal", "https://github.com/acme/web"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Verification").not());
}

// ─── inspect ────────────────────────────────────────────────

#[test]
fn inspect_human_readable() {
    let fx = Fixture::new();
    let att = fx.attest();
    fx.cmd()
        .arg("inspect")
        .arg(&att)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Creator:       https://ci.acme.dev/custos (1.0.0)",
        ))
        .stdout(predicate::str::contains("principal: https://github.com/acme/web"))
        .stdout(predicate::str::contains("sha256: 4f8c0e2a9d"));
}

#[test]
fn inspect_json() {
    let fx = Fixture::new();
    let att = fx.attest();
    let output = fx
        .cmd()
        .arg("inspect")
        .arg(&att)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("summary json");
    assert_eq!(json["creatorVersion"], "1.0.0");
    assert_eq!(json["context"]["principal"], "https://github.com/acme/web");
    assert!(json["policies"]["org"].is_string());
}
