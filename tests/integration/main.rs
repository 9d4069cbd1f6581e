//! Integration tests for execbox

mod client_tests;

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn execbox() -> Command {
        cargo_bin_cmd!("execbox")
    }

    fn write_config(dir: &Path, origin: &str) -> PathBuf {
        let config_path = dir.join("config.toml");
        let content = format!(
            "[server]\norigin = \"{}\"\n\n[container]\nname = \"bundler\"\ninclude_files = [\"Gemfile.lock\"]\n",
            origin
        );
        std::fs::write(&config_path, content).unwrap();
        config_path
    }

    #[test]
    fn help_displays() {
        execbox()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("sandboxed execution containers"));
    }

    #[test]
    fn version_displays() {
        execbox()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("execbox"));
    }

    #[test]
    fn config_path_honors_flag() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("custom.toml");
        execbox()
            .args(["--config", config_path.to_str().unwrap(), "config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("missing.toml");
        execbox()
            .args(["--config", config_path.to_str().unwrap(), "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[server]"))
            .stdout(predicate::str::contains("bundler"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("nested").join("config.toml");
        execbox()
            .args(["--config", config_path.to_str().unwrap(), "config", "init"])
            .assert()
            .success();
        assert!(config_path.exists());
    }

    #[test]
    fn resolve_alias() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "https://code.acme.internal");
        execbox()
            .args(["--config", config_path.to_str().unwrap()])
            .args(["resolve", "--repo", "DEV/devise", "--commit", "abc123"])
            .assert()
            .success()
            .stdout(predicate::str::diff(
                "https://sourcegraph.com/github.com/plataformatec/devise@abc123/-/raw/\n",
            ));
    }

    #[test]
    fn resolve_private_repository_warns() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "https://code.acme.internal");
        execbox()
            .args(["--config", config_path.to_str().unwrap()])
            .args(["resolve", "--repo", "acme/unknown-repo", "--commit", "c1"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "https://code.acme.internal/acme/unknown-repo@c1/-/raw/",
            ))
            .stderr(predicate::str::contains("access token"));
    }

    #[test]
    fn run_rejects_unbalanced_quotes() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "https://code.acme.internal");
        execbox()
            .args(["--config", config_path.to_str().unwrap()])
            .args(["run", "--repo", "DEV/devise", "--commit", "c1", "-C", "echo 'oops"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid command pipeline"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_prints_json_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.api/extension-containers/bundler"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "commands": [{"combinedOutput": "Resolving dependencies...\n", "ok": true}],
                "files": {"Gemfile.lock": "GEM\n"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), &server.uri());

        let output = tokio::task::spawn_blocking(move || {
            execbox()
                .args(["--config", config_path.to_str().unwrap()])
                .args(["run", "--repo", "DEV/devise", "--commit", "abc123"])
                .args(["-C", "bundle lock", "--json"])
                .output()
                .unwrap()
        })
        .await
        .unwrap();

        assert!(output.status.success());
        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["commands"][0]["ok"], true);
        assert_eq!(result["files"]["Gemfile.lock"], "GEM\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_reports_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), &server.uri());

        let output = tokio::task::spawn_blocking(move || {
            execbox()
                .args(["--config", config_path.to_str().unwrap()])
                .args(["run", "--repo", "DEV/devise", "--commit", "abc123"])
                .args(["-C", "bundle lock", "--json"])
                .output()
                .unwrap()
        })
        .await
        .unwrap();

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("DEV/devise"));
        assert!(stderr.contains("HTTP 500"));
    }
}
