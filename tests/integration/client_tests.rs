//! `ExecClient` over the real HTTP transport

use execbox::client::{parse_origin, ClientOptions, ExecClient, RepositoryContext};
use execbox::ExecError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::new(parse_origin(&server.uri()).unwrap(), "bundler")
        .with_include_files(["Gemfile.lock"])
        .with_timeout(Some(Duration::from_secs(10)))
}

fn bundle_lock() -> Vec<Vec<String>> {
    vec![vec!["bundle".to_string(), "lock".to_string()]]
}

fn ok_body() -> serde_json::Value {
    json!({
        "commands": [{"combinedOutput": "Writing lockfile\n", "ok": true}],
        "files": {"Gemfile.lock": "GEM\n"}
    })
}

#[tokio::test]
async fn sends_params_query_and_content_type() {
    let server = MockServer::start().await;
    let expected_params = json!({
        "archiveURL": "https://sourcegraph.com/github.com/plataformatec/devise@abc123/-/raw/",
        "commands": [["bundle", "lock"]],
        "dir": "lib",
        "includeFiles": ["Gemfile.lock"]
    })
    .to_string();

    Mock::given(method("GET"))
        .and(path("/.api/extension-containers/bundler"))
        .and(query_param("params", expected_params.as_str()))
        .and(header("content-type", "application/json; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server)).unwrap();
    let result = client
        .execute(
            bundle_lock(),
            RepositoryContext::new("DEV/devise", "abc123").with_path("lib"),
        )
        .await
        .unwrap();

    assert!(result.all_ok());
    assert_eq!(result.file("Gemfile.lock"), Some("GEM\n"));
}

#[tokio::test]
async fn concurrent_identical_calls_hit_server_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body())
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server)).unwrap();
    let context = RepositoryContext::new("DEV/devise", "abc123");

    let (a, b) = tokio::join!(
        client.execute(bundle_lock(), context.clone()),
        client.execute(bundle_lock(), context.clone()),
    );
    assert_eq!(a.unwrap(), b.unwrap());

    // A later identical call is served from the cache.
    client.execute(bundle_lock(), context).await.unwrap();
}

#[tokio::test]
async fn uncached_client_hits_server_every_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server).with_cache(false)).unwrap();
    let context = RepositoryContext::new("DEV/devise", "abc123");

    client.execute(bundle_lock(), context.clone()).await.unwrap();
    client.execute(bundle_lock(), context).await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server)).unwrap();
    let err = client
        .execute(bundle_lock(), RepositoryContext::new("DEV/devise", "abc123"))
        .await
        .unwrap_err();

    assert_eq!(err, ExecError::transport("DEV/devise", 500));
}

#[tokio::test]
async fn failed_command_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commands": [
                {"combinedOutput": "ok\n", "ok": true},
                {"combinedOutput": "boom\n", "ok": false, "error": "exit status 2"}
            ],
            "files": {}
        })))
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server)).unwrap();
    let result = client
        .execute(
            vec![vec!["true".to_string()], vec!["false".to_string()]],
            RepositoryContext::new("DEV/devise", "abc123"),
        )
        .await
        .unwrap();

    assert_eq!(result.commands.len(), 2);
    assert!(result.commands[0].ok);
    assert_eq!(result.commands[1].error.as_deref(), Some("exit status 2"));
}

#[tokio::test]
async fn large_response_body_is_read_whole() {
    let server = MockServer::start().await;
    let big_log = "x".repeat(11 * 1024 * 1024);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commands": [{"combinedOutput": "", "ok": true}],
            "files": {"big.log": big_log}
        })))
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server)).unwrap();
    let result = client
        .execute(bundle_lock(), RepositoryContext::new("DEV/devise", "abc123"))
        .await
        .unwrap();

    assert_eq!(result.file("big.log").map(str::len), Some(11 * 1024 * 1024));
}

#[tokio::test]
async fn non_utf8_body_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0x7b]))
        .mount(&server)
        .await;

    let client = ExecClient::new(options(&server)).unwrap();
    let err = client
        .execute(bundle_lock(), RepositoryContext::new("DEV/devise", "abc123"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ExecError::MalformedResponse { ref repository, .. } if repository == "DEV/devise"),
        "unexpected error: {err:?}"
    );
}
