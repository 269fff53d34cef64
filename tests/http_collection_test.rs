//! Full runs against a mock Comunica server

use comunica::config::CollectorConfig;
use comunica::core::collect::RunController;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::watch;

fn page_query(day: &str, page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("siglaTribunal".into(), "TJMG".into()),
        Matcher::UrlEncoded("dataDisponibilizacaoInicio".into(), day.into()),
        Matcher::UrlEncoded("dataDisponibilizacaoFim".into(), day.into()),
        Matcher::UrlEncoded("pagina".into(), page.to_string()),
        Matcher::UrlEncoded("itensPorPagina".into(), "2".into()),
    ])
}

fn config_for(server: &ServerGuard, dir: &TempDir) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.api.base_url = format!("{}/api/v1/comunicacao", server.url());
    config.api.page_size = 2;
    config.api.timeout_seconds = 5;
    config.collection.start_date = "2025-01-01".to_string();
    config.collection.end_date = "2025-01-02".to_string();
    config.collection.backoff_seconds = 0;
    config.output.output_path = dir.path().join("casos.json").display().to_string();
    config.output.checkpoint_path = dir.path().join("backup.json").display().to_string();
    config.output.error_log_path = dir.path().join("erros.log").display().to_string();
    config
}

#[tokio::test]
async fn test_collects_pages_and_skips_failing_day() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;

    let day1_page1 = server
        .mock("GET", "/api/v1/comunicacao")
        .match_query(page_query("2025-01-01", 1))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "success", "count": 3, "items": [{"id": "a"}, {"id": "b"}]}).to_string())
        .create_async()
        .await;
    let day1_page2 = server
        .mock("GET", "/api/v1/comunicacao")
        .match_query(page_query("2025-01-01", 2))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "success", "count": 3, "items": [{"id": "c"}]}).to_string())
        .create_async()
        .await;
    let day2 = server
        .mock("GET", "/api/v1/comunicacao")
        .match_query(page_query("2025-01-02", 1))
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let (_tx, rx) = watch::channel(false);
    let controller = RunController::from_config(&config_for(&server, &dir), rx).unwrap();
    let summary = controller.run().await;

    day1_page1.assert_async().await;
    day1_page2.assert_async().await;
    day2.assert_async().await;

    assert_eq!(summary.exit_code(), 1);
    assert_eq!(summary.requests, 5);
    assert_eq!(summary.failed_requests, 3);

    let output: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("casos.json")).unwrap())
            .unwrap();
    assert_eq!(output, json!([{"id": "a"}, {"id": "b"}, {"id": "c"}]));

    let error_log = std::fs::read_to_string(dir.path().join("erros.log")).unwrap();
    assert_eq!(
        error_log
            .lines()
            .filter(|l| l.ends_with("Erro 500 na página 1 (2025-01-02)"))
            .count(),
        3
    );
}

#[tokio::test]
async fn test_output_is_four_space_indented() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/comunicacao")
        .match_query(page_query("2025-01-01", 1))
        .with_status(200)
        .with_body(json!({"items": [{"id": "a"}]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/comunicacao")
        .match_query(page_query("2025-01-02", 1))
        .with_status(200)
        .with_body(json!({"items": []}).to_string())
        .create_async()
        .await;

    let (_tx, rx) = watch::channel(false);
    let summary = RunController::from_config(&config_for(&server, &dir), rx)
        .unwrap()
        .run()
        .await;

    assert_eq!(summary.exit_code(), 0);
    let text = std::fs::read_to_string(dir.path().join("casos.json")).unwrap();
    assert_eq!(text, "[\n    {\n        \"id\": \"a\"\n    }\n]");
}
