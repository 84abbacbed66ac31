//! End-to-end tests for the audit pipeline.
//!
//! These tests drive config -> targets -> HTTP fetch -> extraction -> checks
//! against a local mock origin.

use std::sync::Arc;

use content_audit::{
    service::{ContentCollection, ContentItem, StaticContentSource},
    test_utils::fixtures::PageHtml,
    AuditConfig, AuditOrchestrator, CheckStatus, StaticTarget, TargetType,
};
use mockito::{Matcher, ServerGuard};

/// Config pointing at the mock server, with the site's keyword pages.
fn config_for(server: &ServerGuard) -> AuditConfig {
    AuditConfig::from_json_str(&format!(
        r#"{{
            "site_url": "{}/",
            "fallback_keyword": "tiles",
            "request_timeout_secs": 5,
            "static_targets": [
                {{ "path": "/", "focus_keyword": "Terracotta Facade" }},
                {{ "path": "/products", "type": "category", "focus_keyword": "Terracotta Facade" }}
            ]
        }}"#,
        server.url()
    ))
    .expect("valid config")
}

async fn serve(server: &mut ServerGuard, path: &str, status: usize, body: String) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Regex(r"_audit_ts=\d+".to_string()))
        .match_header("cache-control", "no-store, no-cache")
        .with_status(status)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_full_batch_against_mock_origin() {
    let mut server = mockito::Server::new_async().await;

    let home = serve(&mut server, "/", 200, PageHtml::perfect().render()).await;
    let products = serve(
        &mut server,
        "/products",
        200,
        PageHtml {
            json_ld: false,
            images_without_alt: 2,
            ..PageHtml::perfect()
        }
        .render(),
    )
    .await;
    let thin = serve(&mut server, "/products/thin-tile", 200, PageHtml::thin().render()).await;
    let broken = serve(&mut server, "/products/broken-tile", 500, String::new()).await;

    let source = StaticContentSource::new(vec![ContentCollection {
        target_type: TargetType::Product,
        path_template: "/products/{slug}".to_string(),
        items: vec![
            ContentItem {
                id: "thin".to_string(),
                slug: "thin-tile".to_string(),
                title: "Thin Tile | Terracotta".to_string(),
                keywords: None,
            },
            ContentItem {
                id: "broken".to_string(),
                slug: "broken-tile".to_string(),
                title: "Broken Tile".to_string(),
                keywords: Some(vec!["broken tile".to_string()]),
            },
        ],
    }]);

    let config = config_for(&server);
    let orchestrator = AuditOrchestrator::with_http(&config, Arc::new(source)).expect("orchestrator");
    let batch = orchestrator.run().await.expect("batch");

    home.assert_async().await;
    products.assert_async().await;
    thin.assert_async().await;
    broken.assert_async().await;

    // 4 targets, 1 failed fetch
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.scores(), vec![30, 95, 100]);

    let worst = &batch.reports()[0];
    assert_eq!(worst.url, format!("{}/products/thin-tile", server.url()));
    assert_eq!(worst.id.as_deref(), Some("thin"));
    assert_eq!(worst.focus_keyword, "Thin Tile");
    assert_eq!(worst.failures().count(), 4);

    let category = &batch.reports()[1];
    assert_eq!(category.target_type, TargetType::Category);
    let warned: Vec<&str> = category.warnings().map(|c| c.id.as_str()).collect();
    assert_eq!(warned, vec!["image_alt", "structured_data"]);

    let best = &batch.reports()[2];
    assert!(best.checks.iter().all(|c| c.status == CheckStatus::Pass));
    assert_eq!(best.meta.internal_link_count, 3);

    let summary = batch.summary();
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.average_score, 75.0);
    assert_eq!(summary.worst_url, Some(worst.url.clone()));
}

#[tokio::test]
async fn test_unreachable_origin_yields_empty_batch() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = AuditConfig {
        static_targets: vec![StaticTarget::new("/", TargetType::Page, "tiles")],
        request_timeout_secs: 2,
        ..AuditConfig::for_site(format!("http://127.0.0.1:{}/", port))
    };

    let orchestrator =
        AuditOrchestrator::with_http(&config, Arc::new(StaticContentSource::empty())).unwrap();
    let batch = orchestrator.run().await.expect("fetch failures are not errors");
    assert!(batch.is_empty());
}

#[tokio::test]
async fn test_batch_json_shape() {
    let mut server = mockito::Server::new_async().await;
    let _home = serve(&mut server, "/", 200, PageHtml::perfect().render()).await;
    let _products = serve(&mut server, "/products", 200, PageHtml::thin().render()).await;

    let config = config_for(&server);
    let orchestrator =
        AuditOrchestrator::with_http(&config, Arc::new(StaticContentSource::empty())).unwrap();
    let batch = orchestrator.run().await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&batch.to_json_pretty().unwrap()).unwrap();
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["type"], "category");
    assert_eq!(reports[0]["score"], 30);
    assert_eq!(reports[0]["checks"].as_array().unwrap().len(), 15);
    assert_eq!(reports[0]["checks"][0]["id"], "title_length_short");
    assert_eq!(reports[0]["checks"][0]["status"], "warning");
    assert_eq!(reports[1]["meta"]["readability_score"], 65);
}
