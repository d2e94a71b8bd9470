// Integration tests for a full device report: password grant, paging through
// the device list, a token revoked mid-walk, then client-side filtering and
// field selection over the aggregate.

use chrono::Utc;
use mockito::{Matcher, Server, ServerGuard};
use rmm::config::HttpConfig;
use rmm::filter::select_fields;
use rmm::{
    CachedToken, CombineMode, Credentials, FilterSet, HttpClient, MemoryTokenStore, Method,
    Paginator,
};
use serde_json::{json, Value};
use std::sync::Arc;

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn device(n: usize) -> Value {
    json!({
        "uid": format!("dev-{}", n),
        "hostname": format!("WS-{:03}", n),
        "online": n % 2 == 0,
        "deviceType": {"category": if n % 10 == 0 { "Server" } else { "Desktop" }},
        "patchManagement": {"patchesApprovedPending": n % 7},
        "udf": {"udf1": if n < 50 { "Finance" } else { "Sales" }}
    })
}

fn page_body(range: std::ops::Range<usize>, total: usize) -> String {
    let devices: Vec<Value> = range.map(device).collect();
    json!({
        "pageDetails": {"count": devices.len(), "totalCount": total},
        "devices": devices
    })
    .to_string()
}

fn page_query(page: usize) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("max".into(), "100".into()),
    ])
}

async fn token_mock(server: &mut ServerGuard, token: &str, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/auth/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"access_token": token, "token_type": "bearer", "expires_in": 3600}).to_string())
        .expect(hits)
        .create_async()
        .await
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_survives_token_revocation_between_pages() {
    let mut server = Server::new_async().await;

    let stale_page = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(1))
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let page0 = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(0))
        .match_header("authorization", "Bearer stale")
        .with_status(200)
        .with_body(page_body(0..100, 150))
        .expect(1)
        .create_async()
        .await;
    let grant = token_mock(&mut server, "fresh", 1).await;
    let page1 = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(1))
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(page_body(100..150, 150))
        .expect(1)
        .create_async()
        .await;

    let token = CachedToken::issued_at(
        "stale".to_string(),
        "bearer".to_string(),
        3600,
        Utc::now().timestamp_millis(),
    );
    let client = HttpClient::with_config(
        Credentials::new(server.url(), "key", "secret"),
        &HttpConfig::default(),
        Arc::new(MemoryTokenStore::with_token(token)),
    )
    .unwrap();

    let devices = Paginator::new(&client)
        .fetch_all(Method::GET, "/api/v2/account/devices", None, None)
        .await
        .unwrap();

    assert_eq!(devices.len(), 150);
    assert_eq!(devices[149]["uid"], "dev-149");
    stale_page.assert_async().await;
    page0.assert_async().await;
    grant.assert_async().await;
    page1.assert_async().await;
}

#[tokio::test]
async fn test_second_rejection_after_refresh_is_returned() {
    let mut server = Server::new_async().await;
    // Both grants hand back the same revoked token
    let grant = token_mock(&mut server, "revoked", 2).await;
    let page0 = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(0))
        .with_status(200)
        .with_body(page_body(0..100, 150))
        .expect(1)
        .create_async()
        .await;
    let page1 = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(1))
        .with_status(401)
        .expect(2)
        .create_async()
        .await;

    let client = HttpClient::new(Credentials::new(server.url(), "key", "secret")).unwrap();
    let err = Paginator::new(&client)
        .fetch_all(Method::GET, "/api/v2/account/devices", None, None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    grant.assert_async().await;
    page0.assert_async().await;
    page1.assert_async().await;
}

#[tokio::test]
async fn test_report_filters_and_projects_aggregate() {
    let mut server = Server::new_async().await;
    let grant = token_mock(&mut server, "report-token", 1).await;

    let mut pages = Vec::new();
    for (page, range) in [(0, 0..100), (1, 100..200), (2, 200..230)] {
        pages.push(
            server
                .mock("GET", "/api/v2/account/devices")
                .match_query(page_query(page))
                .match_header("authorization", "Bearer report-token")
                .with_status(200)
                .with_body(page_body(range, 230))
                .expect(1)
                .create_async()
                .await,
        );
    }

    let client = HttpClient::new(Credentials::new(server.url(), "key", "secret")).unwrap();
    let devices = Paginator::new(&client)
        .fetch_all(Method::GET, "/api/v2/account/devices", None, None)
        .await
        .unwrap();
    assert_eq!(devices.len(), 230);

    let filters = FilterSet::from_raw(
        &json!([
            {"field": "online", "operator": "equals", "booleanValue": true},
            {"field": "deviceType.category", "operator": "notEquals", "value": "server"},
            {"field": "patchManagement.patchesApprovedPending", "operator": "greaterThanOrEqual", "numericValue": 5},
            {"field": "", "operator": "equals", "value": "dropped"}
        ]),
        CombineMode::And,
    );
    assert_eq!(filters.conditions.len(), 3);

    let fields = vec!["hostname".to_string(), "udf.udf1".to_string()];
    let report: Vec<Value> = filters
        .apply(devices.clone())
        .iter()
        .map(|d| select_fields(d, &fields))
        .collect();

    let expected: Vec<Value> = (0..230)
        .filter(|n| n % 2 == 0 && n % 10 != 0 && n % 7 >= 5)
        .map(|n| select_fields(&device(n), &fields))
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(report, expected);
    assert_eq!(report[0], json!({"hostname": "WS-006", "udf": {"udf1": "Finance"}}));

    // Re-applying the same filter is a no-op on its own output.
    let once = filters.apply(devices);
    assert_eq!(filters.apply(once.clone()), once);

    grant.assert_async().await;
    for page in pages {
        page.assert_async().await;
    }
}

#[tokio::test]
async fn test_or_mode_across_pages_with_limit() {
    let mut server = Server::new_async().await;
    let _grant = token_mock(&mut server, "t", 1).await;
    let _page0 = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(0))
        .with_status(200)
        .with_body(page_body(0..100, 230))
        .create_async()
        .await;
    let page1 = server
        .mock("GET", "/api/v2/account/devices")
        .match_query(page_query(1))
        .with_status(200)
        .with_body(page_body(100..200, 230))
        .expect(0)
        .create_async()
        .await;

    let client = HttpClient::new(Credentials::new(server.url(), "key", "secret")).unwrap();
    let first_fifty = Paginator::new(&client)
        .fetch_limited(Method::GET, "/api/v2/account/devices", None, None, 50)
        .await
        .unwrap();
    assert_eq!(first_fifty.len(), 50);

    let filters = FilterSet::from_raw(
        &json!([
            {"field": "deviceType.category", "operator": "equals", "value": "Server"},
            {"field": "hostname", "operator": "endsWith", "value": "-001"}
        ]),
        CombineMode::Or,
    );
    let hosts: Vec<Value> = filters
        .apply(first_fifty)
        .into_iter()
        .map(|d| d["hostname"].clone())
        .collect();
    assert_eq!(
        hosts,
        vec![json!("WS-000"), json!("WS-001"), json!("WS-010"), json!("WS-020"), json!("WS-030"), json!("WS-040")]
    );
    page1.assert_async().await;
}
