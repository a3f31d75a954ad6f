//! Pagination and query encoding against a mock Hubstaff server.

use std::sync::Arc;

use integrations_hubstaff::{
    HubstaffClient, HubstaffConfig, ListOptions, MockTokenIssuer, QueryParams,
    ReqwestHttpTransport, TaskFilters, TokenCache,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HubstaffClient {
    let config = HubstaffConfig::builder()
        .refresh_token("rt-123")
        .organization_id("7")
        .api_base_url(format!("{}/v2", server.uri()))
        .build()
        .expect("valid config");
    let transport = Arc::new(ReqwestHttpTransport::new().expect("transport"));
    HubstaffClient::with_issuer(
        config,
        transport,
        Arc::new(TokenCache::new()),
        Arc::new(MockTokenIssuer::new("at-1")),
    )
}

fn records(count: usize, offset: usize) -> Vec<Value> {
    (0..count).map(|i| json!({"id": offset + i})).collect()
}

#[tokio::test]
async fn test_metadata_pagination_requests_each_page_once() {
    let server = MockServer::start().await;

    for page in 1..=3usize {
        Mock::given(method("GET"))
            .and(path("/v2/organizations/7/projects"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": records(2, (page - 1) * 2),
                "meta": {"pagination": {"total_pages": 3}}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let projects = client(&server)
        .projects()
        .list(ListOptions::all())
        .await
        .unwrap();

    assert_eq!(projects, records(6, 0));
}

#[tokio::test]
async fn test_short_page_ends_pagination() {
    let server = MockServer::start().await;

    for (page, size) in [(1usize, 100usize), (2, 100), (3, 37)] {
        Mock::given(method("GET"))
            .and(path("/v2/organizations/7/members"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Value::Array(records(size, (page - 1) * 100))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let members = client(&server)
        .members()
        .list(ListOptions::all())
        .await
        .unwrap();

    assert_eq!(members.len(), 237);
    assert_eq!(members[236], json!({"id": 236}));
}

#[tokio::test]
async fn test_list_filters_use_repeated_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations/7/tasks"))
        .and(query_param("status[]", "active"))
        .and(query_param("status[]", "completed"))
        .and(query_param("user_ids[]", "11"))
        .and(query_param("user_ids[]", "12"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": [{"id": 1}]})))
        .expect(1)
        .mount(&server)
        .await;

    let filters = TaskFilters {
        status: vec!["active".to_string(), "completed".to_string()],
        user_ids: json!("11,12"),
        ..Default::default()
    };
    let tasks = client(&server)
        .tasks()
        .list(None, &filters, ListOptions::limit(5))
        .await
        .unwrap();

    assert_eq!(tasks, vec![json!({"id": 1})]);
}

#[tokio::test]
async fn test_fetch_all_generic_data_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/time_entries"))
        .and(query_param("page", "1"))
        .and(query_param("start_date", "2024-03-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": records(3, 0)})))
        .expect(1)
        .mount(&server)
        .await;

    let query = QueryParams::new().with("start_date", "2024-03-01");
    let entries = client(&server)
        .fetch_all("/time_entries", &query)
        .await
        .unwrap();

    assert_eq!(entries, records(3, 0));
}
