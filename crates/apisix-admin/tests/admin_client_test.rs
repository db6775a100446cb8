// Integration tests for `AdminClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use apisix_admin::admin_types::{Consumer, Route, Service, UpstreamUpdate};
use apisix_admin::{
    AdminClient, Error, PluginMetadata, Secret, SecretManager, TransportConfig, VaultSecret,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let client = AdminClient::from_reqwest(
        &server.uri(),
        reqwest::Client::new(),
        &SecretString::from("secret123"),
    )
    .unwrap();
    (server, client)
}

fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_route() {
    let (server, client) = setup().await;

    let body = json!({
        "key": "/apisix/routes/1",
        "value": {
            "id": "1",
            "name": "orders",
            "uri": "/orders/*",
            "methods": ["GET", "POST"],
            "upstream_id": "u1",
            "status": 1
        }
    });

    Mock::given(method("GET"))
        .and(path("/apisix/admin/routes/1"))
        .and(header("X-API-KEY", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let route = client.get_route("1").await.unwrap();

    assert_eq!(route.id.as_deref(), Some("1"));
    assert_eq!(route.name.as_deref(), Some("orders"));
    assert_eq!(route.uri.as_deref(), Some("/orders/*"));
    assert_eq!(route.upstream_id.as_deref(), Some("u1"));
    assert_eq!(route.status, Some(1));
}

#[tokio::test]
async fn test_api_key_header_sent_exactly_once() {
    // Build through the default-header decorator path; the per-request
    // header set in the core must not stack on top of it.
    let server = MockServer::start().await;
    let client = AdminClient::from_api_key(
        &server.uri(),
        &SecretString::from("secret123"),
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/apisix/admin/routes/1"))
        .and(header("X-API-KEY", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/routes/1",
            "value": { "id": "1" }
        })))
        .mount(&server)
        .await;

    client.get_route("1").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let count = requests[0].headers.get_all("x-api-key").iter().count();
    assert_eq!(count, 1, "X-API-KEY must appear exactly once");
}

#[tokio::test]
async fn test_create_route_server_assigns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/apisix/admin/routes/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "key": "/apisix/routes/00000000000042",
            "value": {
                "id": "00000000000042",
                "uri": "/orders/*",
                "status": 1
            }
        })))
        .mount(&server)
        .await;

    let req = Route {
        uri: Some("/orders/*".to_owned()),
        upstream_id: Some("u1".to_owned()),
        ..Route::default()
    };

    let created = client.create_route(&req).await.unwrap();

    // The id comes from the decoded response, never from the request.
    assert_eq!(created.id.as_deref(), Some("00000000000042"));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("id").is_none(), "request must not carry an id");
    assert_eq!(sent["uri"], json!("/orders/*"));
}

#[tokio::test]
async fn test_update_service_uses_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/apisix/admin/services/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/services/s1",
            "value": { "id": "s1", "name": "billing" }
        })))
        .mount(&server)
        .await;

    let patch = Service {
        name: Some("billing".to_owned()),
        ..Service::default()
    };

    let updated = client.update_service("s1", &patch).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("billing"));
}

#[tokio::test]
async fn test_update_upstream_sends_explicit_nulls() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/apisix/admin/upstreams/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/upstreams/u1",
            "value": { "id": "u1", "type": "roundrobin" }
        })))
        .mount(&server)
        .await;

    let patch = UpstreamUpdate {
        upstream_type: Some("roundrobin".to_owned()),
        ..UpstreamUpdate::default()
    };

    client.update_upstream("u1", &patch).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    // PATCH shape: unset fields must be present as nulls so the merge
    // can clear them.
    assert_eq!(sent["type"], json!("roundrobin"));
    assert!(sent.get("name").is_some());
    assert_eq!(sent["name"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_create_consumer_keyed_by_username() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/apisix/admin/consumers/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/consumers/alice",
            "value": { "username": "alice", "group_id": "g1" }
        })))
        .mount(&server)
        .await;

    let consumer = Consumer {
        username: "alice".to_owned(),
        group_id: Some("g1".to_owned()),
        ..Consumer::default()
    };

    let stored = client.create_consumer(&consumer).await.unwrap();
    assert_eq!(stored.username, "alice");
    assert_eq!(stored.group_id.as_deref(), Some("g1"));
}

// ── Delete semantics ────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_route_confirmed() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/apisix/admin/routes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/routes/1",
            "deleted": "1"
        })))
        .mount(&server)
        .await;

    client.delete_route("1").await.unwrap();
}

#[tokio::test]
async fn test_delete_soft_failure_despite_200() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/apisix/admin/routes/x"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"key":"/x","deleted":"0"}"#),
        )
        .mount(&server)
        .await;

    let result = client.delete_route("x").await;

    match result {
        Err(Error::DeleteFailed { ref body }) => {
            assert_eq!(body, r#"{"key":"/x","deleted":"0"}"#);
        }
        other => panic!("expected DeleteFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_missing_flag_is_soft_failure() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/apisix/admin/services/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "key": "/x" })))
        .mount(&server)
        .await;

    let result = client.delete_service("s1").await;
    assert!(matches!(result, Err(Error::DeleteFailed { .. })));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_404_carries_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apisix/admin/routes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error_msg":"not found"}"#))
        .mount(&server)
        .await;

    let result = client.get_route("missing").await;

    match result {
        Err(Error::Api { status, ref body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, r#"{"error_msg":"not found"}"#);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }

    let err = result.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.api_status(), Some(404));
}

#[tokio::test]
async fn test_error_500_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let result = client.get_upstream("u1").await;

    match result {
        Err(Error::Api { status, ref body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_truncated_body_yields_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apisix/admin/routes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"key":"x","valu"#))
        .mount(&server)
        .await;

    let result = client.get_route("1").await;

    match result {
        Err(Error::Decode { ref body, .. }) => {
            assert_eq!(body, r#"{"key":"x","valu"#);
        }
        other => panic!("expected Decode error, got: {other:?}"),
    }
}

// ── Plugin metadata ─────────────────────────────────────────────────

#[tokio::test]
async fn test_plugin_metadata_round_trip() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/apisix/admin/plugin_metadata/http-logger"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "key": "/apisix/plugin_metadata/http-logger",
            "value": {
                "id": "http-logger",
                "log_format": { "client_ip": "$remote_addr", "host": "$host" }
            }
        })))
        .mount(&server)
        .await;

    let metadata = PluginMetadata {
        id: None,
        fields: fields(json!({
            "log_format": { "host": "$host", "client_ip": "$remote_addr" }
        })),
    };

    let stored = client
        .create_plugin_metadata("http-logger", &metadata)
        .await
        .unwrap();

    assert_eq!(stored.id.as_deref(), Some("http-logger"));
    assert!(stored.fields.contains_key("log_format"));
    assert!(!stored.fields.contains_key("id"));

    // The wire body is one flat object, id first, fields in sorted key
    // order -- byte-stable for the same logical content.
    let requests = server.received_requests().await.unwrap();
    let sent = std::str::from_utf8(&requests[0].body).unwrap();
    assert_eq!(
        sent,
        r#"{"id":"http-logger","log_format":{"client_ip":"$remote_addr","host":"$host"}}"#
    );
}

#[tokio::test]
async fn test_plugin_metadata_reserved_key_fails_before_request() {
    let (server, client) = setup().await;

    let metadata = PluginMetadata {
        id: None,
        fields: fields(json!({ "key": "not allowed" })),
    };

    let result = client.create_plugin_metadata("syslog", &metadata).await;

    assert!(matches!(result, Err(Error::ReservedMetadataKey(ref k)) if k == "key"));
    assert!(
        server.received_requests().await.unwrap().is_empty(),
        "validation must fire before any network call"
    );
}

// ── Secrets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_secret_puts_to_manager_path() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/apisix/admin/secrets/vault"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/secrets/vault/1",
            "value": {
                "uri": "https://vault.internal:8200",
                "prefix": "/apisix/kv",
                "token": "root"
            }
        })))
        .mount(&server)
        .await;

    let secret = Secret::Vault(VaultSecret {
        uri: Some("https://vault.internal:8200".to_owned()),
        prefix: Some("/apisix/kv".to_owned()),
        token: Some("root".to_owned()),
        namespace: None,
    });

    let stored = client.create_secret(&secret).await.unwrap();

    match stored {
        Secret::Vault(vault) => {
            assert_eq!(vault.uri.as_deref(), Some("https://vault.internal:8200"));
        }
        other => panic!("expected Vault secret, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_secret_decodes_tagged_variant() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apisix/admin/secrets/aws/prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/secrets/aws/prod",
            "value": {
                "access_key_id": "AKIA",
                "secret_access_key": "shh",
                "region": "eu-west-1"
            }
        })))
        .mount(&server)
        .await;

    let secret = client.get_secret(SecretManager::Aws, "prod").await.unwrap();

    match secret {
        Secret::Aws(aws) => assert_eq!(aws.region.as_deref(), Some("eu-west-1")),
        other => panic!("expected AWS secret, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_secret_manager_never_touches_network() {
    let (server, client) = setup().await;

    // A secret operation can only be formed from a parsed tag, so the
    // fetch runs iff the tag is recognized.
    let result = match "unknown".parse::<SecretManager>() {
        Ok(manager) => client.get_secret(manager, "prod").await.map(|_| ()),
        Err(e) => Err(e),
    };

    assert!(matches!(
        result,
        Err(Error::UnsupportedSecretManager(ref tag)) if tag == "unknown"
    ));
    assert!(
        server.received_requests().await.unwrap().is_empty(),
        "unsupported tag must fail before any network call"
    );
}

#[tokio::test]
async fn test_delete_secret_path_includes_manager() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/apisix/admin/secrets/gcp/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/secrets/gcp/1",
            "deleted": "1"
        })))
        .mount(&server)
        .await;

    client.delete_secret(SecretManager::Gcp, "1").await.unwrap();
}

// ── URL normalization ───────────────────────────────────────────────

#[tokio::test]
async fn test_endpoint_with_admin_prefix_not_doubled() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/apisix/admin", server.uri());
    let client = AdminClient::from_reqwest(
        &endpoint,
        reqwest::Client::new(),
        &SecretString::from("secret123"),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/apisix/admin/routes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/routes/1",
            "value": { "id": "1" }
        })))
        .mount(&server)
        .await;

    let route = client.get_route("1").await.unwrap();
    assert_eq!(route.id.as_deref(), Some("1"));
}
