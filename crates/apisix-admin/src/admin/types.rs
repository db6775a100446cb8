//! Wire envelopes and static resource schemas for the Admin API.
//!
//! Every get/create/update response arrives as `{"key": ..., "value": ...}`
//! and every delete as `{"key": ..., "deleted": "0"|"1"}`. The resource
//! shapes map fields to fixed JSON tags; optional fields distinguish
//! absent from set through `Option` plus `skip_serializing_if`, except in
//! the `*Update` PATCH shapes where `null` must be sent explicitly to
//! clear a field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{key, value}` envelope wrapping every stored resource.
///
/// `key` is the gateway's opaque storage identifier; callers only ever
/// see `value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub key: String,
    pub value: T,
}

/// `{key, deleted}` envelope answering a DELETE.
///
/// `deleted` is lenient on decode: a missing field is a soft failure,
/// not a decode error, so the raw body can be surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteEnvelope {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub deleted: Option<String>,
}

// ── Shared nested types ──────────────────────────────────────────────

/// Connect/send/read timeouts in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Timeout {
    pub connect: i64,
    pub send: i64,
    pub read: i64,
}

// ── Routes ───────────────────────────────────────────────────────────

/// A route — matches requests by URI/host/method and forwards them to an
/// upstream or service. Identifier is server-assigned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addrs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Nginx-variable match expressions, kept as opaque JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vars: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_func: Option<String>,
    /// Per-plugin configuration, keyed by plugin name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_config_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_websocket: Option<bool>,
    /// 1 = enabled, 0 = disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

// ── Services ─────────────────────────────────────────────────────────

/// A service — a reusable bundle of upstream + plugins that routes can
/// reference. Identifier is server-assigned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_config_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_websocket: Option<bool>,
}

// ── Upstreams ────────────────────────────────────────────────────────

/// An upstream — a set of backend nodes plus load-balancing and
/// health-check configuration. Identifier is server-assigned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Upstream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Load-balancing algorithm (`roundrobin`, `chash`, ...). Always
    /// serialized; the Admin API treats it as the upstream's discriminant.
    #[serde(rename = "type")]
    pub upstream_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_timeout: Option<i64>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keepalive_pool: Option<KeepalivePool>,
    #[serde(rename = "tls.client_cert_id", skip_serializing_if = "Option::is_none")]
    pub tls_client_cert_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<UpstreamChecks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<UpstreamNode>>,
}

/// PATCH shape for upstreams: optional fields serialize `null` explicitly
/// so the partial merge can clear them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpstreamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub upstream_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub discovery_type: Option<String>,
    pub timeout: Option<Timeout>,
    pub name: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub pass_host: Option<String>,
    pub scheme: Option<String>,
    pub retries: Option<i64>,
    pub retry_timeout: Option<i64>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub upstream_host: Option<String>,
    pub hash_on: Option<String>,
    pub key: Option<String>,
    pub keepalive_pool: Option<KeepalivePool>,
    #[serde(rename = "tls.client_cert_id")]
    pub tls_client_cert_id: Option<String>,
    pub checks: Option<UpstreamChecksUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<UpstreamNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeepalivePool {
    pub size: i64,
    pub idle_timeout: i64,
    pub requests: i64,
}

/// A single backend node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamNode {
    pub host: String,
    pub port: i64,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpstreamChecks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive: Option<PassiveCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpstreamChecksUpdate {
    pub active: Option<ActiveCheckUpdate>,
    pub passive: Option<PassiveCheckUpdate>,
}

/// Active health probing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ActiveCheck {
    #[serde(rename = "type", default)]
    pub check_type: String,
    #[serde(default)]
    pub timeout: i64,
    #[serde(default)]
    pub concurrency: i64,
    #[serde(default)]
    pub http_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default)]
    pub https_verify_certificate: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub req_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy: Option<ActiveHealthy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy: Option<ActiveUnhealthy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ActiveCheckUpdate {
    #[serde(rename = "type", default)]
    pub check_type: String,
    #[serde(default)]
    pub timeout: i64,
    #[serde(default)]
    pub concurrency: i64,
    #[serde(default)]
    pub http_path: String,
    pub host: Option<String>,
    pub port: Option<i64>,
    #[serde(default)]
    pub https_verify_certificate: bool,
    #[serde(default)]
    pub req_headers: Vec<String>,
    pub healthy: Option<ActiveHealthy>,
    pub unhealthy: Option<ActiveUnhealthy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActiveHealthy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_statuses: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActiveUnhealthy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_statuses: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_failures: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_failures: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PassiveCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy: Option<PassiveHealthy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy: Option<PassiveUnhealthy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PassiveCheckUpdate {
    pub healthy: Option<PassiveHealthy>,
    pub unhealthy: Option<PassiveUnhealthy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PassiveHealthy {
    #[serde(default)]
    pub http_statuses: Vec<i64>,
    #[serde(default)]
    pub successes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PassiveUnhealthy {
    #[serde(default)]
    pub http_statuses: Vec<i64>,
    #[serde(default)]
    pub tcp_failures: i64,
    #[serde(default)]
    pub timeouts: i64,
    #[serde(default)]
    pub http_failures: i64,
}

// ── Consumers ────────────────────────────────────────────────────────

/// A consumer, keyed by username rather than a server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Consumer {
    pub username: String,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// A consumer group. All fields serialize explicitly (including nulls),
/// matching the Admin API's full-replace semantics for this collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConsumerGroup {
    pub id: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub labels: Option<HashMap<String, String>>,
    pub plugins: Option<Map<String, Value>>,
}

// ── Global rules & plugin configs ────────────────────────────────────

/// A global rule — plugins applied to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub plugins: Map<String, Value>,
}

/// A named, reusable plugin bundle referenced by routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PluginConfig {
    pub id: Option<String>,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    pub plugins: Option<Map<String, Value>>,
}

// ── SSL certificates ─────────────────────────────────────────────────

/// An SSL certificate bound to one or more SNIs. Identifier is
/// server-assigned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SslCertificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// 1 = enabled, 0 = disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    /// `server` or `client`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ssl_type: Option<String>,
}

// ── Stream routes ────────────────────────────────────────────────────

/// A TCP/UDP proxy route. Identifier is server-assigned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StreamRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
}
