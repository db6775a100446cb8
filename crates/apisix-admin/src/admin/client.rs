// Async HTTP client for the APISIX Admin API.
//
// Base path: /apisix/admin/
// Auth: X-API-KEY header
//
// Every resource operation funnels through `execute`, which attaches the
// credential, runs the call, reads the full body, and classifies the
// outcome by status code. Envelope decoding happens above it.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::metadata::PluginMetadata;
use super::secret::{Secret, SecretManager};
use super::types::{
    Consumer, ConsumerGroup, DeleteEnvelope, Envelope, GlobalRule, PluginConfig, Route, Service,
    SslCertificate, StreamRoute, Upstream, UpstreamUpdate,
};
use crate::error::Error;
use crate::transport::TransportConfig;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Async client for the APISIX Admin API.
///
/// Immutable after construction and safe to share across concurrent
/// callers; each operation is one awaited request with no internal
/// queuing, retry, or backoff.
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: HeaderValue,
}

impl AdminClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an endpoint, API key, and transport config.
    ///
    /// Installs `X-API-KEY` as a default header so the credential rides on
    /// every request made through this client's transport. The credential
    /// is resolved into a header value once, here; operations reuse it.
    pub fn from_api_key(
        endpoint: &str,
        api_key: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let api_key = Self::key_header(api_key)?;

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key.clone());
        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(endpoint)?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// The credential header is still set per request, so the wrapped
    /// client needs no default headers of its own.
    pub fn from_reqwest(
        endpoint: &str,
        http: reqwest::Client,
        api_key: &secrecy::SecretString,
    ) -> Result<Self, Error> {
        let api_key = Self::key_header(api_key)?;
        let base_url = Self::normalize_base_url(endpoint)?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn key_header(api_key: &secrecy::SecretString) -> Result<HeaderValue, Error> {
        let mut value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Build the base URL with the `/apisix/admin/` prefix.
    ///
    /// Endpoints that already carry the prefix are not double-prefixed.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/apisix/admin") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/apisix/admin/"));
        }

        Ok(url)
    }

    /// The normalized Admin API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request core ─────────────────────────────────────────────────

    /// Execute one authenticated request and classify the outcome.
    ///
    /// The credential header is set explicitly here, overriding anything
    /// configured elsewhere; reqwest's default headers never overwrite a
    /// request-level header, so the key appears exactly once. The body is
    /// always read to completion before returning, which also releases
    /// the connection on every exit path. Status >= 400 becomes
    /// [`Error::Api`] with the raw body attached, unparsed; anything
    /// below 400 (200 and 201 both occur on writes) is success.
    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.base_url.join(path)?;
        debug!("{method} {url}");

        let mut req = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.clone());
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        if status >= 400 {
            return Err(Error::Api { status, body });
        }

        Ok(body)
    }

    /// GET a stored resource and unwrap its `{key, value}` envelope.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let body = self.execute::<Value>(Method::GET, path, None).await?;
        Ok(decode::<Envelope<T>>(&body)?.value)
    }

    /// Send a resource and decode the stored value the gateway answers
    /// with — which may differ from the input (server-filled defaults).
    async fn store<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let raw = self.execute(method, path, Some(body)).await?;
        Ok(decode::<Envelope<T>>(&raw)?.value)
    }

    /// DELETE a resource, requiring both a non-error status and a
    /// `deleted == "1"` payload. A 2xx answer with anything else in
    /// `deleted` is a soft failure carrying the raw body.
    async fn remove(&self, path: &str) -> Result<(), Error> {
        let raw = self.execute::<Value>(Method::DELETE, path, None).await?;
        let resp: DeleteEnvelope = decode(&raw)?;
        if resp.deleted.as_deref() == Some("1") {
            Ok(())
        } else {
            Err(Error::DeleteFailed { body: raw })
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Routes ───────────────────────────────────────────────────────

    pub async fn get_route(&self, route_id: &str) -> Result<Route, Error> {
        self.fetch(&format!("routes/{route_id}")).await
    }

    /// Create a route. The identifier is server-assigned; any `id` in the
    /// returned value comes from the gateway's response.
    pub async fn create_route(&self, route: &Route) -> Result<Route, Error> {
        self.store(Method::POST, "routes/", route).await
    }

    pub async fn update_route(&self, route_id: &str, route: &Route) -> Result<Route, Error> {
        self.store(Method::PUT, &format!("routes/{route_id}"), route)
            .await
    }

    pub async fn delete_route(&self, route_id: &str) -> Result<(), Error> {
        self.remove(&format!("routes/{route_id}")).await
    }

    // ── Services ─────────────────────────────────────────────────────

    pub async fn get_service(&self, service_id: &str) -> Result<Service, Error> {
        self.fetch(&format!("services/{service_id}")).await
    }

    pub async fn create_service(&self, service: &Service) -> Result<Service, Error> {
        self.store(Method::POST, "services/", service).await
    }

    /// Partial update: only the fields present in `service` are merged.
    pub async fn update_service(
        &self,
        service_id: &str,
        service: &Service,
    ) -> Result<Service, Error> {
        self.store(Method::PATCH, &format!("services/{service_id}"), service)
            .await
    }

    pub async fn delete_service(&self, service_id: &str) -> Result<(), Error> {
        self.remove(&format!("services/{service_id}")).await
    }

    // ── Upstreams ────────────────────────────────────────────────────

    pub async fn get_upstream(&self, upstream_id: &str) -> Result<Upstream, Error> {
        self.fetch(&format!("upstreams/{upstream_id}")).await
    }

    pub async fn create_upstream(&self, upstream: &Upstream) -> Result<Upstream, Error> {
        self.store(Method::POST, "upstreams/", upstream).await
    }

    /// Partial update using the PATCH shape, which serializes explicit
    /// nulls so fields can be cleared.
    pub async fn update_upstream(
        &self,
        upstream_id: &str,
        upstream: &UpstreamUpdate,
    ) -> Result<Upstream, Error> {
        self.store(Method::PATCH, &format!("upstreams/{upstream_id}"), upstream)
            .await
    }

    pub async fn delete_upstream(&self, upstream_id: &str) -> Result<(), Error> {
        self.remove(&format!("upstreams/{upstream_id}")).await
    }

    // ── Consumers ────────────────────────────────────────────────────

    pub async fn get_consumer(&self, username: &str) -> Result<Consumer, Error> {
        self.fetch(&format!("consumers/{username}")).await
    }

    /// Create (or replace) a consumer. Consumers are keyed by username,
    /// so creation is an idempotent PUT.
    pub async fn create_consumer(&self, consumer: &Consumer) -> Result<Consumer, Error> {
        self.store(
            Method::PUT,
            &format!("consumers/{}", consumer.username),
            consumer,
        )
        .await
    }

    pub async fn update_consumer(&self, consumer: &Consumer) -> Result<Consumer, Error> {
        self.create_consumer(consumer).await
    }

    pub async fn delete_consumer(&self, username: &str) -> Result<(), Error> {
        self.remove(&format!("consumers/{username}")).await
    }

    // ── Consumer groups ──────────────────────────────────────────────

    pub async fn get_consumer_group(&self, group_id: &str) -> Result<ConsumerGroup, Error> {
        self.fetch(&format!("consumer_groups/{group_id}")).await
    }

    pub async fn create_consumer_group(
        &self,
        group_id: &str,
        group: &ConsumerGroup,
    ) -> Result<ConsumerGroup, Error> {
        self.store(Method::PUT, &format!("consumer_groups/{group_id}"), group)
            .await
    }

    pub async fn update_consumer_group(
        &self,
        group_id: &str,
        group: &ConsumerGroup,
    ) -> Result<ConsumerGroup, Error> {
        self.create_consumer_group(group_id, group).await
    }

    pub async fn delete_consumer_group(&self, group_id: &str) -> Result<(), Error> {
        self.remove(&format!("consumer_groups/{group_id}")).await
    }

    // ── Global rules ─────────────────────────────────────────────────

    pub async fn get_global_rule(&self, rule_id: &str) -> Result<GlobalRule, Error> {
        self.fetch(&format!("global_rules/{rule_id}")).await
    }

    pub async fn create_global_rule(
        &self,
        rule_id: &str,
        rule: &GlobalRule,
    ) -> Result<GlobalRule, Error> {
        self.store(Method::PUT, &format!("global_rules/{rule_id}"), rule)
            .await
    }

    pub async fn update_global_rule(
        &self,
        rule_id: &str,
        rule: &GlobalRule,
    ) -> Result<GlobalRule, Error> {
        self.store(Method::PATCH, &format!("global_rules/{rule_id}"), rule)
            .await
    }

    pub async fn delete_global_rule(&self, rule_id: &str) -> Result<(), Error> {
        self.remove(&format!("global_rules/{rule_id}")).await
    }

    // ── Plugin configs ───────────────────────────────────────────────

    pub async fn get_plugin_config(&self, config_id: &str) -> Result<PluginConfig, Error> {
        self.fetch(&format!("plugin_configs/{config_id}")).await
    }

    pub async fn create_plugin_config(
        &self,
        config_id: &str,
        config: &PluginConfig,
    ) -> Result<PluginConfig, Error> {
        self.store(Method::PUT, &format!("plugin_configs/{config_id}"), config)
            .await
    }

    pub async fn update_plugin_config(
        &self,
        config_id: &str,
        config: &PluginConfig,
    ) -> Result<PluginConfig, Error> {
        self.create_plugin_config(config_id, config).await
    }

    pub async fn delete_plugin_config(&self, config_id: &str) -> Result<(), Error> {
        self.remove(&format!("plugin_configs/{config_id}")).await
    }

    // ── SSL certificates ─────────────────────────────────────────────

    pub async fn get_ssl_certificate(&self, cert_id: &str) -> Result<SslCertificate, Error> {
        self.fetch(&format!("ssls/{cert_id}")).await
    }

    pub async fn create_ssl_certificate(
        &self,
        certificate: &SslCertificate,
    ) -> Result<SslCertificate, Error> {
        self.store(Method::POST, "ssls/", certificate).await
    }

    pub async fn update_ssl_certificate(
        &self,
        cert_id: &str,
        certificate: &SslCertificate,
    ) -> Result<SslCertificate, Error> {
        self.store(Method::PATCH, &format!("ssls/{cert_id}"), certificate)
            .await
    }

    pub async fn delete_ssl_certificate(&self, cert_id: &str) -> Result<(), Error> {
        self.remove(&format!("ssls/{cert_id}")).await
    }

    // ── Stream routes ────────────────────────────────────────────────

    pub async fn get_stream_route(&self, route_id: &str) -> Result<StreamRoute, Error> {
        self.fetch(&format!("stream_routes/{route_id}")).await
    }

    pub async fn create_stream_route(&self, route: &StreamRoute) -> Result<StreamRoute, Error> {
        self.store(Method::POST, "stream_routes/", route).await
    }

    pub async fn update_stream_route(
        &self,
        route_id: &str,
        route: &StreamRoute,
    ) -> Result<StreamRoute, Error> {
        self.store(Method::PUT, &format!("stream_routes/{route_id}"), route)
            .await
    }

    pub async fn delete_stream_route(&self, route_id: &str) -> Result<(), Error> {
        self.remove(&format!("stream_routes/{route_id}")).await
    }

    // ── Plugin metadata ──────────────────────────────────────────────

    pub async fn get_plugin_metadata(&self, plugin_id: &str) -> Result<PluginMetadata, Error> {
        self.fetch(&format!("plugin_metadata/{plugin_id}")).await
    }

    /// Create (or replace) metadata for a plugin.
    ///
    /// The identifier is forced to `plugin_id` and the field map is
    /// validated against the reserved wire keys before anything is
    /// marshaled or sent.
    pub async fn create_plugin_metadata(
        &self,
        plugin_id: &str,
        metadata: &PluginMetadata,
    ) -> Result<PluginMetadata, Error> {
        let mut payload = metadata.clone();
        payload.id = Some(plugin_id.to_owned());
        payload.validate()?;

        self.store(Method::PUT, &format!("plugin_metadata/{plugin_id}"), &payload)
            .await
    }

    /// Metadata updates are full replacements on this collection.
    pub async fn update_plugin_metadata(
        &self,
        plugin_id: &str,
        metadata: &PluginMetadata,
    ) -> Result<PluginMetadata, Error> {
        self.create_plugin_metadata(plugin_id, metadata).await
    }

    pub async fn delete_plugin_metadata(&self, plugin_id: &str) -> Result<(), Error> {
        self.remove(&format!("plugin_metadata/{plugin_id}")).await
    }

    // ── Secrets ──────────────────────────────────────────────────────

    pub async fn get_secret(
        &self,
        manager: SecretManager,
        secret_id: &str,
    ) -> Result<Secret, Error> {
        let raw = self
            .execute::<Value>(Method::GET, &format!("secrets/{manager}/{secret_id}"), None)
            .await?;
        decode_secret(manager, raw)
    }

    /// Create a secret. The manager tag is derived from the variant
    /// itself, so path and payload cannot disagree.
    pub async fn create_secret(&self, secret: &Secret) -> Result<Secret, Error> {
        let manager = secret.manager();
        let raw = self
            .execute(Method::PUT, &format!("secrets/{manager}"), Some(secret))
            .await?;
        decode_secret(manager, raw)
    }

    pub async fn update_secret(&self, secret_id: &str, secret: &Secret) -> Result<Secret, Error> {
        let manager = secret.manager();
        let raw = self
            .execute(
                Method::PATCH,
                &format!("secrets/{manager}/{secret_id}"),
                Some(secret),
            )
            .await?;
        decode_secret(manager, raw)
    }

    pub async fn delete_secret(
        &self,
        manager: SecretManager,
        secret_id: &str,
    ) -> Result<(), Error> {
        self.remove(&format!("secrets/{manager}/{secret_id}")).await
    }
}

// ── Decoding helpers ─────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Decode {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Two-step secret decode: unwrap the envelope, then resolve the variant
/// selected by the manager tag.
fn decode_secret(manager: SecretManager, raw: String) -> Result<Secret, Error> {
    let envelope: Envelope<Value> = decode(&raw)?;
    Secret::from_value(manager, envelope.value).map_err(|e| Error::Decode {
        message: e.to_string(),
        body: raw,
    })
}
