// Typed client for the APISIX Admin API.
//
// RESTful JSON endpoints under /apisix/admin/, authenticated with the
// X-API-KEY header. `client` carries the request core, `types` the static
// resource schemas, `metadata` and `secret` the two dynamic codecs.

pub mod client;
pub mod metadata;
pub mod secret;
pub mod types;

pub use client::AdminClient;
