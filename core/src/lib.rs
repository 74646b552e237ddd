//! Synchronous client for a digital-wallet pass-management REST API.
//!
//! # Overview
//! Covers passes (with their tags and locations), projects and templates.
//! `WalletClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern);
//! `BlockingClient` runs each operation as exactly one blocking round-trip
//! through a `Transport`.
//!
//! # Design
//! - `WalletClient` is stateless: base URL, authorization and API revision.
//! - Each operation is split into `build_*` (validates arguments, produces the
//!   request) and `parse_*` (consumes the response), so the I/O boundary is
//!   explicit and every operation can be tested without a server.
//! - Response records mirror whatever the server returned; identifiers,
//!   flags and timestamps are coerced leniently (see `coerce`).
//!
//! ```no_run
//! use wallet_core::{BlockingClient, Page, WalletClient};
//!
//! let client = BlockingClient::new(
//!     WalletClient::new("https://wallet-api.urbanairship.com/v1")
//!         .with_credentials("acme", "api-key"),
//! );
//! for pass in client.list_passes(Page::default())? {
//!     println!("{:?} {:?}", pass.id, pass.url);
//! }
//! # Ok::<(), wallet_core::ApiError>(())
//! ```

pub mod blocking;
pub mod client;
pub mod coerce;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use blocking::BlockingClient;
pub use client::WalletClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use types::{
    AttachedLocation, Location, NewProject, NewTemplate, Page, Pass, Project, ProjectUpdate,
    ResourceId, Tag, Template, TemplateHeader, TemplateUpdate,
};
