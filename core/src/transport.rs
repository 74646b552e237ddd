//! Executing `HttpRequest`s.
//!
//! # Design
//! `Transport` is the single seam between the pure core and the network.
//! `UreqTransport` disables ureq's status-code-as-error behavior so 4xx/5xx
//! responses come back as data and the core keeps ownership of status
//! interpretation. Closures implement `Transport` too, which is how tests
//! stub the network.

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}

#[cfg(feature = "blocking")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "blocking")]
mod ureq_transport {
    use super::Transport;
    use crate::error::{ApiError, Result};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Use a preconfigured agent (proxies, timeouts, TLS). The agent
        /// must not turn HTTP status codes into errors.
        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            let HttpRequest {
                method,
                path,
                headers,
                body,
            } = request;

            let agent = &self.agent;
            let result = match (method, body) {
                (HttpMethod::Get, _) => with_headers(agent.get(&path), &headers).call(),
                (HttpMethod::Delete, _) => with_headers(agent.delete(&path), &headers).call(),
                (HttpMethod::Post, Some(body)) => {
                    with_headers(agent.post(&path), &headers).send(body.as_bytes())
                }
                (HttpMethod::Post, None) => with_headers(agent.post(&path), &headers).send_empty(),
                (HttpMethod::Put, Some(body)) => {
                    with_headers(agent.put(&path), &headers).send(body.as_bytes())
                }
                (HttpMethod::Put, None) => with_headers(agent.put(&path), &headers).send_empty(),
            };
            let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_vec()
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}
