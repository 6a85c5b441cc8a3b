//! Binds a method descriptor to a transport and executes it.
//!
//! # Design
//! `MethodInvoker` is the only place that turns positional argument values
//! into an HTTP request and the only place that talks to the transport.
//! Request building (`build_*`) is separated from execution so the wire shape
//! can be checked without I/O. Every API version reuses it unchanged; only
//! the descriptor it is handed differs.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use url::form_urlencoded;

use crate::descriptor::MethodDescriptor;
use crate::envelope::{Payload, Response};
use crate::error::{ApiError, HttpStatusError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Identifies this library on every outbound request.
pub const DEFAULT_USER_AGENT: &str = concat!("smugmug-core/", env!("CARGO_PKG_VERSION"));

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// Executes one remote method against a shared transport.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct MethodInvoker {
    descriptor: MethodDescriptor,
    transport: Arc<dyn Transport>,
    user_agent: String,
}

impl std::fmt::Debug for MethodInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodInvoker")
            .field("descriptor", &self.descriptor)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl MethodInvoker {
    pub fn new(descriptor: MethodDescriptor, transport: Arc<dyn Transport>) -> Self {
        Self {
            descriptor,
            transport,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Form-encoded POST carrying `method` and every present argument.
    pub fn build_request(&self, server_url: &str, values: &[Option<String>]) -> Result<HttpRequest, ApiError> {
        let form = self.encode_pairs(values)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: server_url.to_string(),
            headers: vec![
                ("User-Agent".to_string(), self.user_agent.clone()),
                ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(form.into_bytes()),
        })
    }

    /// PUT of raw bytes; `method` and the arguments travel in the query string.
    pub fn build_binary_request(
        &self,
        server_url: &str,
        values: &[Option<String>],
        body: Vec<u8>,
    ) -> Result<HttpRequest, ApiError> {
        let query = self.encode_pairs(values)?;
        let separator = if server_url.contains('?') { '&' } else { '?' };
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: format!("{server_url}{separator}{query}"),
            headers: vec![
                ("User-Agent".to_string(), self.user_agent.clone()),
                ("Content-Type".to_string(), BINARY_CONTENT_TYPE.to_string()),
            ],
            body: Some(body),
        })
    }

    /// Run the method and return the response body verbatim.
    pub fn execute(&self, server_url: &str, values: &[Option<String>]) -> Result<String, ApiError> {
        let request = self.build_request(server_url, values)?;
        self.send(&request)
    }

    /// Run the method with a raw byte body and return the response body verbatim.
    pub fn execute_binary(&self, server_url: &str, values: &[Option<String>], body: Vec<u8>) -> Result<String, ApiError> {
        let request = self.build_binary_request(server_url, values, body)?;
        self.send(&request)
    }

    /// `execute` followed by envelope and payload parsing.
    pub fn invoke<P: Payload>(&self, server_url: &str, values: &[Option<String>]) -> Result<Response<P>, ApiError> {
        Response::parse(self.execute(server_url, values)?)
    }

    pub fn invoke_binary<P: Payload>(
        &self,
        server_url: &str,
        values: &[Option<String>],
        body: Vec<u8>,
    ) -> Result<Response<P>, ApiError> {
        Response::parse(self.execute_binary(server_url, values, body)?)
    }

    fn encode_pairs(&self, values: &[Option<String>]) -> Result<String, ApiError> {
        if values.len() != self.descriptor.arity() {
            return Err(ApiError::ArgumentCount {
                method: self.descriptor.name().to_string(),
                expected: self.descriptor.arity(),
                actual: values.len(),
            });
        }
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("method", self.descriptor.name());
        for (name, value) in self.descriptor.argument_names().iter().zip(values) {
            if let Some(value) = value {
                form.append_pair(name, value);
            }
        }
        Ok(form.finish())
    }

    fn send(&self, request: &HttpRequest) -> Result<String, ApiError> {
        let start = Instant::now();
        let response = self.transport.send(request).map_err(ApiError::Network)?;
        debug!(
            method = self.descriptor.name(),
            url = %request.url,
            status = response.status,
            arguments = self.descriptor.arity(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "remote method executed"
        );
        check_status(response)
    }
}

/// Map a non-2xx status to a network error; otherwise hand back the body.
fn check_status(response: HttpResponse) -> Result<String, ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(response.body);
    }
    Err(ApiError::Network(Box::new(HttpStatusError {
        status: response.status,
        body: response.body,
    })))
}
