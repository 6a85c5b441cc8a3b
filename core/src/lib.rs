//! Blocking client for the SmugMug 1.2.x JSON API.
//!
//! # Overview
//! A remote method is described once as a [`MethodDescriptor`] (wire name plus
//! ordered argument names). A [`MethodInvoker`] binds a descriptor to a shared
//! [`Transport`], sends one form-encoded request per call and returns the body
//! verbatim. [`Response`] parses the common `stat` envelope and, on success,
//! the method's typed payload through the tolerant [`EntityReader`].
//!
//! # Design
//! - API versions are data: [`VersionProfile`] derives each version's
//!   descriptors from 1.2.0 plus argument deltas. The typed entry points in
//!   [`v1_2_0`] and [`v1_2_1`] share one [`Core`] and differ only in shape.
//! - Three failure kinds, never conflated: argument-count violations, network
//!   faults and malformed responses (see [`ApiError`]). A service-reported
//!   failure is a normal [`Response`] with `is_error()` set.
//! - The transport is owned by the application and injected; there is no
//!   global client and no session state in the library.

pub mod args;
pub mod config;
pub mod decode;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod http;
pub mod invoker;
pub mod payloads;
pub mod types;
pub mod upload;
pub mod versions;

pub use args::{ArgValue, Arguments};
pub use config::{ClientConfig, Endpoints};
pub use decode::{Entity, EntityReader, Field};
pub use descriptor::MethodDescriptor;
pub use envelope::{Envelope, Payload, Response};
pub use error::{ApiError, FormatError, HttpStatusError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use invoker::{MethodInvoker, DEFAULT_USER_AGENT};
pub use upload::UploadOptions;
pub use versions::{v1_2_0, v1_2_1, ApiVersion, Core, Method, VersionProfile};
