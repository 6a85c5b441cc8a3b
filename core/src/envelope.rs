//! The response wrapper shared by every remote method.
//!
//! # Design
//! Every body is JSON with a top-level `stat` discriminant: `"ok"` carries a
//! method-specific payload next to it, `"fail"` carries `code` and `message`.
//! `Response<P>` parses the envelope once and only asks the payload type to
//! decode itself when the envelope reports success, so a failed response never
//! has partially populated data.

use std::fmt;

use serde_json::Value;

use crate::decode::EntityReader;
use crate::error::{ApiError, FormatError};

/// Parsed top-level status of one response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    pub is_error: bool,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    /// Method name echoed back by the service, when present.
    pub method: Option<String>,
    pub raw_text: String,
}

impl Envelope {
    /// Parse `raw_text`, returning the envelope and, on success, the
    /// top-level JSON value for payload decoding.
    ///
    /// Empty (or all-whitespace) text is a vacuous success with no payload.
    pub fn parse(raw_text: impl Into<String>) -> Result<(Envelope, Option<Value>), FormatError> {
        let raw_text = raw_text.into();
        if raw_text.trim().is_empty() {
            return Ok((
                Envelope {
                    raw_text,
                    ..Envelope::default()
                },
                None,
            ));
        }

        let root: Value = serde_json::from_str(&raw_text)?;
        if !root.is_object() {
            return Err(FormatError::NotAnObject);
        }

        let reader = EntityReader::new("Envelope", Some(&root));
        let stat = reader.string("stat").ok_or(FormatError::MissingStatus)?;
        let method = reader.string("method");

        match stat.as_str() {
            "ok" => Ok((
                Envelope {
                    method,
                    raw_text,
                    ..Envelope::default()
                },
                Some(root),
            )),
            "fail" => {
                let envelope = Envelope {
                    is_error: true,
                    error_code: reader.int("code"),
                    error_message: reader.string("message"),
                    method,
                    raw_text,
                };
                Ok((envelope, None))
            }
            _ => Err(FormatError::UnknownStatus(stat)),
        }
    }
}

/// Method-specific data carried by a successful response.
///
/// `Default` is the empty payload used for failed and vacuous responses.
pub trait Payload: Default {
    /// Decode from the top-level response object.
    fn decode(root: &EntityReader<'_>) -> Self;

    /// Named entity counts shown in the response summary.
    fn counts(&self) -> Vec<(&'static str, usize)> {
        Vec::new()
    }
}

impl Payload for () {
    fn decode(_root: &EntityReader<'_>) -> Self {}
}

/// A parsed response: envelope plus typed payload.
#[derive(Debug, Clone)]
pub struct Response<P> {
    pub envelope: Envelope,
    pub payload: P,
}

impl<P: Payload> Response<P> {
    pub fn parse(raw_text: impl Into<String>) -> Result<Self, ApiError> {
        let (envelope, root) = Envelope::parse(raw_text)?;
        let payload = match &root {
            Some(root) if !envelope.is_error => P::decode(&EntityReader::new("Response", Some(root))),
            _ => P::default(),
        };
        Ok(Self { envelope, payload })
    }

    pub fn is_error(&self) -> bool {
        self.envelope.is_error
    }

    pub fn error_code(&self) -> Option<i64> {
        self.envelope.error_code
    }

    pub fn error_message(&self) -> Option<&str> {
        self.envelope.error_message.as_deref()
    }

    pub fn raw_text(&self) -> &str {
        &self.envelope.raw_text
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    /// One-line description: error flag, error code and entity counts.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl<P: Payload> fmt::Display for Response<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response[error={}, code=", self.envelope.is_error)?;
        match self.envelope.error_code {
            Some(code) => write!(f, "{code}")?,
            None => write!(f, "-")?,
        }
        for (name, count) in self.payload.counts() {
            write!(f, ", {name}={count}")?;
        }
        write!(f, "]")
    }
}
