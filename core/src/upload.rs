//! Upload payload framing for the Base64 text endpoint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};

/// Caption, keywords and visibility shared by both upload modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub caption: Option<String>,
    pub keywords: Option<String>,
    pub hidden: bool,
}

/// Form fields carrying the file contents for a text-mode upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedUpload {
    pub data: String,
    pub byte_count: usize,
    pub md5_sum: String,
}

impl EncodedUpload {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            byte_count: bytes.len(),
            md5_sum: md5_hex(bytes),
        }
    }
}

/// Lowercase hex MD5 digest.
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}
