//! Canonical request model.
//!
//! One [`Request`] is built per inbound exchange by the active header
//! codec, read by application code, and discarded once the response for
//! that exchange has been sent. The struct is plain data; all decoding
//! normalization (header sanitizing, cookie flattening, query nesting,
//! attribute merging) happens before construction.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::headers::Headers;

/// Descriptor for one uploaded file, as reported by the host.
///
/// The file contents are not carried over the channel; `tmp_name` points
/// at the host-side temporary file holding them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUpload {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub error: u32,
    #[serde(rename = "tmpName")]
    pub tmp_name: String,
}

/// One entry in the upload tree: a single file, an ordered list of
/// entries, or a named nesting of entries.
///
/// The wire shape is untagged; an object carrying the full file-record
/// field set is a file, anything else nests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadEntry {
    File(FileUpload),
    List(Vec<UploadEntry>),
    Map(BTreeMap<String, UploadEntry>),
}

/// Immutable value representing one inbound exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Peer address as reported by the host, e.g. `"127.0.0.1"`.
    pub remote_addr: String,
    /// Protocol version string, e.g. `"HTTP/1.1"`.
    pub protocol: String,
    /// Request method, upper-case as received.
    pub method: String,
    /// Full request URI.
    pub uri: String,
    /// Sanitized header multimap, names case-sensitive as received.
    pub headers: Headers,
    /// Cookies, multi-values comma-joined into one string per name.
    pub cookies: BTreeMap<String, String>,
    /// Uploaded-file descriptor tree, keyed by form field name.
    pub uploads: BTreeMap<String, UploadEntry>,
    /// Request attributes; always contains [`Request::PARSED_BODY_ATTRIBUTE`].
    pub attributes: BTreeMap<String, Value>,
    /// Query parameters decoded from the raw query string.
    pub query: Map<String, Value>,
    /// Raw body bytes.
    pub body: Bytes,
    /// Whether the host already parsed the body on its side.
    pub parsed: bool,
}

impl Request {
    /// Reserved attribute recording whether the host parsed the body.
    ///
    /// Set before any codec-supplied attributes are merged, so those can
    /// never displace it.
    pub const PARSED_BODY_ATTRIBUTE: &'static str = "parsed-body";

    /// Decode the body as JSON when the host marked it parsed.
    ///
    /// Returns `Ok(None)` for unparsed bodies; a parsed-but-empty body
    /// was normalized to `{}` at decode time, so this yields an empty
    /// object rather than an error.
    pub fn parsed_body(&self) -> serde_json::Result<Option<Value>> {
        if !self.parsed {
            return Ok(None);
        }
        serde_json::from_slice(&self.body).map(Some)
    }
}
