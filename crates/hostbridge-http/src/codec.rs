//! Header codecs: JSON text and protobuf binary.
//!
//! The host picks one of two encodings for the header bytes it sends,
//! and expects response heads back in the same encoding. [`detect`]
//! makes the call once, on the first inbound header of a worker's life:
//! bytes that validate as JSON select [`Codec::Json`], anything else
//! falls back to [`Codec::Proto`] and is then properly validated by the
//! binary decoder. All other code is codec-blind and goes through the
//! [`HeaderCodec`] trait.

use std::collections::BTreeMap;

use bytes::Bytes;
use hostbridge_relay::Codec;
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HttpError, HttpResult};
use crate::headers::{Headers, sanitize_headers};
use crate::proto;
use crate::query::parse_query;
use crate::request::{Request, UploadEntry};

/// Decide the wire encoding from the first inbound header bytes.
///
/// Never rejects input: a header that fails JSON validation is assumed
/// binary, and the binary decoder reports it if it is garbage.
pub fn detect(header: &[u8]) -> Codec {
    if serde_json::from_slice::<serde::de::IgnoredAny>(header).is_ok() {
        Codec::Json
    } else {
        Codec::Proto
    }
}

/// Look up the implementation for a negotiated codec.
pub fn header_codec(codec: Codec) -> &'static dyn HeaderCodec {
    match codec {
        Codec::Json => &JsonCodec,
        Codec::Proto => &ProtoCodec,
    }
}

/// Encoding-specific view of request headers and response heads.
///
/// Both implementations produce the same canonical [`Request`] and
/// accept the same status/header inputs; only the byte-level shape
/// differs.
pub trait HeaderCodec {
    /// Decode inbound header bytes plus raw body into a [`Request`].
    fn decode_request(&self, header: &[u8], body: Bytes) -> HttpResult<Request>;

    /// Encode a response head (status + header multimap).
    fn encode_head(&self, status: u16, headers: &Headers) -> HttpResult<Vec<u8>>;

    /// Decode a response head produced by [`encode_head`].
    ///
    /// [`encode_head`]: HeaderCodec::encode_head
    fn decode_head(&self, head: &[u8]) -> HttpResult<(u16, Headers)>;
}

// ── Shared assembly ────────────────────────────────────────────────

/// Codec-independent intermediate: what either wire shape decodes into
/// before normalization.
struct RawRequest {
    remote_addr: String,
    protocol: String,
    method: String,
    uri: String,
    raw_query: String,
    parsed: bool,
    headers: Headers,
    cookies: BTreeMap<String, Vec<String>>,
    uploads: BTreeMap<String, UploadEntry>,
    attributes: BTreeMap<String, Value>,
}

/// Normalization pipeline shared by both codecs: sanitize headers,
/// flatten cookies, expand the query string, and seat the reserved
/// parsed-body attribute before any host-supplied attributes.
fn build_request(raw: RawRequest, body: Bytes) -> Request {
    let mut attributes = BTreeMap::new();
    attributes.insert(
        Request::PARSED_BODY_ATTRIBUTE.to_string(),
        Value::Bool(raw.parsed),
    );
    for (name, value) in raw.attributes {
        attributes.entry(name).or_insert(value);
    }

    Request {
        remote_addr: raw.remote_addr,
        protocol: raw.protocol,
        method: raw.method,
        uri: raw.uri,
        headers: sanitize_headers(raw.headers),
        cookies: raw
            .cookies
            .into_iter()
            .map(|(name, values)| (name, values.join(",")))
            .collect(),
        uploads: raw.uploads,
        attributes,
        query: parse_query(&raw.raw_query),
        body,
        parsed: raw.parsed,
    }
}

/// Decode the upload descriptor tree from its JSON form.
///
/// Hosts encode "no uploads" as either an absent value, `null`, or an
/// empty list, so all three collapse to an empty map.
fn decode_uploads(value: Value) -> HttpResult<BTreeMap<String, UploadEntry>> {
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| HttpError::MalformedPayload(format!("invalid uploads: {e}"))),
        other => Err(HttpError::MalformedPayload(format!(
            "invalid uploads: expected object, got {other}"
        ))),
    }
}

// ── JSON codec ─────────────────────────────────────────────────────

/// Text encoding: the header bytes are one JSON document.
pub struct JsonCodec;

/// A cookie value on the JSON wire: a single string or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(single) => vec![single],
            OneOrMany::Many(many) => many,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonRequest {
    #[serde(default)]
    remote_addr: String,
    #[serde(default)]
    protocol: String,
    #[serde(default)]
    method: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    raw_query: String,
    #[serde(default)]
    parsed: bool,
    #[serde(default)]
    headers: Headers,
    #[serde(default)]
    cookies: BTreeMap<String, OneOrMany>,
    #[serde(default)]
    uploads: Option<Value>,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonHead {
    status: u16,
    headers: Headers,
}

impl HeaderCodec for JsonCodec {
    fn decode_request(&self, header: &[u8], body: Bytes) -> HttpResult<Request> {
        let message: JsonRequest = serde_json::from_slice(header)
            .map_err(|e| HttpError::MalformedPayload(e.to_string()))?;

        let raw = RawRequest {
            remote_addr: message.remote_addr,
            protocol: message.protocol,
            method: message.method,
            uri: message.uri,
            raw_query: message.raw_query,
            parsed: message.parsed,
            headers: message.headers,
            cookies: message
                .cookies
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
            uploads: decode_uploads(message.uploads.unwrap_or(Value::Null))?,
            attributes: message.attributes,
        };
        Ok(build_request(raw, body))
    }

    fn encode_head(&self, status: u16, headers: &Headers) -> HttpResult<Vec<u8>> {
        // An empty header map must serialize as {}, which the map type
        // guarantees; hosts reject a bare [] here.
        let head = JsonHead {
            status,
            headers: headers.clone(),
        };
        serde_json::to_vec(&head).map_err(|e| HttpError::MalformedPayload(e.to_string()))
    }

    fn decode_head(&self, head: &[u8]) -> HttpResult<(u16, Headers)> {
        let decoded: JsonHead =
            serde_json::from_slice(head).map_err(|e| HttpError::MalformedPayload(e.to_string()))?;
        Ok((decoded.status, decoded.headers))
    }
}

// ── Binary codec ───────────────────────────────────────────────────

/// Binary encoding: the header bytes are a protobuf message.
pub struct ProtoCodec;

/// Collapse a wire value list to the attribute value it represents: a
/// lone element stays scalar, anything else becomes a list.
fn attribute_value(mut values: Vec<String>) -> Value {
    if values.len() == 1 {
        Value::String(values.remove(0))
    } else {
        Value::Array(values.into_iter().map(Value::String).collect())
    }
}

impl HeaderCodec for ProtoCodec {
    fn decode_request(&self, header: &[u8], body: Bytes) -> HttpResult<Request> {
        let message = proto::Request::decode(header)
            .map_err(|e| HttpError::MalformedPayload(e.to_string()))?;

        let uploads = if message.uploads.is_empty() {
            BTreeMap::new()
        } else {
            let value: Value = serde_json::from_str(&message.uploads)
                .map_err(|e| HttpError::MalformedPayload(format!("invalid uploads: {e}")))?;
            decode_uploads(value)?
        };

        // A host that already parsed the body sends it empty; represent
        // that as an empty structure so body parsing stays well-formed.
        let body = if message.parsed && body.is_empty() {
            Bytes::from_static(b"{}")
        } else {
            body
        };

        let raw = RawRequest {
            remote_addr: message.remote_addr,
            protocol: message.protocol,
            method: message.method,
            uri: message.uri,
            raw_query: message.raw_query,
            parsed: message.parsed,
            headers: message
                .header
                .into_iter()
                .map(|(name, value)| (name, value.value))
                .collect(),
            cookies: message
                .cookies
                .into_iter()
                .map(|(name, value)| (name, value.value))
                .collect(),
            uploads,
            attributes: message
                .attributes
                .into_iter()
                .map(|(name, value)| (name, attribute_value(value.value)))
                .collect(),
        };
        Ok(build_request(raw, body))
    }

    fn encode_head(&self, status: u16, headers: &Headers) -> HttpResult<Vec<u8>> {
        let head = proto::Response {
            status: i32::from(status),
            headers: headers
                .iter()
                .map(|(name, values)| (name.clone(), proto::HeaderValue::new(values.clone())))
                .collect(),
        };
        Ok(head.encode_to_vec())
    }

    fn decode_head(&self, head: &[u8]) -> HttpResult<(u16, Headers)> {
        let decoded = proto::Response::decode(head)
            .map_err(|e| HttpError::MalformedPayload(e.to_string()))?;
        let status = u16::try_from(decoded.status)
            .map_err(|_| HttpError::MalformedPayload(format!("status {} out of range", decoded.status)))?;
        let headers = decoded
            .headers
            .into_iter()
            .map(|(name, value)| (name, value.value))
            .collect();
        Ok((status, headers))
    }
}
