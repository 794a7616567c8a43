//! Wire messages for the binary header codec.
//!
//! Hand-maintained prost mirror of the host's protobuf schema. The
//! message set is small and changes with the host protocol version, so
//! the definitions are kept in-tree instead of being generated at build
//! time; field numbers must match the host exactly.

use std::collections::BTreeMap;

/// Ordered list of values for one header, cookie, or attribute name.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HeaderValue {
    #[prost(string, repeated, tag = "1")]
    pub value: Vec<String>,
}

impl HeaderValue {
    pub fn new(value: Vec<String>) -> Self {
        Self { value }
    }
}

/// Inbound request context, carried in a frame's header bytes.
///
/// `uploads` is a JSON side-channel: the host serializes the upload
/// descriptor tree to JSON rather than modelling its recursion in the
/// schema.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Request {
    #[prost(string, tag = "1")]
    pub remote_addr: String,
    #[prost(string, tag = "2")]
    pub protocol: String,
    #[prost(string, tag = "3")]
    pub method: String,
    #[prost(string, tag = "4")]
    pub uri: String,
    #[prost(btree_map = "string, message", tag = "5")]
    pub header: BTreeMap<String, HeaderValue>,
    #[prost(btree_map = "string, message", tag = "6")]
    pub cookies: BTreeMap<String, HeaderValue>,
    #[prost(string, tag = "7")]
    pub raw_query: String,
    #[prost(bool, tag = "8")]
    pub parsed: bool,
    #[prost(string, tag = "9")]
    pub uploads: String,
    #[prost(btree_map = "string, message", tag = "10")]
    pub attributes: BTreeMap<String, HeaderValue>,
}

/// Outbound response head, carried in a frame's header bytes.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Response {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(btree_map = "string, message", tag = "2")]
    pub headers: BTreeMap<String, HeaderValue>,
}
