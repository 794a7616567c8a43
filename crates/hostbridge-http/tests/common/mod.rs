//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use hostbridge_http::proto;
use prost::Message;
use serde_json::{Value, json};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub const RAW_QUERY: &str = "first=value&arr[]=foo+bar&arr[]=baz";

/// JSON request header with the baseline fields, merged with `extra`.
pub fn json_request_header(extra: Value) -> Vec<u8> {
    let mut base = json!({
        "remoteAddr": "127.0.0.1",
        "protocol": "HTTP/1.1",
        "method": "GET",
        "uri": "http://localhost",
        "rawQuery": RAW_QUERY,
        "parsed": false,
    });
    if let (Value::Object(base_map), Value::Object(extra_map)) = (&mut base, extra) {
        for (key, value) in extra_map {
            base_map.insert(key, value);
        }
    }
    serde_json::to_vec(&base).expect("fixture serializes")
}

/// Binary request header with the baseline fields, customized in place.
pub fn proto_request_header(customize: impl FnOnce(&mut proto::Request)) -> Vec<u8> {
    let mut message = proto::Request {
        remote_addr: "127.0.0.1".to_string(),
        protocol: "HTTP/1.1".to_string(),
        method: "GET".to_string(),
        uri: "http://localhost".to_string(),
        raw_query: RAW_QUERY.to_string(),
        ..Default::default()
    };
    customize(&mut message);
    message.encode_to_vec()
}

pub fn header_value(values: &[&str]) -> proto::HeaderValue {
    proto::HeaderValue::new(values.iter().map(|v| v.to_string()).collect())
}
