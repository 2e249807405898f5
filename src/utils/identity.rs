//! Caller fingerprinting
//!
//! A weak pseudo-account key: SHA-1 over a canonical rendering of the
//! caller's request metadata. It is deterministic and spoofable, and only
//! groups links created from the same client.
//!
//! The canonical form is sorted-key JSON with `", "` / `": "` separators
//! and non-ASCII escaped as `\uXXXX`, e.g. `{"sourceIp": "1.2.3.4"}`.

use std::collections::BTreeMap;
use std::io;

use actix_web::HttpRequest;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;
use sha1::{Digest, Sha1};
use tracing::warn;

use super::ip::extract_client_ip;

pub const SOURCE_IP: &str = "sourceIp";
pub const USER_AGENT: &str = "userAgent";

/// Attribute map describing who made a request. Absent values are kept
/// so callers can record "known to be missing", but never hashed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerMetadata {
    attributes: BTreeMap<String, Option<Value>>,
}

impl CallerMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.attributes.insert(key.into(), value);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert(key, value.map(Into::into));
        self
    }

    pub fn from_request(req: &HttpRequest, trusted_proxies: &[String]) -> Self {
        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(String::from);

        Self::new()
            .with(SOURCE_IP, extract_client_ip(req, trusted_proxies))
            .with(USER_AGENT, user_agent)
    }

    /// Null/absent entries dropped, keys sorted.
    pub fn canonical_json(&self) -> String {
        let present: BTreeMap<&str, &Value> = self
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .filter(|v| !v.is_null())
                    .map(|v| (key.as_str(), v))
            })
            .collect();

        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
        if let Err(e) = present.serialize(&mut ser) {
            warn!("Failed to serialize caller metadata: {}", e);
        }
        // 输出只含 ASCII
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn identity_hash(&self) -> String {
        hash_identity(&self.canonical_json())
    }
}

/// 160-bit SHA-1 of the canonical bytes, lowercase hex
pub fn hash_identity(canonical: &str) -> String {
    hex::encode(Sha1::digest(canonical.as_bytes()))
}

/// `", "` / `": "` separators, everything outside printable ASCII as `\uXXXX`
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for c in fragment.chars() {
            if matches!(c, ' '..='~') {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
