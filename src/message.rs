// Copyright (C) 2026
//
// This file is part of gelf-tracing.
//
// gelf-tracing is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// gelf-tracing is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with gelf-tracing.  If
// not, see <http://www.gnu.org/licenses/>.

//! The GELF message value.
//!
//! [`GelfMessage`] is an immutable-once-built value produced by
//! [`make_message`](crate::factory::make_message) and consumed by a
//! [`GelfSender`](crate::transport::GelfSender). The wire form is [GELF] 1.1 JSON: a fixed set of
//! core fields plus arbitrary additional fields, the latter prefixed with `_` on the wire so they
//! can never shadow a core field.
//!
//! [GELF]: https://go2docs.graylog.org/current/getting_in_log_data/gelf.html

use crate::level::Level;

use serde_json::{json, Map, Value};

use std::collections::BTreeMap;

/// The GELF schema version this crate emits.
pub const GELF_VERSION: &str = "1.1";

/// Upper bound on the `short_message` field, in characters.
///
/// Note that the truncation path below this bound keeps one character *fewer* (249). That
/// off-by-one is a wire contract inherited from the collectors this crate feeds; downstream
/// parsers key off the exact boundary, so it is preserved rather than corrected.
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 250;

/// Core attribute names that a provider-supplied additional field must never shadow.
pub const RESERVED_FIELDS: [&str; 7] = [
    "version",
    "host",
    "short_message",
    "full_message",
    "timestamp",
    "level",
    "facility",
];

/// One GELF message, ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct GelfMessage {
    host: Option<String>,
    short_message: String,
    full_message: String,
    timestamp_millis: i64,
    level: Level,
    facility: Option<String>,
    file: Option<String>,
    line: Option<String>,
    additional: BTreeMap<String, Value>,
}

impl GelfMessage {
    /// Assemble a message from the attributes every message carries. Host, facility & source
    /// location are filled in afterwards, when the configuration supplies them.
    pub fn new(
        short_message: String,
        full_message: String,
        timestamp_millis: i64,
        level: Level,
    ) -> GelfMessage {
        GelfMessage {
            host: None,
            short_message,
            full_message,
            timestamp_millis,
            level,
            facility: None,
            file: None,
            line: None,
            additional: BTreeMap::new(),
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, host: String) {
        self.host = Some(host);
    }

    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    pub fn full_message(&self) -> &str {
        &self.full_message
    }

    /// The original event timestamp, milliseconds since the epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    /// The wire timestamp: seconds since the epoch with millisecond fraction.
    pub fn timestamp(&self) -> f64 {
        self.timestamp_millis as f64 / 1000.0
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn facility(&self) -> Option<&str> {
        self.facility.as_deref()
    }

    pub fn set_facility(&mut self, facility: String) {
        self.facility = Some(facility);
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    pub fn set_source_location(&mut self, file: String, line: String) {
        self.file = Some(file);
        self.line = Some(line);
    }

    /// Add an additional field. Keys that would shadow a core attribute are silently dropped;
    /// everything a provider merges in goes through here, so the envelope stays well-formed no
    /// matter what the configuration carries.
    pub fn add_field(&mut self, key: &str, value: Value) {
        if RESERVED_FIELDS.contains(&key) {
            return;
        }
        self.additional.insert(key.to_string(), value);
    }

    /// Look up an additional field by its (unprefixed) key.
    pub fn additional_field(&self, key: &str) -> Option<&Value> {
        self.additional.get(key)
    }

    /// Render the GELF 1.1 JSON object. Additional fields are `_`-prefixed; `host` is omitted
    /// entirely when it could not be resolved, rather than sent as an empty string.
    pub fn to_wire_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("version".to_string(), json!(GELF_VERSION));
        if let Some(host) = &self.host {
            map.insert("host".to_string(), json!(host));
        }
        map.insert("short_message".to_string(), json!(self.short_message));
        map.insert("full_message".to_string(), json!(self.full_message));
        map.insert("timestamp".to_string(), json!(self.timestamp()));
        map.insert("level".to_string(), json!(self.level.code()));
        if let Some(facility) = &self.facility {
            map.insert("facility".to_string(), json!(facility));
        }
        if let Some(file) = &self.file {
            map.insert("file".to_string(), json!(file));
        }
        if let Some(line) = &self.line {
            map.insert("line".to_string(), json!(line));
        }
        for (key, value) in &self.additional {
            map.insert(format!("_{}", key), value.clone());
        }
        Value::Object(map)
    }

    /// The serialized wire form, sans any transport framing.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        self.to_wire_json().to_string().into_bytes()
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;

    fn message() -> GelfMessage {
        GelfMessage::new(
            "short".to_string(),
            "short but full".to_string(),
            1656000000123,
            Level::LOG_INFO,
        )
    }

    #[test]
    fn test_wire_shape() {
        let mut msg = message();
        msg.set_host("bree.local".to_string());
        msg.set_facility("gelf-test".to_string());
        msg.add_field("thread", json!("main"));

        let wire = msg.to_wire_json();
        assert_eq!(wire["version"], json!("1.1"));
        assert_eq!(wire["host"], json!("bree.local"));
        assert_eq!(wire["short_message"], json!("short"));
        assert_eq!(wire["full_message"], json!("short but full"));
        assert_eq!(wire["timestamp"], json!(1656000000.123));
        assert_eq!(wire["level"], json!(6));
        assert_eq!(wire["facility"], json!("gelf-test"));
        assert_eq!(wire["_thread"], json!("main"));
    }

    #[test]
    fn test_unresolved_host_is_omitted() {
        let wire = message().to_wire_json();
        assert!(wire.get("host").is_none());
        assert!(wire.get("file").is_none());
        assert!(wire.get("line").is_none());
    }

    #[test]
    fn test_reserved_fields_are_dropped() {
        let mut msg = message();
        for key in RESERVED_FIELDS {
            msg.add_field(key, json!("shadow"));
        }
        msg.add_field("allowed", json!("kept"));

        let wire = msg.to_wire_json();
        assert_eq!(wire["version"], json!("1.1"));
        assert_eq!(wire["level"], json!(6));
        assert_eq!(wire["_allowed"], json!("kept"));
        for key in RESERVED_FIELDS {
            assert!(msg.additional_field(key).is_none());
            assert!(wire.get(format!("_{}", key)).is_none());
        }
    }

    #[test]
    fn test_numeric_additional_fields_survive() {
        let mut msg = message();
        msg.add_field("attempt", json!(3));
        assert_eq!(msg.to_wire_json()["_attempt"], json!(3));
    }
}
