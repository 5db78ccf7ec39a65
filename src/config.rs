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

//! Provider configuration.
//!
//! [`GelfConfig`] supplies policy to both halves of the crate: the message factory reads the
//! origin host, facility, static fields, the three enrichment flags and the extended-field
//! transform hook; the [`Dispatcher`](crate::dispatcher::Dispatcher) reads the transport targets.
//! Build one through [`GelfConfigBuilder`]; the defaults interoperate with a stock Graylog
//! install (UDP port 12201, location capture on, everything else off).

use crate::error::{Error, Result};
use crate::sink::ErrorSink;

use backtrace::Backtrace;
use serde_json::Value;

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// The port Graylog collectors conventionally listen on.
pub const DEFAULT_GRAYLOG_PORT: u16 = 12201;

/// Static-field key treated as a host override instead of an additional field.
pub(crate) const ORIGIN_HOST_KEY: &str = "originHost";

/// Hook applied to every context-mapping entry before it becomes an additional field. The
/// default renders the raw value as a JSON string; embedders may substitute numeric or
/// structured renderings per key.
pub type FieldTransform = Box<dyn Fn(&str, &str) -> Value + Send + Sync>;

pub struct GelfConfig {
    graylog_host: Option<String>,
    graylog_port: u16,
    amqp_uri: Option<String>,
    amqp_exchange_name: Option<String>,
    amqp_routing_key: Option<String>,
    amqp_max_retries: u32,
    facility: Option<String>,
    origin_host: Option<String>,
    fields: BTreeMap<String, String>,
    extract_stacktrace: bool,
    include_location: bool,
    add_extended_information: bool,
    transform: FieldTransform,
}

impl std::default::Default for GelfConfig {
    fn default() -> Self {
        GelfConfig {
            graylog_host: None,
            graylog_port: DEFAULT_GRAYLOG_PORT,
            amqp_uri: None,
            amqp_exchange_name: None,
            amqp_routing_key: None,
            amqp_max_retries: 0,
            facility: None,
            origin_host: None,
            fields: BTreeMap::new(),
            extract_stacktrace: false,
            include_location: true,
            add_extended_information: false,
            transform: Box::new(|_key, value| Value::String(value.to_string())),
        }
    }
}

impl GelfConfig {
    pub fn builder() -> GelfConfigBuilder {
        GelfConfigBuilder {
            imp: GelfConfig::default(),
        }
    }

    /// The collector target, optionally `tcp:`/`udp:`-prefixed.
    pub fn graylog_host(&self) -> Option<&str> {
        self.graylog_host.as_deref()
    }

    pub fn graylog_port(&self) -> u16 {
        self.graylog_port
    }

    pub fn amqp_uri(&self) -> Option<&str> {
        self.amqp_uri.as_deref()
    }

    pub fn amqp_exchange_name(&self) -> Option<&str> {
        self.amqp_exchange_name.as_deref()
    }

    pub fn amqp_routing_key(&self) -> Option<&str> {
        self.amqp_routing_key.as_deref()
    }

    pub fn amqp_max_retries(&self) -> u32 {
        self.amqp_max_retries
    }

    pub fn facility(&self) -> Option<&str> {
        self.facility.as_deref()
    }

    /// The explicit origin host, when one was configured. Absent one, the factory falls back to
    /// [`default_origin_host`].
    pub fn origin_host(&self) -> Option<&str> {
        self.origin_host.as_deref()
    }

    /// Static fields merged into every message.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn extract_stacktrace(&self) -> bool {
        self.extract_stacktrace
    }

    pub fn include_location(&self) -> bool {
        self.include_location
    }

    pub fn add_extended_information(&self) -> bool {
        self.add_extended_information
    }

    pub fn transform_extended_field(&self, key: &str, value: &str) -> Value {
        (self.transform)(key, value)
    }
}

pub struct GelfConfigBuilder {
    imp: GelfConfig,
}

impl GelfConfigBuilder {
    pub fn graylog_host(mut self, host: String) -> Self {
        self.imp.graylog_host = Some(host);
        self
    }

    pub fn graylog_port(mut self, port: u16) -> Self {
        self.imp.graylog_port = port;
        self
    }

    pub fn amqp_uri(mut self, uri: String) -> Self {
        self.imp.amqp_uri = Some(uri);
        self
    }

    pub fn amqp_exchange_name(mut self, exchange: String) -> Self {
        self.imp.amqp_exchange_name = Some(exchange);
        self
    }

    pub fn amqp_routing_key(mut self, routing_key: String) -> Self {
        self.imp.amqp_routing_key = Some(routing_key);
        self
    }

    pub fn amqp_max_retries(mut self, max_retries: u32) -> Self {
        self.imp.amqp_max_retries = max_retries;
        self
    }

    pub fn facility(mut self, facility: String) -> Self {
        self.imp.facility = Some(facility);
        self
    }

    pub fn origin_host(mut self, origin_host: String) -> Self {
        self.imp.origin_host = Some(origin_host);
        self
    }

    pub fn field(mut self, key: String, value: String) -> Self {
        self.imp.fields.insert(key, value);
        self
    }

    /// Merge static fields from a JSON-ish object string. Single-quoted keys & values are
    /// accepted and normalized to double quotes before parsing, e.g.
    /// `{'environment': 'staging'}`.
    pub fn additional_fields_json(mut self, json: &str) -> Result<Self> {
        let fields: BTreeMap<String, String> = serde_json::from_str(&json.replace('\'', "\""))
            .map_err(|err| Error::BadFieldsJson {
                source: err,
                back: Backtrace::new(),
            })?;
        self.imp.fields.extend(fields);
        Ok(self)
    }

    pub fn extract_stacktrace(mut self, extract: bool) -> Self {
        self.imp.extract_stacktrace = extract;
        self
    }

    pub fn include_location(mut self, include: bool) -> Self {
        self.imp.include_location = include;
        self
    }

    pub fn add_extended_information(mut self, add: bool) -> Self {
        self.imp.add_extended_information = add;
        self
    }

    pub fn transform_extended_fields(mut self, transform: FieldTransform) -> Self {
        self.imp.transform = transform;
        self
    }

    pub fn build(self) -> GelfConfig {
        self.imp
    }
}

static DEFAULT_ORIGIN_HOST: OnceLock<Option<String>> = OnceLock::new();

/// The lazily-resolved local hostname, cached process-wide on first resolution: host identity
/// does not change during a process lifetime, so every configuration shares one value.
///
/// Resolution first asks the OS for the hostname, then falls back to the local IP address. If
/// both fail the failure is reported to `sink` and the cached value is `None`; messages then go
/// out without a host rather than not at all.
pub(crate) fn default_origin_host(sink: &dyn ErrorSink) -> Option<String> {
    DEFAULT_ORIGIN_HOST
        .get_or_init(|| match hostname::get() {
            Ok(name) => Some(name.to_string_lossy().into_owned()),
            Err(err) => match local_ip_address::local_ip() {
                Ok(ip) => Some(ip.to_string()),
                Err(_) => {
                    let err = Error::NoHostname {
                        source: Box::new(err),
                        back: Backtrace::new(),
                    };
                    sink.error("unknown local hostname", Some(&err));
                    None
                }
            },
        })
        .clone()
}

#[cfg(test)]
mod config_tests {
    use super::*;

    use crate::sink::test_support::RecordingSink;

    #[test]
    fn test_defaults() {
        let config = GelfConfig::builder().build();
        assert_eq!(config.graylog_port(), 12201);
        assert!(config.include_location());
        assert!(!config.extract_stacktrace());
        assert!(!config.add_extended_information());
        assert!(config.graylog_host().is_none());
        assert!(config.amqp_uri().is_none());
        assert!(config.fields().is_empty());
    }

    #[test]
    fn test_single_quoted_fields_are_normalized() {
        let config = GelfConfig::builder()
            .additional_fields_json("{'environment': 'staging', 'tier': 'web'}")
            .unwrap()
            .build();
        assert_eq!(
            config.fields().get("environment").map(String::as_str),
            Some("staging")
        );
        assert_eq!(config.fields().get("tier").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_malformed_fields_json() {
        assert!(GelfConfig::builder()
            .additional_fields_json("not json at all")
            .is_err());
    }

    #[test]
    fn test_default_transform_stringifies() {
        let config = GelfConfig::builder().build();
        assert_eq!(
            config.transform_extended_field("foo", "200"),
            Value::String("200".to_string())
        );
    }

    #[test]
    fn test_default_origin_host_is_stable() {
        let sink = RecordingSink::default();
        let first = default_origin_host(&sink);
        let second = default_origin_host(&sink);
        assert_eq!(first, second);
        // Hostname resolution succeeds on any sane build host, so nothing lands in the sink.
        assert_eq!(sink.count(), 0);
    }
}
