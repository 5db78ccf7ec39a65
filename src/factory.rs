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

//! GELF message construction.
//!
//! [`make_message`] is a pure function from one [`LogEvent`] plus one [`GelfConfig`] to one
//! [`GelfMessage`]; its only side effect is reading (and, on first use, populating) the
//! process-wide origin-host cache. It never fails: the one fallible step, hostname resolution,
//! degrades to a report on the sink and a message without a host.

use crate::config::{default_origin_host, GelfConfig, ORIGIN_HOST_KEY};
use crate::event::LogEvent;
use crate::message::{GelfMessage, MAX_SHORT_MESSAGE_LENGTH};
use crate::sink::ErrorSink;

use chrono::Utc;
use serde_json::Value;

const THREAD_NAME_KEY: &str = "thread";
const LOGGER_NAME_KEY: &str = "logger";
const LOGGER_NDC_KEY: &str = "loggerNdc";
const TIMESTAMP_MS_KEY: &str = "timestampMs";

/// Turn one log event plus configuration into a well-formed GELF message.
pub fn make_message(event: &LogEvent, config: &GelfConfig, sink: &dyn ErrorSink) -> GelfMessage {
    let timestamp_millis = match event.timestamp_millis() {
        Some(millis) if millis != 0 => millis,
        _ => Utc::now().timestamp_millis(),
    };

    let mut rendered = event.message().unwrap_or("").to_string();

    if config.extract_stacktrace() {
        if let Some(trace) = event.error_trace() {
            // "\n\r", not "\r\n": the exact byte sequence collectors parsing these
            // messages split on.
            rendered.push_str("\n\r");
            rendered.push_str(trace);
        }
    }

    let short_message: String = if rendered.chars().count() > MAX_SHORT_MESSAGE_LENGTH {
        // One short of the limit, not the limit itself; see MAX_SHORT_MESSAGE_LENGTH.
        rendered.chars().take(MAX_SHORT_MESSAGE_LENGTH - 1).collect()
    } else {
        rendered.clone()
    };

    let mut message = GelfMessage::new(short_message, rendered, timestamp_millis, event.level());

    if config.include_location() {
        if let Some((file, line)) = event.source_location() {
            message.set_source_location(file.to_string(), line.to_string());
        }
    }

    if let Some(host) = config.origin_host() {
        message.set_host(host.to_string());
    }

    if let Some(facility) = config.facility() {
        message.set_facility(facility.to_string());
    }

    for (key, value) in config.fields() {
        if key == ORIGIN_HOST_KEY && message.host().is_none() {
            message.set_host(value.clone());
        } else {
            message.add_field(key, Value::String(value.clone()));
        }
    }

    if config.add_extended_information() {
        message.add_field(
            THREAD_NAME_KEY,
            Value::String(event.thread_name().to_string()),
        );
        message.add_field(
            LOGGER_NAME_KEY,
            Value::String(event.logger_name().to_string()),
        );
        // The raw millisecond timestamp rides along as an additional field, independent of the
        // second-resolution core timestamp.
        message.add_field(
            TIMESTAMP_MS_KEY,
            Value::String(timestamp_millis.to_string()),
        );

        for (key, value) in event.context() {
            message.add_field(key, config.transform_extended_field(key, value));
        }

        if !event.context_stack().is_empty() {
            message.add_field(
                LOGGER_NDC_KEY,
                Value::String(event.context_stack().join(" ")),
            );
        }
    }

    if message.host().is_none() {
        if let Some(host) = default_origin_host(sink) {
            message.set_host(host);
        }
    }

    message
}
