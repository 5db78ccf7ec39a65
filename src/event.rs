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

//! The log event view consumed by message construction.
//!
//! [`LogEvent`] is a read-only bundle of everything one log occurrence carries: severity, message
//! text, an optional pre-rendered error trace, timestamp, logger & thread names, source location,
//! and the thread-scoped diagnostic context (a key/value mapping plus an ordered nesting stack).
//! The [`Layer`](crate::layer::GelfLayer) captures `tracing` events into this type; embedders with
//! their own event source can assemble one through [`LogEventBuilder`] instead.

use crate::level::Level;

use std::collections::BTreeMap;

/// One log occurrence, as seen by [`make_message`](crate::factory::make_message).
#[derive(Clone, Debug)]
pub struct LogEvent {
    level: Level,
    message: Option<String>,
    error_trace: Option<String>,
    timestamp_millis: Option<i64>,
    logger_name: String,
    thread_name: String,
    source_location: Option<(String, u32)>,
    context: BTreeMap<String, String>,
    context_stack: Vec<String>,
}

impl LogEvent {
    pub fn builder(level: Level) -> LogEventBuilder {
        LogEventBuilder {
            imp: LogEvent {
                level,
                message: None,
                error_trace: None,
                timestamp_millis: None,
                logger_name: String::new(),
                thread_name: String::new(),
                source_location: None,
                context: BTreeMap::new(),
                context_stack: Vec::new(),
            },
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The rendered message text; absent messages are treated as empty downstream.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The thrown error, pre-rendered as multi-line stack text (outermost error first, nested
    /// causes following).
    pub fn error_trace(&self) -> Option<&str> {
        self.error_trace.as_deref()
    }

    /// Milliseconds since the epoch; `None` or `0` means the framework could not supply one and
    /// the builder substitutes the wall clock.
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.timestamp_millis
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn source_location(&self) -> Option<(&str, u32)> {
        self.source_location
            .as_ref()
            .map(|(file, line)| (file.as_str(), *line))
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn context_stack(&self) -> &[String] {
        &self.context_stack
    }
}

pub struct LogEventBuilder {
    imp: LogEvent,
}

impl LogEventBuilder {
    pub fn message(mut self, message: String) -> Self {
        self.imp.message = Some(message);
        self
    }

    pub fn error_trace(mut self, trace: String) -> Self {
        self.imp.error_trace = Some(trace);
        self
    }

    pub fn timestamp_millis(mut self, millis: i64) -> Self {
        self.imp.timestamp_millis = Some(millis);
        self
    }

    pub fn logger_name(mut self, name: String) -> Self {
        self.imp.logger_name = name;
        self
    }

    pub fn thread_name(mut self, name: String) -> Self {
        self.imp.thread_name = name;
        self
    }

    pub fn source_location(mut self, file: String, line: u32) -> Self {
        self.imp.source_location = Some((file, line));
        self
    }

    pub fn context_entry(mut self, key: String, value: String) -> Self {
        self.imp.context.insert(key, value);
        self
    }

    pub fn context_stack(mut self, stack: Vec<String>) -> Self {
        self.imp.context_stack = stack;
        self
    }

    pub fn build(self) -> LogEvent {
        self.imp
    }
}

/// Collects the fields of one `tracing` [`Event`] into the pieces a [`LogEvent`] needs.
///
/// [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
#[derive(Default)]
pub(crate) struct EventVisitor {
    pub(crate) message: Option<String>,
    pub(crate) error_trace: Option<String>,
    pub(crate) context: BTreeMap<String, String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.context.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_error(
        &mut self,
        field: &tracing::field::Field,
        value: &(dyn std::error::Error + 'static),
    ) {
        self.error_trace = Some(render_error_chain(value));
        self.context
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            // Regrettably, we have only a `Debug` implementation available to us; but the tracing
            // macros `info!()`, `event!()` & the like all take care to "pre-format" the `message`
            // field so that `value` actually refers to a `std::fmt::Arguments` instance, which
            // will print to a debug format without enclosing double-quotes.
            self.message = Some(format!("{:?}", value));
        } else {
            self.context
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}

/// Render an error and its nested causes the way a standard stack dump would: outermost error
/// first, one `Caused by:` line per cause.
pub(crate) fn render_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut trace = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push_str("\nCaused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

#[cfg(test)]
mod event_tests {
    use super::*;

    use std::fmt;

    #[test]
    fn test_builder_defaults() {
        let event = LogEvent::builder(Level::LOG_INFO).build();
        assert!(event.message().is_none());
        assert!(event.error_trace().is_none());
        assert!(event.timestamp_millis().is_none());
        assert!(event.source_location().is_none());
        assert!(event.context().is_empty());
        assert!(event.context_stack().is_empty());
    }

    #[test]
    fn test_builder_roundtrip() {
        let event = LogEvent::builder(Level::LOG_ERR)
            .message("Das Auto".to_string())
            .timestamp_millis(123)
            .logger_name("org.example.Klass".to_string())
            .thread_name("main".to_string())
            .source_location("klass.rs".to_string(), 42)
            .context_entry("foo".to_string(), "bar".to_string())
            .context_stack(vec!["outer".to_string(), "inner".to_string()])
            .build();

        assert_eq!(event.level(), Level::LOG_ERR);
        assert_eq!(event.message(), Some("Das Auto"));
        assert_eq!(event.timestamp_millis(), Some(123));
        assert_eq!(event.logger_name(), "org.example.Klass");
        assert_eq!(event.thread_name(), "main");
        assert_eq!(event.source_location(), Some(("klass.rs", 42)));
        assert_eq!(event.context().get("foo").map(String::as_str), Some("bar"));
        assert_eq!(event.context_stack(), ["outer", "inner"]);
    }

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Volkswagen")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "LOL")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    impl std::error::Error for Inner {}

    #[test]
    fn test_error_chain_rendering() {
        let trace = render_error_chain(&Outer(Inner));
        assert_eq!(trace, "Volkswagen\nCaused by: LOL");
    }
}
