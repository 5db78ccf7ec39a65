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

//! [gelf-tracing](crate) [`Layer`] implementation.
//!
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//!
//! [`GelfLayer`] is the appender entry point: a thin caller that captures each [`tracing`]
//! [`Event`] into a [`LogEvent`], runs the message factory, and relays the result through the
//! [`Dispatcher`]. It constructs no messages itself and it never lets a delivery failure escape
//! `on_event`.
//!
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html

use crate::config::GelfConfig;
use crate::dispatcher::Dispatcher;
use crate::event::{EventVisitor, LogEvent};
use crate::factory::make_message;
use crate::level::Level;
use crate::sink::{ErrorSink, StderrErrorSink};

use tracing::Event;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use std::sync::Arc;

/// A [`tracing-subscriber`]-compliant [`Layer`] implementation that ships [`Event`]s to a
/// Graylog collector as GELF messages.
///
/// [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
/// [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
///
/// The transport is selected once, when the layer is constructed; see
/// [`Dispatcher`](crate::dispatcher::Dispatcher) for the selection ladder and its failure
/// behavior.
pub struct GelfLayer {
    config: GelfConfig,
    dispatcher: Dispatcher,
    sink: Arc<dyn ErrorSink>,
}

impl GelfLayer {
    /// Construct a layer from `config`, reporting failures to stderr.
    pub fn new(config: GelfConfig) -> GelfLayer {
        GelfLayer::with_error_sink(config, Arc::new(StderrErrorSink))
    }

    /// Construct a layer from `config`, reporting failures to `sink`.
    pub fn with_error_sink(config: GelfConfig, sink: Arc<dyn ErrorSink>) -> GelfLayer {
        let dispatcher = Dispatcher::start(&config, sink.clone());
        GelfLayer {
            config,
            dispatcher,
            sink,
        }
    }

    /// Construct a layer around an existing dispatcher, bypassing transport selection.
    pub fn with_dispatcher(
        config: GelfConfig,
        dispatcher: Dispatcher,
        sink: Arc<dyn ErrorSink>,
    ) -> GelfLayer {
        GelfLayer {
            config,
            dispatcher,
            sink,
        }
    }

    /// Release the active transport's resources.
    pub fn close(&self) {
        self.dispatcher.close();
    }
}

impl<S> tracing_subscriber::layer::Layer<S> for GelfLayer
where
    S: tracing_core::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let log_event = capture_event(event, &ctx);
        let message = make_message(&log_event, &self.config, self.sink.as_ref());
        // A non-OK outcome was already reported to the sink; there is nowhere further to
        // raise it without interrupting the instrumented application.
        let _ = self.dispatcher.send(&message);
    }
}

/// Capture one `tracing` event into the crate's event view: the `message` field becomes the
/// message text, a recorded error value becomes the error trace, every other field lands in the
/// context mapping, and the names of the spans in scope (root first) form the context stack.
fn capture_event<S>(event: &Event<'_>, ctx: &Context<'_, S>) -> LogEvent
where
    S: tracing_core::Subscriber + for<'a> LookupSpan<'a>,
{
    let mut visitor = EventVisitor::default();
    event.record(&mut visitor);

    let meta = event.metadata();
    let mut builder = LogEvent::builder(Level::from(meta.level()))
        .logger_name(meta.target().to_string())
        .thread_name(
            std::thread::current()
                .name()
                .unwrap_or("unnamed")
                .to_string(),
        );

    if let Some(message) = visitor.message {
        builder = builder.message(message);
    }
    if let Some(trace) = visitor.error_trace {
        builder = builder.error_trace(trace);
    }
    if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
        builder = builder.source_location(file.to_string(), line);
    }
    for (key, value) in visitor.context {
        builder = builder.context_entry(key, value);
    }

    let context_stack: Vec<String> = ctx
        .event_scope(event)
        .map(|scope| {
            scope
                .from_root()
                .map(|span| span.name().to_string())
                .collect()
        })
        .unwrap_or_default();

    builder.context_stack(context_stack).build()
}

#[cfg(test)]
mod layer_tests {
    use super::*;

    use crate::message::GelfMessage;
    use crate::sink::test_support::RecordingSink;
    use crate::transport::{GelfSender, SenderResult};

    use serde_json::json;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::registry::Registry;

    use std::sync::{Arc, Mutex};

    struct RecordingSender {
        messages: Arc<Mutex<Vec<GelfMessage>>>,
    }

    impl GelfSender for RecordingSender {
        fn send_message(&self, message: &GelfMessage) -> SenderResult {
            self.messages.lock().unwrap().push(message.clone());
            SenderResult::Ok
        }
        fn close(&self) {}
    }

    fn layer_with_capture(config: GelfConfig) -> (GelfLayer, Arc<Mutex<Vec<GelfMessage>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::with_sender(
            Box::new(RecordingSender {
                messages: messages.clone(),
            }),
            sink.clone(),
        );
        (GelfLayer::with_dispatcher(config, dispatcher, sink), messages)
    }

    #[test]
    fn test_event_to_message() {
        let config = GelfConfig::builder()
            .origin_host("bree.local".to_string())
            .add_extended_information(true)
            .build();
        let (layer, messages) = layer_with_capture(config);

        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("outer");
            let _enter = span.enter();
            tracing::info!(user = "kemal", "Hello, world!");
        });

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        let message = &messages[0];
        assert_eq!(message.short_message(), "Hello, world!");
        assert_eq!(message.full_message(), "Hello, world!");
        assert_eq!(message.host(), Some("bree.local"));
        assert_eq!(message.level().code(), 6);
        assert_eq!(message.additional_field("user"), Some(&json!("kemal")));
        assert_eq!(message.additional_field("loggerNdc"), Some(&json!("outer")));
        assert!(message.additional_field("logger").is_some());
        assert!(message.additional_field("thread").is_some());
        assert!(message.additional_field("timestampMs").is_some());
    }

    #[test]
    fn test_nested_spans_form_the_context_stack() {
        let config = GelfConfig::builder()
            .origin_host("bree.local".to_string())
            .add_extended_information(true)
            .build();
        let (layer, messages) = layer_with_capture(config);

        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("level 1");
            let _outer = outer.enter();
            let inner = tracing::info_span!("level 5");
            let _inner = inner.enter();
            tracing::warn!("we need to go deeper");
        });

        let messages = messages.lock().unwrap();
        assert_eq!(
            messages[0].additional_field("loggerNdc"),
            Some(&json!("level 1 level 5"))
        );
        assert_eq!(messages[0].level().code(), 4);
    }

    #[test]
    fn test_plain_events_stay_lean() {
        let config = GelfConfig::builder()
            .origin_host("bree.local".to_string())
            .build();
        let (layer, messages) = layer_with_capture(config);

        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(user = "kemal", "boom");
        });

        let messages = messages.lock().unwrap();
        let message = &messages[0];
        assert_eq!(message.level().code(), 3);
        // Extended information is opt-in; the context never leaks without it.
        assert!(message.additional_field("user").is_none());
        assert!(message.additional_field("logger").is_none());
        // Location capture defaults on, and test code has a file & line.
        assert!(message.file().is_some());
        assert!(message.line().is_some());
    }
}
