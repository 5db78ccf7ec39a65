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
//! A [`tracing-subscriber`] [`Layer`] implementation for shipping [`tracing`] [`Event`]s to a
//! [Graylog] collector in [GELF], over UDP, TCP or AMQP.
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//! [`tracing`]: https://docs.rs/tracing/0.1.35/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
//! [Graylog]: https://www.graylog.org
//! [GELF]: https://go2docs.graylog.org/current/getting_in_log_data/gelf.html
//!
//! # Introduction
//!
//! The translation from [`tracing`] events to collected log records occurs in three parts:
//!
//! 1. capturing the event into a [`LogEvent`](crate::event::LogEvent) view (message text,
//!    severity, diagnostic context);
//!
//! 2. constructing a [`GelfMessage`](crate::message::GelfMessage) from that view plus the
//!    configured policy (truncation, field merging, extended-context extraction);
//!
//! 3. dispatching that message through the transport selected at startup.
//!
//! Steps 2 & 3 are independent components — [`make_message`](crate::factory::make_message) is a
//! pure function, the [`Dispatcher`](crate::dispatcher::Dispatcher) owns the one active sender —
//! composed by the thin [`GelfLayer`](crate::layer::GelfLayer). Nothing in any of the three is
//! allowed to raise a fault into the instrumented application: every failure degrades to a
//! report on an [`ErrorSink`](crate::sink::ErrorSink) plus a best-effort continuation.
//!
//! # Usage
//!
//! ```no_run
//! use gelf_tracing::config::GelfConfig;
//! use gelf_tracing::layer::GelfLayer;
//! use tracing::info;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//! use tracing_subscriber::registry::Registry;
//!
//! let config = GelfConfig::builder()
//!     .graylog_host("udp:graylog.domain.io".to_string())
//!     .facility("my-service".to_string())
//!     .add_extended_information(true)
//!     .build();
//! let subscriber = Registry::default().with(GelfLayer::new(config));
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!("Hello, world!");
//! ```
//!
//! Prefix the host with `tcp:` for a stream transport, or configure `amqp_uri` (instead of a
//! host) to publish through a broker exchange. A bare host defaults to UDP on port 12201.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod factory;
pub mod layer;
pub mod level;
pub mod message;
pub mod sink;
pub mod transport;
