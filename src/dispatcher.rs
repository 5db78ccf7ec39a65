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

//! Transport selection & dispatch.
//!
//! A [`Dispatcher`] owns exactly one active sender, chosen once at startup from the configured
//! targets and never re-selected. Selection failures (both targets set, neither set, a sender
//! constructor failing) are reported to the error sink and leave the dispatcher inert: it keeps
//! accepting `send` calls and keeps reporting "not initialized", because the instrumented
//! application must never pay for a broken logging pipeline with anything but diagnostics.

use crate::config::GelfConfig;
use crate::error::{Error, Result};
use crate::message::GelfMessage;
use crate::sink::ErrorSink;
use crate::transport::{AmqpSender, GelfSender, SendErrorCode, SenderResult, TcpSender, UdpSender};

use backtrace::Backtrace;

use std::sync::Arc;

/// Constructor seam for the three sender kinds.
///
/// Selection logic is a pure function of the configuration strings; routing it through this
/// trait lets tests observe which sender would be built, and with what target, without touching
/// the network.
pub trait SenderFactory {
    fn udp(&self, host: &str, port: u16) -> Result<Box<dyn GelfSender>>;
    fn tcp(&self, host: &str, port: u16) -> Result<Box<dyn GelfSender>>;
    fn amqp(
        &self,
        uri: &str,
        exchange: &str,
        routing_key: &str,
        max_retries: u32,
    ) -> Result<Box<dyn GelfSender>>;
}

/// The real thing: sockets & broker connections.
struct SocketSenderFactory;

impl SenderFactory for SocketSenderFactory {
    fn udp(&self, host: &str, port: u16) -> Result<Box<dyn GelfSender>> {
        Ok(Box::new(UdpSender::new(host, port)?))
    }

    fn tcp(&self, host: &str, port: u16) -> Result<Box<dyn GelfSender>> {
        Ok(Box::new(TcpSender::new(host, port)?))
    }

    fn amqp(
        &self,
        uri: &str,
        exchange: &str,
        routing_key: &str,
        max_retries: u32,
    ) -> Result<Box<dyn GelfSender>> {
        Ok(Box::new(AmqpSender::new(
            uri,
            exchange,
            routing_key,
            max_retries,
        )?))
    }
}

/// Pick a sender from the configured targets.
///
/// A `tcp:`-prefixed host selects TCP, a `udp:` prefix selects UDP, a broker URI (and no host)
/// selects AMQP, and a bare host defaults to UDP. Both-or-neither target combinations are
/// configuration errors.
fn select_sender(config: &GelfConfig, factory: &dyn SenderFactory) -> Result<Box<dyn GelfSender>> {
    match (config.graylog_host(), config.amqp_uri()) {
        (Some(_), Some(_)) => Err(Error::Configuration {
            message: "graylog host and amqp uri are both informed".to_string(),
            back: Backtrace::new(),
        }),
        (None, None) => Err(Error::Configuration {
            message: "graylog host and amqp uri are both empty".to_string(),
            back: Backtrace::new(),
        }),
        (Some(host), None) => {
            if let Some(tcp_host) = host.strip_prefix("tcp:") {
                factory.tcp(tcp_host, config.graylog_port())
            } else if let Some(udp_host) = host.strip_prefix("udp:") {
                factory.udp(udp_host, config.graylog_port())
            } else {
                factory.udp(host, config.graylog_port())
            }
        }
        (None, Some(uri)) => factory.amqp(
            uri,
            config.amqp_exchange_name().unwrap_or(""),
            config.amqp_routing_key().unwrap_or(""),
            config.amqp_max_retries(),
        ),
    }
}

/// Relays messages to the one sender selected at startup.
pub struct Dispatcher {
    sender: Option<Box<dyn GelfSender>>,
    sink: Arc<dyn ErrorSink>,
}

impl Dispatcher {
    /// Select & construct the sender the configuration calls for. Runs once, before the
    /// dispatcher is shared; any failure is reported to `sink` exactly once and yields an inert
    /// dispatcher.
    pub fn start(config: &GelfConfig, sink: Arc<dyn ErrorSink>) -> Dispatcher {
        Dispatcher::start_with_factory(config, &SocketSenderFactory, sink)
    }

    /// [`start`](Dispatcher::start), with sender construction routed through `factory`.
    pub fn start_with_factory(
        config: &GelfConfig,
        factory: &dyn SenderFactory,
        sink: Arc<dyn ErrorSink>,
    ) -> Dispatcher {
        let sender = match select_sender(config, factory) {
            Ok(sender) => Some(sender),
            Err(err) => {
                sink.error("could not start a GELF sender", Some(&err));
                None
            }
        };
        Dispatcher { sender, sink }
    }

    /// Wrap an already-constructed sender, bypassing selection.
    pub fn with_sender(sender: Box<dyn GelfSender>, sink: Arc<dyn ErrorSink>) -> Dispatcher {
        Dispatcher {
            sender: Some(sender),
            sink,
        }
    }

    /// Whether startup selection produced a sender.
    pub fn is_active(&self) -> bool {
        self.sender.is_some()
    }

    /// Relay one message to the active sender. A non-OK outcome is reported to the sink and
    /// returned; it is never raised, and nothing is retried here.
    pub fn send(&self, message: &GelfMessage) -> SenderResult {
        match &self.sender {
            None => {
                self.sink.error(
                    "could not send GELF message: sender is not initialized",
                    None,
                );
                SenderResult::Error {
                    code: SendErrorCode::NotInitialized,
                    source: None,
                }
            }
            Some(sender) => {
                let result = sender.send_message(message);
                if let SenderResult::Error { code, source } = &result {
                    self.sink.error(
                        &format!("error during sending GELF message: {}", code),
                        source
                            .as_ref()
                            .map(|err| err.as_ref() as &(dyn std::error::Error + 'static)),
                    );
                }
                result
            }
        }
    }

    /// Release the active sender's resources; no-op when inert.
    pub fn close(&self) {
        if let Some(sender) = &self.sender {
            sender.close();
        }
    }
}
