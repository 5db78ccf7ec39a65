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

//! The error sink.
//!
//! Nothing in this crate is allowed to raise a fault into the instrumented application: a failed
//! log delivery must never interrupt the caller's control flow. Every recoverable failure is
//! instead handed to an [`ErrorSink`] as a diagnostic. The default sink writes to stderr; it
//! deliberately does not re-enter the `tracing` machinery, since this crate runs inside a
//! subscriber layer and would observe its own output.

/// Receiver for recoverable failures in message construction & dispatch.
pub trait ErrorSink: Send + Sync {
    /// Report a failure; `cause` carries the underlying error, when one was captured.
    fn error(&self, message: &str, cause: Option<&(dyn std::error::Error + 'static)>);
}

/// An [`ErrorSink`] that writes one line per report to stderr.
#[derive(Default)]
pub struct StderrErrorSink;

impl ErrorSink for StderrErrorSink {
    fn error(&self, message: &str, cause: Option<&(dyn std::error::Error + 'static)>) {
        match cause {
            Some(cause) => eprintln!("gelf-tracing: {}: {}", message, cause),
            None => eprintln!("gelf-tracing: {}", message),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    use std::sync::Mutex;

    /// An [`ErrorSink`] that records the messages it is handed, for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub(crate) fn last(&self) -> Option<String> {
            self.messages.lock().unwrap().last().cloned()
        }

        pub(crate) fn count(&self) -> usize {
            self.messages.lock().unwrap().len()
        }
    }

    impl ErrorSink for RecordingSink {
        fn error(&self, message: &str, _cause: Option<&(dyn std::error::Error + 'static)>) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }
}
