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

//! GELF severity level definitions.
//!
//! GELF carries the message severity in its `level` field as the numeric syslog severity code, so
//! [`Level`] replicates the names used in `<syslog.h>`, with the enumeration values being the
//! codes that go out on the wire.

type StdResult<T, E> = std::result::Result<T, E>;

/// The eight syslog severity levels, as encoded in the GELF `level` field.
///
/// The enumeration values duplicate the constants documented in the `syslog()` manual
/// [page] & defined in `<syslog.h>`.
///
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// system is unusable
    LOG_EMERG = 0,
    /// action must be take immediately
    LOG_ALERT = 1,
    /// critical conditions
    LOG_CRIT = 2,
    /// error conditions
    LOG_ERR = 3,
    /// warning conditions
    LOG_WARNING = 4,
    /// normal, but significant condition
    LOG_NOTICE = 5,
    /// informational message
    LOG_INFO = 6,
    /// debug-level message
    LOG_DEBUG = 7,
}

impl Level {
    /// The numeric severity code placed in the GELF `level` field.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Level::LOG_EMERG => "LOG_EMERG",
                Level::LOG_ALERT => "LOG_ALERT",
                Level::LOG_CRIT => "LOG_CRIT",
                Level::LOG_ERR => "LOG_ERR",
                Level::LOG_WARNING => "LOG_WARNING",
                Level::LOG_NOTICE => "LOG_NOTICE",
                Level::LOG_INFO => "LOG_INFO",
                Level::LOG_DEBUG => "LOG_DEBUG",
            }
        )
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match level {
            &tracing::Level::TRACE | &tracing::Level::DEBUG => Level::LOG_DEBUG,
            &tracing::Level::INFO => Level::LOG_INFO,
            &tracing::Level::WARN => Level::LOG_WARNING,
            &tracing::Level::ERROR => Level::LOG_ERR,
        }
    }
}

#[cfg(test)]
mod level_tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(3, Level::LOG_ERR.code());
        assert_eq!(6, Level::LOG_INFO.code());
        assert_eq!(format!("{}", Level::LOG_WARNING), "LOG_WARNING".to_string());
    }

    #[test]
    fn test_tracing_mapping() {
        assert_eq!(Level::LOG_DEBUG, Level::from(&tracing::Level::TRACE));
        assert_eq!(Level::LOG_DEBUG, Level::from(&tracing::Level::DEBUG));
        assert_eq!(Level::LOG_INFO, Level::from(&tracing::Level::INFO));
        assert_eq!(Level::LOG_WARNING, Level::from(&tracing::Level::WARN));
        assert_eq!(Level::LOG_ERR, Level::from(&tracing::Level::ERROR));
    }
}
