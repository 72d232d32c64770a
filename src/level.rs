use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity.
///
/// Ordering follows the declaration order, so `Severity::Debug` is the
/// lowest and `Severity::Critical` the highest. A logger configured with
/// a minimum severity emits every record whose severity compares `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Every severity, lowest first.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Upper-case name used in the `level` field of emitted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSeverityError {
    #[error("unknown log level: {0:?}")]
    Unknown(String),
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive. `WARN` and `FATAL` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError::Unknown(s.to_string())),
        }
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        // tracing has no level above ERROR and one below DEBUG.
        if *level == tracing::Level::ERROR {
            Severity::Error
        } else if *level == tracing::Level::WARN {
            Severity::Warning
        } else if *level == tracing::Level::INFO {
            Severity::Info
        } else {
            Severity::Debug
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);

        let mut sorted = Severity::ALL;
        sorted.sort();
        assert_eq!(sorted, Severity::ALL);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("info".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("Debug".parse::<Severity>(), Ok(Severity::Debug));
        assert_eq!(" CRITICAL ".parse::<Severity>(), Ok(Severity::Critical));
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("fatal".parse::<Severity>(), Ok(Severity::Critical));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "verbose".parse::<Severity>().unwrap_err();
        assert_eq!(err, ParseSeverityError::Unknown("verbose".to_string()));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn tracing_levels_map_onto_severities() {
        assert_eq!(Severity::from(&tracing::Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(&tracing::Level::DEBUG), Severity::Debug);
        assert_eq!(Severity::from(&tracing::Level::INFO), Severity::Info);
        assert_eq!(Severity::from(&tracing::Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(&tracing::Level::ERROR), Severity::Error);
    }

    #[test]
    fn serializes_as_level_name() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
    }
}
