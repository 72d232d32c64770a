use crate::level::Severity;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Caller-supplied contextual fields attached to a single log call.
///
/// Values are stored as JSON. Inserting never fails: a value whose
/// `Serialize` implementation errors is stored as its `Debug` text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, see [`Fields::insert`].
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Serialize + fmt::Debug,
    {
        self.insert(key, &value);
        self
    }

    /// Builder-style insert, see [`Fields::insert_display`].
    pub fn with_display(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert_display(key, value);
        self
    }

    /// Insert a serializable value, replacing any previous value for `key`.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: &T)
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        self.0.insert(key.into(), to_json_value(value));
    }

    /// Insert the `Display` text of `value`.
    pub fn insert_display(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.0.insert(key.into(), Value::String(value.to_string()));
    }

    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Convert `value` to JSON, falling back to its `Debug` text.
pub fn to_json_value<T>(value: &T) -> Value
where
    T: Serialize + fmt::Debug + ?Sized,
{
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(format!("{:?}", value)))
}

impl From<BTreeMap<String, Value>> for Fields {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Fields(map)
    }
}

impl From<serde_json::Map<String, Value>> for Fields {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Objects contribute their entries; any other value is stored under `value`.
impl From<Value> for Fields {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into(),
            Value::Null => Fields::new(),
            other => Fields::new().with("value", other),
        }
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Fields(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Best-effort location of the code that issued a log call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub module: Option<String>,
    pub function: Option<String>,
    pub line: Option<u32>,
}

impl SourceLocation {
    /// Location of a `#[track_caller]` call site. The module is the file stem.
    pub fn from_caller(location: &Location<'_>) -> Self {
        let module = Path::new(location.file())
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        SourceLocation {
            module,
            function: None,
            line: Some(location.line()),
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

/// A single structured log entry, built at emission time and rendered
/// straight to a JSON line.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    pub message: String,
    pub location: SourceLocation,
    pub fields: Fields,
    pub service: String,
    pub environment: String,
}

impl LogRecord {
    /// Merge the record into a flat JSON object.
    ///
    /// Layers are applied in a fixed order:
    /// 1. fixed fields (`timestamp`, `level`, `service`, `environment`,
    ///    and `module` / `function` / `line` when known);
    /// 2. caller fields, replacing fixed fields with the same key;
    /// 3. `message`, which always reflects the logged message.
    pub fn to_object(&self) -> BTreeMap<String, Value> {
        let mut object = BTreeMap::new();
        object.insert("timestamp".to_string(), Value::String(format_timestamp(&self.timestamp)));
        object.insert("level".to_string(), Value::String(self.level.as_str().to_string()));
        object.insert("service".to_string(), Value::String(self.service.clone()));
        object.insert("environment".to_string(), Value::String(self.environment.clone()));
        if let Some(module) = &self.location.module {
            object.insert("module".to_string(), Value::String(module.clone()));
        }
        if let Some(function) = &self.location.function {
            object.insert("function".to_string(), Value::String(function.clone()));
        }
        if let Some(line) = self.location.line {
            object.insert("line".to_string(), Value::from(line));
        }

        for (key, value) in self.fields.iter() {
            object.insert(key.clone(), value.clone());
        }

        object.insert("message".to_string(), Value::String(self.message.clone()));
        object
    }

    /// Render as a single-line JSON object without a trailing newline.
    pub fn to_json_line(&self) -> String {
        match serde_json::to_string(&self.to_object()) {
            Ok(line) => line,
            Err(e) => serde_json::json!({
                "timestamp": format_timestamp(&self.timestamp),
                "level": self.level.as_str(),
                "message": self.message,
                "serialization_error": e.to_string(),
            })
            .to_string(),
        }
    }
}

/// RFC 3339, UTC, millisecond precision: `2024-01-01T12:00:00.123Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
