/// A single timed unit of work within a trace.
///
/// Spans arrive already normalized from whatever backend produced them. Times
/// are microseconds. `parent_ids` may reference ids that are absent from the
/// trace, such dangling references are tolerated everywhere in this crate.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Span {
    pub span_id: String,
    /// Parent references in order of importance. Only the first one is used
    /// when building graph edges.
    pub parent_ids: Vec<String>,
    pub service_name: String,
    pub operation_name: String,
    /// Start of the span, microseconds.
    pub start_time: i64,
    /// Length of the span, microseconds. Not validated, may be zero or negative.
    pub duration: i64,
    pub tags: Vec<Tag>,
    /// Tags attached at the process/service level, shared across spans of the
    /// same service.
    pub process_tags: Vec<Tag>,
    pub logs: Vec<SpanLog>,
    pub kind: Option<String>,
    pub status_code: Option<StatusCode>,
    pub status_message: Option<String>,
    pub instrumentation_library_name: Option<String>,
    pub instrumentation_library_version: Option<String>,
    pub trace_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: TagValue,
}

/// A timestamped event attached to a span.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpanLog {
    pub timestamp: i64,
    pub fields: Vec<Tag>,
}

/// Tag values keep their original type, comparisons against filter input
/// happen on the string form (see `Display`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Array(Vec<TagValue>),
}

impl std::fmt::Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValue::String(s) => write!(f, "{}", s),
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Int(i) => write!(f, "{}", i),
            TagValue::Float(d) => write!(f, "{}", d),
            TagValue::Array(values) => write!(
                f,
                "{}",
                values
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }
}

/// Span status as defined by the tracing backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StatusCode {
    Unset,
    Ok,
    Error,
}

impl StatusCode {
    /// Lowercase name used when matching against the `status` filter key.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Unset => "unset",
            StatusCode::Ok => "ok",
            StatusCode::Error => "error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The capabilities graph construction needs from a span.
///
/// Backends with their own span representation can implement this instead of
/// converting to [`Span`] first.
pub trait GraphSpan {
    fn span_id(&self) -> &str;
    fn parent_ids(&self) -> &[String];
    fn service_name(&self) -> &str;
    fn operation_name(&self) -> &str;
    /// Microseconds.
    fn start_time(&self) -> i64;
    /// Microseconds.
    fn duration(&self) -> i64;
}

impl GraphSpan for Span {
    fn span_id(&self) -> &str {
        &self.span_id
    }

    fn parent_ids(&self) -> &[String] {
        &self.parent_ids
    }

    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn operation_name(&self) -> &str {
        &self.operation_name
    }

    fn start_time(&self) -> i64 {
        self.start_time
    }

    fn duration(&self) -> i64 {
        self.duration
    }
}
