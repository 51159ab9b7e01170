use bytes::Bytes;

/// A fully decoded reply value.
///
/// This is the typed result model shared by leaf decoders (which produce
/// one value per raw element) and composite decoders (which assemble whole
/// groups into aggregate values). The variants mirror the shapes a reply
/// can take on the wire without committing to any byte grammar:
///
/// ```text
/// ┌─────────┬──────────────────────────────────────────────────────┐
/// │ Variant │ Produced by                                          │
/// ├─────────┼──────────────────────────────────────────────────────┤
/// │ Nil     │ explicit absent value (nil bulk, nil aggregate)      │
/// │ Int     │ integer leaf decoders                                │
/// │ Double  │ floating-point leaf decoders                         │
/// │ Text    │ textual leaf decoders (UTF-8 payloads)               │
/// │ Bulk    │ binary-safe leaf decoders (payload passed through)   │
/// │ Array   │ group assembly — ordered collection                  │
/// │ Map     │ group assembly — ordered key/value pairs             │
/// └─────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// `Map` keeps entries in arrival order rather than imposing a hash or
/// sort order; replies are ordered on the wire and callers may rely on it.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyValue {
    Nil,
    Int(i64),
    Double(f64),
    Text(String),
    Bulk(Bytes),
    Array(Vec<ReplyValue>),
    Map(Vec<(ReplyValue, ReplyValue)>),
}

impl ReplyValue {
    /// Returns `true` for the explicit absent value.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, ReplyValue::Nil)
    }

    /// The integer payload, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ReplyValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The textual payload, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReplyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The raw payload bytes, if this is a `Bulk`.
    #[must_use]
    pub fn as_bulk(&self) -> Option<&Bytes> {
        match self {
            ReplyValue::Bulk(b) => Some(b),
            _ => None,
        }
    }

    /// The assembled elements, if this is an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[ReplyValue]> {
        match self {
            ReplyValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<i64> for ReplyValue {
    fn from(n: i64) -> Self {
        ReplyValue::Int(n)
    }
}

impl From<&str> for ReplyValue {
    fn from(s: &str) -> Self {
        ReplyValue::Text(s.to_owned())
    }
}

impl From<String> for ReplyValue {
    fn from(s: String) -> Self {
        ReplyValue::Text(s)
    }
}

impl From<Vec<ReplyValue>> for ReplyValue {
    fn from(items: Vec<ReplyValue>) -> Self {
        ReplyValue::Array(items)
    }
}

impl From<Bytes> for ReplyValue {
    fn from(payload: Bytes) -> Self {
        ReplyValue::Bulk(payload)
    }
}
