#![warn(clippy::pedantic)]

//! Shared support for the integration suite.
//!
//! Three kinds of helpers live here:
//!
//! - element script builders ([`bulk`], [`agg`], [`nil`]) so tests read
//!   like the reply they describe;
//! - deterministic decoder doubles: [`Label`] leaves that reveal which
//!   child selection routed to, [`tagged`]/[`declining`] composites for
//!   assembly routing, [`CountingCycle`] for cycle-restart patterns, and
//!   two small realistic leaves ([`Utf8Leaf`], [`IntLeaf`]);
//! - [`render`], the canonical single-line rendering of a [`ReplyValue`]
//!   that the snapshot tests assert against.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use redpoll_reply::{
    Assembly, CompositeDecoder, DecodeContext, DecodeError, ElementDecoder, Selection,
};
use redpoll_types::{Element, ReplyValue};

// ── Element scripts ───────────────────────────────────────────────────────

/// A bulk element with the given payload.
#[must_use]
pub fn bulk(payload: &[u8]) -> Element {
    Element::bulk(payload)
}

/// An aggregate header announcing `len` elements.
#[must_use]
pub fn agg(len: usize) -> Element {
    Element::Aggregate { len }
}

/// An explicit absent value.
#[must_use]
pub fn nil() -> Element {
    Element::Nil
}

// ── Leaves ────────────────────────────────────────────────────────────────

/// Leaf that ignores its payload and yields its tag as text — the tag
/// tells a test which child's leaf selection routed to.
pub struct Label(pub &'static str);

impl ElementDecoder for Label {
    fn decode(&self, _payload: &[u8], _ctx: &DecodeContext) -> Result<ReplyValue, DecodeError> {
        Ok(ReplyValue::Text(self.0.to_owned()))
    }
}

/// Strict UTF-8 leaf: text payloads become [`ReplyValue::Text`], anything
/// else is a decode failure.
pub struct Utf8Leaf;

impl ElementDecoder for Utf8Leaf {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<ReplyValue, DecodeError> {
        match std::str::from_utf8(payload) {
            Ok(text) => Ok(ReplyValue::Text(text.to_owned())),
            Err(_) => Err(DecodeError::element("payload is not valid UTF-8")),
        }
    }
}

/// ASCII integer leaf: digit payloads become [`ReplyValue::Int`].
pub struct IntLeaf;

impl ElementDecoder for IntLeaf {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<ReplyValue, DecodeError> {
        std::str::from_utf8(payload)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .map(ReplyValue::Int)
            .ok_or_else(|| DecodeError::element("payload is not an ASCII integer"))
    }
}

// ── Composite doubles ─────────────────────────────────────────────────────

/// Composite that selects its [`Label`] leaf at every position and
/// assembles any group into an array headed by its tag, so a test can see
/// both which child selected and which child assembled.
pub struct TaggedCollector {
    leaf: Label,
}

impl TaggedCollector {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self { leaf: Label(tag) }
    }
}

impl CompositeDecoder for TaggedCollector {
    fn select_decoder(
        &self,
        _position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        Ok(Selection::Element(&self.leaf))
    }

    fn assemble(
        &self,
        parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        let mut assembled = vec![ReplyValue::Text(self.leaf.0.to_owned())];
        assembled.append(parts);
        Ok(Assembly::Value(ReplyValue::Array(assembled)))
    }
}

/// Boxed [`TaggedCollector`], ready for a chain.
#[must_use]
pub fn tagged(tag: &'static str) -> Box<dyn CompositeDecoder> {
    Box::new(TaggedCollector::new(tag))
}

/// Composite that selects its label leaf but declines every group.
pub struct DecliningCollector {
    leaf: Label,
}

impl CompositeDecoder for DecliningCollector {
    fn select_decoder(
        &self,
        _position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        Ok(Selection::Element(&self.leaf))
    }

    fn assemble(
        &self,
        _parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        Ok(Assembly::Decline)
    }
}

/// Boxed [`DecliningCollector`], ready for a chain.
#[must_use]
pub fn declining(tag: &'static str) -> Box<dyn CompositeDecoder> {
    Box::new(DecliningCollector { leaf: Label(tag) })
}

/// Cycle double that counts how many fields it has handed out and reports
/// a completed cycle once per full round.
///
/// Unlike the position-keyed production cycle, this double re-answers the
/// re-delegated call after a restart with its first field again — which
/// takes per-consult state. The interior counter makes it single-reply,
/// test-only equipment.
pub struct CountingCycle {
    fields: Box<[Label]>,
    handed: AtomicUsize,
}

impl CountingCycle {
    /// # Panics
    ///
    /// Panics if `tags` is empty.
    #[must_use]
    pub fn new(tags: &[&'static str]) -> Self {
        assert!(!tags.is_empty(), "a cycle needs at least one field");
        Self {
            fields: tags.iter().map(|&tag| Label(tag)).collect(),
            handed: AtomicUsize::new(0),
        }
    }
}

impl CompositeDecoder for CountingCycle {
    fn select_decoder(
        &self,
        _position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        let handed = self.handed.load(Ordering::Relaxed);
        if handed == self.fields.len() {
            self.handed.store(0, Ordering::Relaxed);
            return Ok(Selection::Restart);
        }
        self.handed.store(handed + 1, Ordering::Relaxed);
        Ok(Selection::Element(&self.fields[handed]))
    }

    fn assemble(
        &self,
        _parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        Ok(Assembly::Decline)
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────

/// Canonical single-line rendering of a value, for snapshot assertions.
///
/// ```text
/// nil                      Nil
/// 42                       Int
/// "text"                   Text (quoted, escaped)
/// b"raw"                   Bulk (lossy UTF-8, quoted, b-prefixed)
/// [1, "a"]                 Array
/// {"k" => 1, "j" => 2}     Map (arrival order)
/// ```
#[must_use]
pub fn render(value: &ReplyValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &ReplyValue) {
    match value {
        ReplyValue::Nil => out.push_str("nil"),
        ReplyValue::Int(n) => {
            let _ = write!(out, "{n}");
        }
        ReplyValue::Double(d) => {
            let _ = write!(out, "{d:?}");
        }
        ReplyValue::Text(s) => {
            let _ = write!(out, "{s:?}");
        }
        ReplyValue::Bulk(payload) => {
            let _ = write!(out, "b{:?}", String::from_utf8_lossy(payload));
        }
        ReplyValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        ReplyValue::Map(entries) => {
            out.push('{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, key);
                out.push_str(" => ");
                write_value(out, val);
            }
            out.push('}');
        }
    }
}
