use std::fmt;

use bytes::Bytes;
use redpoll_types::ReplyValue;

use crate::context::DecodeContext;
use crate::error::DecodeError;

/// Leaf capability: turn one raw protocol element into one typed value.
///
/// Implementations are supplied by whoever defines a concrete reply shape
/// (an integer decoder, a UTF-8 decoder, a timestamp decoder, …); the core
/// only ever reaches them through a composite's selection. Leaves receive
/// the decode context by shared reference — they may read the cursor for
/// position-sensitive decisions, but mutating it is structurally reserved
/// to the sequential composite layer.
pub trait ElementDecoder: Send + Sync {
    /// Decodes one raw payload into a value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Element`] (typically via
    /// [`DecodeError::element`]) when the payload does not parse.
    fn decode(&self, payload: &[u8], ctx: &DecodeContext) -> Result<ReplyValue, DecodeError>;
}

/// Composite capability: route raw positions to leaf decoders and assemble
/// completed groups into values.
///
/// A composite never touches wire bytes itself. The driver asks it which
/// [`ElementDecoder`] applies at each raw position, and — once the framing
/// layer reports a group boundary — hands it the group's decoded values for
/// assembly. Composites nest: a child handed out by [`SequenceDecoder`] may
/// itself be a composite whose selection was consulted recursively.
///
/// Implementations must be side-effect-free except for mutating the cursor
/// inside the passed context, and must never block or perform I/O; drivers
/// call both operations synchronously on the connection's processing path.
///
/// [`SequenceDecoder`]: crate::sequence::SequenceDecoder
pub trait CompositeDecoder: Send + Sync {
    /// Chooses the decoder for the raw element at `position`.
    ///
    /// Positions count from 0 within each sequence; a call with
    /// `position == 0` tells the composite a fresh sequence is starting.
    ///
    /// # Errors
    ///
    /// Fails fast with a [`DecodeError`] when the reply shape contradicts
    /// the composite's configuration; never for ordinary control flow.
    fn select_decoder(
        &self,
        position: usize,
        ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError>;

    /// Assembles a completed group of decoded values into one result.
    ///
    /// A composite that accepts the group consumes `parts` and returns
    /// [`Assembly::Value`]. A composite that declines must leave `parts`
    /// untouched and return [`Assembly::Decline`] so the caller can offer
    /// the same group to the next child in its chain.
    ///
    /// # Errors
    ///
    /// Fails fast with a [`DecodeError`] on a configuration/shape
    /// mismatch; declining is not an error.
    fn assemble(
        &self,
        parts: &mut Vec<ReplyValue>,
        ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError>;
}

/// Outcome of [`CompositeDecoder::select_decoder`].
#[derive(Clone, Copy)]
pub enum Selection<'a> {
    /// Decode the next raw element with this leaf.
    Element(&'a dyn ElementDecoder),
    /// The composite's own cyclic sub-sequence has completed; the caller
    /// should restart selection from its first child. This is a control
    /// signal only — it never reaches the driver, which treats an escaped
    /// restart as a configuration error.
    Restart,
}

// The `Element` payload is a bare trait object with no `Debug` bound, so
// the derive is unavailable; print the variant shape only.
impl fmt::Debug for Selection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Element(_) => f.write_str("Element(..)"),
            Selection::Restart => f.write_str("Restart"),
        }
    }
}

impl<'a> Selection<'a> {
    /// The selected leaf, or `None` for a restart signal.
    #[must_use]
    pub fn element(self) -> Option<&'a dyn ElementDecoder> {
        match self {
            Selection::Element(leaf) => Some(leaf),
            Selection::Restart => None,
        }
    }

    /// `true` when this is the cycle-restart signal.
    #[must_use]
    pub fn is_restart(self) -> bool {
        matches!(self, Selection::Restart)
    }
}

/// Outcome of [`CompositeDecoder::assemble`].
#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    /// The group assembled into this value.
    Value(ReplyValue),
    /// The composite declined the group; the same parts should be offered
    /// to the next child in the chain. Distinct by construction from any
    /// assembled value — a nil value is `Value(ReplyValue::Nil)`, never a
    /// decline.
    Decline,
}

impl Assembly {
    /// The assembled value, or `None` for a decline.
    #[must_use]
    pub fn value(self) -> Option<ReplyValue> {
        match self {
            Assembly::Value(value) => Some(value),
            Assembly::Decline => None,
        }
    }
}

/// Identity leaf: hands the payload bytes through as [`ReplyValue::Bulk`].
///
/// The one leaf this crate ships. Reply shapes that care about element
/// types bring their own leaves; shapes that just want the raw payloads
/// (or tests that only care about routing) use this.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl ElementDecoder for Verbatim {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<ReplyValue, DecodeError> {
        Ok(ReplyValue::Bulk(Bytes::copy_from_slice(payload)))
    }
}
