use redpoll_types::ReplyValue;

use crate::context::DecodeContext;
use crate::decoder::{Assembly, CompositeDecoder, Selection};
use crate::error::DecodeError;

/// The sequential-list composite: an ordered, fixed chain of child
/// decoders walked by the per-reply [`SequenceCursor`].
///
/// This is the piece that lets an irregular reply grammar — leading
/// fields of distinct types, repeating tuples, trailing rests — be
/// declared as a flat list of children, with all progress kept in the
/// reply's own context so the chain itself stays immutable and shareable.
///
/// # Selection
///
/// `select_decoder(position, ctx)` routes each raw position to a child:
///
/// 1. `position == 0` marks a sequence start: the cursor advances to the
///    next child and the progress counter clears. Because every sequence
///    start advances, one chain instance decodes any number of
///    consecutive sequences (pipelined replies, repeating units) on a
///    single context.
/// 2. A cursor that has never advanced is pinned to child 0 — and stays
///    pinned, which keeps later assembly off its "never selected"
///    fallback.
/// 3. The active child is consulted. If it answers [`Selection::Restart`]
///    its own cycle is complete: the cursor is pinned back to child 0 and
///    child 0 is consulted for the same position. The restart never
///    leaves this method; a second restart from child 0 itself is a
///    misconfigured chain ([`DecodeError::RestartLoop`]).
///
/// # Assembly
///
/// `assemble(parts, ctx)` picks the child that turns a completed group
/// into a value. The cursor's two fields combine into an *effective*
/// index — the base chosen during selection plus the number of groups
/// already produced under it — so a run of nested groups is distributed
/// over consecutive children without any selection calls in between:
///
/// ```text
/// ┌────────────────┬──────────┬─────────────────────────────────────┐
/// │ cursor         │ effective│ meaning                             │
/// ├────────────────┼──────────┼─────────────────────────────────────┤
/// │ base b, prog p │ b + p    │ p-th group under base b             │
/// │ unset,  unset  │ —        │ nothing selected: last child (the   │
/// │                │          │ default) assembles directly         │
/// │ unset,  prog p │ p - 1    │ progress without a base             │
/// └────────────────┴──────────┴─────────────────────────────────────┘
/// ```
///
/// A child answering [`Assembly::Decline`] was the wrong shape for the
/// group: the base advances permanently and the same parts go to the next
/// effective child, chaining until one accepts. Any index leaving the
/// chain — during selection, assembly, or the decline chain — is a
/// [`DecodeError::ChainMismatch`]: the reply on the wire does not have
/// the shape this chain was built for.
///
/// [`SequenceCursor`]: crate::cursor::SequenceCursor
pub struct SequenceDecoder {
    children: Box<[Box<dyn CompositeDecoder>]>,
}

impl SequenceDecoder {
    /// Builds a chain from its children, in order. The last child is the
    /// default: it assembles groups for replies that never triggered
    /// selection.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty — a sequence needs at least a
    /// default child.
    #[must_use]
    pub fn new(children: Vec<Box<dyn CompositeDecoder>>) -> Self {
        assert!(
            !children.is_empty(),
            "a sequence needs at least one child decoder"
        );
        Self {
            children: children.into_boxed_slice(),
        }
    }

    /// Number of children in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Always `false`: the constructor rejects empty chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    fn child(&self, index: usize) -> Result<&dyn CompositeDecoder, DecodeError> {
        self.children
            .get(index)
            .map(|child| child.as_ref())
            .ok_or(DecodeError::ChainMismatch {
                index,
                len: self.children.len(),
            })
    }
}

impl CompositeDecoder for SequenceDecoder {
    fn select_decoder(
        &self,
        position: usize,
        ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        if position == 0 {
            // Sequence start: move to the next child, forget group
            // progress accumulated under the previous one.
            let cursor = ctx.cursor_mut();
            cursor.advance();
            cursor.clear_produced();
        }

        let active = match ctx.cursor_mut().active() {
            Some(index) => index,
            None => {
                // Mid-sequence call before any sequence start. Pin to
                // child 0 and keep it pinned; only the never-touched
                // cursor means "use the default at assembly".
                ctx.cursor_mut().restart();
                0
            }
        };

        match self.child(active)?.select_decoder(position, ctx)? {
            Selection::Restart => {
                // The active child's cycle completed. Absorb the signal:
                // pin the cursor back to child 0 and let it select for
                // this same position instead.
                ctx.cursor_mut().restart();
                match self.child(0)?.select_decoder(position, ctx)? {
                    Selection::Restart => Err(DecodeError::RestartLoop { position }),
                    selection => Ok(selection),
                }
            }
            selection => Ok(selection),
        }
    }

    fn assemble(
        &self,
        parts: &mut Vec<ReplyValue>,
        ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        let produced = ctx.cursor_mut().bump_produced();
        let mut effective = match ctx.cursor_mut().active() {
            Some(base) => base + produced,
            None if produced == 0 => {
                // Neither field ever set: no selection happened for this
                // reply, so the default child assembles. A decline from
                // it propagates to the caller unchanged.
                return self.child(self.children.len() - 1)?.assemble(parts, ctx);
            }
            None => produced - 1,
        };

        loop {
            match self.child(effective)?.assemble(parts, ctx)? {
                Assembly::Value(value) => return Ok(Assembly::Value(value)),
                Assembly::Decline => {
                    // Wrong shape for that child. Advance the base
                    // permanently and offer the same parts to the next
                    // effective child.
                    let base = ctx.cursor_mut().advance();
                    let progress = ctx.cursor_mut().produced().unwrap_or(0);
                    effective = base + progress;
                }
            }
        }
    }
}
