use crate::cursor::SequenceCursor;

/// Mutable per-reply decode state.
///
/// One `DecodeContext` exists per in-flight reply: created when the reply's
/// first element arrives, dropped when the reply fully assembles or fails.
/// Nothing in it outlives the reply, and no two replies ever share one —
/// pipelined replies each get their own context, which is the entire
/// concurrency story of this crate (no locks, no process-wide state).
///
/// The context owns at most one [`SequenceCursor`], created lazily the
/// first time a sequential composite asks for it. Leaf decoders receive the
/// context by shared reference and can read the cursor but never mutate it;
/// cursor mutation belongs to the sequential layer alone.
#[derive(Debug, Default)]
pub struct DecodeContext {
    cursor: Option<SequenceCursor>,
}

impl DecodeContext {
    /// A context with no cursor yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context seeded with a specific cursor state.
    ///
    /// [`duplicate`](Self::duplicate) is built on this; tests use it to
    /// start a reply from a forced cursor position.
    #[must_use]
    pub fn with_cursor(cursor: SequenceCursor) -> Self {
        Self {
            cursor: Some(cursor),
        }
    }

    /// The cursor, if one has been created.
    #[must_use]
    pub fn cursor(&self) -> Option<&SequenceCursor> {
        self.cursor.as_ref()
    }

    /// The cursor, created fresh on first access.
    ///
    /// Idempotent after the first call: later calls hand back the same
    /// cursor with whatever state it has accumulated.
    pub fn cursor_mut(&mut self) -> &mut SequenceCursor {
        self.cursor.get_or_insert_with(SequenceCursor::new)
    }

    /// An independent context for decoding a repeating unit.
    ///
    /// The copy keeps the "which child is active" position but forgets the
    /// per-child progress counter, so the same composite shape can decode
    /// the next unit without inheriting the previous unit's progress. A
    /// context that never created a cursor duplicates to one that still
    /// has none.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            cursor: self.cursor.as_ref().map(SequenceCursor::duplicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_created_lazily() {
        let mut ctx = DecodeContext::new();
        assert!(ctx.cursor().is_none());

        ctx.cursor_mut();
        assert!(ctx.cursor().is_some());
    }

    #[test]
    fn cursor_mut_is_idempotent() {
        let mut ctx = DecodeContext::new();
        ctx.cursor_mut().advance();
        ctx.cursor_mut().bump_produced();

        // Re-access observes the accumulated state, not a fresh cursor.
        assert_eq!(ctx.cursor_mut().active(), Some(0));
        assert_eq!(ctx.cursor_mut().produced(), Some(0));
    }

    #[test]
    fn duplicate_without_cursor_stays_empty() {
        let ctx = DecodeContext::new();
        assert!(ctx.duplicate().cursor().is_none());
    }

    #[test]
    fn duplicate_keeps_position_and_clears_progress() {
        let mut ctx = DecodeContext::new();
        ctx.cursor_mut().advance();
        ctx.cursor_mut().advance();
        ctx.cursor_mut().bump_produced();

        let copy = ctx.duplicate();
        let copied = copy.cursor().copied().unwrap();
        assert_eq!(copied.active(), Some(1));
        assert_eq!(copied.produced(), None);

        // Mutating the original afterwards does not reach the copy.
        ctx.cursor_mut().advance();
        assert_eq!(copy.cursor().copied().unwrap().active(), Some(1));
    }
}
