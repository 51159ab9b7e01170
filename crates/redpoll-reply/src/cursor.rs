/// Progress record for a sequential composite decoder.
///
/// A [`SequenceDecoder`] walks an ordered chain of child decoders, and this
/// cursor remembers where in that walk a single in-flight reply currently
/// is. Two fields carry the whole state:
///
/// ```text
/// ┌──────────┬──────────────────────────────────────────────────────────┐
/// │ Field    │ Meaning                                                  │
/// ├──────────┼──────────────────────────────────────────────────────────┤
/// │ active   │ index of the child selected for the current sequence.    │
/// │          │ `None` = no sequence start has been seen yet; selection  │
/// │          │ falls back to child 0 and assembly to the last child.    │
/// │ produced │ how many groups have been assembled under `active` since │
/// │          │ the cursor last advanced. `None` = no progress yet.      │
/// └──────────┴──────────────────────────────────────────────────────────┘
/// ```
///
/// During assembly the two combine into an *effective* child index
/// (`active + produced`), which is how one selected base child can cover a
/// run of consecutive groups (an entry tuple followed by its field map, for
/// example) without any further selection calls.
///
/// The distinction between `active: None` (nothing ever selected) and
/// `active: Some(0)` (selection restarted at, or coerced to, child 0) is
/// load-bearing: assembly's fallback path fires only when *neither* field
/// was ever touched. Cycle restarts therefore pin `active` to `Some(0)`,
/// never back to `None`.
///
/// [`SequenceDecoder`]: crate::sequence::SequenceDecoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceCursor {
    active: Option<usize>,
    produced: Option<usize>,
}

impl SequenceCursor {
    /// A fresh cursor with neither field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor pinned to a specific active child, with no progress.
    #[must_use]
    pub fn at(active: usize) -> Self {
        Self {
            active: Some(active),
            produced: None,
        }
    }

    /// Index of the currently active child, if one was ever established.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Groups produced under the active child, if any.
    #[must_use]
    pub fn produced(&self) -> Option<usize> {
        self.produced
    }

    /// Moves the active index one child forward (`None` counts as one
    /// before child 0) and returns the new index.
    pub fn advance(&mut self) -> usize {
        let next = self.active.map_or(0, |index| index + 1);
        self.active = Some(next);
        next
    }

    /// Pins the active index to child 0.
    ///
    /// Used when a child's cyclic sub-sequence completes and selection
    /// starts over, and when a mid-sequence call finds the cursor
    /// uninitialized. Both paths land on `Some(0)` — not `None` — so that
    /// assembly can still tell "restarted" apart from "never selected".
    pub fn restart(&mut self) {
        self.active = Some(0);
    }

    /// Clears the per-child progress counter back to "no progress".
    pub fn clear_produced(&mut self) {
        self.produced = None;
    }

    /// Counts one more produced group (`None` becomes 0) and returns the
    /// new count.
    pub fn bump_produced(&mut self) -> usize {
        let next = self.produced.map_or(0, |count| count + 1);
        self.produced = Some(next);
        next
    }

    /// An independent copy that keeps the active child but forgets all
    /// progress. This is the cursor half of [`DecodeContext::duplicate`].
    ///
    /// [`DecodeContext::duplicate`]: crate::context::DecodeContext::duplicate
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            active: self.active,
            produced: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cursor_has_nothing_set() {
        let cursor = SequenceCursor::new();
        assert_eq!(cursor.active(), None);
        assert_eq!(cursor.produced(), None);
    }

    #[test]
    fn advance_counts_from_zero() {
        let mut cursor = SequenceCursor::new();
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.active(), Some(2));
    }

    #[test]
    fn restart_pins_to_child_zero_not_none() {
        let mut cursor = SequenceCursor::at(4);
        cursor.restart();
        assert_eq!(cursor.active(), Some(0));

        // An advance after a restart moves to child 1, not back to 0.
        assert_eq!(cursor.advance(), 1);
    }

    #[test]
    fn bump_produced_counts_from_zero() {
        let mut cursor = SequenceCursor::new();
        assert_eq!(cursor.bump_produced(), 0);
        assert_eq!(cursor.bump_produced(), 1);
        cursor.clear_produced();
        assert_eq!(cursor.produced(), None);
        assert_eq!(cursor.bump_produced(), 0);
    }

    #[test]
    fn duplicate_keeps_active_and_drops_progress() {
        let mut cursor = SequenceCursor::at(3);
        cursor.bump_produced();
        cursor.bump_produced();

        let copy = cursor.duplicate();
        assert_eq!(copy.active(), Some(3));
        assert_eq!(copy.produced(), None);

        // The copy is independent of the original's later mutation.
        cursor.advance();
        assert_eq!(copy.active(), Some(3));
    }
}
