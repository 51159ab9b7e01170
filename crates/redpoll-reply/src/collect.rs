//! Reusable composites for the common reply shapes: uniform lists,
//! key/value runs, cyclic field tuples, and fixed-arity repeating units.
//!
//! None of these is special to the sequential algorithm — they are plain
//! [`CompositeDecoder`] implementations meant to be chained inside a
//! [`SequenceDecoder`] (or used alone as the root for trivial shapes).
//!
//! [`SequenceDecoder`]: crate::sequence::SequenceDecoder

use redpoll_types::ReplyValue;

use crate::context::DecodeContext;
use crate::decoder::{Assembly, CompositeDecoder, ElementDecoder, Selection, Verbatim};
use crate::error::DecodeError;

/// Uniform sequence: one leaf for every position, groups assembled into
/// [`ReplyValue::Array`]. Never declines, never restarts.
pub struct ListCollector {
    leaf: Box<dyn ElementDecoder>,
}

impl ListCollector {
    #[must_use]
    pub fn new(leaf: Box<dyn ElementDecoder>) -> Self {
        Self { leaf }
    }

    /// A list of raw payloads, element decoding left to [`Verbatim`].
    #[must_use]
    pub fn verbatim() -> Self {
        Self::new(Box::new(Verbatim))
    }
}

impl CompositeDecoder for ListCollector {
    fn select_decoder(
        &self,
        _position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        Ok(Selection::Element(self.leaf.as_ref()))
    }

    fn assemble(
        &self,
        parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        Ok(Assembly::Value(ReplyValue::Array(std::mem::take(parts))))
    }
}

/// Alternating key/value sequence assembled into [`ReplyValue::Map`].
///
/// Keys sit at even positions, values at odd ones. A completed group must
/// therefore have even length; an odd group is a shape error
/// ([`DecodeError::UnpairedGroup`]), not a decline — the group can never
/// become pairs no matter which child looks at it.
pub struct MapCollector {
    key: Box<dyn ElementDecoder>,
    value: Box<dyn ElementDecoder>,
}

impl MapCollector {
    #[must_use]
    pub fn new(key: Box<dyn ElementDecoder>, value: Box<dyn ElementDecoder>) -> Self {
        Self { key, value }
    }

    /// Key and value payloads passed through raw.
    #[must_use]
    pub fn verbatim() -> Self {
        Self::new(Box::new(Verbatim), Box::new(Verbatim))
    }
}

impl CompositeDecoder for MapCollector {
    fn select_decoder(
        &self,
        position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        let leaf = if position % 2 == 0 {
            self.key.as_ref()
        } else {
            self.value.as_ref()
        };
        Ok(Selection::Element(leaf))
    }

    fn assemble(
        &self,
        parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        if parts.len() % 2 != 0 {
            return Err(DecodeError::UnpairedGroup { len: parts.len() });
        }
        let mut entries = Vec::with_capacity(parts.len() / 2);
        let mut taken = std::mem::take(parts).into_iter();
        while let (Some(key), Some(value)) = (taken.next(), taken.next()) {
            entries.push((key, value));
        }
        Ok(Assembly::Value(ReplyValue::Map(entries)))
    }
}

/// Fixed cycle of per-position leaves — the selection half of a repeating
/// tuple of heterogeneous fields.
///
/// Position `p` selects `fields[p % len]`; a nonzero multiple of the cycle
/// length reports the cycle complete via [`Selection::Restart`] so the
/// enclosing chain can bounce selection back to its first child. Because a
/// restart is re-answered by child 0 for the *same* position, a cycle must
/// not sit at the head of its chain: child 0 would just report complete
/// again, which the sequence rejects as [`DecodeError::RestartLoop`].
///
/// Assembly always declines; pair the cycle with a collector later in the
/// chain to claim the groups it steered.
pub struct FieldCycle {
    fields: Box<[Box<dyn ElementDecoder>]>,
}

impl FieldCycle {
    /// # Panics
    ///
    /// Panics if `fields` is empty.
    #[must_use]
    pub fn new(fields: Vec<Box<dyn ElementDecoder>>) -> Self {
        assert!(!fields.is_empty(), "a field cycle needs at least one field");
        Self {
            fields: fields.into_boxed_slice(),
        }
    }
}

impl CompositeDecoder for FieldCycle {
    fn select_decoder(
        &self,
        position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        if position != 0 && position % self.fields.len() == 0 {
            return Ok(Selection::Restart);
        }
        Ok(Selection::Element(self.fields[position % self.fields.len()].as_ref()))
    }

    fn assemble(
        &self,
        _parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        Ok(Assembly::Decline)
    }
}

/// Fixed-arity unit assembler — the assembly half of a repeating tuple.
///
/// Selection always answers [`Selection::Restart`]: by the time the cursor
/// lands here a whole unit has been consumed, so the next unit's first
/// element belongs to the chain's first child again. Assembly claims
/// exactly `arity` parts as one [`ReplyValue::Array`] and declines any
/// other group size, letting a later child (typically the outer list
/// collector) take those.
pub struct UnitCollector {
    arity: usize,
}

impl UnitCollector {
    /// # Panics
    ///
    /// Panics if `arity` is zero.
    #[must_use]
    pub fn new(arity: usize) -> Self {
        assert!(arity > 0, "a unit needs at least one part");
        Self { arity }
    }
}

impl CompositeDecoder for UnitCollector {
    fn select_decoder(
        &self,
        _position: usize,
        _ctx: &mut DecodeContext,
    ) -> Result<Selection<'_>, DecodeError> {
        Ok(Selection::Restart)
    }

    fn assemble(
        &self,
        parts: &mut Vec<ReplyValue>,
        _ctx: &mut DecodeContext,
    ) -> Result<Assembly, DecodeError> {
        if parts.len() != self.arity {
            return Ok(Assembly::Decline);
        }
        Ok(Assembly::Value(ReplyValue::Array(std::mem::take(parts))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);

    impl ElementDecoder for Label {
        fn decode(&self, _payload: &[u8], _ctx: &DecodeContext) -> Result<ReplyValue, DecodeError> {
            Ok(ReplyValue::Text(self.0.to_owned()))
        }
    }

    fn tag_of(selection: Selection<'_>) -> String {
        let ctx = DecodeContext::new();
        match selection.element().unwrap().decode(b"", &ctx).unwrap() {
            ReplyValue::Text(tag) => tag,
            other => panic!("label leaf produced {other:?}"),
        }
    }

    #[test]
    fn list_collects_everything_into_an_array() {
        let list = ListCollector::verbatim();
        let mut ctx = DecodeContext::new();

        let mut group = vec![ReplyValue::Int(1), ReplyValue::Int(2)];
        let result = list.assemble(&mut group, &mut ctx).unwrap();
        assert_eq!(
            result,
            Assembly::Value(ReplyValue::Array(vec![
                ReplyValue::Int(1),
                ReplyValue::Int(2),
            ]))
        );
        assert!(group.is_empty());
    }

    #[test]
    fn map_alternates_key_and_value_leaves() {
        let map = MapCollector::new(Box::new(Label("key")), Box::new(Label("value")));
        let mut ctx = DecodeContext::new();

        for (position, expected) in [(0, "key"), (1, "value"), (2, "key"), (3, "value")] {
            let selection = map.select_decoder(position, &mut ctx).unwrap();
            assert_eq!(tag_of(selection), expected);
        }
    }

    #[test]
    fn map_pairs_consecutive_parts_in_order() {
        let map = MapCollector::verbatim();
        let mut ctx = DecodeContext::new();

        let mut group = vec![
            ReplyValue::Text("a".into()),
            ReplyValue::Int(1),
            ReplyValue::Text("b".into()),
            ReplyValue::Int(2),
        ];
        let result = map.assemble(&mut group, &mut ctx).unwrap();
        assert_eq!(
            result,
            Assembly::Value(ReplyValue::Map(vec![
                (ReplyValue::Text("a".into()), ReplyValue::Int(1)),
                (ReplyValue::Text("b".into()), ReplyValue::Int(2)),
            ]))
        );
    }

    #[test]
    fn map_rejects_odd_groups() {
        let map = MapCollector::verbatim();
        let mut ctx = DecodeContext::new();

        let mut group = vec![ReplyValue::Int(1), ReplyValue::Int(2), ReplyValue::Int(3)];
        let err = map.assemble(&mut group, &mut ctx).unwrap_err();
        assert!(matches!(err, DecodeError::UnpairedGroup { len: 3 }));
    }

    #[test]
    fn field_cycle_walks_fields_and_reports_cycle_ends() {
        let cycle = FieldCycle::new(vec![Box::new(Label("id")), Box::new(Label("body"))]);
        let mut ctx = DecodeContext::new();

        assert_eq!(tag_of(cycle.select_decoder(0, &mut ctx).unwrap()), "id");
        assert_eq!(tag_of(cycle.select_decoder(1, &mut ctx).unwrap()), "body");
        assert!(cycle.select_decoder(2, &mut ctx).unwrap().is_restart());
        assert_eq!(tag_of(cycle.select_decoder(3, &mut ctx).unwrap()), "body");
        assert!(cycle.select_decoder(4, &mut ctx).unwrap().is_restart());
    }

    #[test]
    fn field_cycle_never_assembles() {
        let cycle = FieldCycle::new(vec![Box::new(Label("id"))]);
        let mut ctx = DecodeContext::new();

        let mut group = vec![ReplyValue::Int(1)];
        assert_eq!(cycle.assemble(&mut group, &mut ctx).unwrap(), Assembly::Decline);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn unit_selection_always_hands_back_control() {
        let unit = UnitCollector::new(2);
        let mut ctx = DecodeContext::new();
        assert!(unit.select_decoder(0, &mut ctx).unwrap().is_restart());
        assert!(unit.select_decoder(7, &mut ctx).unwrap().is_restart());
    }

    #[test]
    fn unit_claims_exactly_its_arity() {
        let unit = UnitCollector::new(2);
        let mut ctx = DecodeContext::new();

        let mut pair = vec![ReplyValue::Int(1), ReplyValue::Int(2)];
        let result = unit.assemble(&mut pair, &mut ctx).unwrap();
        assert_eq!(
            result,
            Assembly::Value(ReplyValue::Array(vec![
                ReplyValue::Int(1),
                ReplyValue::Int(2),
            ]))
        );

        let mut triple = vec![ReplyValue::Int(1), ReplyValue::Int(2), ReplyValue::Int(3)];
        assert_eq!(unit.assemble(&mut triple, &mut ctx).unwrap(), Assembly::Decline);
        assert_eq!(triple.len(), 3, "declined parts stay untouched");
    }
}
