use bytes::Bytes;

/// One raw protocol element, as the framing layer delivers it.
///
/// The framing layer owns the byte grammar: it splits the connection's
/// byte stream into discrete elements and hands them over one at a time.
/// Everything above that boundary — decoder selection, group tracking,
/// assembly — works in terms of this enum and never sees raw wire bytes
/// except inside a `Bulk` payload.
///
/// ```text
/// ┌───────────┬────────────────────────────────────────────────────┐
/// │ Variant   │ Meaning                                            │
/// ├───────────┼────────────────────────────────────────────────────┤
/// │ Bulk      │ one binary-safe payload, decoded by a leaf decoder │
/// │ Aggregate │ group header: the next `len` elements form a group │
/// │ Nil       │ explicit absent value (nil bulk or nil aggregate)  │
/// └───────────┴────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A single binary-safe payload.
    Bulk(Bytes),
    /// A group header announcing `len` elements (which may themselves be
    /// aggregates, nesting arbitrarily).
    Aggregate { len: usize },
    /// An explicit absent value. Framing layers deliver both nil bulks
    /// and nil aggregates as this variant.
    Nil,
}

impl Element {
    /// Convenience constructor for a bulk payload copied out of a slice.
    #[must_use]
    pub fn bulk(payload: &[u8]) -> Self {
        Element::Bulk(Bytes::copy_from_slice(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_copies_payload() {
        let el = Element::bulk(b"abc");
        assert_eq!(el, Element::Bulk(Bytes::from_static(b"abc")));
    }
}
