/// Errors raised during decoder selection or group assembly.
///
/// Normal decode control flow — a child declining a group, a cycle
/// restart — travels through the `Assembly` and `Selection` result enums
/// and never appears here. Every variant of this type is fatal to the
/// reply it occurs in: the driver discards the reply's context and reports
/// the failure upward, and no partial result is returned.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── ChainMismatch   ← child index resolved outside the decoder chain
///   ├── RestartLoop     ← child 0 answered a restart with another restart
///   ├── UnpairedGroup   ← key/value collector handed an odd-length group
///   └── Element         ← a leaf decoder rejected its payload
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Selection or assembly computed a child index outside `[0, len)`.
    ///
    /// This means the configured decoder chain does not match the shape of
    /// the reply actually on the wire — for example a reply delivering more
    /// groups than the chain has assemblers for. It indicates a
    /// configuration bug, not transient input corruption, so it is never
    /// retried internally.
    #[error("decoder chain of {len} children has no child {index}: reply shape does not match the configured chain")]
    ChainMismatch { index: usize, len: usize },

    /// While absorbing a cycle restart, child 0 immediately requested
    /// another restart for the same position.
    ///
    /// Re-delegating would loop forever, so the chain is rejected as
    /// misconfigured: the first child of a sequential chain must always be
    /// able to select a real decoder at a cycle boundary.
    #[error("restart loop at position {position}: child 0 re-requested a cycle restart")]
    RestartLoop { position: usize },

    /// A pair-shaped collector was asked to assemble a group whose length
    /// is odd and therefore cannot form key/value pairs.
    #[error("group of {len} elements cannot be assembled into key/value pairs")]
    UnpairedGroup { len: usize },

    /// A leaf decoder rejected its raw payload.
    #[error("element decode failed: {reason}")]
    Element { reason: String },
}

impl DecodeError {
    /// Builds the leaf-rejection variant.
    ///
    /// Leaf decoders live outside this crate; this constructor keeps their
    /// failure path to one line.
    #[must_use]
    pub fn element(reason: impl Into<String>) -> Self {
        DecodeError::Element {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_indices() {
        let err = DecodeError::ChainMismatch { index: 5, len: 2 };
        let text = err.to_string();
        assert!(text.contains("no child 5"), "unexpected message: {text}");
        assert!(text.contains("2 children"), "unexpected message: {text}");
    }

    #[test]
    fn element_constructor_carries_reason() {
        let err = DecodeError::element("not an integer");
        assert_eq!(err.to_string(), "element decode failed: not an integer");
    }
}
