use redpoll_reply::DecodeError;

/// Errors surfaced while driving one reply to completion.
///
/// Anything fatal inside the composite layer arrives here through the
/// transparent `Decode` variant; the remaining variants are boundary
/// conditions only the driver can see (it owns the group stack and the
/// element feed).
///
/// Error hierarchy:
///
/// ```text
///   DriverError
///   ├── Decode(DecodeError)  ← selection/assembly failed in the chain
///   ├── DepthExceeded        ← aggregates nested past the configured cap
///   ├── OversizedGroup       ← aggregate header announced too many elements
///   ├── RestartEscaped       ← root composite answered with a cycle restart
///   ├── UnclaimedGroup       ← every child declined a completed group
///   ├── TrailingElement      ← element arrived after the reply completed
///   └── ReplyUnfinished      ← begin_next() with groups still open
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The composite chain failed fatally during selection or assembly.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An aggregate header would nest groups deeper than the configured
    /// limit allows.
    #[error("aggregate nesting depth {depth} exceeds the configured limit {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    /// An aggregate header announced more elements than the configured
    /// limit allows.
    #[error("aggregate header announces {len} elements, over the configured limit {limit}")]
    OversizedGroup { len: usize, limit: usize },

    /// The root composite answered selection with a cycle restart.
    ///
    /// Restarts are meant to be absorbed by an enclosing sequential
    /// chain. One reaching the driver means the root composite is a bare
    /// cycle with nothing above it to bounce selection back to.
    #[error("cycle restart escaped to the driver at position {position}")]
    RestartEscaped { position: usize },

    /// A group completed but every child in the chain declined it, so
    /// there is no value to place.
    #[error("no child claimed a completed group of {len} elements")]
    UnclaimedGroup { len: usize },

    /// An element was fed after the reply had already completed. Feed the
    /// next reply after `begin_next()`, or into a fresh driver.
    #[error("element delivered after the reply completed")]
    TrailingElement,

    /// `begin_next()` was called while the current reply still has open
    /// groups.
    #[error("cannot start the next reply with {open_groups} groups still open")]
    ReplyUnfinished { open_groups: usize },
}
