/// Configuration for a [`ReplyDriver`].
///
/// Both fields guard against hostile or corrupt aggregate headers — a
/// reply that *announces* absurd structure before delivering a single
/// element. Neither is a protocol limit; well-formed replies never get
/// near the defaults.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Field         │ Purpose                                          │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ max_depth     │ How deep aggregates may nest before the reply is │
/// │               │ rejected. Depth 1 is a flat aggregate.           │
/// │ max_group_len │ Largest element count one aggregate header may   │
/// │               │ announce.                                        │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// [`ReplyDriver`]: crate::driver::ReplyDriver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Maximum aggregate nesting depth. Exceeding it fails the reply with
    /// [`DriverError::DepthExceeded`](crate::error::DriverError::DepthExceeded).
    pub max_depth: usize,

    /// Maximum element count a single aggregate header may announce.
    /// Exceeding it fails the reply with
    /// [`DriverError::OversizedGroup`](crate::error::DriverError::OversizedGroup).
    pub max_group_len: usize,
}

impl Default for DriverConfig {
    /// Defaults: depth 32, one million elements per group.
    ///
    /// Real reply grammars nest a handful of levels; 32 leaves room for
    /// deeply composed shapes while stopping header-driven stack growth
    /// long before it matters.
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_group_len: 1 << 20,
        }
    }
}
