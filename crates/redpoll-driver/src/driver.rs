use redpoll_reply::{Assembly, CompositeDecoder, DecodeContext, Selection};
use redpoll_types::{Element, ReplyValue};

use crate::config::DriverConfig;
use crate::error::DriverError;

/// Upper bound on the capacity reserved up front for one group's parts.
///
/// An aggregate header is attacker-controlled data; reserving whatever it
/// announces would let a single header allocate the configured maximum
/// before any element arrives. Groups larger than this grow organically.
const PREALLOC_LIMIT: usize = 1024;

/// Walks one reply through a composite decoder chain.
///
/// The driver sits between the framing layer and the composite core. It
/// consumes [`Element`]s as framing produces them, translates each into
/// the selection/assembly calls the chain expects, and tracks the one
/// piece of state the chain deliberately does not: which groups are
/// currently open and what has been decoded into them.
///
/// ```text
/// framing ──Element──▶ ReplyDriver ──select_decoder──▶ chain
///                          │  ▲                          │
///                          │  └──────── leaf ◀───────────┘
///                          │      (decode payload)
///                          └──assemble (at group close)──▶ chain
/// ```
///
/// One driver decodes one reply at a time. Pipelined replies either get
/// one driver each (independent contexts) or reuse a single driver via
/// [`begin_next`](Self::begin_next), which keeps the context — and with
/// it the chain's selection position — across replies. Dropping the
/// driver cancels the reply; there is nothing to unwind.
///
/// Position numbering restarts at 0 inside every group, so the chain sees
/// each nested unit begin with a fresh sequence start. Nil elements are
/// placed directly without consulting selection — absent values carry no
/// payload for a leaf to decode.
pub struct ReplyDriver<'d> {
    chain: &'d dyn CompositeDecoder,
    config: DriverConfig,
    ctx: DecodeContext,
    stack: Vec<OpenGroup>,
    finished: bool,
}

struct OpenGroup {
    expected: usize,
    parts: Vec<ReplyValue>,
}

/// What [`ReplyDriver::feed`] reports after each element.
#[derive(Debug, PartialEq)]
pub enum Progress {
    /// The reply fully assembled into this value.
    Complete(ReplyValue),
    /// More elements are needed.
    Incomplete,
}

impl Progress {
    /// The assembled value, if the reply completed.
    #[must_use]
    pub fn into_value(self) -> Option<ReplyValue> {
        match self {
            Progress::Complete(value) => Some(value),
            Progress::Incomplete => None,
        }
    }
}

impl<'d> ReplyDriver<'d> {
    /// A driver over `chain` with default limits.
    #[must_use]
    pub fn new(chain: &'d dyn CompositeDecoder) -> Self {
        Self::with_config(chain, DriverConfig::default())
    }

    /// A driver over `chain` with explicit limits.
    #[must_use]
    pub fn with_config(chain: &'d dyn CompositeDecoder, config: DriverConfig) -> Self {
        Self {
            chain,
            config,
            ctx: DecodeContext::new(),
            stack: Vec::new(),
            finished: false,
        }
    }

    /// Consumes one element from the framing layer.
    ///
    /// # Errors
    ///
    /// Fails on chain errors (selection/assembly), guard violations
    /// (depth, group size), an escaped cycle restart, an unclaimed group,
    /// or an element arriving after completion. Any error abandons the
    /// reply; the driver must not be fed further.
    pub fn feed(&mut self, element: Element) -> Result<Progress, DriverError> {
        if self.finished {
            return Err(DriverError::TrailingElement);
        }
        match element {
            Element::Bulk(payload) => {
                let position = self.stack.last().map_or(0, |group| group.parts.len());
                let chain = self.chain;
                let leaf = match chain.select_decoder(position, &mut self.ctx)? {
                    Selection::Element(leaf) => leaf,
                    Selection::Restart => {
                        return Err(DriverError::RestartEscaped { position });
                    }
                };
                let value = leaf.decode(&payload, &self.ctx)?;
                self.place(value)
            }
            // Absent values bypass decoder selection: there is no payload
            // to decode and the position is still consumed by placement.
            Element::Nil => self.place(ReplyValue::Nil),
            Element::Aggregate { len } => {
                if len > self.config.max_group_len {
                    return Err(DriverError::OversizedGroup {
                        len,
                        limit: self.config.max_group_len,
                    });
                }
                if self.stack.len() >= self.config.max_depth {
                    return Err(DriverError::DepthExceeded {
                        depth: self.stack.len() + 1,
                        limit: self.config.max_depth,
                    });
                }
                if len == 0 {
                    // An empty aggregate is already a complete group;
                    // assemble it without opening a frame.
                    let mut parts = Vec::new();
                    let value = self.assemble_group(&mut parts)?;
                    return self.place(value);
                }
                tracing::trace!("group open: {} elements at depth {}", len, self.stack.len() + 1);
                self.stack.push(OpenGroup {
                    expected: len,
                    parts: Vec::with_capacity(len.min(PREALLOC_LIMIT)),
                });
                Ok(Progress::Incomplete)
            }
        }
    }

    /// Feeds a whole script of elements, returning the last progress.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`feed`](Self::feed) error.
    pub fn feed_all<I>(&mut self, elements: I) -> Result<Progress, DriverError>
    where
        I: IntoIterator<Item = Element>,
    {
        let mut progress = Progress::Incomplete;
        for element in elements {
            progress = self.feed(element)?;
        }
        Ok(progress)
    }

    /// Rearms the driver for the next reply on the same context.
    ///
    /// The context keeps its cursor, so the next reply's first selection
    /// advances the chain one child forward — this is how one driver
    /// decodes a run of same-shaped replies with a chain that assigns
    /// each reply its own child.
    ///
    /// # Errors
    ///
    /// [`DriverError::ReplyUnfinished`] if groups are still open.
    pub fn begin_next(&mut self) -> Result<(), DriverError> {
        if !self.stack.is_empty() {
            return Err(DriverError::ReplyUnfinished {
                open_groups: self.stack.len(),
            });
        }
        self.finished = false;
        Ok(())
    }

    /// A sibling driver for decoding one repeating unit.
    ///
    /// The fork shares the chain but duplicates the context: same active
    /// child, cleared group progress, empty stack. The parent driver is
    /// not affected by anything the fork does.
    #[must_use]
    pub fn fork_unit(&self) -> ReplyDriver<'d> {
        ReplyDriver {
            chain: self.chain,
            config: self.config,
            ctx: self.ctx.duplicate(),
            stack: Vec::new(),
            finished: false,
        }
    }

    /// The reply's decode context, for inspection.
    #[must_use]
    pub fn context(&self) -> &DecodeContext {
        &self.ctx
    }

    /// `true` once the reply has fully assembled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Places a decoded value into the innermost open group, cascading
    /// assembly for every group the placement completes.
    fn place(&mut self, mut value: ReplyValue) -> Result<Progress, DriverError> {
        while let Some(mut group) = self.stack.pop() {
            group.parts.push(value);
            if group.parts.len() < group.expected {
                self.stack.push(group);
                return Ok(Progress::Incomplete);
            }
            tracing::trace!(
                "group close: {} elements at depth {}",
                group.parts.len(),
                self.stack.len() + 1
            );
            value = self.assemble_group(&mut group.parts)?;
        }
        self.finished = true;
        tracing::debug!("reply assembled");
        Ok(Progress::Complete(value))
    }

    fn assemble_group(&mut self, parts: &mut Vec<ReplyValue>) -> Result<ReplyValue, DriverError> {
        let len = parts.len();
        let chain = self.chain;
        match chain.assemble(parts, &mut self.ctx)? {
            Assembly::Value(value) => Ok(value),
            Assembly::Decline => Err(DriverError::UnclaimedGroup { len }),
        }
    }
}
