#![warn(clippy::pedantic)]

pub mod error;
pub mod cursor;
pub mod context;
pub mod decoder;
pub mod sequence;
pub mod collect;

pub use collect::{FieldCycle, ListCollector, MapCollector, UnitCollector};
pub use context::DecodeContext;
pub use cursor::SequenceCursor;
pub use decoder::{Assembly, CompositeDecoder, ElementDecoder, Selection, Verbatim};
pub use error::DecodeError;
pub use sequence::SequenceDecoder;
