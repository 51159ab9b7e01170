#![warn(clippy::pedantic)]

pub mod element;
pub mod value;

pub use element::Element;
pub use value::ReplyValue;
