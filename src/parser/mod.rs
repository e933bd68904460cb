//! Parser for the structured config block of a definition file

mod scanner;
pub mod value;

pub use scanner::parse;
pub use value::{Mapping, StructuredValue};
