pub mod damage;
mod error;
mod line;
mod parser;
mod reader;

pub use damage::{DecodedHit, HitKind, HitQualifier};
pub use error::ReaderError;
pub use line::*;
pub use parser::parse_line;
pub use reader::Reader;
