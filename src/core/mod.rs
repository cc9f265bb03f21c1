// Engine-neutral value model plus the native parser and writer.
pub mod error;
pub mod map;
pub mod number;
pub mod parse;
pub mod serialize;
pub mod value;
