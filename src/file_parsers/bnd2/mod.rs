use anyhow::Result;

use crate::file_parsers::FileParser;

pub mod alignment;
pub mod dependencies;
pub mod error;
pub mod parser;
pub mod platform;
pub mod types;
pub mod writer;

pub use error::Bnd2Error;
pub use parser::load_bundle;
pub use platform::Platform;
pub use types::{Bundle, ImportEntry, ResourceEntry};
pub use writer::save_bundle;

pub struct Bnd2Parser;

impl FileParser for Bnd2Parser {
    type Output = Bundle;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output> {
        Ok(load_bundle(bytes)?)
    }
}
