pub mod commands;
pub mod file_parsers;

pub use file_parsers::bnd2::{
    Bnd2Error, Bundle, ImportEntry, Platform, ResourceEntry, load_bundle, save_bundle,
};
