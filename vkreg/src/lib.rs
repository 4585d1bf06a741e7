//! In-memory registry model and parser for the Khronos Vulkan API
//! registry (`vk.xml`).
//!
//! This crate covers components A (Registry Model) and B (Registry
//! Parser). It owns nothing about code generation — callers hand the
//! parsed [`Registry`] to a separate generator (see `vkbind-gen`).

pub mod error;
pub mod model;
mod parse;

pub use error::ParseError;
pub use model::*;
pub use parse::parse_registry;

use std::{fs, io, path::Path};
use tracing::{debug, error_span};

impl Registry {
    /// Reads and parses a registry XML file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Registry, LoadError> {
        let path = path.as_ref();
        error_span!("registry", path = %path.display()).in_scope(|| {
            debug!("reading registry file");
            let xml = fs::read_to_string(path).map_err(LoadError::Io)?;
            Registry::parse(xml).map_err(LoadError::Parse)
        })
    }

    /// Parses a registry already held in memory.
    pub fn parse(xml: String) -> Result<Registry, ParseError> {
        parse_registry(xml)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read registry file: {0}")]
    Io(#[source] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
