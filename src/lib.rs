//! Consolidates the per-category wiki scrapes (weapons, equipment,
//! modifications, materials and ammo) into one game-data document.

pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod raw;
pub mod source;

pub use crate::config::Settings;
pub use error::{Error, Result};
pub use model::GameData;
pub use pipeline::{consolidate, run, Consolidated, Sources, Summary};
pub use source::{DocumentSink, ImageLookup, JsonDirSource, JsonFileSink, SourceKind, SourceProvider};
