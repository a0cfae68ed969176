//! # Rover Lines
//!
//! Voiced line table for the rover character:
//! - Line ids mapped to audio asset paths and captions
//! - Category groups of ordered line ids
//! - Artifact loading with full validation
//! - Asset presence checks and configuration loading
//!
//! A [`LineTable`] is built once at startup and then only read. It holds no
//! interior mutability and can be shared across threads by reference or
//! `Arc`.

pub mod artifact;
pub mod asset_name;
pub mod assets;
pub mod builtin;
pub mod config;
pub mod error;
pub mod model;
pub mod table;

pub use artifact::LineArtifact;
pub use asset_name::{AssetName, Intensity};
pub use error::{Error, LookupKind, Result, Violation};
pub use model::{AudioContainer, AudioEntry, LineId};
pub use table::LineTable;
