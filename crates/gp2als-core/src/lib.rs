//! Import Guitar Pro rehearsal marks into Ableton Live sets.
//!
//! The pipeline has three parts:
//!
//! - [`project`] reads and rewrites gzip-compressed `.als` files, keeping a
//!   backup of the previous version;
//! - [`notation`] extracts `(bar, label)` pairs from a MusicXML export;
//! - [`locators`] turns those pairs into arrangement locators inside the
//!   set's `LiveSet` element.
//!
//! [`pipeline::run`] wires them together.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod document;
pub mod error;
pub mod locators;
pub mod notation;
pub mod pipeline;
pub mod project;

pub use config::ImportConfig;
pub use document::{Document, Element, NodeId};
pub use error::{Error, Result};
pub use locators::Locator;
pub use notation::MarkerRecord;
pub use pipeline::{run, ImportReport};
pub use project::SavedProject;
