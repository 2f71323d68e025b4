//! Core library for the Sunless Sea Save Editor (SSSE).
//! Loads the game's quality definitions, reconciles a save's possessed qualities against them,
//! and writes edits back with unmodified saves kept byte-for-byte.

mod catalog;
mod editor;
mod error;
pub mod locate;
pub mod path;
mod qualities;
mod quality;
mod save;
pub mod statics;
mod value;

pub use catalog::{QualityCatalog, TrackedQuality};
pub use editor::{
    CargoDelta, Editor, EditorOptions, Field, OfficerRole, Panel, Presence, SaveWarning, ShipView,
};
pub use error::{Error, Result};
pub use qualities::{ListSource, Loaded, QualitiesList};
pub use quality::{QualityClass, QualityFactory, QualityItem, QualityKind, Ship, ShipAttribute};
pub use save::{SaveDocument, SaveSummary, backup_path, json_target_path};
pub use value::{Number, Value};
