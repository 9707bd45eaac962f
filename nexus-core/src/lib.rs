//! Narrative Nexus: structured creative-writing generation.
//!
//! This crate provides:
//! - Prompt composition for six content kinds (story, script, character,
//!   world, dialogue, poem)
//! - A generation client backed by Claude, behind the `TextGenerator` trait
//! - A per-session ledger of generated history and user projects
//! - Plain-text export
//!
//! # Quick Start
//!
//! ```ignore
//! use nexus_core::{ContentKind, Form, Studio, StudioConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut studio = Studio::new(StudioConfig::from_env()?)?;
//!
//!     let form = Form::new()
//!         .with("premise", "A lost key")
//!         .with("genre", "Mystery")
//!         .with("length", "1000")
//!         .with("style", "Minimalist")
//!         .with("tone", "Dark");
//!
//!     let generation = studio.generate_form(ContentKind::Story, &form).await?;
//!     println!("{}", generation.entry.content);
//!
//!     studio.export_entry(generation.entry.id).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod compose;
pub mod config;
pub mod export;
pub mod generator;
pub mod kind;
pub mod ledger;
pub mod studio;
pub mod testing;

// Primary public API
pub use compose::{compose, Form, GenerationRequest, ValidationError};
pub use config::{ConfigError, StudioConfig};
pub use export::{export_filename, ExportError};
pub use generator::{ClaudeGenerator, GenerationError, GeneratorConfig, TextGenerator};
pub use kind::{ContentKind, HistoryFilter, UnknownKind};
pub use ledger::{EntryId, HistoryEntry, Ledger, LedgerError, Project, ProjectItem};
pub use studio::{Generation, Studio, StudioError};
pub use testing::MockGenerator;
