//! Studio - the per-session entry point for content generation.
//!
//! A `Studio` owns one generator and one ledger. Every user action runs
//! against a single studio; concurrent users each get their own.

use crate::compose::{Form, GenerationRequest, ValidationError};
use crate::config::{ConfigError, StudioConfig};
use crate::export::{self, ExportError};
use crate::generator::{ClaudeGenerator, GenerationError, TextGenerator};
use crate::kind::ContentKind;
use crate::ledger::{EntryId, HistoryEntry, Ledger, LedgerError, Project, ProjectItem};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from studio operations.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The result of one successful generation.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The validated request.
    pub request: GenerationRequest,

    /// Instruction sent to the model.
    pub instruction: String,

    /// The entry stored in the ledger.
    pub entry: HistoryEntry,
}

impl Generation {
    /// A project item carrying the request's headline parameters.
    pub fn project_item(&self) -> ProjectItem {
        project_item(&self.entry, Some(&self.request))
    }
}

fn project_item(entry: &HistoryEntry, request: Option<&GenerationRequest>) -> ProjectItem {
    let mut item = ProjectItem::from_entry(entry);
    if let Some(request) = request {
        item.metadata.extend(request.metadata());
    }
    item
}

/// A content generation session.
pub struct Studio {
    generator: Box<dyn TextGenerator>,
    ledger: Ledger,
    config: StudioConfig,
    /// Requests behind entries generated in this session.
    requests: HashMap<EntryId, GenerationRequest>,
}

impl Studio {
    /// Create a studio backed by Claude.
    ///
    /// Requires `ANTHROPIC_API_KEY` environment variable to be set.
    pub fn new(config: StudioConfig) -> Result<Self, StudioError> {
        let generator = ClaudeGenerator::from_env(config.generator_config())?;
        Ok(Self::with_generator(generator, config))
    }

    /// Create a studio with any generator.
    pub fn with_generator(generator: impl TextGenerator + 'static, config: StudioConfig) -> Self {
        Self {
            generator: Box::new(generator),
            ledger: Ledger::new(),
            config,
            requests: HashMap::new(),
        }
    }

    /// Validate a form and generate content from it.
    pub async fn generate_form(&mut self, kind: ContentKind, form: &Form) -> Result<Generation, StudioError> {
        let request = GenerationRequest::from_form(kind, form)?;
        self.generate(request).await
    }

    /// Generate content for a request and record it in history.
    ///
    /// On failure nothing is recorded.
    pub async fn generate(&mut self, request: GenerationRequest) -> Result<Generation, StudioError> {
        let kind = request.kind();
        let instruction = request.instruction();
        tracing::debug!(kind = %kind, chars = instruction.len(), "requesting generation");

        let text = self.generator.generate(&instruction).await?;

        let entry = self.ledger.append_history(kind, text);
        self.requests.insert(entry.id, request.clone());
        tracing::info!(kind = %kind, id = %entry.id, "generated content");

        Ok(Generation {
            request,
            instruction,
            entry,
        })
    }

    /// Like [`Studio::generate`], abandoning the call when `cancel` completes first.
    ///
    /// A cancelled generation records nothing and reports
    /// [`GenerationError::Cancelled`].
    pub async fn generate_until<F>(
        &mut self,
        request: GenerationRequest,
        cancel: F,
    ) -> Result<Generation, StudioError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.generate(request) => result,
            _ = cancel => {
                tracing::info!("generation cancelled");
                Err(GenerationError::Cancelled.into())
            }
        }
    }

    /// Remove an entry from history. Removing twice is harmless.
    pub fn remove_entry(&mut self, id: EntryId) -> bool {
        self.requests.remove(&id);
        self.ledger.remove_history(id)
    }

    /// The request that produced an entry, if it was generated here.
    pub fn request_for(&self, id: EntryId) -> Option<&GenerationRequest> {
        self.requests.get(&id)
    }

    /// Create a project and return its index.
    pub fn create_project(&mut self, name: impl Into<String>) -> usize {
        self.ledger.create_project(name);
        self.ledger.projects().len() - 1
    }

    /// Save a history entry into a project, with its request metadata when known.
    pub fn save_entry_to_project(&mut self, index: usize, id: EntryId) -> Result<&Project, StudioError> {
        let entry = self.ledger.entry(id).ok_or(LedgerError::EntryNotFound(id))?;
        let item = project_item(entry, self.requests.get(&id));
        Ok(self.ledger.save_to_project(index, item)?)
    }

    /// Export an entry to the configured export directory.
    pub async fn export_entry(&self, id: EntryId) -> Result<PathBuf, StudioError> {
        self.export_entry_to(&self.config.export_dir, id).await
    }

    /// Export an entry to `dir`.
    pub async fn export_entry_to(&self, dir: impl AsRef<Path>, id: EntryId) -> Result<PathBuf, StudioError> {
        let entry = self.ledger.entry(id).ok_or(LedgerError::EntryNotFound(id))?;
        Ok(export::export_entry(dir, entry).await?)
    }

    /// Get a reference to the ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_form, MockGenerator};

    #[test]
    fn test_generation_project_item_metadata() {
        let request =
            GenerationRequest::from_form(ContentKind::Story, &sample_form(ContentKind::Story)).unwrap();
        let mut ledger = Ledger::new();
        let entry = ledger.append_history(ContentKind::Story, "The key was in the well.");
        let generation = Generation {
            instruction: request.instruction(),
            request,
            entry,
        };

        let item = generation.project_item();
        assert_eq!(item.kind, ContentKind::Story);
        assert_eq!(item.content, "The key was in the well.");
        assert_eq!(item.metadata["genre"], "Mystery");
        assert_eq!(item.metadata["length"], "1000");
        assert!(item.metadata.contains_key("created_at"));
    }

    #[tokio::test]
    async fn test_generate_records_unmodified_text() {
        let mock = MockGenerator::new(["  The lighthouse keeper counted waves.\n"]);
        let mut studio = Studio::with_generator(mock.clone(), StudioConfig::default());

        let generation = studio
            .generate_form(ContentKind::Story, &sample_form(ContentKind::Story))
            .await
            .unwrap();

        assert_eq!(generation.entry.content, "  The lighthouse keeper counted waves.\n");
        assert_eq!(studio.ledger().history_len(), 1);
        assert_eq!(mock.instructions(), vec![generation.instruction.clone()]);
        assert!(studio.request_for(generation.entry.id).is_some());
    }

    #[tokio::test]
    async fn test_remove_entry_forgets_request() {
        let mock = MockGenerator::new(["text"]);
        let mut studio = Studio::with_generator(mock, StudioConfig::default());
        let generation = studio
            .generate_form(ContentKind::Poem, &sample_form(ContentKind::Poem))
            .await
            .unwrap();

        assert!(studio.remove_entry(generation.entry.id));
        assert!(!studio.remove_entry(generation.entry.id));
        assert!(studio.request_for(generation.entry.id).is_none());
    }
}
