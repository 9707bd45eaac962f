//! Session ledger: generated history and user projects.
//!
//! The ledger lives for one session only. History is append-only apart from
//! explicit removal; project items are append-only.

use crate::kind::{ContentKind, HistoryFilter};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors from ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("no project at index {index} ({len} projects exist)")]
    ProjectIndex { index: usize, len: usize },

    #[error("no history entry with id {0}")]
    EntryNotFound(EntryId),
}

/// Unique identifier for history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated item as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Local>,
    pub kind: ContentKind,
    pub content: String,
}

/// An item saved into a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub kind: ContentKind,
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ProjectItem {
    pub fn new(kind: ContentKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Copy a history entry into a project item, stamping `created_at`.
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self::new(entry.kind, entry.content.clone())
            .with_metadata("created_at", entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

/// A named collection of saved items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub created_at: DateTime<Local>,
    pub items: Vec<ProjectItem>,
}

/// Counts shown on a session dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub by_kind: BTreeMap<ContentKind, usize>,
    pub total: usize,
    pub projects: usize,
}

impl LedgerStats {
    pub fn count(&self, kind: ContentKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// In-memory record of everything generated and saved in one session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    history: Vec<HistoryEntry>,
    projects: Vec<Project>,
    last_stamp: Option<DateTime<Local>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps strictly increase, even if the wall clock stalls or runs backwards.
    fn stamp(&mut self) -> DateTime<Local> {
        let now = Local::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + chrono::Duration::nanoseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    /// Record generated content and return the stored entry.
    pub fn append_history(&mut self, kind: ContentKind, content: impl Into<String>) -> HistoryEntry {
        let entry = HistoryEntry {
            id: EntryId::new(),
            timestamp: self.stamp(),
            kind,
            content: content.into(),
        };
        tracing::debug!(id = %entry.id, kind = %kind, "appended history entry");
        self.history.push(entry.clone());
        entry
    }

    /// Remove the entry with `id`. Removing an absent entry is a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn remove_history(&mut self, id: EntryId) -> bool {
        let Some(pos) = self.history.iter().position(|e| e.id == id) else {
            return false;
        };
        self.history.remove(pos);
        tracing::debug!(%id, "removed history entry");
        true
    }

    pub fn entry(&self, id: EntryId) -> Option<&HistoryEntry> {
        self.history.iter().find(|e| e.id == id)
    }

    /// Entries in insertion order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Matching entries, most recent first.
    pub fn filter_history(&self, filter: impl Into<HistoryFilter>) -> HistoryView<'_> {
        HistoryView {
            entries: self.history.iter().rev(),
            filter: filter.into(),
        }
    }

    /// The last `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev().take(n)
    }

    pub fn count_by_kind(&self, kind: ContentKind) -> usize {
        self.filter_history(kind).count()
    }

    pub fn stats(&self) -> LedgerStats {
        let mut by_kind = BTreeMap::new();
        for entry in &self.history {
            *by_kind.entry(entry.kind).or_insert(0) += 1;
        }
        LedgerStats {
            by_kind,
            total: self.history.len(),
            projects: self.projects.len(),
        }
    }

    /// Create an empty project. Names need not be unique.
    pub fn create_project(&mut self, name: impl Into<String>) -> &Project {
        let project = Project {
            name: name.into(),
            created_at: Local::now(),
            items: Vec::new(),
        };
        tracing::debug!(name = %project.name, index = self.projects.len(), "created project");
        self.projects.push(project);
        &self.projects[self.projects.len() - 1]
    }

    /// Append `item` to the project at `index`.
    pub fn save_to_project(&mut self, index: usize, item: ProjectItem) -> Result<&Project, LedgerError> {
        let len = self.projects.len();
        let project = self
            .projects
            .get_mut(index)
            .ok_or(LedgerError::ProjectIndex { index, len })?;
        project.items.push(item);
        tracing::debug!(index, items = project.items.len(), "saved item to project");
        Ok(project)
    }

    /// Copy a history entry into a project.
    pub fn save_entry_to_project(&mut self, index: usize, id: EntryId) -> Result<&Project, LedgerError> {
        let entry = self.entry(id).ok_or(LedgerError::EntryNotFound(id))?;
        let item = ProjectItem::from_entry(entry);
        self.save_to_project(index, item)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }
}

/// Lazy view over history entries matching a filter, most recent first.
///
/// Nothing is evaluated until the view is iterated. Clone it before iterating,
/// or call [`Ledger::filter_history`] again, to walk the entries a second time.
#[derive(Debug, Clone)]
pub struct HistoryView<'a> {
    entries: std::iter::Rev<std::slice::Iter<'a, HistoryEntry>>,
    filter: HistoryFilter,
}

impl<'a> Iterator for HistoryView<'a> {
    type Item = &'a HistoryEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.entries.by_ref().find(|e| filter.matches(e.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(view: HistoryView<'_>) -> Vec<ContentKind> {
        view.map(|e| e.kind).collect()
    }

    #[test]
    fn test_append_returns_stored_entry() {
        let mut ledger = Ledger::new();
        let entry = ledger.append_history(ContentKind::Story, "Once upon a time.");

        assert_eq!(ledger.history_len(), 1);
        assert_eq!(entry.content, "Once upon a time.");
        assert_eq!(ledger.entry(entry.id), Some(&entry));
    }

    #[test]
    fn test_consecutive_appends_have_ordered_timestamps() {
        let mut ledger = Ledger::new();
        let first = ledger.append_history(ContentKind::Poem, "...");
        let second = ledger.append_history(ContentKind::Poem, "...");

        assert_eq!(ledger.history_len(), 2);
        assert_ne!(first.id, second.id);
        assert!(first.timestamp < second.timestamp);
    }

    #[test]
    fn test_timestamps_advance_when_clock_lags() {
        let mut ledger = Ledger::new();
        let ahead = Local::now() + chrono::Duration::seconds(5);
        ledger.last_stamp = Some(ahead);

        let first = ledger.append_history(ContentKind::Poem, "one");
        let second = ledger.append_history(ContentKind::Poem, "two");

        assert!(ahead < first.timestamp);
        assert!(first.timestamp < second.timestamp);
    }

    #[test]
    fn test_filter_all_is_reverse_insertion() {
        let mut ledger = Ledger::new();
        ledger.append_history(ContentKind::Story, "a");
        ledger.append_history(ContentKind::Poem, "b");
        ledger.append_history(ContentKind::World, "c");

        let contents: Vec<_> = ledger
            .filter_history(HistoryFilter::All)
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(contents, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_filter_by_kind() {
        let mut ledger = Ledger::new();
        ledger.append_history(ContentKind::Poem, "p1");
        ledger.append_history(ContentKind::Story, "s1");
        ledger.append_history(ContentKind::Poem, "p2");

        let poems: Vec<_> = ledger
            .filter_history(ContentKind::Poem)
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(poems, vec!["p2", "p1"]);
        assert!(kinds(ledger.filter_history(ContentKind::Script)).is_empty());
    }

    #[test]
    fn test_view_is_restartable() {
        let mut ledger = Ledger::new();
        ledger.append_history(ContentKind::Story, "a");
        ledger.append_history(ContentKind::Story, "b");

        let view = ledger.filter_history(HistoryFilter::All);
        let again = view.clone();
        assert_eq!(view.count(), 2);
        assert_eq!(again.count(), 2);
        assert_eq!(ledger.filter_history(HistoryFilter::All).count(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ledger = Ledger::new();
        let keep = ledger.append_history(ContentKind::Story, "same");
        let gone = ledger.append_history(ContentKind::Story, "same");

        assert!(ledger.remove_history(gone.id));
        assert!(!ledger.remove_history(gone.id));
        assert_eq!(ledger.history(), &[keep]);
    }

    #[test]
    fn test_save_to_project() {
        let mut ledger = Ledger::new();
        ledger.create_project("Anthology");
        let project = ledger
            .save_to_project(0, ProjectItem::new(ContentKind::Poem, "verse").with_metadata("style", "Ode"))
            .unwrap();

        assert_eq!(project.items.len(), 1);
        assert_eq!(project.items[0].metadata["style"], "Ode");
    }

    #[test]
    fn test_save_out_of_range_does_not_mutate() {
        let mut ledger = Ledger::new();
        ledger.create_project("One");
        let before = ledger.projects().to_vec();

        let err = ledger
            .save_to_project(1, ProjectItem::new(ContentKind::Story, "x"))
            .unwrap_err();

        assert_eq!(err, LedgerError::ProjectIndex { index: 1, len: 1 });
        assert_eq!(ledger.projects(), before.as_slice());
    }

    #[test]
    fn test_duplicate_project_names_allowed() {
        let mut ledger = Ledger::new();
        ledger.create_project("Drafts");
        ledger.create_project("Drafts");
        assert_eq!(ledger.projects().len(), 2);
    }

    #[test]
    fn test_save_entry_to_project_copies_content() {
        let mut ledger = Ledger::new();
        let entry = ledger.append_history(ContentKind::Character, "Profile of Mira");
        ledger.create_project("Cast");

        let project = ledger.save_entry_to_project(0, entry.id).unwrap();
        assert_eq!(project.items[0].content, "Profile of Mira");
        assert!(project.items[0].metadata.contains_key("created_at"));

        let missing = EntryId::new();
        assert_eq!(
            ledger.save_entry_to_project(0, missing).unwrap_err(),
            LedgerError::EntryNotFound(missing)
        );
    }

    #[test]
    fn test_stats_and_recent() {
        let mut ledger = Ledger::new();
        for kind in [ContentKind::Story, ContentKind::Story, ContentKind::Script] {
            ledger.append_history(kind, "text");
        }
        ledger.create_project("P");

        let stats = ledger.stats();
        assert_eq!(stats.count(ContentKind::Story), 2);
        assert_eq!(stats.count(ContentKind::Character), 0);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.projects, 1);
        assert_eq!(ledger.count_by_kind(ContentKind::Script), 1);

        let recent: Vec<_> = ledger.recent(2).map(|e| e.kind).collect();
        assert_eq!(recent, vec![ContentKind::Script, ContentKind::Story]);
    }
}
