//! Testing utilities.
//!
//! This module provides tools for exercising a studio without API calls:
//! - `MockGenerator` for deterministic, scripted generation
//! - `sample_form` for a complete, valid form of each content kind
//! - Assertion helpers for ledger state

use crate::compose::Form;
use crate::generator::{GenerationError, TextGenerator};
use crate::kind::ContentKind;
use crate::ledger::Ledger;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// A scripted reply from the mock generator.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with this error.
    Fail(GenerationError),
    /// Never complete.
    Hang,
}

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    instructions: Vec<String>,
}

/// A generator that returns scripted replies in order.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// studio and inspect the instructions it received.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    state: Arc<Mutex<MockState>>,
}

impl MockGenerator {
    /// Create a mock that returns each text in turn.
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(texts.into_iter().map(|t| MockReply::Text(t.into())))
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::default();
        mock.lock().replies.extend(replies);
        mock
    }

    /// Add a reply to the queue.
    pub fn queue(&self, reply: MockReply) -> &Self {
        self.lock().replies.push_back(reply);
        self
    }

    /// Every instruction received so far, oldest first.
    pub fn instructions(&self) -> Vec<String> {
        self.lock().instructions.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().instructions.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let reply = {
            let mut state = self.lock();
            state.instructions.push(instruction.to_string());
            state.replies.pop_front()
        };

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(err)) => Err(err),
            Some(MockReply::Hang) => std::future::pending().await,
            None => Err(GenerationError::Unreachable(
                "mock generator has no more scripted replies".to_string(),
            )),
        }
    }
}

/// A complete, valid form for `kind`.
pub fn sample_form(kind: ContentKind) -> Form {
    let fields: &[(&str, &str)] = match kind {
        ContentKind::Story => &[
            ("premise", "A lost key"),
            ("genre", "Mystery"),
            ("length", "1000"),
            ("style", "Minimalist"),
            ("tone", "Dark"),
        ],
        ContentKind::Script => &[
            ("premise", "Two rival food trucks share one parking spot"),
            ("format", "Short Film"),
            ("character_count", "3"),
            ("genre", "Comedy"),
            ("tone", "Humorous"),
        ],
        ContentKind::Character => &[
            ("name", "Mira Vell"),
            ("archetype", "Trickster"),
            ("background", "Raised by smugglers in a river port"),
            ("goals", "Buy back her family's boat"),
            ("conflicts", "Loyalty to her crew versus a debt to the harbor master"),
        ],
        ContentKind::World => &[
            ("setting_type", "Fantasy Realm"),
            ("culture", "Tidal clans who trade by the moon's phases"),
            ("magic_or_tech_system", "Tide-bound rune magic"),
            ("technology_level", "Medieval"),
            ("conflicts", "The sea is retreating"),
        ],
        ContentKind::Dialogue => &[
            ("characters", "Ada, Grace"),
            ("situation", "Debugging a spaceship at 3 a.m."),
            ("tone", "Tense"),
            ("exchange_count", "10"),
        ],
        ContentKind::Poem => &[
            ("theme", "autumn rain"),
            ("style", "Sonnet"),
            ("line_count", "14"),
        ],
    };
    fields.iter().copied().collect()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the ledger holds exactly `expected` history entries.
#[track_caller]
pub fn assert_history_len(ledger: &Ledger, expected: usize) {
    let actual = ledger.history_len();
    assert_eq!(actual, expected, "Expected {expected} history entries, got {actual}");
}

/// Assert the most recent history entry has the given kind and content.
#[track_caller]
pub fn assert_latest(ledger: &Ledger, kind: ContentKind, content: &str) {
    let latest = ledger
        .recent(1)
        .next()
        .unwrap_or_else(|| panic!("Expected a {kind} entry, history is empty"));
    assert_eq!(latest.kind, kind, "Expected latest entry to be a {kind}");
    assert_eq!(latest.content, content, "Latest {kind} content differs");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replies_in_order() {
        let mock = MockGenerator::new(["one", "two"]);

        assert_eq!(mock.generate("a").await.unwrap(), "one");
        assert_eq!(mock.generate("b").await.unwrap(), "two");
        assert!(matches!(
            mock.generate("c").await,
            Err(GenerationError::Unreachable(_))
        ));
        assert_eq!(mock.instructions(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockGenerator::default();
        let handle = mock.clone();
        handle.queue(MockReply::Fail(GenerationError::EmptyResponse));

        assert_eq!(mock.generate("x").await, Err(GenerationError::EmptyResponse));
        assert_eq!(handle.call_count(), 1);
    }

    #[test]
    fn test_sample_forms_cover_every_field() {
        for kind in ContentKind::ALL {
            let form = sample_form(kind);
            for field in kind.fields() {
                assert!(form.get(field).is_some(), "{kind} sample lacks {field}");
            }
        }
    }
}
