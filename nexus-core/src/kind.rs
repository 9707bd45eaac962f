//! Content kinds and history filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six kinds of content the studio can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Story,
    Script,
    Character,
    World,
    Dialogue,
    Poem,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Story,
        ContentKind::Script,
        ContentKind::Character,
        ContentKind::World,
        ContentKind::Dialogue,
        ContentKind::Poem,
    ];

    /// Lowercase tag used in filenames and filters.
    pub fn tag(&self) -> &'static str {
        match self {
            ContentKind::Story => "story",
            ContentKind::Script => "script",
            ContentKind::Character => "character",
            ContentKind::World => "world",
            ContentKind::Dialogue => "dialogue",
            ContentKind::Poem => "poem",
        }
    }

    /// Title-cased name for display.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Story => "Story",
            ContentKind::Script => "Script",
            ContentKind::Character => "Character",
            ContentKind::World => "World",
            ContentKind::Dialogue => "Dialogue",
            ContentKind::Poem => "Poem",
        }
    }

    /// Form fields this kind requires, in the order they are validated.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ContentKind::Story => &["premise", "genre", "length", "style", "tone"],
            ContentKind::Script => &["premise", "format", "character_count", "genre", "tone"],
            ContentKind::Character => &["name", "archetype", "background", "goals", "conflicts"],
            ContentKind::World => &[
                "setting_type",
                "culture",
                "magic_or_tech_system",
                "technology_level",
                "conflicts",
            ],
            ContentKind::Dialogue => &["characters", "situation", "tone", "exchange_count"],
            ContentKind::Poem => &["theme", "style", "line_count"],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Returned when text does not name a content kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content kind '{0}' (expected one of: story, script, character, world, dialogue, poem)")]
pub struct UnknownKind(pub String);

impl FromStr for ContentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ContentKind::ALL
            .into_iter()
            .find(|k| k.tag() == wanted)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Which history entries a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Kind(ContentKind),
}

impl HistoryFilter {
    pub fn matches(&self, kind: ContentKind) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Kind(k) => *k == kind,
        }
    }
}

impl From<ContentKind> for HistoryFilter {
    fn from(kind: ContentKind) -> Self {
        HistoryFilter::Kind(kind)
    }
}

impl FromStr for HistoryFilter {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(HistoryFilter::All)
        } else {
            s.parse().map(HistoryFilter::Kind)
        }
    }
}
