//! Preset choices offered for form fields.
//!
//! Presets are suggestions for front ends; any non-blank text is accepted by
//! the composer.

use crate::kind::ContentKind;

/// Suggested values (or a numeric range) for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHint {
    /// Free text, no presets.
    Text,
    /// Free text with suggested presets.
    Choices(&'static [&'static str]),
    /// A whole number within `min..=max`, with a suggested default.
    Range { min: u32, max: u32, default: u32 },
    /// Comma-separated names.
    List,
}

/// A form field together with the prompt text front ends show for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub hint: FieldHint,
}

pub const TONES: &[&str] = &["Dark", "Neutral", "Light", "Humorous", "Dramatic"];

pub const STORY_GENRES: &[&str] = &[
    "Fantasy",
    "Science Fiction",
    "Romance",
    "Mystery",
    "Horror",
    "Adventure",
    "Historical Fiction",
    "Literary Fiction",
    "Thriller",
    "Comedy",
    "Drama",
];

pub const WRITING_STYLES: &[&str] = &[
    "Descriptive",
    "Minimalist",
    "Stream of Consciousness",
    "Experimental",
    "Classical",
    "Modern",
];

pub const STORY_LENGTHS: &[&str] = &["1000", "2000", "3000", "4000", "5000"];

pub const SCRIPT_FORMATS: &[&str] = &[
    "Movie",
    "TV Episode",
    "Short Film",
    "Theater Play",
    "Radio Play",
    "Web Series",
    "Animation",
];

pub const SCRIPT_GENRES: &[&str] = &[
    "Drama",
    "Comedy",
    "Action",
    "Romance",
    "Thriller",
    "Science Fiction",
    "Horror",
    "Musical",
];

pub const ARCHETYPES: &[&str] = &[
    "Hero",
    "Mentor",
    "Sidekick",
    "Antagonist",
    "Anti-hero",
    "Trickster",
    "Love Interest",
    "Wise Old Man/Woman",
];

pub const SETTING_TYPES: &[&str] = &[
    "Fantasy Realm",
    "Future Earth",
    "Alternate History",
    "Space Colony",
    "Post-Apocalyptic",
    "Urban Fantasy",
];

pub const TECHNOLOGY_LEVELS: &[&str] = &[
    "Primitive",
    "Medieval",
    "Industrial",
    "Modern",
    "Future",
    "Advanced",
];

pub const DIALOGUE_TONES: &[&str] = &["Formal", "Casual", "Tense", "Romantic", "Humorous"];

pub const POETRY_STYLES: &[&str] = &[
    "Sonnet",
    "Haiku",
    "Free Verse",
    "Limerick",
    "Ballad",
    "Ode",
    "Villanelle",
];

const STORY_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "premise", label: "Story Premise", hint: FieldHint::Text },
    FieldSpec { name: "genre", label: "Genre", hint: FieldHint::Choices(STORY_GENRES) },
    FieldSpec { name: "length", label: "Story Length (words)", hint: FieldHint::Choices(STORY_LENGTHS) },
    FieldSpec { name: "style", label: "Writing Style", hint: FieldHint::Choices(WRITING_STYLES) },
    FieldSpec { name: "tone", label: "Tone", hint: FieldHint::Choices(TONES) },
];

const SCRIPT_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "premise", label: "Script Premise", hint: FieldHint::Text },
    FieldSpec { name: "format", label: "Format", hint: FieldHint::Choices(SCRIPT_FORMATS) },
    FieldSpec {
        name: "character_count",
        label: "Number of Characters",
        hint: FieldHint::Range { min: 2, max: 10, default: 4 },
    },
    FieldSpec { name: "genre", label: "Genre", hint: FieldHint::Choices(SCRIPT_GENRES) },
    FieldSpec { name: "tone", label: "Tone", hint: FieldHint::Choices(TONES) },
];

const CHARACTER_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "name", label: "Character Name", hint: FieldHint::Text },
    FieldSpec { name: "archetype", label: "Character Archetype", hint: FieldHint::Choices(ARCHETYPES) },
    FieldSpec { name: "background", label: "Character Background", hint: FieldHint::Text },
    FieldSpec { name: "goals", label: "Character Goals", hint: FieldHint::Text },
    FieldSpec { name: "conflicts", label: "Internal/External Conflicts", hint: FieldHint::Text },
];

const WORLD_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "setting_type", label: "Setting Type", hint: FieldHint::Choices(SETTING_TYPES) },
    FieldSpec { name: "culture", label: "Cultural Elements", hint: FieldHint::Text },
    FieldSpec { name: "magic_or_tech_system", label: "Magic/Technology System", hint: FieldHint::Text },
    FieldSpec {
        name: "technology_level",
        label: "Technology Level",
        hint: FieldHint::Choices(TECHNOLOGY_LEVELS),
    },
    FieldSpec { name: "conflicts", label: "Major Conflicts", hint: FieldHint::Text },
];

const DIALOGUE_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "characters", label: "Characters (comma-separated)", hint: FieldHint::List },
    FieldSpec { name: "situation", label: "Situation/Context", hint: FieldHint::Text },
    FieldSpec { name: "tone", label: "Tone", hint: FieldHint::Choices(DIALOGUE_TONES) },
    FieldSpec {
        name: "exchange_count",
        label: "Number of Exchanges",
        hint: FieldHint::Range { min: 3, max: 20, default: 10 },
    },
];

const POEM_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "theme", label: "Theme/Subject", hint: FieldHint::Text },
    FieldSpec { name: "style", label: "Poetry Style", hint: FieldHint::Choices(POETRY_STYLES) },
    FieldSpec {
        name: "line_count",
        label: "Number of Lines",
        hint: FieldHint::Range { min: 3, max: 50, default: 14 },
    },
];

/// Field specs for `kind`, in the same order as [`ContentKind::fields`].
pub fn fields_for(kind: ContentKind) -> &'static [FieldSpec] {
    match kind {
        ContentKind::Story => STORY_FIELDS,
        ContentKind::Script => SCRIPT_FIELDS,
        ContentKind::Character => CHARACTER_FIELDS,
        ContentKind::World => WORLD_FIELDS,
        ContentKind::Dialogue => DIALOGUE_FIELDS,
        ContentKind::Poem => POEM_FIELDS,
    }
}

impl FieldHint {
    /// One-line description of the accepted values, if there is anything to say.
    pub fn describe(&self) -> Option<String> {
        match self {
            FieldHint::Text => None,
            FieldHint::Choices(choices) => Some(format!("e.g. {}", choices.join(", "))),
            FieldHint::Range { min, max, default } => {
                Some(format!("{min}-{max}, suggested {default}"))
            }
            FieldHint::List => Some("comma-separated".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_kind_fields() {
        for kind in ContentKind::ALL {
            let names: Vec<_> = fields_for(kind).iter().map(|f| f.name).collect();
            assert_eq!(names, kind.fields(), "field order for {kind}");
        }
    }

    #[test]
    fn test_range_defaults_within_bounds() {
        for kind in ContentKind::ALL {
            for field in fields_for(kind) {
                if let FieldHint::Range { min, max, default } = field.hint {
                    assert!((min..=max).contains(&default), "{}", field.name);
                }
            }
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(FieldHint::Text.describe(), None);
        assert_eq!(
            FieldHint::Range { min: 3, max: 50, default: 14 }.describe().as_deref(),
            Some("3-50, suggested 14")
        );
        assert_eq!(
            FieldHint::Choices(DIALOGUE_TONES).describe().as_deref(),
            Some("e.g. Formal, Casual, Tense, Romantic, Humorous")
        );
    }
}
