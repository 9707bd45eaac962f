//! Prompt composition.
//!
//! Turns the fields a user filled in for one content kind into the single
//! instruction string sent to the model. Composition is pure: the same form
//! always yields the same instruction.
//!
//! ```
//! use nexus_core::{ContentKind, Form, GenerationRequest};
//!
//! let form = Form::new()
//!     .with("theme", "autumn rain")
//!     .with("style", "Haiku")
//!     .with("line_count", "3");
//!
//! let request = GenerationRequest::from_form(ContentKind::Poem, &form).unwrap();
//! assert!(request.instruction().starts_with("Create a Haiku poem about autumn rain"));
//! ```

use crate::kind::ContentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from validating a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    /// The form field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

/// Raw field values as entered by the user, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    fields: BTreeMap<String, String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// A present, non-blank value with surrounding whitespace removed.
    fn required(&self, field: &'static str) -> Result<String, ValidationError> {
        match self.get(field).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ValidationError::MissingField(field)),
        }
    }

    fn positive_count(&self, field: &'static str) -> Result<u32, ValidationError> {
        let raw = self.required(field)?;
        match raw.parse::<u32>() {
            Ok(0) => Err(ValidationError::InvalidField {
                field,
                reason: "must be greater than zero".to_string(),
            }),
            Ok(n) => Ok(n),
            Err(_) => Err(ValidationError::InvalidField {
                field,
                reason: format!("'{raw}' is not a whole number"),
            }),
        }
    }

    fn list(&self, field: &'static str) -> Result<Vec<String>, ValidationError> {
        let items: Vec<String> = self
            .get(field)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if items.is_empty() {
            return Err(ValidationError::MissingField(field));
        }
        Ok(items)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Form::new();
        for (k, v) in iter {
            form.set(k, v);
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub premise: String,
    pub genre: String,
    /// Target length in words.
    pub length: u32,
    pub style: String,
    pub tone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub premise: String,
    pub format: String,
    pub character_count: u32,
    pub genre: String,
    pub tone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRequest {
    pub name: String,
    pub archetype: String,
    pub background: String,
    pub goals: String,
    pub conflicts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRequest {
    pub setting_type: String,
    pub culture: String,
    pub magic_or_tech_system: String,
    pub technology_level: String,
    pub conflicts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRequest {
    pub characters: Vec<String>,
    pub situation: String,
    pub tone: String,
    pub exchange_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemRequest {
    pub theme: String,
    pub style: String,
    pub line_count: u32,
}

/// A validated request for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GenerationRequest {
    Story(StoryRequest),
    Script(ScriptRequest),
    Character(CharacterRequest),
    World(WorldRequest),
    Dialogue(DialogueRequest),
    Poem(PoemRequest),
}

impl GenerationRequest {
    /// Validate `form` against the field set of `kind`.
    ///
    /// Fields are checked in [`ContentKind::fields`] order, so the first
    /// missing field is the one reported.
    pub fn from_form(kind: ContentKind, form: &Form) -> Result<Self, ValidationError> {
        let request = match kind {
            ContentKind::Story => GenerationRequest::Story(StoryRequest {
                premise: form.required("premise")?,
                genre: form.required("genre")?,
                length: form.positive_count("length")?,
                style: form.required("style")?,
                tone: form.required("tone")?,
            }),
            ContentKind::Script => GenerationRequest::Script(ScriptRequest {
                premise: form.required("premise")?,
                format: form.required("format")?,
                character_count: form.positive_count("character_count")?,
                genre: form.required("genre")?,
                tone: form.required("tone")?,
            }),
            ContentKind::Character => GenerationRequest::Character(CharacterRequest {
                name: form.required("name")?,
                archetype: form.required("archetype")?,
                background: form.required("background")?,
                goals: form.required("goals")?,
                conflicts: form.required("conflicts")?,
            }),
            ContentKind::World => GenerationRequest::World(WorldRequest {
                setting_type: form.required("setting_type")?,
                culture: form.required("culture")?,
                magic_or_tech_system: form.required("magic_or_tech_system")?,
                technology_level: form.required("technology_level")?,
                conflicts: form.required("conflicts")?,
            }),
            ContentKind::Dialogue => GenerationRequest::Dialogue(DialogueRequest {
                characters: form.list("characters")?,
                situation: form.required("situation")?,
                tone: form.required("tone")?,
                exchange_count: form.positive_count("exchange_count")?,
            }),
            ContentKind::Poem => GenerationRequest::Poem(PoemRequest {
                theme: form.required("theme")?,
                style: form.required("style")?,
                line_count: form.positive_count("line_count")?,
            }),
        };
        Ok(request)
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            GenerationRequest::Story(_) => ContentKind::Story,
            GenerationRequest::Script(_) => ContentKind::Script,
            GenerationRequest::Character(_) => ContentKind::Character,
            GenerationRequest::World(_) => ContentKind::World,
            GenerationRequest::Dialogue(_) => ContentKind::Dialogue,
            GenerationRequest::Poem(_) => ContentKind::Poem,
        }
    }

    /// Render the instruction string sent to the model.
    pub fn instruction(&self) -> String {
        match self {
            GenerationRequest::Story(r) => format!(
                "Write a {genre} story that is approximately {length} words long.\n\
                 Style: {style}\n\
                 Tone: {tone}\n\
                 Story prompt: {premise}\n\
                 Please ensure the story has a clear beginning, middle, and end, \
                 with engaging character development.",
                genre = r.genre,
                length = r.length,
                style = r.style,
                tone = r.tone,
                premise = r.premise,
            ),
            GenerationRequest::Script(r) => format!(
                "Create a {format} script in {genre} genre with {count} characters.\n\
                 Tone: {tone}\n\
                 Premise: {premise}\n\
                 Include character descriptions, stage directions, and dialogue formatting.",
                format = r.format,
                genre = r.genre,
                count = r.character_count,
                tone = r.tone,
                premise = r.premise,
            ),
            GenerationRequest::Character(r) => format!(
                "Create a detailed character profile for {name}\n\
                 Archetype: {archetype}\n\
                 Background: {background}\n\
                 Goals: {goals}\n\
                 Internal/External Conflicts: {conflicts}\n\
                 \n\
                 Include:\n\
                 - Physical description\n\
                 - Personality traits\n\
                 - Motivations\n\
                 - Relationships\n\
                 - Character arc potential",
                name = r.name,
                archetype = r.archetype,
                background = r.background,
                goals = r.goals,
                conflicts = r.conflicts,
            ),
            GenerationRequest::World(r) => format!(
                "Create a detailed world setting with the following parameters:\n\
                 Setting Type: {setting}\n\
                 Culture: {culture}\n\
                 Magic System: {system}\n\
                 Technology Level: {tech}\n\
                 Major Conflicts: {conflicts}\n\
                 \n\
                 Include:\n\
                 - Geography and climate\n\
                 - Social structure\n\
                 - Economic system\n\
                 - History and lore\n\
                 - Unique features",
                setting = r.setting_type,
                culture = r.culture,
                system = r.magic_or_tech_system,
                tech = r.technology_level,
                conflicts = r.conflicts,
            ),
            GenerationRequest::Dialogue(r) => format!(
                "Write a dialogue scene between {characters} in the following situation:\n\
                 {situation}\n\
                 Tone: {tone}\n\
                 Length: {count} exchanges\n\
                 \n\
                 Focus on natural conversation flow and character voice.",
                characters = r.characters.join(", "),
                situation = r.situation,
                tone = r.tone,
                count = r.exchange_count,
            ),
            GenerationRequest::Poem(r) => format!(
                "Create a {style} poem about {theme}\n\
                 Length: {count} lines\n\
                 Include literary devices and meaningful imagery.",
                style = r.style,
                theme = r.theme,
                count = r.line_count,
            ),
        }
    }

    /// Headline parameters recorded alongside content saved to a project.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let pairs: Vec<(&str, String)> = match self {
            GenerationRequest::Story(r) => {
                vec![("genre", r.genre.clone()), ("length", r.length.to_string())]
            }
            GenerationRequest::Script(r) => vec![
                ("format", r.format.clone()),
                ("genre", r.genre.clone()),
                ("character_count", r.character_count.to_string()),
            ],
            GenerationRequest::Character(r) => vec![
                ("name", r.name.clone()),
                ("archetype", r.archetype.clone()),
            ],
            GenerationRequest::World(r) => vec![
                ("setting_type", r.setting_type.clone()),
                ("technology_level", r.technology_level.clone()),
            ],
            GenerationRequest::Dialogue(r) => vec![
                ("characters", r.characters.join(", ")),
                ("exchange_count", r.exchange_count.to_string()),
            ],
            GenerationRequest::Poem(r) => vec![
                ("style", r.style.clone()),
                ("line_count", r.line_count.to_string()),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Validate `form` for `kind` and render its instruction in one step.
pub fn compose(kind: ContentKind, form: &Form) -> Result<String, ValidationError> {
    let request = GenerationRequest::from_form(kind, form)?;
    let instruction = request.instruction();
    tracing::debug!(kind = %kind, chars = instruction.len(), "composed instruction");
    Ok(instruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_form;

    #[test]
    fn test_story_scenario() {
        let form = Form::new()
            .with("premise", "A lost key")
            .with("genre", "Mystery")
            .with("length", "1000")
            .with("style", "Minimalist")
            .with("tone", "Dark");

        let instruction = compose(ContentKind::Story, &form).unwrap();

        assert!(instruction.contains("Mystery story"));
        assert!(instruction.contains("approximately 1000 words"));
        assert!(instruction.contains("Style: Minimalist"));
        assert!(instruction.contains("Tone: Dark"));
        assert!(instruction.contains("A lost key"));
        assert!(instruction.contains("clear beginning, middle, and end"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        for kind in ContentKind::ALL {
            let form = sample_form(kind);
            assert_eq!(compose(kind, &form).unwrap(), compose(kind, &form).unwrap());
        }
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        for kind in ContentKind::ALL {
            for field in kind.fields() {
                let mut form = sample_form(kind);
                form.remove(field);
                assert_eq!(
                    compose(kind, &form),
                    Err(ValidationError::MissingField(*field)),
                    "{kind} without {field}"
                );
            }
        }
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut form = sample_form(ContentKind::Character);
        form.set("goals", "   ");
        let err = compose(ContentKind::Character, &form).unwrap_err();
        assert_eq!(err.field(), "goals");
    }

    #[test]
    fn test_first_missing_field_wins() {
        let form = Form::new().with("style", "Sonnet");
        assert_eq!(
            compose(ContentKind::Poem, &form),
            Err(ValidationError::MissingField("theme"))
        );
    }

    #[test]
    fn test_non_numeric_count_is_invalid() {
        let mut form = sample_form(ContentKind::Poem);
        form.set("line_count", "fourteen");
        assert!(matches!(
            compose(ContentKind::Poem, &form),
            Err(ValidationError::InvalidField { field: "line_count", .. })
        ));

        form.set("line_count", "0");
        assert!(matches!(
            compose(ContentKind::Poem, &form),
            Err(ValidationError::InvalidField { field: "line_count", .. })
        ));
    }

    #[test]
    fn test_dialogue_characters_list() {
        let form = Form::new()
            .with("characters", " Ada , Grace,, ")
            .with("situation", "A broken compiler at midnight")
            .with("tone", "Tense")
            .with("exchange_count", "6");

        let request = GenerationRequest::from_form(ContentKind::Dialogue, &form).unwrap();
        let GenerationRequest::Dialogue(ref dialogue) = request else {
            panic!("expected dialogue request");
        };
        assert_eq!(dialogue.characters, vec!["Ada", "Grace"]);
        assert!(request
            .instruction()
            .starts_with("Write a dialogue scene between Ada, Grace in the following situation:"));
        assert!(request.instruction().contains("Length: 6 exchanges"));
    }

    #[test]
    fn test_dialogue_with_only_commas_is_missing() {
        let mut form = sample_form(ContentKind::Dialogue);
        form.set("characters", " , ,");
        assert_eq!(
            compose(ContentKind::Dialogue, &form),
            Err(ValidationError::MissingField("characters"))
        );
    }

    #[test]
    fn test_script_template() {
        let instruction = compose(ContentKind::Script, &sample_form(ContentKind::Script)).unwrap();
        assert!(instruction.starts_with("Create a Short Film script in Comedy genre with 3 characters."));
        assert!(instruction.contains("character descriptions, stage directions, and dialogue formatting"));
    }

    #[test]
    fn test_world_template_lists_sections() {
        let instruction = compose(ContentKind::World, &sample_form(ContentKind::World)).unwrap();
        assert!(instruction.contains("Magic System: Tide-bound rune magic"));
        assert!(instruction.contains("Technology Level: Medieval"));
        assert!(instruction.contains("- Geography and climate"));
    }

    #[test]
    fn test_request_kind_matches_form_kind() {
        for kind in ContentKind::ALL {
            let request = GenerationRequest::from_form(kind, &sample_form(kind)).unwrap();
            assert_eq!(request.kind(), kind);
        }
    }

    #[test]
    fn test_story_metadata() {
        let request =
            GenerationRequest::from_form(ContentKind::Story, &sample_form(ContentKind::Story))
                .unwrap();
        let metadata = request.metadata();
        assert_eq!(metadata.get("genre").map(String::as_str), Some("Mystery"));
        assert_eq!(metadata.get("length").map(String::as_str), Some("1000"));
    }

    #[test]
    fn test_form_from_iter() {
        let form: Form = [("theme", "tides"), ("style", "Ode")].into_iter().collect();
        assert_eq!(form.get("theme"), Some("tides"));
        assert_eq!(form.get("line_count"), None);
    }
}
