//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use nexus_core::{ContentKind, Form, StudioConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Generate stories, scripts, characters, worlds, dialogue and poems")]
pub struct Cli {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Overrides for `NEXUS_*` configuration.
#[derive(Args)]
pub struct ModelArgs {
    /// Model to generate with
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Maximum tokens per generation
    #[arg(long, global = true)]
    pub max_tokens: Option<usize>,

    /// Generation timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory for exported files
    #[arg(long, global = true)]
    pub export_dir: Option<PathBuf>,
}

impl ModelArgs {
    pub fn apply(&self, mut config: StudioConfig) -> StudioConfig {
        if let Some(ref model) = self.model {
            config = config.with_model(model);
        }
        if let Some(tokens) = self.max_tokens {
            config = config.with_max_tokens(tokens);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(ref dir) = self.export_dir {
            config = config.with_export_dir(dir);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate one piece of content and print it
    Generate {
        #[command(subcommand)]
        kind: KindArgs,

        /// Also write the text to the export directory
        #[arg(long, global = true)]
        export: bool,

        /// Print the stored history entry as JSON
        #[arg(long, global = true)]
        json: bool,
    },
    /// Print the instruction that would be sent, without calling the model
    Prompt {
        #[command(subcommand)]
        kind: KindArgs,
    },
    /// List preset choices for form fields
    Options {
        /// Only show this content kind
        kind: Option<ContentKind>,
    },
    /// Interactive session with history and projects (the default)
    Session,
}

/// Form fields per content kind. Every field is optional here so the
/// composer reports what is missing.
#[derive(Subcommand)]
pub enum KindArgs {
    /// A short story
    Story {
        #[arg(long)]
        premise: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        /// Target length in words
        #[arg(long)]
        length: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        tone: Option<String>,
    },
    /// A script
    Script {
        #[arg(long)]
        premise: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        character_count: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        tone: Option<String>,
    },
    /// A character profile
    Character {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        archetype: Option<String>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        conflicts: Option<String>,
    },
    /// A world setting
    World {
        #[arg(long)]
        setting_type: Option<String>,
        #[arg(long)]
        culture: Option<String>,
        #[arg(long)]
        magic_or_tech_system: Option<String>,
        #[arg(long)]
        technology_level: Option<String>,
        #[arg(long)]
        conflicts: Option<String>,
    },
    /// A dialogue scene
    Dialogue {
        /// Comma-separated character names
        #[arg(long)]
        characters: Option<String>,
        #[arg(long)]
        situation: Option<String>,
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        exchange_count: Option<String>,
    },
    /// A poem
    Poem {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        line_count: Option<String>,
    },
}

impl KindArgs {
    /// The content kind and the fields the user supplied.
    pub fn into_form(self) -> (ContentKind, Form) {
        let (kind, fields): (ContentKind, Vec<(&str, Option<String>)>) = match self {
            KindArgs::Story { premise, genre, length, style, tone } => (
                ContentKind::Story,
                vec![
                    ("premise", premise),
                    ("genre", genre),
                    ("length", length),
                    ("style", style),
                    ("tone", tone),
                ],
            ),
            KindArgs::Script { premise, format, character_count, genre, tone } => (
                ContentKind::Script,
                vec![
                    ("premise", premise),
                    ("format", format),
                    ("character_count", character_count),
                    ("genre", genre),
                    ("tone", tone),
                ],
            ),
            KindArgs::Character { name, archetype, background, goals, conflicts } => (
                ContentKind::Character,
                vec![
                    ("name", name),
                    ("archetype", archetype),
                    ("background", background),
                    ("goals", goals),
                    ("conflicts", conflicts),
                ],
            ),
            KindArgs::World {
                setting_type,
                culture,
                magic_or_tech_system,
                technology_level,
                conflicts,
            } => (
                ContentKind::World,
                vec![
                    ("setting_type", setting_type),
                    ("culture", culture),
                    ("magic_or_tech_system", magic_or_tech_system),
                    ("technology_level", technology_level),
                    ("conflicts", conflicts),
                ],
            ),
            KindArgs::Dialogue { characters, situation, tone, exchange_count } => (
                ContentKind::Dialogue,
                vec![
                    ("characters", characters),
                    ("situation", situation),
                    ("tone", tone),
                    ("exchange_count", exchange_count),
                ],
            ),
            KindArgs::Poem { theme, style, line_count } => (
                ContentKind::Poem,
                vec![("theme", theme), ("style", style), ("line_count", line_count)],
            ),
        };

        let form = fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect();
        (kind, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_story_args_become_form() {
        let cli = Cli::try_parse_from([
            "nexus", "generate", "story", "--premise", "A lost key", "--genre", "Mystery",
            "--length", "1000", "--export",
        ])
        .unwrap();

        let Some(Command::Generate { kind, export, json }) = cli.command else {
            panic!("expected generate");
        };
        assert!(export);
        assert!(!json);

        let (kind, form) = kind.into_form();
        assert_eq!(kind, ContentKind::Story);
        assert_eq!(form.get("premise"), Some("A lost key"));
        assert_eq!(form.get("style"), None);
    }

    #[test]
    fn test_options_kind_parses() {
        let cli = Cli::try_parse_from(["nexus", "options", "Poem"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Options { kind: Some(ContentKind::Poem) })
        ));
    }

    #[test]
    fn test_model_overrides_apply() {
        let cli = Cli::try_parse_from(["nexus", "--model", "claude-haiku", "--timeout", "30", "session"])
            .unwrap();
        let config = cli.model.apply(StudioConfig::default());
        assert_eq!(config.model.as_deref(), Some("claude-haiku"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
