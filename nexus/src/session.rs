//! Interactive session.
//!
//! A line-oriented protocol over stdin/stdout:
//! - A content kind (or `#new <kind>`) starts a form; each field is asked for in turn
//! - Lines starting with `#` are commands (history, projects, export, quit, ...)
//! - Errors are printed as notices and never end the session

use crate::render;
use nexus_core::catalog;
use nexus_core::{
    ContentKind, EntryId, Form, GenerationError, GenerationRequest, HistoryFilter, Studio,
    StudioError,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    New(ContentKind),
    History(HistoryFilter),
    Show(usize),
    Delete(usize),
    Export { n: usize, dir: Option<PathBuf> },
    CreateProject(String),
    Projects,
    Save { project: usize, n: usize },
    Stats,
    Options(Option<ContentKind>),
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` means a blank line.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix('#') else {
        return line
            .parse::<ContentKind>()
            .map(|k| Some(SessionCommand::New(k)))
            .map_err(|e| format!("{e}; type #help for commands"));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    let command = match name {
        "new" => SessionCommand::New(parse_kind(args.first().copied(), "#new <kind>")?),
        "history" | "library" => {
            let filter = match args.first() {
                Some(f) => f.parse().map_err(|e| format!("{e}"))?,
                None => HistoryFilter::All,
            };
            SessionCommand::History(filter)
        }
        "show" => SessionCommand::Show(parse_number(args.first().copied(), "#show <n>")?),
        "delete" => SessionCommand::Delete(parse_number(args.first().copied(), "#delete <n>")?),
        "export" => SessionCommand::Export {
            n: parse_number(args.first().copied(), "#export <n> [dir]")?,
            dir: args.get(1).map(PathBuf::from),
        },
        "project" => {
            if args.is_empty() {
                return Err("Usage: #project <name>".to_string());
            }
            SessionCommand::CreateProject(args.join(" "))
        }
        "projects" => SessionCommand::Projects,
        "save" => SessionCommand::Save {
            project: parse_number(args.first().copied(), "#save <project> [n]")?,
            n: match args.get(1) {
                Some(n) => parse_number(Some(n), "#save <project> [n]")?,
                None => 1,
            },
        },
        "stats" | "dashboard" => SessionCommand::Stats,
        "options" => SessionCommand::Options(match args.first() {
            Some(k) => Some(k.parse().map_err(|e| format!("{e}"))?),
            None => None,
        }),
        "help" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("Unknown command '#{other}'; type #help for commands")),
    };
    Ok(Some(command))
}

fn parse_kind(arg: Option<&str>, usage: &str) -> Result<ContentKind, String> {
    let arg = arg.ok_or_else(|| format!("Usage: {usage}"))?;
    arg.parse().map_err(|e| format!("{e}"))
}

/// Listing numbers start at 1.
fn parse_number(arg: Option<&str>, usage: &str) -> Result<usize, String> {
    arg.and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("Usage: {usage} (numbers start at 1)"))
}

/// The entry shown as `n` in the most-recent-first listing.
fn nth_entry(studio: &Studio, n: usize) -> Option<EntryId> {
    studio
        .ledger()
        .filter_history(HistoryFilter::All)
        .nth(n - 1)
        .map(|e| e.id)
}

/// Completes when the user presses Ctrl-C.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never cancel.
        std::future::pending::<()>().await;
    }
}

fn print_help() {
    println!("Start a form by typing a content kind: story, script, character, world, dialogue, poem");
    println!();
    println!("Commands:");
    println!("  #new <kind>            - Fill in a form and generate");
    println!("  #history [kind|all]    - List generated content, newest first");
    println!("  #show <n>              - Print entry n in full");
    println!("  #delete <n>            - Delete entry n");
    println!("  #export <n> [dir]      - Write entry n to a .txt file");
    println!("  #project <name>        - Create a project");
    println!("  #projects              - List projects");
    println!("  #save <project> [n]    - Save entry n (default newest) to a project");
    println!("  #stats                 - Show the dashboard");
    println!("  #options [kind]        - Show preset choices");
    println!("  #help                  - Show this help");
    println!("  #quit                  - Exit (Ctrl-D also works)");
    println!();
    println!("Press Ctrl-C while generating to cancel that request.");
}

/// Ask for each field of `kind`. Blank answers leave the field unset.
fn read_form(kind: ContentKind, lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<Option<Form>> {
    let mut form = Form::new();
    println!("{} form (leave blank to skip):", kind.label());
    for field in catalog::fields_for(kind) {
        print!("{}", render::field_prompt(field.label, field.hint));
        io::stdout().flush()?;
        match lines.next() {
            Some(line) => {
                let value = line?;
                if !value.trim().is_empty() {
                    form.set(field.name, value.trim());
                }
            }
            None => return Ok(None),
        }
    }
    Ok(Some(form))
}

async fn generate(studio: &mut Studio, kind: ContentKind, form: &Form) {
    let request = match GenerationRequest::from_form(kind, form) {
        Ok(r) => r,
        Err(e) => {
            println!("[INVALID] {e}");
            return;
        }
    };

    println!("Generating {}... (Ctrl-C to cancel)", kind.tag());
    match studio.generate_until(request, interrupted()).await {
        Ok(generation) => {
            println!();
            println!("### Your {}", kind.label());
            println!("{}", generation.entry.content);
            println!();
            println!("[SAVED] History entry 1 ({})", render::timestamp(&generation.entry));
        }
        Err(StudioError::Generation(GenerationError::Cancelled)) => {
            println!("[CANCELLED] Nothing was saved");
        }
        Err(e) => println!("[ERROR] {e}"),
    }
}

/// Apply one command. Returns false when the session should end.
async fn execute(
    studio: &mut Studio,
    command: SessionCommand,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> io::Result<bool> {
    match command {
        SessionCommand::New(kind) => match read_form(kind, lines)? {
            Some(form) => generate(studio, kind, &form).await,
            None => return Ok(false),
        },
        SessionCommand::History(filter) => {
            let mut any = false;
            for (i, entry) in studio.ledger().filter_history(HistoryFilter::All).enumerate() {
                if filter.matches(entry.kind) {
                    any = true;
                    println!("  {:>3}. {}", i + 1, render::entry_summary(entry));
                }
            }
            if !any {
                println!("  (no entries)");
            }
        }
        SessionCommand::Show(n) => match studio.ledger().filter_history(HistoryFilter::All).nth(n - 1) {
            Some(entry) => {
                println!("=== {} ===", render::entry_summary(entry));
                println!("{}", entry.content);
            }
            None => println!("[ERROR] No history entry {n}"),
        },
        SessionCommand::Delete(n) => match nth_entry(studio, n) {
            Some(id) => {
                studio.remove_entry(id);
                println!("[DELETED] Entry {n}");
            }
            None => println!("[ERROR] No history entry {n}"),
        },
        SessionCommand::Export { n, dir } => match nth_entry(studio, n) {
            Some(id) => {
                let result = match dir {
                    Some(dir) => studio.export_entry_to(dir, id).await,
                    None => studio.export_entry(id).await,
                };
                match result {
                    Ok(path) => println!("[EXPORTED] {}", path.display()),
                    Err(e) => println!("[ERROR] Export failed: {e}"),
                }
            }
            None => println!("[ERROR] No history entry {n}"),
        },
        SessionCommand::CreateProject(name) => {
            let index = studio.create_project(name);
            println!("[CREATED] Project {}", index + 1);
        }
        SessionCommand::Projects => {
            let projects = studio.ledger().projects();
            if projects.is_empty() {
                println!("  (no projects; create one with #project <name>)");
            }
            for (i, project) in projects.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, render::project_summary(project));
            }
        }
        SessionCommand::Save { project, n } => match nth_entry(studio, n) {
            Some(id) => match studio.save_entry_to_project(project - 1, id) {
                Ok(p) => println!("[SAVED] Entry {n} to '{}' ({} items)", p.name, p.items.len()),
                Err(e) => println!("[ERROR] {e}"),
            },
            None => println!("[ERROR] No history entry {n}"),
        },
        SessionCommand::Stats => print!("{}", render::dashboard(studio.ledger())),
        SessionCommand::Options(Some(kind)) => print!("{}", render::options(kind)),
        SessionCommand::Options(None) => {
            for kind in ContentKind::ALL {
                print!("{}", render::options(kind));
            }
        }
        SessionCommand::Help => print_help(),
        SessionCommand::Quit => {
            println!("Goodbye!");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Run an interactive session until `#quit` or end of input.
pub async fn run(mut studio: Studio) -> io::Result<()> {
    println!("=== Narrative Nexus ===");
    println!();
    print_help();
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Ok(Some(command)) => {
                if !execute(&mut studio, command, &mut lines).await? {
                    break;
                }
            }
            Ok(None) => {}
            Err(notice) => println!("[ERROR] {notice}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> SessionCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_bare_kind_starts_form() {
        assert_eq!(parse("Poem"), SessionCommand::New(ContentKind::Poem));
        assert_eq!(parse("#new world"), SessionCommand::New(ContentKind::World));
        assert!(parse_command("sonnet").is_err());
    }

    #[test]
    fn test_history_filters() {
        assert_eq!(parse("#history"), SessionCommand::History(HistoryFilter::All));
        assert_eq!(
            parse("#history script"),
            SessionCommand::History(HistoryFilter::Kind(ContentKind::Script))
        );
        assert!(parse_command("#history novels").is_err());
    }

    #[test]
    fn test_numbers_start_at_one() {
        assert_eq!(parse("#show 2"), SessionCommand::Show(2));
        assert!(parse_command("#show 0").is_err());
        assert!(parse_command("#delete").is_err());
    }

    #[test]
    fn test_save_defaults_to_newest() {
        assert_eq!(parse("#save 2"), SessionCommand::Save { project: 2, n: 1 });
        assert_eq!(parse("#save 1 3"), SessionCommand::Save { project: 1, n: 3 });
    }

    #[test]
    fn test_project_name_keeps_spaces() {
        assert_eq!(
            parse("#project  Short Stories  2025"),
            SessionCommand::CreateProject("Short Stories 2025".to_string())
        );
        assert!(parse_command("#project").is_err());
    }

    #[test]
    fn test_export_with_dir() {
        assert_eq!(
            parse("#export 1 out"),
            SessionCommand::Export { n: 1, dir: Some(PathBuf::from("out")) }
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("#dance").is_err());
        assert_eq!(parse("#exit"), SessionCommand::Quit);
    }
}
