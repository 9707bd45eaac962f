//! Text formatting for terminal output.

use nexus_core::catalog::{self, FieldHint};
use nexus_core::{ContentKind, HistoryEntry, Ledger, Project};

const PREVIEW_CHARS: usize = 60;

/// Display time used throughout the front end.
pub fn timestamp(entry: &HistoryEntry) -> String {
    entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `"{Kind} - {time}: {first line...}"`
pub fn entry_summary(entry: &HistoryEntry) -> String {
    let first_line = entry.content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut preview: String = first_line.trim().chars().take(PREVIEW_CHARS).collect();
    if first_line.trim().chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    format!("{} - {}: {}", entry.kind.label(), timestamp(entry), preview)
}

pub fn project_summary(project: &Project) -> String {
    format!(
        "{} ({} items, created {})",
        project.name,
        project.items.len(),
        project.created_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Field presets for one kind.
pub fn options(kind: ContentKind) -> String {
    let mut out = format!("{}:\n", kind.label());
    for field in catalog::fields_for(kind) {
        out.push_str(&format!("  --{:<22} {}", field.name.replace('_', "-"), field.label));
        if let Some(hint) = field.hint.describe() {
            out.push_str(&format!(" ({hint})"));
        }
        out.push('\n');
    }
    out
}

/// Prompt shown when asking for one field interactively.
pub fn field_prompt(label: &str, hint: FieldHint) -> String {
    match hint.describe() {
        Some(desc) => format!("  {label} [{desc}]: "),
        None => format!("  {label}: "),
    }
}

/// Counts per kind plus the five most recent entries.
pub fn dashboard(ledger: &Ledger) -> String {
    let stats = ledger.stats();
    let mut out = String::from("=== Dashboard ===\n");
    for kind in ContentKind::ALL {
        out.push_str(&format!("  {:<10} {}\n", kind.label(), stats.count(kind)));
    }
    out.push_str(&format!("  {:<10} {}\n", "Projects", stats.projects));

    out.push_str("\nRecent Activity\n");
    if stats.total == 0 {
        out.push_str("  (nothing generated yet)\n");
    }
    for entry in ledger.recent(5) {
        out.push_str(&format!(
            "  {} created at {}\n",
            entry.kind.label(),
            timestamp(entry)
        ));
    }
    out
}
