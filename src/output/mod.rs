//! Output formatting for CLI display
//!
//! Formats lead rows, selection summaries and bulk outcomes. Every helper
//! takes `quiet`; quiet output is plain text meant for piping.

use crate::selection::{HeaderCheckbox, PayloadMode, SelectionPayload};
use crate::store::{Contact, Lead, LeadStatus};
use crate::view::BulkOutcome;
use colored::Colorize;

/// Colour a status label
#[must_use]
pub fn status_label(status: LeadStatus) -> String {
    let label = status.as_str();
    match status {
        LeadStatus::New => label.cyan().to_string(),
        LeadStatus::Contacted => label.yellow().to_string(),
        LeadStatus::Converted => label.green().to_string(),
        LeadStatus::Discarded => label.dimmed().to_string(),
    }
}

/// Format a lead row, optionally with its selection checkbox
#[must_use]
pub fn lead_row(lead: &Lead, selected: Option<bool>, quiet: bool) -> String {
    if quiet {
        return lead.id.clone();
    }

    let checkbox = match selected {
        Some(true) => "[x] ",
        Some(false) => "[ ] ",
        None => "",
    };
    let company = lead
        .company
        .as_deref()
        .map(|c| format!(" @ {c}"))
        .unwrap_or_default();
    let email = if lead.email.is_empty() {
        String::new()
    } else {
        format!(" <{}>", lead.email)
    };

    format!(
        "  {checkbox}{} {}{email}{company} [{}] {}",
        lead.id.dimmed(),
        lead.name.bold(),
        lead.run_id,
        status_label(lead.status)
    )
}

/// Format a contact row
#[must_use]
pub fn contact_row(contact: &Contact, quiet: bool) -> String {
    if quiet {
        return contact.lead_id.clone();
    }
    format!(
        "  {} {} <{}> converted {}",
        contact.lead_id.dimmed(),
        contact.name.bold(),
        contact.email,
        contact.converted_at.format("%Y-%m-%d %H:%M")
    )
}

/// Header checkbox glyph
#[must_use]
pub const fn header_glyph(state: HeaderCheckbox) -> &'static str {
    match state {
        HeaderCheckbox::Empty => "[ ]",
        HeaderCheckbox::Indeterminate => "[-]",
        HeaderCheckbox::Checked => "[x]",
    }
}

/// One-line summary of a payload
#[must_use]
pub fn payload_summary(payload: &SelectionPayload<String>, selected_count: u64) -> String {
    match payload.mode {
        PayloadMode::AllExcept if payload.deselected_ids.is_empty() => {
            format!("all {selected_count} matching lead(s)")
        }
        PayloadMode::AllExcept => format!(
            "all matching leads except {} ({selected_count} lead(s))",
            payload.deselected_ids.len()
        ),
        PayloadMode::Selected => format!("{selected_count} selected lead(s)"),
    }
}

/// Multi-line report of a bulk outcome
#[must_use]
pub fn bulk_outcome(outcome: &BulkOutcome, quiet: bool) -> String {
    if quiet {
        return format!(
            "{} {} {}",
            outcome.created_count, outcome.skipped_count, outcome.error_count
        );
    }

    let mut lines = vec![format!(
        "{} converted, {} skipped, {} failed",
        outcome.created_count.to_string().green(),
        outcome.skipped_count.to_string().yellow(),
        if outcome.error_count == 0 {
            "0".normal()
        } else {
            outcome.error_count.to_string().red()
        }
    )];
    for error in &outcome.errors {
        lines.push(format!("  #{}: {}", error.index, error.message.red()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lead() -> Lead {
        Lead {
            id: "L000000000001".to_string(),
            name: "Ana".to_string(),
            email: "ana@x.io".to_string(),
            company: Some("Acme".to_string()),
            run_id: "r1".to_string(),
            status: LeadStatus::New,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_quiet_lead_row_is_id() {
        assert_eq!(lead_row(&lead(), Some(true), true), "L000000000001");
    }

    #[test]
    fn test_lead_row_contains_fields() {
        colored::control::set_override(false);
        let row = lead_row(&lead(), Some(true), false);
        assert!(row.contains("[x]"));
        assert!(row.contains("Ana"));
        assert!(row.contains("<ana@x.io>"));
        assert!(row.contains("@ Acme"));
        assert!(row.contains("[r1]"));
    }

    #[test]
    fn test_lead_row_checkbox_states() {
        colored::control::set_override(false);
        assert!(lead_row(&lead(), Some(false), false).starts_with("  [ ] "));
        assert!(!lead_row(&lead(), None, false).starts_with("  ["));
    }

    #[test]
    fn test_header_glyphs() {
        assert_eq!(header_glyph(HeaderCheckbox::Checked), "[x]");
        assert_eq!(header_glyph(HeaderCheckbox::Indeterminate), "[-]");
        assert_eq!(header_glyph(HeaderCheckbox::Empty), "[ ]");
    }

    #[test]
    fn test_payload_summary() {
        let payload = SelectionPayload {
            mode: PayloadMode::AllExcept,
            selected_ids: vec![],
            deselected_ids: vec!["a".to_string()],
        };
        assert_eq!(
            payload_summary(&payload, 9),
            "all matching leads except 1 (9 lead(s))"
        );
    }

    #[test]
    fn test_quiet_outcome() {
        let mut outcome = BulkOutcome::new();
        outcome.add_created();
        outcome.add_error(1, "boom");
        assert_eq!(bulk_outcome(&outcome, true), "1 0 1");
    }
}
