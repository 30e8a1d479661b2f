//! Human-readable card rendering for interactions, HCPs and tool results.

use replog_core::{
    FollowupResult, Hcp, Interaction, InteractionSummary, Mode, Status, TrendSummary,
};

pub fn print_hcps(hcps: &[Hcp]) {
    if hcps.is_empty() {
        println!("no HCPs registered");
        return;
    }
    for hcp in hcps {
        print!("{:>4}  {}", hcp.id, hcp.name);
        if let Some(speciality) = &hcp.speciality {
            print!("  [{speciality}]");
        }
        if let Some(organisation) = &hcp.organisation {
            print!("  {organisation}");
        }
        println!();
    }
}

/// Print a single interaction as a vertical card.
pub fn print_interaction(record: &Interaction) {
    println!("=== interaction {} ===", record.id);
    print_field("status", status_label(record.status));
    print_field("mode", mode_label(record.mode));
    if let Some(hcp_id) = record.hcp_id {
        print_field("hcp", &hcp_id.to_string());
    }
    print_field("rep", &record.rep_id);
    print_field("logged", &format_timestamp(&record.created_at));
    if let Some(updated) = &record.updated_at {
        print_field("updated", &format_timestamp(updated));
    }

    if let Some(text) = &record.raw_text {
        print_field("notes", text);
    }
    if let Some(form) = &record.form_data {
        if let Some(topic) = &form.topic {
            print_field("topic", topic);
        }
        if let Some(materials) = &form.materials {
            print_field("materials", materials);
        }
        for (key, value) in &form.extra {
            print_field(key, &value.to_string());
        }
    }

    if record.status == Status::Processed {
        println!();
        if let Some(summary) = &record.summary {
            print_field("summary", summary);
        }
        if let Some(topics) = &record.topics {
            if !topics.is_empty() {
                print_field("topics", &topics.join(", "));
            }
        }
        if let Some(sentiment) = &record.sentiment {
            print_field("sentiment", sentiment);
        }
    }
}

pub fn print_interaction_list(rows: &[InteractionSummary]) {
    if rows.is_empty() {
        println!("no interactions");
        return;
    }
    for row in rows {
        let summary = row.summary.as_deref().unwrap_or("(not processed yet)");
        println!(
            "{:>4}  {}  {:<9}  {:<4}  {}",
            row.id,
            format_timestamp(&row.created_at),
            status_label(row.status),
            mode_label(row.mode),
            summary
        );
    }
}

pub fn print_followups(result: &FollowupResult) {
    if result.followups.is_empty() {
        println!("no follow-ups suggested for interaction {}", result.interaction_id);
        return;
    }
    println!("follow-ups for interaction {}:", result.interaction_id);
    for suggestion in &result.followups {
        println!("  - {suggestion}");
    }
}

pub fn print_trend(trend: &TrendSummary) {
    println!("=== HCP {} trends ===", trend.hcp_id);
    print_field("summary", &trend.summary);
    if !trend.topics.is_empty() {
        print_field("topics", &trend.topics.join(", "));
    }
}

fn print_field(name: &str, value: &str) {
    println!("  {name:<12} {value}");
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Pending => "pending",
        Status::Processed => "processed",
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Form => "form",
        Mode::Chat => "chat",
    }
}

/// Reformat the backend's naive ISO 8601 timestamps for display; unparseable
/// values pass through untouched.
fn format_timestamp(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
