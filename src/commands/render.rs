//! Terminal rendering of flows and chat replies

use crate::flow::{Flow, FlowStop, Message};
use colored::Colorize;
use prettytable::{row, Table};

/// Header line with title, stop count, budget and total time
pub fn format_flow_header(flow: &Flow) -> String {
    format!(
        "{}\n{} stops • Budget: {} • ~{:.1} hours total",
        flow.title.bold(),
        flow.stops.len(),
        flow.total_budget_estimate.cyan(),
        flow.total_hours()
    )
}

fn format_stop(stop: &FlowStop) -> String {
    let mut lines = vec![
        format!(
            "({}) {}  {} {}",
            stop.order.to_string().cyan().bold(),
            stop.business_name.bold(),
            format!("{:.1}★", stop.rating).yellow(),
            format!("({} reviews)", stop.review_count).dimmed()
        ),
        format!("    {}", stop.category.to_uppercase().dimmed()),
    ];
    if !stop.reason.is_empty() {
        lines.push(format!("    {} \"{}\"", "Why here:".magenta(), stop.reason));
    }
    lines.push(format!(
        "    {} • ~{} min • {}",
        if stop.price.is_empty() { "-" } else { stop.price.as_str() },
        stop.duration_minutes,
        stop.yelp_url.underline()
    ));
    lines.join("\n")
}

/// The whole flow as a numbered timeline
pub fn format_timeline(flow: &Flow) -> String {
    let mut out = format_flow_header(flow);
    for stop in &flow.stops {
        out.push_str("\n\n");
        out.push_str(&format_stop(stop));
    }
    out
}

pub fn print_timeline(flow: &Flow) {
    println!("\n{}\n", format_timeline(flow));
}

/// Compact table of the stops
pub fn build_summary_table(flow: &Flow) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Business", "Category", "Rating", "Price", "Minutes"]);
    for stop in &flow.stops {
        table.add_row(row![
            stop.order,
            stop.business_name,
            stop.category,
            format!("{:.1} ({})", stop.rating, stop.review_count),
            stop.price,
            stop.duration_minutes
        ]);
    }
    table
}

pub fn print_summary_table(flow: &Flow) {
    build_summary_table(flow).printstd();
    println!();
}

/// Numbered follow-ups, matching the `/1`..`/4` shortcuts
pub fn format_suggestions(actions: &[String]) -> String {
    actions
        .iter()
        .enumerate()
        .map(|(idx, action)| format!("  {} {}", format!("/{}", idx + 1).cyan(), action))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An assistant reply with its suggestions
pub fn print_reply(message: &Message) {
    println!("\n{} {}", "Kelp:".green().bold(), message.content);
    if !message.suggested_actions.is_empty() {
        println!("{}", format_suggestions(&message.suggested_actions));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> Flow {
        Flow {
            id: "flow-1".to_string(),
            title: "Nightcap Loop".to_string(),
            total_duration: 210,
            total_budget_estimate: "$50-80".to_string(),
            stops: vec![FlowStop {
                id: "stop-1".to_string(),
                order: 1,
                business_name: "Trick Dog".to_string(),
                category: "Cocktail Bar".to_string(),
                rating: 4.3,
                review_count: 2100,
                price: "$$".to_string(),
                image_url: "https://picsum.photos/400/300?random=0".to_string(),
                yelp_url: "https://www.yelp.com/search?find_desc=Trick+Dog".to_string(),
                reason: "Inventive menu".to_string(),
                duration_minutes: 210,
                coordinates: None,
            }],
            location: None,
        }
    }

    #[test]
    fn test_timeline_contents() {
        colored::control::set_override(false);
        let text = format_timeline(&flow());
        assert!(text.contains("Nightcap Loop"));
        assert!(text.contains("1 stops • Budget: $50-80 • ~3.5 hours total"));
        assert!(text.contains("(1) Trick Dog  4.3★ (2100 reviews)"));
        assert!(text.contains("Why here: \"Inventive menu\""));
        assert!(text.contains("$$ • ~210 min"));
    }

    #[test]
    fn test_summary_table_rows() {
        let table = build_summary_table(&flow());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_format_suggestions_numbered() {
        colored::control::set_override(false);
        let text = format_suggestions(&["Make it cheaper".to_string(), "Add dessert".to_string()]);
        assert_eq!(text, "  /1 Make it cheaper\n  /2 Add dessert");
    }
}
