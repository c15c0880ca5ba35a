//! Terminal rendering of sessions and messages

use crate::session::{ChatSession, Message, Role};
use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use prettytable::{format, Table};

/// Longest title shown in the session table
const MAX_TITLE_WIDTH: usize = 40;

/// Label for a session's creation date relative to `now`
///
/// Same calendar day is "Today", the day before is "Yesterday", anything
/// else is the short month and day.
pub fn format_session_date<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = date.date_naive();
    let today = now.date_naive();

    if day == today {
        "Today".to_string()
    } else if Some(day) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

/// Hour and minute of a message in local time
pub fn format_time(message: &Message) -> String {
    message
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_WIDTH {
        let kept: String = title.chars().take(MAX_TITLE_WIDTH - 3).collect();
        format!("{}...", kept)
    } else {
        title.to_string()
    }
}

/// Print the session table, marking the active session
pub fn print_sessions(sessions: &[ChatSession], active_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No chat sessions found.".yellow());
        return;
    }

    let now = Local::now();
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Created".bold()
    ]);

    for session in sessions {
        let marker = if Some(session.id.as_str()) == active_id {
            "*".green()
        } else {
            "".normal()
        };
        let created = format_session_date(&session.created_at.with_timezone(&Local), &now);

        table.add_row(prettytable::row![
            marker,
            session.id.cyan(),
            truncate_title(&session.title),
            session.messages.len(),
            created
        ]);
    }

    println!("\nChat Sessions:");
    table.printstd();
    println!();
}

/// Print one message with its author and time
pub fn print_message(message: &Message) {
    let label = match message.role {
        Role::User => "You".blue().bold(),
        Role::Assistant => "Assistant".magenta().bold(),
    };
    println!("{} {}", label, format_time(message).dimmed());
    println!("{}\n", message.content);
}

/// Print a session header followed by all its messages
pub fn print_session(session: &ChatSession) {
    println!("\n{} {}", session.title.bold(), format!("({})", session.id).dimmed());
    if session.messages.is_empty() {
        println!("{}\n", "No messages yet.".yellow());
        return;
    }
    println!();
    for message in &session.messages {
        print_message(message);
    }
}
