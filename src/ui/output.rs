use crate::course::Summary;
use crate::editor::Notice;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BOOK, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

/// Transient message from an editor action
pub fn notice(notice: &Notice) {
    if notice.is_success() {
        success(&notice.to_string());
    } else {
        error(&notice.to_string());
    }
}

/// The aggregate display, or nothing when the table is empty
pub fn summary_line(summary: Option<&Summary>) {
    let Some(summary) = summary else {
        return;
    };
    println!(
        "{} {} {}   {} {}",
        Icons::STATS.style(theme().info.clone()),
        format!("{}:", Summary::AVERAGE_LABEL).style(theme().dim.clone()),
        summary.average_text().bold(),
        format!("{}:", Summary::CREDITS_LABEL).style(theme().dim.clone()),
        summary.total_credits.bold()
    );
}
