use chrono::{DateTime, Utc};

use recall_lib::flashcards::algorithm::format_interval;
use recall_lib::flashcards::{Card, CardStatus};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status_color(status: CardStatus) -> &'static str {
    match status {
        CardStatus::New => Color::BLUE,
        CardStatus::Learning => Color::YELLOW,
        CardStatus::Review => Color::GREEN,
        CardStatus::Relearning => Color::RED,
    }
}

/// "new", "due now" or "overdue 3d" relative to `now`
pub fn due_label(card: &Card, now: DateTime<Utc>) -> String {
    match card.next_review {
        None => "new".to_string(),
        Some(next) if next > now => match days_between(now, next) {
            0 => "later today".to_string(),
            days => format!("in {}", format_interval(days)),
        },
        Some(next) => match days_between(next, now) {
            0 => "due now".to_string(),
            days => format!("overdue {}", format_interval(days)),
        },
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    u32::try_from((to - from).num_days()).unwrap_or(0)
}

/// A fixed-width bar for a value in [0, 1]
pub fn strength_bar(strength: f64, width: usize) -> String {
    let filled = (strength.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}

/// Simple word-wrapping for terminal output
pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.len() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.len() + 1 + word.len() <= effective_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(format!("{}{}", prefix, current_line));
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(format!("{}{}", prefix, current_line));
        }
    }

    lines
}
