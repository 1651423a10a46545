use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{due_label, paint, status_color, Color};
use crate::OutputFormat;

pub fn run(app: &App, limit: Option<usize>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let now = app.now();
    let mut due = app.cards.get_due_cards(now);
    if let Some(limit) = limit {
        due.truncate(limit);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due.");
                return Ok(());
            }

            for card in &due {
                let status = card.status();
                let id = card.id.to_string();
                println!(
                    "{} {:<10} {:<12} {}",
                    paint(&id[..8], Color::DIM, use_color),
                    paint(status.label(), status_color(status), use_color),
                    due_label(card, now),
                    card.question
                );
            }

            println!("\n{} cards due", due.len());
        }
    }

    Ok(())
}
