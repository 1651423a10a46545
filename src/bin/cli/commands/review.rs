use anyhow::Result;

use recall_lib::flashcards::algorithm::format_interval;

use crate::app::App;
use crate::render::terminal::{paint, status_color};
use crate::OutputFormat;

pub fn run(app: &mut App, key: &str, quality: i32, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card_id = app.find_card(key)?.id;
    let now = app.now();
    let card = app.cards.record_review(card_id, quality, now)?;
    app.save()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            let status = card.status();
            println!("{}", card.question);
            println!(
                "  {} | ease {:.2} | next review in {}",
                paint(status.label(), status_color(status), use_color),
                card.ease_factor,
                format_interval(card.interval)
            );
        }
    }

    Ok(())
}
