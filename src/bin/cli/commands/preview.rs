use anyhow::Result;

use recall_lib::flashcards::algorithm::{format_interval, preview_intervals};

use crate::app::App;
use crate::OutputFormat;

const RATINGS: [&str; 4] = ["again", "hard", "good", "easy"];

pub fn run(app: &App, key: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(key)?;
    let intervals = preview_intervals(&card.scheduling_state(), app.now());

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = RATINGS
                .iter()
                .zip(intervals)
                .map(|(rating, days)| (rating.to_string(), days.into()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", card.question);
            for (rating, days) in RATINGS.iter().zip(intervals) {
                println!("  {:<6} {}", rating, format_interval(days));
            }
        }
    }

    Ok(())
}
