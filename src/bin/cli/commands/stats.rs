use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.cards.review_stats(app.now());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Cards      {}", stats.total_cards);
            println!("  new      {}", stats.new_cards);
            println!("  learning {}", stats.learning_cards);
            println!("  review   {}", stats.review_cards);
            println!("Due now    {}", stats.due_cards);
            println!(
                "Today      {} reviews, {} correct",
                stats.reviews_today, stats.correct_today
            );
        }
    }

    Ok(())
}
