use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat) -> Result<()> {
    let Some(card) = app.cards.undo_last_review() else {
        println!("No review to undo.");
        return Ok(());
    };
    app.save()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Restored \"{}\"", card.question);
        }
    }

    Ok(())
}
