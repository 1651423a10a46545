use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, strength_bar, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let nodes = app.graph.snapshot(app.now(), &app.cards)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        OutputFormat::Plain => {
            if nodes.is_empty() {
                println!("No topics. Add cards with --topic to build the graph.");
                return Ok(());
            }

            let width = nodes.iter().map(|n| n.label.len()).max().unwrap_or(5).max(5);
            for node in &nodes {
                let color = if node.strength >= 0.7 {
                    Color::GREEN
                } else if node.strength >= 0.4 {
                    Color::YELLOW
                } else {
                    Color::RED
                };
                println!(
                    "{:<width$} {} {:>3.0}%",
                    node.label,
                    paint(&strength_bar(node.strength, 20), color, use_color),
                    node.strength * 100.0,
                    width = width
                );
            }
        }
    }

    Ok(())
}
