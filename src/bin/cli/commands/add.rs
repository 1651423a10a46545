use anyhow::Result;

use recall_lib::flashcards::{Card, Difficulty};
use recall_lib::knowledge::KnowledgeNode;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    question: String,
    answer: String,
    category: String,
    difficulty: Difficulty,
    topic: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let card = Card::new(question, answer)
        .category(category.clone())
        .difficulty(difficulty);
    let card_id = card.id;
    app.cards.insert(card)?;

    let node_id = match topic {
        Some(label) => {
            let node_id = match app.graph.find_by_label(label) {
                Some(node) => node.id,
                None => {
                    let node = KnowledgeNode::new(label, category);
                    let id = node.id;
                    app.graph.add_node(node)?;
                    id
                }
            };
            app.graph.link_card(node_id, card_id)?;
            Some(node_id)
        }
        None => None,
    };

    app.save()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "card": app.cards.get(card_id)?,
                "nodeId": node_id.map(|id| id.to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added card {}", card_id);
            if let (Some(label), Some(_)) = (topic, node_id) {
                println!("Linked to topic \"{}\"", label);
            }
        }
    }

    Ok(())
}
