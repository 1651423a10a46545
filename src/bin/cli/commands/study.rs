use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use recall_lib::flashcards::algorithm::{clamp_quality, format_interval, PASSING_QUALITY};
use recall_lib::StudySessionTracker;

use crate::app::App;
use crate::render::terminal::{paint, wrap_lines, Color};
use crate::OutputFormat;

const WRAP_WIDTH: usize = 72;

/// Walk the study queue: show each question, reveal the answer on Enter,
/// then read a 0-5 rating. `q` or end of input stops early.
pub fn run(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let started = app.now();
    let queue = app.cards.study_queue(started, &app.config);
    let mut tracker = StudySessionTracker::new(queue, started);

    if tracker.is_complete() {
        println!("Nothing to study right now.");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !tracker.is_complete() {
        let Some(card_id) = tracker.current_card() else {
            break;
        };
        let card = app.cards.get(card_id)?.clone();

        println!(
            "\n{} ({}/{})",
            paint("Question", Color::BOLD, use_color),
            tracker.position() + 1,
            tracker.queue().len()
        );
        for line in wrap_lines(&card.question, "  ", WRAP_WIDTH) {
            println!("{}", line);
        }
        prompt("[Enter] to reveal, q to quit: ")?;
        match lines.next().transpose()? {
            Some(input) if input.trim() == "q" => break,
            Some(_) => {}
            None => break,
        }

        println!("{}", paint("Answer", Color::BOLD, use_color));
        for line in wrap_lines(&card.answer, "  ", WRAP_WIDTH) {
            println!("{}", line);
        }

        let Some(quality) = read_quality(&mut lines)? else {
            break;
        };
        let now = app.now();
        let updated = tracker.grade(&mut app.cards, quality, now)?;

        let verdict = if clamp_quality(quality) >= PASSING_QUALITY {
            paint("correct", Color::GREEN, use_color)
        } else {
            paint("again", Color::RED, use_color)
        };
        println!("  {} | next review in {}", verdict, format_interval(updated.interval));
    }

    app.save().context("Failed to save reviews")?;

    let session = tracker.session();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(session)?);
        }
        OutputFormat::Plain => {
            let heading = if tracker.is_complete() {
                "Session complete!"
            } else {
                "Session stopped."
            };
            println!("\n{}", paint(heading, Color::BOLD, use_color));
            println!(
                "Studied {} | Correct {} | Incorrect {}",
                session.cards_studied, session.correct_answers, session.incorrect_answers
            );
            if let Some(accuracy) = tracker.accuracy() {
                println!("Accuracy {:.0}%", accuracy * 100.0);
            }
        }
    }

    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    io::stdout().flush()?;
    Ok(())
}

/// Read ratings until one parses. `None` means stop.
fn read_quality(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<i32>> {
    loop {
        prompt("Rate recall 0-5 (q to quit): ")?;
        let Some(input) = lines.next().transpose()? else {
            return Ok(None);
        };
        let input = input.trim();
        if input == "q" {
            return Ok(None);
        }
        match input.parse::<i32>() {
            Ok(quality) => return Ok(Some(quality)),
            Err(_) => println!("  '{}' is not a number", input),
        }
    }
}
