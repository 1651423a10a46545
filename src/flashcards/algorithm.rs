//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! optimal review intervals based on user performance.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! [`schedule`] never reads the clock: the review time is always passed in,
//! so identical inputs always produce identical outputs.

use chrono::{DateTime, Duration, Utc};

use super::models::SchedulingState;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a card that has never been reviewed
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Interval of a card that has never been reviewed
pub const INITIAL_INTERVAL: u32 = 1;

/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

/// Highest quality rating, a perfect recall
pub const MAX_QUALITY: u8 = 5;

const LAPSE_EASE_PENALTY: f64 = 0.2;

const SECOND_INTERVAL: u32 = 6;

/// Result of calculating the next review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewResult {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval: u32,
    pub last_reviewed: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

impl ReviewResult {
    pub fn state(&self) -> SchedulingState {
        SchedulingState {
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            interval: self.interval,
        }
    }
}

/// Clamp any rating into the 0-5 quality scale
pub fn clamp_quality(quality: i32) -> u8 {
    quality.clamp(0, MAX_QUALITY as i32) as u8
}

/// Calculate the next review interval and ease factor using SM-2 algorithm
///
/// # Arguments
/// * `state` - Current scheduling state, with `ease_factor >= 1.3`
/// * `quality` - Quality rating, clamped into 0-5
/// * `now` - Time of the review
///
/// # Returns
/// ReviewResult with new repetitions, interval, ease factor and review dates
pub fn schedule(state: &SchedulingState, quality: i32, now: DateTime<Utc>) -> ReviewResult {
    debug_assert!(
        state.ease_factor >= MIN_EASE_FACTOR,
        "ease factor {} below floor",
        state.ease_factor
    );

    let quality = clamp_quality(quality);

    let (repetitions, ease_factor, interval) = if quality < PASSING_QUALITY {
        // Lapse: restart the spacing curve with a harder ease factor
        (
            0,
            (state.ease_factor - LAPSE_EASE_PENALTY).max(MIN_EASE_FACTOR),
            INITIAL_INTERVAL,
        )
    } else {
        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let miss = f64::from(MAX_QUALITY - quality);
        let ease_factor =
            (state.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);

        let interval = match state.repetitions {
            0 => INITIAL_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => ((f64::from(state.interval) * ease_factor).round() as u32).max(1),
        };

        (state.repetitions + 1, ease_factor, interval)
    };

    ReviewResult {
        repetitions,
        ease_factor,
        interval,
        last_reviewed: now,
        next_review: now + Duration::days(i64::from(interval)),
    }
}

/// Calculate the preview intervals for each quality rating
/// Used to show users what interval each rating would give
pub fn preview_intervals(state: &SchedulingState, now: DateTime<Utc>) -> [u32; 4] {
    // Again (1), Hard (2), Good (3), Easy (4) map to SM-2 qualities 1, 3, 4, 5
    [1, 2, 3, 4].map(|rating| schedule(state, ui_rating_to_quality(rating), now).interval)
}

/// Map UI rating (1-4: Again, Hard, Good, Easy) to SM-2 quality (0-5)
pub fn ui_rating_to_quality(rating: i32) -> i32 {
    match rating {
        1 => 1, // Again -> quality 1 (incorrect but recognized)
        2 => 3, // Hard -> quality 3 (correct with difficulty)
        3 => 4, // Good -> quality 4 (correct with hesitation)
        4 => 5, // Easy -> quality 5 (perfect)
        _ => 4, // Default to Good
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
