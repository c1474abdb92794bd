//! Text shown around the playfield: counters, menu entries and summaries.

use bank_heist_core::{clamped_fraction, LEVEL_COUNT};
use bank_heist_world::Statistics;

use crate::progression::Progression;

/// Frames it takes a menu entry to be fully revealed.
pub const MENU_REVEAL_FRAMES: u64 = 25;
/// Frames it takes a line of prose to be fully revealed.
pub const TEXT_REVEAL_FRAMES: u64 = 15;
/// Digits shown by each heads-up display counter.
pub const COUNTER_DIGITS: u32 = 3;

/// Instructions shown on the how-to-play screen.
pub const HOW_TO_PLAY: [&str; 11] = [
    "How To Play",
    "",
    "Robbers are walking towards the gold.",
    "Buy turrets and traps from the shop",
    "at the top of the screen, then click",
    "to deploy them. Turrets go on walls,",
    "traps go on the floor.",
    "Killing robbers earns cash.",
    "Hold out for 100 seconds to win,",
    "but lose all of the gold and the",
    "level is lost.",
];

/// Formats a counter right-aligned in `digits` columns, keeping only the
/// lowest digits of the truncated value.
#[must_use]
pub fn format_counter(value: f32, digits: u32) -> String {
    let modulus = 10_i64.checked_pow(digits).unwrap_or(i64::MAX);
    let shown = (value as i64).rem_euclid(modulus);
    format!("{shown:>width$}", width = digits as usize)
}

/// Leading portion of `text` covering `fraction` of its characters.
#[must_use]
pub fn reveal(text: &str, fraction: f32) -> &str {
    let count = text.chars().count();
    let visible = (clamped_fraction(fraction, 0.0, 1.0) * count as f32) as usize;
    match text.char_indices().nth(visible) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Portion of the `line`-th entry of a block visible `frames` frames after
/// the block appeared, each line starting `stride` frames after the previous.
#[must_use]
pub fn reveal_line(text: &str, frames: u64, line: usize, stride: u64) -> &str {
    let stride = stride.max(1) as f32;
    let started = frames as f32 - line as f32 * stride;
    reveal(text, started / stride)
}

/// High score as shown to the player; negative scores are unset.
#[must_use]
pub fn score_label(score: f32) -> String {
    if score < 0.0 {
        return "???".to_owned();
    }
    format!("{score}")
}

/// Entries of the title menu in display order.
#[must_use]
pub fn menu_lines(progression: &Progression) -> Vec<String> {
    let mut lines = Vec::with_capacity(LEVEL_COUNT + 2);
    lines.push("How To Play".to_owned());
    for level in 1..=LEVEL_COUNT {
        if progression.is_unlocked(level) {
            lines.push(format!(
                "Play Level {level} | High Score: {}",
                progression.high_score_label(level)
            ));
        } else {
            lines.push("Complete previous level to unlock".to_owned());
        }
    }
    lines.push("Credits".to_owned());
    lines
}

/// Title menu entries as far as they are revealed `frames` frames after the
/// title screen appeared.
#[must_use]
pub fn revealed_menu(progression: &Progression, frames: u64) -> Vec<String> {
    menu_lines(progression)
        .iter()
        .enumerate()
        .map(|(line, text)| reveal_line(text, frames, line, MENU_REVEAL_FRAMES).to_owned())
        .collect()
}

/// How-to-play text as far as it is revealed `frames` frames after the
/// screen appeared.
#[must_use]
pub fn how_to_play(frames: u64) -> Vec<&'static str> {
    HOW_TO_PLAY
        .iter()
        .enumerate()
        .map(|(line, text)| reveal_line(text, frames, line, TEXT_REVEAL_FRAMES))
        .collect()
}

/// Lines of the end-of-level summary.
#[must_use]
pub fn summary_lines(statistics: &Statistics) -> [String; 7] {
    [
        format!("You killed {} enemies", statistics.kills),
        format!("You deployed {} turrets", statistics.turrets_placed),
        format!("You placed {} traps", statistics.traps_placed),
        format!("You spent {} dollars", statistics.money_spent),
        format!("You took {} damage", statistics.damage_taken),
        String::new(),
        "Press any key to continue".to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_wrap_and_pad() {
        assert_eq!(format_counter(7.9, 3), "  7");
        assert_eq!(format_counter(100.0, 3), "100");
        assert_eq!(format_counter(1234.0, 3), "234");
        assert_eq!(format_counter(-5.0, 3), "995");
        assert_eq!(format_counter(42.0, 0), "0");
    }

    #[test]
    fn reveal_clamps_its_fraction() {
        assert_eq!(reveal("Credits", -3.0), "");
        assert_eq!(reveal("Credits", 0.5), "Cre");
        assert_eq!(reveal("Credits", 4.0), "Credits");
        assert_eq!(reveal("", 0.5), "");
    }

    #[test]
    fn lines_reveal_one_after_another() {
        assert_eq!(reveal_line("abcde", 0, 0, 15), "");
        assert_eq!(reveal_line("abcde", 15, 0, 15), "abcde");
        assert_eq!(reveal_line("abcde", 15, 1, 15), "");
        assert_eq!(reveal_line("abcde", 21, 1, 15), "ab");
    }

    #[test]
    fn menu_hides_locked_levels() {
        let mut progression = Progression::default();
        let _ = progression.record_win(1, 40.0);
        assert_eq!(
            menu_lines(&progression),
            vec![
                "How To Play".to_owned(),
                "Play Level 1 | High Score: 40".to_owned(),
                "Play Level 2 | High Score: ???".to_owned(),
                "Complete previous level to unlock".to_owned(),
                "Credits".to_owned(),
            ]
        );
    }

    #[test]
    fn menu_entries_appear_in_turn() {
        let progression = Progression::default();
        let hidden = revealed_menu(&progression, 0);
        assert!(hidden.iter().all(String::is_empty));

        let first = revealed_menu(&progression, MENU_REVEAL_FRAMES);
        assert_eq!(first[0], "How To Play");
        assert!(first[1..].iter().all(String::is_empty));

        let settled = revealed_menu(&progression, MENU_REVEAL_FRAMES * 8);
        assert_eq!(settled, menu_lines(&progression));
    }

    #[test]
    fn instructions_unroll_line_by_line() {
        let start = how_to_play(TEXT_REVEAL_FRAMES);
        assert_eq!(start[0], HOW_TO_PLAY[0]);
        assert_eq!(start[1], "");
        assert_eq!(start[2], "");

        let settled = how_to_play(TEXT_REVEAL_FRAMES * HOW_TO_PLAY.len() as u64);
        assert_eq!(settled, HOW_TO_PLAY.to_vec());
    }

    #[test]
    fn summary_reports_statistics() {
        let statistics = Statistics {
            kills: 12,
            turrets_placed: 3,
            traps_placed: 2,
            money_spent: 450,
            damage_taken: 22.5,
        };
        let lines = summary_lines(&statistics);
        assert_eq!(lines[0], "You killed 12 enemies");
        assert_eq!(lines[4], "You took 22.5 damage");
        assert_eq!(lines[6], "Press any key to continue");
    }
}
