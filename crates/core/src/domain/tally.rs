use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use super::OptionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub option_id: OptionId,
    pub text: String,
    pub order: i32,
    pub count: u64,
}

/// Response counts for one multiple choice question. Every defined option is
/// present, including those nobody picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McqTally {
    pub options: Vec<OptionCount>,
    pub total: u64,
}

impl McqTally {
    pub fn percentage_of(&self, count: u64) -> f64 {
        percentage(count, self.total)
    }

    pub fn label_of(&self, count: u64) -> String {
        percentage_label(count, self.total)
    }
}

/// Counts `answers` against `options` (id, text, order).
///
/// Answers pointing at options outside the list are ignored.
pub fn tally_options(
    options: impl IntoIterator<Item = (OptionId, String, i32)>,
    answers: impl IntoIterator<Item = OptionId>,
) -> McqTally {
    let mut counts: HashMap<OptionId, u64> = HashMap::new();
    for option_id in answers {
        *counts.entry(option_id).or_default() += 1;
    }

    let mut rows: Vec<OptionCount> = options
        .into_iter()
        .map(|(option_id, text, order)| OptionCount {
            option_id,
            count: counts.get(&option_id).copied().unwrap_or(0),
            text,
            order,
        })
        .collect();
    rows.sort_by_key(|row| row.order);

    let total = rows.iter().map(|row| row.count).sum();

    McqTally {
        options: rows,
        total,
    }
}

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// `"60.0%"` style label; `"0%"` when nothing was answered.
pub fn percentage_label(count: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", percentage(count, total))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntry {
    pub respondent: String,
    pub text: String,
    pub submitted_at: NaiveDateTime,
}

impl TextEntry {
    /// Drops blank answers and orders the rest oldest first.
    pub fn chronological(entries: impl IntoIterator<Item = TextEntry>) -> Vec<TextEntry> {
        let mut kept: Vec<TextEntry> = entries
            .into_iter()
            .filter(|entry| !entry.text.trim().is_empty())
            .collect();
        kept.sort_by_key(|entry| entry.submitted_at);
        kept
    }

    /// Same as [`TextEntry::chronological`], newest first.
    pub fn newest_first(entries: impl IntoIterator<Item = TextEntry>) -> Vec<TextEntry> {
        let mut kept = Self::chronological(entries);
        kept.reverse();
        kept
    }
}
