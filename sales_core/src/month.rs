//! Month names and misspelling repair
//!
//! Sales records name their month in Portuguese. The set is closed: every
//! canonical record carries one of the twelve [`Month`] variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Janeiro,
    Fevereiro,
    #[serde(rename = "Março")]
    Marco,
    Abril,
    Maio,
    Junho,
    Julho,
    Agosto,
    Setembro,
    Outubro,
    Novembro,
    Dezembro,
}

/// Known misspellings seen in the sales source and their canonical month
pub const MONTH_ALIASES: [(&str, Month); 8] = [
    ("Fevreiro", Month::Fevereiro),
    ("Maiu", Month::Maio),
    ("Setembr", Month::Setembro),
    ("Novembr", Month::Novembro),
    ("Feverero", Month::Fevereiro),
    ("Janiero", Month::Janeiro),
    ("Outbro", Month::Outubro),
    ("Dezembo", Month::Dezembro),
];

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Janeiro,
        Month::Fevereiro,
        Month::Marco,
        Month::Abril,
        Month::Maio,
        Month::Junho,
        Month::Julho,
        Month::Agosto,
        Month::Setembro,
        Month::Outubro,
        Month::Novembro,
        Month::Dezembro,
    ];

    /// Value assigned to rows whose month cannot be recovered
    pub const FALLBACK: Month = Month::Janeiro;

    /// Calendar index, 1 for January through 12 for December
    pub fn index(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_index(index: u32) -> Option<Month> {
        index
            .checked_sub(1)
            .and_then(|i| Month::ALL.get(i as usize).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Janeiro => "Janeiro",
            Month::Fevereiro => "Fevereiro",
            Month::Marco => "Março",
            Month::Abril => "Abril",
            Month::Maio => "Maio",
            Month::Junho => "Junho",
            Month::Julho => "Julho",
            Month::Agosto => "Agosto",
            Month::Setembro => "Setembro",
            Month::Outubro => "Outubro",
            Month::Novembro => "Novembro",
            Month::Dezembro => "Dezembro",
        }
    }

    /// Repair a raw month value.
    ///
    /// Applies the alias table to the trimmed value, then capitalizes it
    /// (first character upper case, the rest lower case) and matches the
    /// result against the canonical names. `None` means the value is unknown.
    pub fn repair(raw: &str) -> Option<Month> {
        let raw = raw.trim();
        let aliased = MONTH_ALIASES
            .iter()
            .find(|(alias, _)| *alias == raw)
            .map(|(_, month)| month.name())
            .unwrap_or(raw);

        capitalize(aliased).parse().ok()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Error returned when a string is not an exact canonical month name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMonth(pub String);

impl fmt::Display for UnknownMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown month '{}'", self.0)
    }
}

impl std::error::Error for UnknownMonth {}

impl FromStr for Month {
    type Err = UnknownMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips_through_all() {
        for (i, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.index(), i as u32 + 1);
            assert_eq!(Month::from_index(month.index()), Some(*month));
        }
        assert_eq!(Month::from_index(0), None);
        assert_eq!(Month::from_index(13), None);
    }

    #[test]
    fn test_repair_applies_aliases_before_capitalizing() {
        assert_eq!(Month::repair("Fevreiro"), Some(Month::Fevereiro));
        assert_eq!(Month::repair("Dezembo"), Some(Month::Dezembro));
        // Aliases are exact; a lower-cased misspelling is not in the table
        assert_eq!(Month::repair("fevreiro"), None);
    }

    #[test]
    fn test_repair_capitalizes_valid_names() {
        assert_eq!(Month::repair("MAIO"), Some(Month::Maio));
        assert_eq!(Month::repair("março"), Some(Month::Marco));
        assert_eq!(Month::repair("  julho "), Some(Month::Julho));
    }

    #[test]
    fn test_repair_rejects_unknown_values() {
        assert_eq!(Month::repair(""), None);
        assert_eq!(Month::repair("Mai"), None);
        assert_eq!(Month::repair("13"), None);
    }
}
