// SPDX-License-Identifier: MPL-2.0
//! Plural category selection for integer counts.
//!
//! Covers the languages the client ships catalogs for plus the common
//! European and East Asian ones. Languages without explicit rules use the
//! `one`/`other` split.

use std::fmt;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of `count` in `language` (a lowercase primary subtag).
pub fn plural_category(language: &str, count: i64) -> PluralCategory {
    let n = count.unsigned_abs();
    let n10 = n % 10;
    let n100 = n % 100;

    match language {
        "ja" | "zh" | "ko" | "th" | "vi" | "id" | "tr" => PluralCategory::Other,
        "fr" | "pt" => {
            if n <= 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        "sl" => match n100 {
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            3 | 4 => PluralCategory::Few,
            _ => PluralCategory::Other,
        },
        "ru" | "uk" | "be" | "hr" | "sr" | "bs" => {
            if n10 == 1 && n100 != 11 {
                PluralCategory::One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
        "pl" => {
            if n == 1 {
                PluralCategory::One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
        "cs" | "sk" => match n {
            1 => PluralCategory::One,
            2..=4 => PluralCategory::Few,
            _ => PluralCategory::Other,
        },
        "ar" => match n {
            0 => PluralCategory::Zero,
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            _ if (3..=10).contains(&n100) => PluralCategory::Few,
            _ if (11..=99).contains(&n100) => PluralCategory::Many,
            _ => PluralCategory::Other,
        },
        _ => {
            if n == 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
    }
}
