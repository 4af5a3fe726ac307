//! Code for stepping through months and classifying seasons.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-letter month abbreviations, indexed from January
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month in a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    /// The year
    pub year: u32,
    /// The month, from 1 (January) to 12 (December)
    pub month: u32,
}

impl MonthYear {
    /// The first month of every generated dataset
    pub const START: MonthYear = MonthYear {
        year: 2013,
        month: 1,
    };

    /// The following month, rolling over into the next year after December
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whether this month falls in the dry season (December to May)
    pub fn is_dry_season(self) -> bool {
        is_dry_season(self.month)
    }

    /// Iterate over consecutive months, starting with `self`
    pub fn iter_from(self) -> impl Iterator<Item = MonthYear> {
        std::iter::successors(Some(self), |my| Some(my.next()))
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match month_name(self.month) {
            Some(name) => write!(f, "{name} {}", self.year),
            None => write!(f, "{} {}", self.month, self.year),
        }
    }
}

/// Whether the given month (1-12) is in the dry season.
///
/// Months 1-5 and 12 are dry; everything else counts as wet.
pub fn is_dry_season(month: u32) -> bool {
    (1..=5).contains(&month) || month == 12
}

/// Get the abbreviated English name for a month, if it is in range
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rstest::rstest;

    #[rstest]
    #[case(MonthYear { year: 2013, month: 1 }, MonthYear { year: 2013, month: 2 })]
    #[case(MonthYear { year: 2013, month: 11 }, MonthYear { year: 2013, month: 12 })]
    #[case(MonthYear { year: 2013, month: 12 }, MonthYear { year: 2014, month: 1 })]
    fn test_month_year_next(#[case] input: MonthYear, #[case] expected: MonthYear) {
        assert_eq!(input.next(), expected);
    }

    #[test]
    fn test_iter_from_144_months() {
        let months = MonthYear::START.iter_from().take(144).collect_vec();
        assert_eq!(months.first(), Some(&MonthYear::START));
        assert_eq!(
            months.last(),
            Some(&MonthYear {
                year: 2024,
                month: 12
            })
        );
        assert!(months.iter().tuple_windows().all(|(a, b)| a < b));
    }

    #[rstest]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    #[case(11, false)]
    #[case(12, true)]
    fn test_is_dry_season(#[case] month: u32, #[case] expected: bool) {
        assert_eq!(is_dry_season(month), expected);
    }

    #[rstest]
    #[case(1, Some("Jan"))]
    #[case(12, Some("Dec"))]
    #[case(0, None)]
    #[case(13, None)]
    fn test_month_name(#[case] month: u32, #[case] expected: Option<&str>) {
        assert_eq!(month_name(month), expected);
    }

    #[test]
    fn test_display() {
        let my = MonthYear {
            year: 2024,
            month: 3,
        };
        assert_eq!(my.to_string(), "Mar 2024");
    }
}
