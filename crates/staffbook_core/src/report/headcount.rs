//! Headcount aggregation: total, current and former employees.

use super::round_to;
use crate::model::employee::Employee;
use crate::model::stats::StatusCounts;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const RULE_WIDTH: usize = 60;

/// Current/former split with percentages of the total.
///
/// Percentages are rounded independently, so their sum may be off from 100
/// by up to 0.1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadcountSummary {
    pub total: u64,
    pub current: u64,
    pub former: u64,
    pub current_pct: f64,
    pub former_pct: f64,
}

/// Builds a summary from store-side counts.
pub fn summarize_headcount(counts: StatusCounts) -> HeadcountSummary {
    HeadcountSummary {
        total: counts.total,
        current: counts.current,
        former: counts.former,
        current_pct: percentage(counts.current, counts.total),
        former_pct: percentage(counts.former, counts.total),
    }
}

/// Counts a snapshot in a single pass.
pub fn headcount_from_snapshot(employees: &[Employee]) -> HeadcountSummary {
    let counts = employees
        .iter()
        .fold(StatusCounts::default(), |mut counts, employee| {
            counts.total += 1;
            if employee.is_current() {
                counts.current += 1;
            } else {
                counts.former += 1;
            }
            counts
        });
    summarize_headcount(counts)
}

/// Renders the fixed-width headcount block.
///
/// The current/former breakdown is omitted when there are no employees.
pub fn render_headcount(summary: &HeadcountSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "EMPLOYEE COUNT SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total employees in database: {}", summary.total);

    if summary.total > 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Current employees: {} ({:.1}%)",
            summary.current, summary.current_pct
        );
        let _ = writeln!(
            out,
            "Former employees: {} ({:.1}%)",
            summary.former, summary.former_pct
        );
        let _ = writeln!(out, "Active workforce: {:.1}%", summary.current_pct);
    }
    let _ = writeln!(out, "{rule}");
    out
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 / total as f64 * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::{render_headcount, summarize_headcount, HeadcountSummary};
    use crate::model::stats::StatusCounts;

    #[test]
    fn two_current_one_former() {
        let summary = summarize_headcount(StatusCounts {
            total: 3,
            current: 2,
            former: 1,
        });
        assert_eq!(
            summary,
            HeadcountSummary {
                total: 3,
                current: 2,
                former: 1,
                current_pct: 66.7,
                former_pct: 33.3,
            }
        );
        assert!((summary.current_pct + summary.former_pct - 100.0).abs() <= 0.1);
    }

    #[test]
    fn exact_ties_round_to_even_and_sum_to_hundred() {
        let summary = summarize_headcount(StatusCounts {
            total: 400,
            current: 399,
            former: 1,
        });
        assert_eq!((summary.current_pct, summary.former_pct), (99.8, 0.2));
        assert_eq!(summary.current_pct + summary.former_pct, 100.0);
    }

    #[test]
    fn empty_store_is_all_zero() {
        let summary = summarize_headcount(StatusCounts::default());
        assert_eq!(summary, HeadcountSummary::default());

        let rendered = render_headcount(&summary);
        assert!(rendered.contains("Total employees in database: 0"));
        assert!(!rendered.contains("Current employees"));
    }

    #[test]
    fn render_shows_breakdown() {
        let rendered = render_headcount(&summarize_headcount(StatusCounts {
            total: 4,
            current: 3,
            former: 1,
        }));
        assert!(rendered.contains("Current employees: 3 (75.0%)"));
        assert!(rendered.contains("Former employees: 1 (25.0%)"));
        assert!(rendered.contains("Active workforce: 75.0%"));
    }
}
