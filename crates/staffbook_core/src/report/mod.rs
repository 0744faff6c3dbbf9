//! Aggregate reports over an employee snapshot.
//!
//! # Responsibility
//! - Tenure per employee, headcount split and department breakdown.
//! - Fixed-width text rendering for the interactive shell.
//!
//! # Invariants
//! - Every function here is pure: no store access, no clock reads.
//! - Empty snapshots yield zero/empty summaries, never a division by zero.

pub mod department;
pub mod headcount;
pub mod tenure;

/// Rounds to `decimals` places; exact ties go to the even digit.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn ties_round_to_even_digit() {
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(99.75, 1), 99.8);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(1.0978, 2), 1.1);
    }
}
