use crate::model::{FptCumulativeRow, GpaScale, GradingScaleEntry};

/// Maps a 0-10 score onto the 0-4 scale using the grading table.
/// First matching entry wins; a score no entry covers maps to 0.
pub fn score_to_gpa4(score10: f64, table: &[GradingScaleEntry]) -> f64 {
    table
        .iter()
        .find(|entry| score10 >= entry.min_score && score10 <= entry.max_score)
        .map(|entry| entry.gpa4)
        .unwrap_or(0.0)
}

/// Letter grade for a score. Scale-4 inputs are rescaled into the 0-10
/// domain before the table lookup.
pub fn score_to_letter<'a>(score: f64, scale: GpaScale, table: &'a [GradingScaleEntry]) -> &'a str {
    let score10 = match scale {
        GpaScale::Four => score * 2.5,
        GpaScale::Ten => score,
    };
    table
        .iter()
        .find(|entry| score10 >= entry.min_score && score10 <= entry.max_score)
        .map(|entry| entry.letter.as_str())
        .unwrap_or("F")
}

/// Percentage-weighted course average: sum(score * weight) / 100.
/// The divisor is always 100 regardless of the actual weight sum; callers
/// gate on `weights_valid` before trusting the result.
pub fn weighted_course_average(rows: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = rows.iter().map(|(_, weight)| weight).sum();
    if total_weight == 0.0 {
        return 0.0;
    }
    rows.iter().map(|(score, weight)| score * weight).sum::<f64>() / 100.0
}

/// Component weights must sum to 100 percent, within rounding tolerance.
pub fn weights_valid(weights: &[f64]) -> bool {
    (weights.iter().sum::<f64>() - 100.0).abs() < 0.01
}

/// Arithmetic mean of the scores that have been entered. A score of
/// exactly 0 means "not graded yet" and is excluded, not averaged in.
pub fn plain_average(scores: &[f64]) -> f64 {
    let graded: Vec<f64> = scores.iter().copied().filter(|s| *s > 0.0).collect();
    if graded.is_empty() {
        return 0.0;
    }
    graded.iter().sum::<f64>() / graded.len() as f64
}

/// Cumulative GPA over semester rows. Rows with a zero semester GPA are
/// skipped (ungraded convention). When `weighted`, each semester counts
/// proportionally to its number of courses.
pub fn fpt_cumulative(rows: &[FptCumulativeRow], weighted: bool) -> f64 {
    let graded: Vec<&FptCumulativeRow> = rows.iter().filter(|r| r.semester_gpa > 0.0).collect();
    if graded.is_empty() {
        return 0.0;
    }

    if weighted {
        let total_courses: f64 = graded.iter().map(|r| r.num_courses).sum();
        if total_courses == 0.0 {
            return 0.0;
        }
        return graded
            .iter()
            .map(|r| r.semester_gpa * r.num_courses)
            .sum::<f64>()
            / total_courses;
    }

    graded.iter().map(|r| r.semester_gpa).sum::<f64>() / graded.len() as f64
}

/// Credit-weighted average over (grade, credits) pairs. Unlike
/// `plain_average`, zero grades are real grades here and pull the average
/// down; only a zero credit total degenerates to 0.
pub fn credit_weighted_average(pairs: &[(f64, f64)]) -> f64 {
    let total_credits: f64 = pairs.iter().map(|(_, credits)| credits).sum();
    if total_credits == 0.0 {
        return 0.0;
    }
    pairs
        .iter()
        .map(|(grade, credits)| grade * credits)
        .sum::<f64>()
        / total_credits
}

pub fn format_gpa(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl GpaBand {
    pub fn label(self) -> &'static str {
        match self {
            GpaBand::Excellent => "excellent",
            GpaBand::Good => "good",
            GpaBand::Average => "average",
            GpaBand::Poor => "poor",
        }
    }
}

/// Coarse quality band, relative to the scale maximum.
pub fn gpa_band(score: f64, scale: GpaScale) -> GpaBand {
    let normalized = score / scale.max();
    if normalized >= 0.85 {
        GpaBand::Excellent
    } else if normalized >= 0.7 {
        GpaBand::Good
    } else if normalized >= 0.5 {
        GpaBand::Average
    } else {
        GpaBand::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_grading_scale;

    #[test]
    fn grading_table_maps_boundaries_in_order() {
        let table = default_grading_scale();
        assert_eq!(score_to_gpa4(10.0, &table), 4.0);
        assert_eq!(score_to_gpa4(8.5, &table), 4.0);
        assert_eq!(score_to_gpa4(8.49, &table), 3.0);
        assert_eq!(score_to_gpa4(5.5, &table), 2.0);
        assert_eq!(score_to_gpa4(4.0, &table), 1.0);
        assert_eq!(score_to_gpa4(3.99, &table), 0.0);
        assert_eq!(score_to_gpa4(0.0, &table), 0.0);
    }

    #[test]
    fn unmatched_score_falls_back_silently() {
        let table = default_grading_scale();
        assert_eq!(score_to_gpa4(11.0, &table), 0.0);
        assert_eq!(score_to_letter(11.0, GpaScale::Ten, &table), "F");
    }

    #[test]
    fn letter_grade_rescales_scale4_input() {
        let table = default_grading_scale();
        assert_eq!(score_to_letter(9.0, GpaScale::Ten, &table), "A");
        // 3.5 * 2.5 = 8.75 lands in the A band.
        assert_eq!(score_to_letter(3.5, GpaScale::Four, &table), "A");
        assert_eq!(score_to_letter(2.9, GpaScale::Four, &table), "B");
        assert_eq!(score_to_letter(1.0, GpaScale::Four, &table), "F");
    }

    #[test]
    fn weighted_average_divides_by_hundred() {
        let rows = vec![(8.0, 60.0), (6.0, 40.0)];
        let value = weighted_course_average(&rows);
        assert!((value - 7.2).abs() < 1e-9);
        assert!(weights_valid(&[60.0, 40.0]));
    }

    #[test]
    fn weighted_average_is_not_normalized_by_weight_sum() {
        // Weights sum to 50, which is invalid input; the function still
        // divides by 100 and the caller is expected to reject the rows.
        let rows = vec![(8.0, 25.0), (6.0, 25.0)];
        let value = weighted_course_average(&rows);
        assert!((value - 3.5).abs() < 1e-9);
        assert!(!weights_valid(&[25.0, 25.0]));
    }

    #[test]
    fn weighted_average_of_zero_weights_is_zero() {
        assert_eq!(weighted_course_average(&[(9.0, 0.0), (8.0, 0.0)]), 0.0);
        assert_eq!(weighted_course_average(&[]), 0.0);
    }

    #[test]
    fn plain_average_excludes_ungraded_scores() {
        assert_eq!(plain_average(&[]), 0.0);
        assert_eq!(plain_average(&[0.0, 0.0, 0.0]), 0.0);
        assert!((plain_average(&[8.0, 0.0, 6.0]) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn credit_weighted_average_includes_zero_grades() {
        let pairs = vec![(0.0, 3.0), (10.0, 3.0)];
        assert!((credit_weighted_average(&pairs) - 5.0).abs() < 1e-9);
        assert_eq!(credit_weighted_average(&[(8.0, 0.0)]), 0.0);
        assert_eq!(credit_weighted_average(&[]), 0.0);
    }

    #[test]
    fn cumulative_skips_zero_gpa_rows() {
        let rows = vec![
            FptCumulativeRow {
                id: "1".to_string(),
                semester_gpa: 8.0,
                num_courses: 5.0,
            },
            FptCumulativeRow {
                id: "2".to_string(),
                semester_gpa: 0.0,
                num_courses: 5.0,
            },
            FptCumulativeRow {
                id: "3".to_string(),
                semester_gpa: 6.0,
                num_courses: 3.0,
            },
        ];

        let weighted = fpt_cumulative(&rows, true);
        let expected = (8.0 * 5.0 + 6.0 * 3.0) / 8.0;
        assert!((weighted - expected).abs() < 1e-9);

        let unweighted = fpt_cumulative(&rows, false);
        assert!((unweighted - 7.0).abs() < 1e-9);

        assert_eq!(fpt_cumulative(&[], true), 0.0);
    }

    #[test]
    fn bands_follow_scale_fractions() {
        assert_eq!(gpa_band(9.0, GpaScale::Ten), GpaBand::Excellent);
        assert_eq!(gpa_band(7.5, GpaScale::Ten), GpaBand::Good);
        assert_eq!(gpa_band(5.0, GpaScale::Ten), GpaBand::Average);
        assert_eq!(gpa_band(4.9, GpaScale::Ten), GpaBand::Poor);
        assert_eq!(gpa_band(3.4, GpaScale::Four), GpaBand::Excellent);
    }
}
