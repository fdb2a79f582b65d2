use std::fmt::Write;

use chrono::Utc;

use crate::calc::{
    credit_weighted_average, format_gpa, fpt_cumulative, gpa_band, plain_average, score_to_gpa4,
    score_to_letter, weighted_course_average, weights_valid,
};
use crate::curriculum;
use crate::model::{default_grading_scale, GpaScale, Mode, UserData};
use crate::planner::{required_gpa, UnitKind};

/// Markdown summary of everything the engine derives from the document.
/// Only the active mode's sections are rendered.
pub fn build_report(data: &UserData) -> String {
    let mut output = String::new();

    match data.selected_mode {
        Mode::Fpt => build_fpt_report(data, &mut output),
        Mode::Other => build_other_report(data, &mut output),
    }

    output
}

fn build_fpt_report(data: &UserData, output: &mut String) {
    let table = default_grading_scale();
    let fpt = &data.fpt;

    let _ = writeln!(output, "# GPA Summary (FPT mode)");
    let _ = writeln!(output, "Generated on {}", Utc::now().date_naive());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Average");

    let pairs: Vec<(f64, f64)> = fpt
        .course_average_rows
        .iter()
        .map(|r| (r.score, r.weight))
        .collect();
    let weights: Vec<f64> = fpt.course_average_rows.iter().map(|r| r.weight).collect();

    if weights_valid(&weights) {
        let average = weighted_course_average(&pairs);
        let _ = writeln!(
            output,
            "- Average: {} ({}, {})",
            format_gpa(average, 2),
            score_to_letter(average, GpaScale::Ten, &table),
            gpa_band(average, GpaScale::Ten).label()
        );
    } else {
        let _ = writeln!(
            output,
            "- Average unavailable: weights sum to {}, expected 100.",
            format_gpa(weights.iter().sum::<f64>(), 2)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Semester GPA");
    for (index, semester) in fpt.semesters.iter().enumerate() {
        let scores: Vec<f64> = semester.courses.iter().map(|c| c.score).collect();
        let average = plain_average(&scores);
        let _ = writeln!(
            output,
            "- Semester {}: {} ({}, {} on the 4.0 scale)",
            index + 1,
            format_gpa(average, 2),
            score_to_letter(average, GpaScale::Ten, &table),
            format_gpa(score_to_gpa4(average, &table), 1)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Cumulative GPA");
    let _ = writeln!(
        output,
        "- Weighted by courses: {}",
        format_gpa(fpt_cumulative(&fpt.cumulative, true), 2)
    );
    let _ = writeln!(
        output,
        "- Unweighted: {}",
        format_gpa(fpt_cumulative(&fpt.cumulative, false), 2)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Planner");
    let plan = required_gpa(
        fpt.planner.total_semesters,
        fpt.planner.completed_semesters,
        fpt.planner.current_gpa,
        fpt.planner.target_gpa,
        10.0,
        UnitKind::Semesters,
    );
    let _ = writeln!(output, "- {}", plan.message);

    if let (Some(block), Some(sub_major)) = (&fpt.major.block, &fpt.major.sub_major) {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Major Progress ({sub_major})");
        for semester in 1..=curriculum::total_semesters(block, sub_major) {
            let courses = curriculum::semester_courses(block, sub_major, semester);
            if courses.is_empty() {
                continue;
            }
            let scores: Vec<f64> = courses
                .iter()
                .filter_map(|code| fpt.major_grades.get(sub_major, semester, code))
                .collect();
            let graded = scores.iter().filter(|s| **s > 0.0).count();
            let _ = writeln!(
                output,
                "- Semester {}: {}/{} graded, average {}",
                semester,
                graded,
                courses.len(),
                format_gpa(plain_average(&scores), 2)
            );
        }
    }
}

fn build_other_report(data: &UserData, output: &mut String) {
    let other = &data.other;
    let scales = other.scale_per_feature;
    let table = &other.grading_scale_config;

    let _ = writeln!(output, "# GPA Summary (credit-weighted mode)");
    let _ = writeln!(output, "Generated on {}", Utc::now().date_naive());
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Course Average (scale {})",
        u8::from(scales.course_avg_scale)
    );

    let pairs: Vec<(f64, f64)> = other
        .course_average_rows
        .iter()
        .map(|r| (r.score, r.weight))
        .collect();
    let weights: Vec<f64> = other.course_average_rows.iter().map(|r| r.weight).collect();

    if weights_valid(&weights) {
        let average = weighted_course_average(&pairs);
        let _ = writeln!(
            output,
            "- Average: {} ({})",
            format_gpa(average, 2),
            score_to_letter(average, scales.course_avg_scale, table)
        );
    } else {
        let _ = writeln!(
            output,
            "- Average unavailable: weights sum to {}, expected 100.",
            format_gpa(weights.iter().sum::<f64>(), 2)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Semester GPA (scale {})",
        u8::from(scales.semester_scale)
    );
    let course_pairs: Vec<(f64, f64)> = other
        .semester_courses
        .iter()
        .map(|c| (c.grade, c.credits))
        .collect();
    let semester_gpa = credit_weighted_average(&course_pairs);
    let total_credits: f64 = other.semester_courses.iter().map(|c| c.credits).sum();
    let _ = writeln!(
        output,
        "- {} over {} credits ({})",
        format_gpa(semester_gpa, 2),
        total_credits,
        gpa_band(semester_gpa, scales.semester_scale).label()
    );

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Cumulative GPA (scale {})",
        u8::from(scales.cumulative_scale)
    );
    let cumulative_pairs: Vec<(f64, f64)> = other
        .cumulative_semesters
        .iter()
        .map(|s| (s.semester_gpa, s.semester_credits))
        .collect();
    let _ = writeln!(
        output,
        "- {}",
        format_gpa(credit_weighted_average(&cumulative_pairs), 2)
    );

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Planner (scale {})",
        u8::from(scales.planner_scale)
    );
    let plan = required_gpa(
        other.planner.total_credits,
        other.planner.completed_credits,
        other.planner.current_gpa,
        other.planner.target_gpa,
        scales.planner_scale.max(),
        UnitKind::Credits,
    );
    let _ = writeln!(output, "- {}", plan.message);
}
