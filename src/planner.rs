use crate::calc::format_gpa;

/// Unit the plan is expressed in; only affects the wording of the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Semesters,
    Credits,
}

impl UnitKind {
    fn noun(self) -> &'static str {
        match self {
            UnitKind::Semesters => "semesters",
            UnitKind::Credits => "credits",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub required: f64,
    pub feasible: bool,
    pub message: String,
}

/// Minimum average GPA needed over the remaining units to land on the
/// target. An unattainable target is a regular outcome (`feasible: false`),
/// never an error.
pub fn required_gpa(
    total_units: f64,
    completed_units: f64,
    current_gpa: f64,
    target_gpa: f64,
    max_scale: f64,
    unit: UnitKind,
) -> PlanOutcome {
    let remaining = total_units - completed_units;

    if remaining <= 0.0 {
        let achieved = current_gpa >= target_gpa;
        let message = if achieved {
            format!(
                "Congratulations! Your current GPA ({}) already meets the target.",
                format_gpa(current_gpa, 2)
            )
        } else {
            format!(
                "Your current GPA ({}) does not meet the target ({}).",
                format_gpa(current_gpa, 2),
                format_gpa(target_gpa, 2)
            )
        };
        return PlanOutcome {
            required: current_gpa,
            feasible: achieved,
            message,
        };
    }

    let required = (target_gpa * total_units - current_gpa * completed_units) / remaining;

    if required > max_scale {
        return PlanOutcome {
            required,
            feasible: false,
            message: format!(
                "You would need an average GPA of {} over the remaining {} {}, which exceeds the maximum of {}.",
                format_gpa(required, 2),
                remaining,
                unit.noun(),
                format_gpa(max_scale, 1)
            ),
        };
    }

    if required < 0.0 {
        return PlanOutcome {
            required: 0.0,
            feasible: true,
            message: format!(
                "You are already past the target. Any passing average over the remaining {} {} will do.",
                remaining,
                unit.noun()
            ),
        };
    }

    PlanOutcome {
        required,
        feasible: true,
        message: format!(
            "You need an average GPA of {} over the remaining {} {}.",
            format_gpa(required, 2),
            remaining,
            unit.noun()
        ),
    }
}
