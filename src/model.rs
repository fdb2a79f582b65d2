use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Active grading regime. Serialized uppercase, matching the persisted
/// document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Fpt,
    Other,
}

/// Grading scale a feature displays in. Stored as the numbers 10 and 4 on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GpaScale {
    Ten,
    Four,
}

impl GpaScale {
    pub fn max(self) -> f64 {
        match self {
            GpaScale::Ten => 10.0,
            GpaScale::Four => 4.0,
        }
    }
}

impl From<GpaScale> for u8 {
    fn from(scale: GpaScale) -> u8 {
        match scale {
            GpaScale::Ten => 10,
            GpaScale::Four => 4,
        }
    }
}

impl TryFrom<u8> for GpaScale {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(GpaScale::Ten),
            4 => Ok(GpaScale::Four),
            other => Err(format!("unsupported GPA scale {other}, expected 10 or 4")),
        }
    }
}

/// One row of the grading conversion table. Rows are evaluated in order
/// and the first range containing the score wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingScaleEntry {
    pub min_score: f64,
    pub max_score: f64,
    pub gpa4: f64,
    pub letter: String,
}

/// The stock conversion table. The ranges partition [0, 10]; changing them
/// changes every stored scale-4 display, so the values are part of the
/// compatibility surface.
pub fn default_grading_scale() -> Vec<GradingScaleEntry> {
    let entry = |min_score: f64, max_score: f64, gpa4: f64, letter: &str| GradingScaleEntry {
        min_score,
        max_score,
        gpa4,
        letter: letter.to_string(),
    };
    vec![
        entry(8.5, 10.0, 4.0, "A"),
        entry(7.0, 8.49, 3.0, "B"),
        entry(5.5, 6.99, 2.0, "C"),
        entry(4.0, 5.49, 1.0, "D"),
        entry(0.0, 3.99, 0.0, "F"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAverageRow {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FptSemesterCourse {
    pub id: String,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FptSemester {
    pub id: String,
    pub courses: Vec<FptSemesterCourse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FptCumulativeRow {
    pub id: String,
    pub semester_gpa: f64,
    pub num_courses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FptPlanner {
    pub total_semesters: f64,
    pub completed_semesters: f64,
    pub current_gpa: f64,
    pub target_gpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FptMajor {
    pub block: Option<String>,
    pub sub_major: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MajorGradeKey {
    pub sub_major: String,
    pub semester: u32,
    pub course_code: String,
}

/// Sparse curriculum grades, keyed by (sub-major, semester, course code).
/// An absent key means the course has no grade yet. The flat map keeps
/// updates simple; serialization restores the nested object layout of the
/// persisted document (`subMajor -> semester -> courseCode -> score`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MajorGrades(BTreeMap<MajorGradeKey, f64>);

impl MajorGrades {
    pub fn get(&self, sub_major: &str, semester: u32, course_code: &str) -> Option<f64> {
        self.0
            .get(&MajorGradeKey {
                sub_major: sub_major.to_string(),
                semester,
                course_code: course_code.to_string(),
            })
            .copied()
    }

    pub fn set(&mut self, sub_major: &str, semester: u32, course_code: &str, score: f64) {
        self.0.insert(
            MajorGradeKey {
                sub_major: sub_major.to_string(),
                semester,
                course_code: course_code.to_string(),
            },
            score,
        );
    }

    pub fn remove(&mut self, sub_major: &str, semester: u32, course_code: &str) -> Option<f64> {
        self.0.remove(&MajorGradeKey {
            sub_major: sub_major.to_string(),
            semester,
            course_code: course_code.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Scores recorded for one semester of one sub-major.
    pub fn semester_scores(&self, sub_major: &str, semester: u32) -> Vec<(String, f64)> {
        self.0
            .iter()
            .filter(|(key, _)| key.sub_major == sub_major && key.semester == semester)
            .map(|(key, score)| (key.course_code.clone(), *score))
            .collect()
    }
}

impl Serialize for MajorGrades {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut nested: BTreeMap<&str, BTreeMap<String, BTreeMap<&str, f64>>> = BTreeMap::new();
        for (key, score) in &self.0 {
            nested
                .entry(key.sub_major.as_str())
                .or_default()
                .entry(key.semester.to_string())
                .or_default()
                .insert(key.course_code.as_str(), *score);
        }
        nested.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MajorGrades {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nested: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>> =
            Deserialize::deserialize(deserializer)?;
        let mut grades = BTreeMap::new();
        for (sub_major, semesters) in nested {
            for (semester, courses) in semesters {
                let semester: u32 = semester.parse().map_err(|_| {
                    serde::de::Error::custom(format!("invalid semester key {semester:?}"))
                })?;
                for (course_code, score) in courses {
                    grades.insert(
                        MajorGradeKey {
                            sub_major: sub_major.clone(),
                            semester,
                            course_code,
                        },
                        score,
                    );
                }
            }
        }
        Ok(MajorGrades(grades))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FptData {
    pub course_average_rows: Vec<CourseAverageRow>,
    pub semesters: Vec<FptSemester>,
    pub cumulative: Vec<FptCumulativeRow>,
    pub planner: FptPlanner,
    pub major: FptMajor,
    #[serde(rename = "selectedSemesterForMajorUI")]
    pub selected_semester_for_major_ui: u32,
    pub major_grades: MajorGrades,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherSemesterCourse {
    pub id: String,
    pub course_name: String,
    pub grade: f64,
    pub credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherCumulativeRow {
    pub id: String,
    pub semester_gpa: f64,
    pub semester_credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherPlanner {
    pub completed_semesters: f64,
    pub completed_credits: f64,
    pub current_gpa: f64,
    pub target_gpa: f64,
    pub total_credits: f64,
    pub total_semesters: f64,
    pub credits_remaining_per_semester: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePerFeature {
    pub course_avg_scale: GpaScale,
    pub semester_scale: GpaScale,
    pub cumulative_scale: GpaScale,
    pub planner_scale: GpaScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherData {
    pub scale_per_feature: ScalePerFeature,
    pub course_average_rows: Vec<CourseAverageRow>,
    pub semester_courses: Vec<OtherSemesterCourse>,
    pub cumulative_semesters: Vec<OtherCumulativeRow>,
    pub planner: OtherPlanner,
    pub grading_scale_config: Vec<GradingScaleEntry>,
}

/// The whole per-user document: the single unit of load and save. Field
/// names are the wire format and must stay stable across releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub selected_mode: Mode,
    pub fpt: FptData,
    pub other: OtherData,
}

impl Default for UserData {
    fn default() -> Self {
        let placeholder_rows = vec![
            CourseAverageRow {
                id: "1".to_string(),
                name: String::new(),
                score: 0.0,
                weight: 50.0,
            },
            CourseAverageRow {
                id: "2".to_string(),
                name: String::new(),
                score: 0.0,
                weight: 50.0,
            },
        ];

        UserData {
            selected_mode: Mode::Fpt,
            fpt: FptData {
                course_average_rows: placeholder_rows.clone(),
                semesters: vec![FptSemester {
                    id: "1".to_string(),
                    courses: vec![FptSemesterCourse {
                        id: "1".to_string(),
                        name: String::new(),
                        score: 0.0,
                    }],
                }],
                cumulative: vec![FptCumulativeRow {
                    id: "1".to_string(),
                    semester_gpa: 0.0,
                    num_courses: 5.0,
                }],
                planner: FptPlanner {
                    total_semesters: 9.0,
                    completed_semesters: 0.0,
                    current_gpa: 0.0,
                    target_gpa: 8.0,
                },
                major: FptMajor {
                    block: None,
                    sub_major: None,
                },
                selected_semester_for_major_ui: 1,
                major_grades: MajorGrades::default(),
            },
            other: OtherData {
                scale_per_feature: ScalePerFeature {
                    course_avg_scale: GpaScale::Ten,
                    semester_scale: GpaScale::Ten,
                    cumulative_scale: GpaScale::Four,
                    planner_scale: GpaScale::Four,
                },
                course_average_rows: placeholder_rows,
                semester_courses: vec![OtherSemesterCourse {
                    id: "1".to_string(),
                    course_name: String::new(),
                    grade: 0.0,
                    credits: 3.0,
                }],
                cumulative_semesters: vec![OtherCumulativeRow {
                    id: "1".to_string(),
                    semester_gpa: 0.0,
                    semester_credits: 15.0,
                }],
                planner: OtherPlanner {
                    completed_semesters: 0.0,
                    completed_credits: 0.0,
                    current_gpa: 0.0,
                    target_gpa: 3.0,
                    total_credits: 120.0,
                    total_semesters: 8.0,
                    credits_remaining_per_semester: Vec::new(),
                },
                grading_scale_config: default_grading_scale(),
            },
        }
    }
}

/// Shallow-merges a persisted document over the defaults: every top-level
/// key present in the persisted JSON overrides the default, anything
/// missing falls back. This is what lets documents written before a schema
/// addition keep loading.
pub fn merge_with_defaults(persisted: Value) -> serde_json::Result<UserData> {
    let mut merged = serde_json::to_value(UserData::default())?;
    if let (Value::Object(base), Value::Object(overlay)) = (&mut merged, persisted) {
        for (key, value) in overlay {
            base.insert(key, value);
        }
    }
    serde_json::from_value(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_uses_the_original_field_names() {
        let value = serde_json::to_value(UserData::default()).unwrap();

        assert_eq!(value["selectedMode"], "FPT");
        assert!(value["fpt"]["courseAverageRows"].is_array());
        assert!(value["fpt"]["semesters"].is_array());
        assert!(value["fpt"]["cumulative"].is_array());
        assert!(value["fpt"]["planner"]["totalSemesters"].is_number());
        assert_eq!(value["fpt"]["selectedSemesterForMajorUI"], 1);
        assert!(value["fpt"]["majorGrades"].is_object());
        assert_eq!(value["other"]["scalePerFeature"]["courseAvgScale"], 10);
        assert_eq!(value["other"]["scalePerFeature"]["cumulativeScale"], 4);
        assert!(value["other"]["semesterCourses"].is_array());
        assert!(value["other"]["cumulativeSemesters"].is_array());
        assert_eq!(
            value["other"]["gradingScaleConfig"][0],
            json!({"minScore": 8.5, "maxScore": 10.0, "gpa4": 4.0, "letter": "A"})
        );
    }

    #[test]
    fn merge_keeps_persisted_keys_and_fills_missing_ones() {
        let mut custom = serde_json::to_value(UserData::default()).unwrap();
        custom["selectedMode"] = json!("OTHER");
        custom["fpt"]["planner"]["targetGpa"] = json!(9.2);
        let partial = json!({
            "selectedMode": custom["selectedMode"],
            "fpt": custom["fpt"],
        });

        let merged = merge_with_defaults(partial).unwrap();
        assert_eq!(merged.selected_mode, Mode::Other);
        assert_eq!(merged.fpt.planner.target_gpa, 9.2);
        // The `other` section was absent and comes back as the default.
        assert_eq!(merged.other, UserData::default().other);
    }

    #[test]
    fn merge_of_empty_document_is_the_default() {
        let merged = merge_with_defaults(json!({})).unwrap();
        assert_eq!(merged, UserData::default());
    }

    #[test]
    fn merge_rejects_malformed_sections() {
        let result = merge_with_defaults(json!({"fpt": 42}));
        assert!(result.is_err());
    }

    #[test]
    fn major_grades_round_trip_the_nested_wire_layout() {
        let mut grades = MajorGrades::default();
        grades.set("SE", 1, "PRF192", 8.5);
        grades.set("SE", 1, "MAE101", 7.0);
        grades.set("SE", 2, "PRO192", 9.0);
        grades.set("AI", 1, "CSI106", 6.5);

        let value = serde_json::to_value(&grades).unwrap();
        assert_eq!(value["SE"]["1"]["PRF192"], 8.5);
        assert_eq!(value["SE"]["2"]["PRO192"], 9.0);
        assert_eq!(value["AI"]["1"]["CSI106"], 6.5);

        let back: MajorGrades = serde_json::from_value(value).unwrap();
        assert_eq!(back, grades);
        assert_eq!(back.get("SE", 1, "MAE101"), Some(7.0));
        assert_eq!(back.get("SE", 3, "MAE101"), None);
        assert_eq!(
            back.semester_scores("SE", 1),
            vec![("MAE101".to_string(), 7.0), ("PRF192".to_string(), 8.5)]
        );
    }

    #[test]
    fn clearing_a_grade_removes_the_wire_entry() {
        let mut grades = MajorGrades::default();
        grades.set("SE", 1, "PRF192", 8.5);
        grades.set("SE", 1, "MAE101", 7.0);

        assert_eq!(grades.remove("SE", 1, "PRF192"), Some(8.5));
        assert_eq!(grades.remove("SE", 1, "PRF192"), None);
        assert_eq!(grades.get("SE", 1, "PRF192"), None);

        let value = serde_json::to_value(&grades).unwrap();
        assert!(value["SE"]["1"]["PRF192"].is_null());
        assert_eq!(value["SE"]["1"]["MAE101"], 7.0);

        grades.remove("SE", 1, "MAE101");
        assert!(grades.is_empty());
        assert_eq!(serde_json::to_value(&grades).unwrap(), json!({}));
    }

    #[test]
    fn scale_serializes_as_numbers() {
        assert_eq!(serde_json::to_value(GpaScale::Ten).unwrap(), json!(10));
        assert_eq!(serde_json::to_value(GpaScale::Four).unwrap(), json!(4));
        assert_eq!(
            serde_json::from_value::<GpaScale>(json!(4)).unwrap(),
            GpaScale::Four
        );
        assert!(serde_json::from_value::<GpaScale>(json!(7)).is_err());
    }
}
