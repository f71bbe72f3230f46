//! Annotation modes and their fields.
//!
//! Two record shapes are supported:
//! - [`AnnotationMode::Judgment`] adds `annotation` (`"Yes"`, `"No"` or empty)
//!   and `annotator_comment`.
//! - [`AnnotationMode::BehaviorCounts`] adds four non-negative counters and
//!   `annotator_comment`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    record::Record,
};

/// Field holding the yes/no judgment.
pub const ANNOTATION_FIELD: &str = "annotation";
/// Free-text comment field, present in both modes.
pub const COMMENT_FIELD: &str = "annotator_comment";
/// Behavior counter: sub-goal setting.
pub const SUB_GOAL_SETTING_FIELD: &str = "sub_goal_setting";
/// Behavior counter: verification.
pub const VERIFICATION_FIELD: &str = "verification";
/// Behavior counter: backtracking.
pub const BACKTRACKING_FIELD: &str = "backtracking";
/// Behavior counter: backward chaining.
pub const BACKWARD_CHAINING_FIELD: &str = "backward_chaining";

/// The four behavior counter fields in display order.
pub const BEHAVIOR_FIELDS: [&str; 4] = [
    SUB_GOAL_SETTING_FIELD,
    VERIFICATION_FIELD,
    BACKTRACKING_FIELD,
    BACKWARD_CHAINING_FIELD,
];

/// Which set of annotation fields the session works with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationMode {
    /// Yes/No judgment plus comment.
    #[default]
    Judgment,
    /// Four behavior counts plus comment.
    BehaviorCounts,
}

impl AnnotationMode {
    /// Fields this mode requires, with their default values.
    #[must_use]
    pub fn defaults(self) -> Vec<(&'static str, Value)> {
        match self {
            Self::Judgment => vec![
                (ANNOTATION_FIELD, Value::String(String::new())),
                (COMMENT_FIELD, Value::String(String::new())),
            ],
            Self::BehaviorCounts => {
                let mut fields: Vec<(&'static str, Value)> =
                    BEHAVIOR_FIELDS.iter().map(|f| (*f, Value::from(0u64))).collect();
                fields.push((COMMENT_FIELD, Value::String(String::new())));
                fields
            }
        }
    }

    /// Names of the fields this mode requires.
    #[must_use]
    pub fn field_names(self) -> Vec<&'static str> {
        self.defaults().into_iter().map(|(name, _)| name).collect()
    }

    /// Insert every missing mode field into `record` with its default.
    ///
    /// Fields already present, including explicit `null`, are left alone.
    pub fn inject_defaults(self, record: &mut Record) {
        for (name, default) in self.defaults() {
            if !record.contains_key(name) {
                record.insert(name.to_string(), default);
            }
        }
    }

    /// Whether a record carries any annotation under this mode.
    ///
    /// Judgment mode counts a non-empty `annotation`; behavior mode counts any
    /// non-zero counter or a non-empty comment.
    #[must_use]
    pub fn is_annotated(self, record: &Record) -> bool {
        match self {
            Self::Judgment => record
                .get(ANNOTATION_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty()),
            Self::BehaviorCounts => {
                let counts = BehaviorCounts::from_record(record);
                let has_comment = record
                    .get(COMMENT_FIELD)
                    .and_then(Value::as_str)
                    .is_some_and(|s| !s.trim().is_empty());
                counts.any_nonzero() || has_comment
            }
        }
    }
}

impl fmt::Display for AnnotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Judgment => write!(f, "judgment"),
            Self::BehaviorCounts => write!(f, "behavior"),
        }
    }
}

impl FromStr for AnnotationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "judgment" | "binary" | "yes-no" => Ok(Self::Judgment),
            "behavior" | "behaviour" | "counts" | "behavior-counts" => Ok(Self::BehaviorCounts),
            other => Err(Error::invalid_config(format!(
                "Unknown annotation mode '{other}'. Use: judgment, behavior"
            ))),
        }
    }
}

/// A yes/no judgment as stored in the `annotation` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    /// `"Yes"`
    Yes,
    /// `"No"`
    No,
}

impl Judgment {
    /// The canonical stored spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Judgment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Yes),
            "no" | "n" => Ok(Self::No),
            _ => Err(Error::invalid_value(
                ANNOTATION_FIELD,
                format!("expected yes or no, got '{s}'"),
            )),
        }
    }
}

impl From<Judgment> for Value {
    fn from(judgment: Judgment) -> Self {
        Value::String(judgment.as_str().to_string())
    }
}

/// Counts of reasoning behaviors observed in a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorCounts {
    /// Times the model set an intermediate sub-goal.
    pub sub_goal_setting: u64,
    /// Times the model checked an intermediate result.
    pub verification: u64,
    /// Times the model abandoned a path and went back.
    pub backtracking: u64,
    /// Times the model reasoned backwards from the goal.
    pub backward_chaining: u64,
}

impl BehaviorCounts {
    /// Create counts in field order.
    #[must_use]
    pub fn new(
        sub_goal_setting: u64,
        verification: u64,
        backtracking: u64,
        backward_chaining: u64,
    ) -> Self {
        Self {
            sub_goal_setting,
            verification,
            backtracking,
            backward_chaining,
        }
    }

    /// Read counts from a record.
    ///
    /// Missing, null, negative or non-integer values read as zero.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let read = |name: &str| record.get(name).and_then(Value::as_u64).unwrap_or(0);
        Self {
            sub_goal_setting: read(SUB_GOAL_SETTING_FIELD),
            verification: read(VERIFICATION_FIELD),
            backtracking: read(BACKTRACKING_FIELD),
            backward_chaining: read(BACKWARD_CHAINING_FIELD),
        }
    }

    /// Parse four whitespace-separated counts in field order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if there are not exactly four values or
    /// any value is not a non-negative integer.
    pub fn parse_args(args: &[&str]) -> Result<Self> {
        if args.len() != BEHAVIOR_FIELDS.len() {
            return Err(Error::invalid_value(
                "counts",
                format!(
                    "expected {} values ({}), got {}",
                    BEHAVIOR_FIELDS.len(),
                    BEHAVIOR_FIELDS.join(", "),
                    args.len()
                ),
            ));
        }

        let mut values = [0u64; 4];
        for (slot, (raw, field)) in values.iter_mut().zip(args.iter().zip(BEHAVIOR_FIELDS)) {
            *slot = parse_count(field, raw)?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Whether any counter is above zero.
    #[must_use]
    pub fn any_nonzero(&self) -> bool {
        [
            self.sub_goal_setting,
            self.verification,
            self.backtracking,
            self.backward_chaining,
        ]
        .iter()
        .any(|&c| c > 0)
    }

    /// The counts as field values ready for a commit.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which it does not for this
    /// plain struct.
    pub fn to_fields(&self) -> Result<Record> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::invalid_value(
                "counts",
                format!("serialized to non-object {other}"),
            )),
        }
    }
}

/// Parse a single non-negative count for `field`.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] for negative or non-numeric input.
pub fn parse_count(field: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::invalid_value(field, format!("'{raw}' is not a non-negative integer"))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::record::record_from_pairs;

    #[test]
    fn test_judgment_defaults() {
        let names = AnnotationMode::Judgment.field_names();
        assert_eq!(names, vec![ANNOTATION_FIELD, COMMENT_FIELD]);
    }

    #[test]
    fn test_behavior_defaults_are_zero() {
        let defaults = AnnotationMode::BehaviorCounts.defaults();
        assert_eq!(defaults.len(), 5);
        for (name, value) in &defaults[..4] {
            assert!(BEHAVIOR_FIELDS.contains(name));
            assert_eq!(value, &json!(0));
        }
        assert_eq!(defaults[4], (COMMENT_FIELD, json!("")));
    }

    #[test]
    fn test_inject_defaults_keeps_existing_values() {
        let mut record = record_from_pairs([("annotation", json!("Yes"))]);
        AnnotationMode::Judgment.inject_defaults(&mut record);
        assert_eq!(record["annotation"], json!("Yes"));
        assert_eq!(record["annotator_comment"], json!(""));
    }

    #[test]
    fn test_inject_defaults_keeps_explicit_null() {
        let mut record = record_from_pairs([("annotator_comment", Value::Null)]);
        AnnotationMode::Judgment.inject_defaults(&mut record);
        assert_eq!(record["annotator_comment"], Value::Null);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "judgment".parse::<AnnotationMode>().unwrap(),
            AnnotationMode::Judgment
        );
        assert_eq!(
            "Behavior".parse::<AnnotationMode>().unwrap(),
            AnnotationMode::BehaviorCounts
        );
        assert!("sentiment".parse::<AnnotationMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [AnnotationMode::Judgment, AnnotationMode::BehaviorCounts] {
            assert_eq!(mode.to_string().parse::<AnnotationMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_judgment_parse_is_case_insensitive() {
        assert_eq!("YES".parse::<Judgment>().unwrap(), Judgment::Yes);
        assert_eq!("yes".parse::<Judgment>().unwrap(), Judgment::Yes);
        assert_eq!("No".parse::<Judgment>().unwrap(), Judgment::No);
        assert!("maybe".parse::<Judgment>().is_err());
    }

    #[test]
    fn test_counts_at_u64_max_do_not_overflow() {
        let record = record_from_pairs([
            ("sub_goal_setting", json!(u64::MAX)),
            ("verification", json!(1)),
            ("backtracking", json!(u64::MAX)),
        ]);
        let counts = BehaviorCounts::from_record(&record);
        assert_eq!(counts.sub_goal_setting, u64::MAX);
        assert!(counts.any_nonzero());
        assert!(AnnotationMode::BehaviorCounts.is_annotated(&record));
    }

    #[test]
    fn test_counts_any_nonzero() {
        assert!(!BehaviorCounts::default().any_nonzero());
        assert!(BehaviorCounts::new(0, 0, 0, 1).any_nonzero());
    }

    #[test]
    fn test_is_annotated_judgment() {
        let mut record = Record::new();
        AnnotationMode::Judgment.inject_defaults(&mut record);
        assert!(!AnnotationMode::Judgment.is_annotated(&record));
        record.insert(ANNOTATION_FIELD.to_string(), json!("Yes"));
        assert!(AnnotationMode::Judgment.is_annotated(&record));
    }

    #[test]
    fn test_is_annotated_behavior() {
        let mut record = Record::new();
        AnnotationMode::BehaviorCounts.inject_defaults(&mut record);
        assert!(!AnnotationMode::BehaviorCounts.is_annotated(&record));
        record.insert(BACKTRACKING_FIELD.to_string(), json!(2));
        assert!(AnnotationMode::BehaviorCounts.is_annotated(&record));
    }

    #[test]
    fn test_counts_parse_args() {
        let counts = BehaviorCounts::parse_args(&["1", "0", "3", "2"]).unwrap();
        assert_eq!(counts, BehaviorCounts::new(1, 0, 3, 2));
        assert!(counts.any_nonzero());
    }

    #[test]
    fn test_counts_parse_rejects_negative() {
        let err = BehaviorCounts::parse_args(&["1", "-1", "0", "0"]).unwrap_err();
        assert!(err.to_string().contains("verification"));
    }

    #[test]
    fn test_counts_parse_rejects_wrong_arity() {
        assert!(BehaviorCounts::parse_args(&["1", "2"]).is_err());
    }

    #[test]
    fn test_counts_from_record_tolerates_garbage() {
        let record = record_from_pairs([
            ("sub_goal_setting", json!(2)),
            ("verification", json!("three")),
            ("backtracking", Value::Null),
        ]);
        let counts = BehaviorCounts::from_record(&record);
        assert_eq!(counts, BehaviorCounts::new(2, 0, 0, 0));
    }

    #[test]
    fn test_counts_to_fields() {
        let fields = BehaviorCounts::new(1, 2, 3, 4).to_fields().unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, BEHAVIOR_FIELDS.to_vec());
        assert_eq!(fields["backward_chaining"], json!(4));
    }
}
