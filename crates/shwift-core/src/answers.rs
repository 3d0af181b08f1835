use crate::questions::{find_question, questions_for, Question, QuestionKind};
use crate::tier::Tier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Scalar produced by a single form widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Integer(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Integer(value)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field '{key}' does not belong to the {tier} question set")]
    UnknownField { tier: Tier, key: String },

    #[error("Field '{key}' expects a whole number, got {got}")]
    NotAnInteger { key: String, got: String },

    #[error("Field '{key}' must be between {min} and {max}, got {value}")]
    OutOfRange { key: String, min: i64, max: i64, value: i64 },

    #[error("Field '{key}' must be one of the listed options, got '{got}'")]
    UnknownOption { key: String, got: String },

    #[error("Field '{key}' expects text")]
    NotText { key: String },
}

/// The answers of one submission, keyed exactly by its tier's question keys.
///
/// Entries keep the tier's declared question order. A record is never
/// mutated once collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    tier: Tier,
    entries: Vec<(&'static str, AnswerValue)>,
}

impl AnswerRecord {
    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AnswerValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turn submitted widget values into an [`AnswerRecord`] for `tier`.
///
/// Only the constraints a widget itself imposes are checked: numbers must be
/// whole and inside the widget bounds, choices must be listed options, and
/// text is taken verbatim (empty is fine). A field left out of the submission
/// takes the value its widget shows when untouched.
pub fn collect_answers(
    tier: Tier,
    submitted: &HashMap<String, Value>,
) -> Result<AnswerRecord, FormError> {
    if let Some(key) = submitted
        .keys()
        .find(|key| find_question(tier, key).is_none())
    {
        return Err(FormError::UnknownField {
            tier,
            key: key.clone(),
        });
    }

    let entries = questions_for(tier)
        .iter()
        .map(|question| {
            let value = match submitted.get(question.key) {
                Some(raw) => read_widget_value(question, raw)?,
                None => untouched_value(question),
            };
            Ok((question.key, value))
        })
        .collect::<Result<Vec<_>, FormError>>()?;

    Ok(AnswerRecord { tier, entries })
}

fn untouched_value(question: &Question) -> AnswerValue {
    match question.kind {
        QuestionKind::Text | QuestionKind::TextArea => AnswerValue::Text(String::new()),
        QuestionKind::Slider { default, .. } | QuestionKind::Number { default, .. } => {
            AnswerValue::Integer(default)
        }
        QuestionKind::Choice { options } => AnswerValue::Text(options[0].to_string()),
    }
}

fn read_widget_value(question: &Question, raw: &Value) -> Result<AnswerValue, FormError> {
    let key = question.key;
    match question.kind {
        QuestionKind::Text | QuestionKind::TextArea => match raw {
            Value::String(s) => Ok(AnswerValue::Text(s.clone())),
            Value::Null => Ok(AnswerValue::Text(String::new())),
            _ => Err(FormError::NotText {
                key: key.to_string(),
            }),
        },
        QuestionKind::Slider { min, max, .. } | QuestionKind::Number { min, max, .. } => {
            let value = read_integer(key, raw)?;
            if value < min || value > max {
                return Err(FormError::OutOfRange {
                    key: key.to_string(),
                    min,
                    max,
                    value,
                });
            }
            Ok(AnswerValue::Integer(value))
        }
        QuestionKind::Choice { options } => {
            let got = raw.as_str().unwrap_or_default();
            options
                .iter()
                .find(|option| **option == got)
                .map(|option| AnswerValue::Text(option.to_string()))
                .ok_or_else(|| FormError::UnknownOption {
                    key: key.to_string(),
                    got: raw.as_str().map(str::to_string).unwrap_or_else(|| raw.to_string()),
                })
        }
    }
}

// HTML forms post numbers as strings, so both encodings are accepted.
fn read_integer(key: &str, raw: &Value) -> Result<i64, FormError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FormError::NotAnInteger {
        key: key.to_string(),
        got: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn collects_full_community_submission_in_declared_order() {
        let record = collect_answers(
            Tier::Community,
            &submission(json!({
                "readiness": 8,
                "q1_goal_90": "find a new job",
                "clarity": 3,
                "drain": "Overwhelm",
                "strength": "persistence",
                "state": "Exhausted",
                "delay_reason": "Low energy",
                "pattern_to_change": "procrastination",
                "pattern_to_strengthen": "follow-through"
            })),
        )
        .unwrap();

        assert_eq!(record.tier(), Tier::Community);
        assert_eq!(record.len(), 9);
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.first(), Some(&"q1_goal_90"));
        assert_eq!(keys.last(), Some(&"readiness"));
        assert_eq!(record.get("clarity"), Some(&AnswerValue::Integer(3)));
        assert_eq!(record.get("drain"), Some(&AnswerValue::from("Overwhelm")));
    }

    #[test]
    fn untouched_widgets_take_their_defaults() {
        let record = collect_answers(Tier::Lab, &HashMap::new()).unwrap();
        assert_eq!(record.len(), 12);
        assert_eq!(record.get("one_liner"), Some(&AnswerValue::from("")));
        assert_eq!(record.get("hours_per_week"), Some(&AnswerValue::Integer(10)));
        assert_eq!(record.get("pain_confidence"), Some(&AnswerValue::Integer(6)));
        assert_eq!(
            record.get("exec_bottleneck"),
            Some(&AnswerValue::from("Shipping fast"))
        );
    }

    #[test]
    fn empty_free_text_is_accepted() {
        let record =
            collect_answers(Tier::Pro, &submission(json!({ "culture_description": "" }))).unwrap();
        assert_eq!(record.get("culture_description"), Some(&AnswerValue::from("")));
    }

    #[test]
    fn numeric_strings_from_html_forms_are_read() {
        let record =
            collect_answers(Tier::Lab, &submission(json!({ "hours_per_week": " 40 " }))).unwrap();
        assert_eq!(record.get("hours_per_week"), Some(&AnswerValue::Integer(40)));
    }

    #[test]
    fn slider_outside_bounds_is_rejected() {
        let err = collect_answers(Tier::Community, &submission(json!({ "clarity": 11 })))
            .unwrap_err();
        assert_eq!(
            err,
            FormError::OutOfRange {
                key: "clarity".into(),
                min: 1,
                max: 10,
                value: 11
            }
        );
        assert!(collect_answers(Tier::Lab, &submission(json!({ "hours_per_week": 169 }))).is_err());
        assert!(collect_answers(Tier::Lab, &submission(json!({ "hours_per_week": 0 }))).is_ok());
    }

    #[test]
    fn fractional_numbers_are_rejected() {
        let err =
            collect_answers(Tier::Pro, &submission(json!({ "role_clarity": 4.5 }))).unwrap_err();
        assert!(matches!(err, FormError::NotAnInteger { .. }));
    }

    #[test]
    fn choice_must_be_a_listed_option() {
        let err = collect_answers(Tier::Community, &submission(json!({ "state": "Ecstatic" })))
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownOption { ref key, .. } if key == "state"));
    }

    #[test]
    fn keys_from_another_tier_are_rejected() {
        let err = collect_answers(Tier::Community, &submission(json!({ "one_liner": "x" })))
            .unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownField {
                tier: Tier::Community,
                key: "one_liner".into()
            }
        );
    }

    #[test]
    fn display_stringifies_scalars() {
        assert_eq!(AnswerValue::Integer(7).to_string(), "7");
        assert_eq!(AnswerValue::from("Calm").to_string(), "Calm");
    }
}
