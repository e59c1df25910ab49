// Practice question models
// Aptitude questions come in two shapes: an options array with an
// "answer" field, or four option1..option4 slots with "correctAnswer"

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::coerce;

/// DSA question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Case-insensitive label lookup; unknown labels yield None
    pub fn from_label(label: &str) -> Option<Difficulty> {
        match label.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiple-choice aptitude question
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PracticeQuestion {
    pub id: Option<u64>,
    pub title: String,
    pub options: Vec<String>,
    /// Raw stored answer; resolved against the options before grading
    pub answer: Option<String>,
    pub tags: Vec<String>,
}

impl PracticeQuestion {
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self {
            id: coerce::opt_field_u64(value, "id"),
            title: coerce::field_str(value, "title"),
            options: decode_options(value),
            answer: coerce::opt_field_str(value, "answer")
                .or_else(|| coerce::opt_field_str(value, "correctAnswer")),
            tags: decode_tags(value),
        }
    }
}

/// Options arrive as an explicit array or as four numbered slots;
/// blank slots are dropped and numeric options stringified
fn decode_options(value: &Value) -> Vec<String> {
    if let Some(items) = value.get("options").and_then(Value::as_array) {
        if !items.is_empty() {
            return items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|option| !option.trim().is_empty())
                .collect();
        }
    }

    ["option1", "option2", "option3", "option4"]
        .iter()
        .map(|slot| coerce::field_str(value, slot))
        .filter(|option| !option.trim().is_empty())
        .collect()
}

fn decode_tags(value: &Value) -> Vec<String> {
    let tags = coerce::field_str_list(value, "tag");
    if tags.is_empty() {
        coerce::field_str_list(value, "tags")
    } else {
        tags
    }
}

/// Curated DSA practice question
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DsaQuestion {
    pub id: Option<u64>,
    pub title: String,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
    pub link: String,
    pub solved: bool,
}

impl DsaQuestion {
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self {
            id: coerce::opt_field_u64(value, "id"),
            title: coerce::field_str(value, "title"),
            difficulty: value
                .get("difficulty")
                .and_then(Value::as_str)
                .and_then(Difficulty::from_label),
            tags: decode_tags(value),
            link: coerce::field_str(value, "link"),
            solved: coerce::field_bool(value, "solved"),
        }
    }
}
