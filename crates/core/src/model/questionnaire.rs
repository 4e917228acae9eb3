use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Number of mutually exclusive answer choices rendered per question.
pub const CHOICE_COUNT: usize = 5;

/// Payload of `GET /get_data`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Questionnaire {
    pub question_groups: Vec<QuestionGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub display_text: String,
    pub group_class: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    pub question_text: String,
    /// Prior answer. Numbers and numeric strings are accepted; anything else
    /// counts as unanswered.
    #[serde(
        default,
        deserialize_with = "deserialize_answer",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<i64>,
}

impl Question {
    /// Position of the prior answer among the choices, when in range.
    #[must_use]
    pub fn selected_choice(&self) -> Option<usize> {
        self.value
            .and_then(|value| usize::try_from(value).ok())
            .filter(|index| *index < CHOICE_COUNT)
    }
}

fn deserialize_answer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_answer))
}

// Leading-integer parse: "3", "3.9" and 3.9 all read as 3.
fn parse_answer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            let end = text
                .char_indices()
                .find(|(idx, ch)| !(ch.is_ascii_digit() || (*idx == 0 && *ch == '-')))
                .map_or(text.len(), |(idx, _)| idx);
            text[..end].parse().ok()
        }
        _ => None,
    }
}

/// Body of `PUT /update_question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionUpdate {
    pub question_id: i64,
    pub question_text: String,
}

/// Body of `POST /create_question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub group_id: i64,
    pub question_text: String,
}

/// Payload of `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub disabled: Option<bool>,
    #[serde(default)]
    pub is_admin: bool,
}
