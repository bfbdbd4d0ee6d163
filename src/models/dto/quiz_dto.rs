use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shape the model is asked to produce.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GeneratedQuiz {
    /// Topic the questions are about
    #[serde(default)]
    pub topic: Option<String>,
    /// Difficulty level: easy, medium or hard
    #[serde(default)]
    pub difficulty: Option<String>,
    /// The requested number of multiple choice questions
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GeneratedQuestion {
    /// The question text
    #[serde(deserialize_with = "question_text")]
    #[schemars(with = "String")]
    pub question: String,
    /// List of 4 possible answers
    pub options: Vec<String>,
    /// The correct answer, copied verbatim from the options
    pub correct_answer: String,
}

// Models sometimes wrap the text as {"description": "..."}.
fn question_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Object(map) => match map.get("description") {
            Some(Value::String(text)) => text.clone(),
            _ => Value::Object(map).to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
