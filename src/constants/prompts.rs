pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz author. You write clear, factually correct multiple choice questions and you reply with a single JSON object and nothing else.";

pub const QUIZ_GENERATION_PROMPT: &str = "Generate {count} {difficulty} multiple choice questions about {topic}.

Return only a JSON object with exactly these fields:
- 'topic': the topic the questions are about
- 'difficulty': the difficulty level
- 'questions': an array of exactly {count} question objects, each with:
  - 'question': a clear and specific question
  - 'options': an array of exactly four distinct possible answers
  - 'correct_answer': one of the options, copied verbatim, that is the correct answer

Do not repeat questions. Vary the position of the correct answer between questions.

Example format:
{
  \"topic\": \"Geography\",
  \"difficulty\": \"easy\",
  \"questions\": [
    {
      \"question\": \"What is the capital of France?\",
      \"options\": [\"London\", \"Berlin\", \"Paris\", \"Madrid\"],
      \"correct_answer\": \"Paris\"
    }
  ]
}

The response must conform to this JSON schema:
{schema}

Your response:";

/// Fills the generation template. The topic is substituted last so user text is never re-expanded.
pub fn render_quiz_prompt(topic: &str, difficulty: &str, count: usize, schema_json: &str) -> String {
    QUIZ_GENERATION_PROMPT
        .replace("{schema}", schema_json)
        .replace("{count}", &count.to_string())
        .replace("{difficulty}", difficulty)
        .replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_every_placeholder() {
        let prompt = render_quiz_prompt("Rust lifetimes", "hard", 7, "{\"type\":\"object\"}");

        assert!(prompt.contains("Generate 7 hard multiple choice questions about Rust lifetimes."));
        assert!(prompt.contains("exactly 7 question objects"));
        assert!(prompt.contains("{\"type\":\"object\"}"));
        assert!(!prompt.contains("{count}"));
        assert!(!prompt.contains("{difficulty}"));
        assert!(!prompt.contains("{topic}"));
        assert!(!prompt.contains("{schema}"));
    }
}
