//! Prompting the model and turning its reply into validated quiz questions.
//!
//! Replies are never trusted: the first JSON object is pulled out of whatever
//! text the model produced, deserialized into [`GeneratedQuiz`] and checked
//! question by question before anything reaches a caller.

use std::{collections::HashSet, sync::Arc};

use once_cell::sync::Lazy;

use crate::{
    constants::prompts::{render_quiz_prompt, QUIZ_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::{
        domain::{quiz_question::OPTION_COUNT, QuizQuestion},
        dto::quiz_dto::{GeneratedQuestion, GeneratedQuiz},
    },
    services::{
        model_service::QuizModel,
        quiz_attempt_service::normalize_answer,
        quiz_cache::{GenerationParams, QuizCache},
    },
};

static RESPONSE_SCHEMA: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&schemars::schema_for!(GeneratedQuiz))
        .unwrap_or_else(|_| "{}".to_string())
});

/// Returns the first balanced top-level `{...}` in `text`, skipping braces inside strings.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses and validates a raw model reply against the requested question count.
pub fn parse_generated_quiz(raw: &str, expected_count: usize) -> AppResult<Vec<QuizQuestion>> {
    let json = extract_json_object(raw).ok_or_else(|| {
        AppError::GenerationError("Model response contained no JSON object".to_string())
    })?;

    let generated: GeneratedQuiz = serde_json::from_str(json).map_err(|e| {
        AppError::GenerationError(format!("Model response did not match the quiz schema: {}", e))
    })?;

    if generated.questions.len() != expected_count {
        return Err(AppError::GenerationError(format!(
            "Expected {} questions, model returned {}",
            expected_count,
            generated.questions.len()
        )));
    }

    let questions = generated
        .questions
        .into_iter()
        .enumerate()
        .map(|(position, question)| validate_question(position + 1, question))
        .collect::<AppResult<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(questions.len());
    for (position, question) in questions.iter().enumerate() {
        if !seen.insert(normalize_answer(&question.question)) {
            return Err(AppError::GenerationError(format!(
                "Question {} repeats an earlier question",
                position + 1
            )));
        }
    }

    Ok(questions)
}

fn validate_question(number: usize, generated: GeneratedQuestion) -> AppResult<QuizQuestion> {
    let invalid = |reason: &str| {
        AppError::GenerationError(format!("Question {} is invalid: {}", number, reason))
    };

    let question = generated.question.trim().to_string();
    if question.is_empty() {
        return Err(invalid("empty question text"));
    }

    if generated.options.len() != OPTION_COUNT {
        return Err(invalid(&format!(
            "expected {} options, got {}",
            OPTION_COUNT,
            generated.options.len()
        )));
    }

    let options: Vec<String> = generated
        .options
        .iter()
        .map(|option| option.trim().to_string())
        .collect();
    if options.iter().any(String::is_empty) {
        return Err(invalid("empty option"));
    }

    let normalized: Vec<String> = options.iter().map(|o| normalize_answer(o)).collect();
    let distinct: HashSet<&String> = normalized.iter().collect();
    if distinct.len() != normalized.len() {
        return Err(invalid("duplicate options"));
    }

    let correct = normalize_answer(&generated.correct_answer);
    if correct.is_empty() {
        return Err(invalid("missing correct answer"));
    }
    let correct_index = normalized
        .iter()
        .position(|option| *option == correct)
        .ok_or_else(|| invalid("correct answer is not one of the options"))?;

    Ok(QuizQuestion {
        question,
        options,
        correct_index: correct_index as i32,
    })
}

pub struct QuizGenerator {
    model: Arc<dyn QuizModel>,
    cache: QuizCache,
    max_attempts: u32,
}

impl QuizGenerator {
    pub fn new(model: Arc<dyn QuizModel>, cache: QuizCache, max_attempts: u32) -> Self {
        Self {
            model,
            cache,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn cache(&self) -> &QuizCache {
        &self.cache
    }

    /// Cached questions for identical parameters, otherwise a fresh validated batch.
    pub async fn generate(&self, params: &GenerationParams) -> AppResult<Vec<QuizQuestion>> {
        let key = params.cache_key();

        if let Some(questions) = self.cache.get(&key).await {
            log::info!(
                "Quiz cache hit for topic '{}' ({}, {} questions)",
                params.topic,
                params.difficulty,
                params.question_count
            );
            return Ok(questions);
        }

        log::info!(
            "Quiz cache miss for topic '{}' ({}, {} questions)",
            params.topic,
            params.difficulty,
            params.question_count
        );

        let prompt = render_quiz_prompt(
            &params.topic,
            params.difficulty.prompt_label(),
            params.question_count,
            &RESPONSE_SCHEMA,
        );

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            log::debug!("Generation attempt {}/{}", attempt, self.max_attempts);

            let outcome = match self.model.complete(QUIZ_SYSTEM_PROMPT, &prompt).await {
                Ok(raw) => parse_generated_quiz(&raw, params.question_count),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(questions) => {
                    self.cache.insert(key, questions.clone()).await;
                    return Ok(questions);
                }
                Err(e) => {
                    log::warn!(
                        "Rejected model output on attempt {}/{}: {}",
                        attempt,
                        self.max_attempts,
                        e
                    );
                    last_error = match e {
                        AppError::GenerationError(reason) => reason,
                        other => other.to_string(),
                    };
                }
            }
        }

        Err(AppError::GenerationError(format!(
            "failed to generate a valid quiz after {} attempts: {}",
            self.max_attempts, last_error
        )))
    }
}
