use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

use crate::models::domain::{Difficulty, QuizQuestion};
use crate::services::quiz_attempt_service::normalize_answer;

/// Inputs of a single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
}

impl GenerationParams {
    pub fn new(topic: &str, difficulty: Difficulty, question_count: usize) -> Self {
        Self {
            topic: topic.trim().to_string(),
            difficulty,
            question_count,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            topic: normalize_answer(&self.topic),
            difficulty: self.difficulty,
            question_count: self.question_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    topic: String,
    difficulty: Difficulty,
    question_count: usize,
}

struct CacheEntry {
    questions: Vec<QuizQuestion>,
    inserted_at: Instant,
}

pub struct QuizCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Option<Duration>,
}

impl QuizCache {
    /// `None` keeps entries until the process exits.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_ttl_secs(secs: u64) -> Self {
        Self::new((secs > 0).then(|| Duration::from_secs(secs)))
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Vec<QuizQuestion>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !self.is_stale(entry) => return Some(entry.questions.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // stale: drop it so the next insert starts fresh
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| self.is_stale(entry)) {
            entries.remove(key);
        }
        None
    }

    pub async fn insert(&self, key: CacheKey, questions: Vec<QuizQuestion>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                questions,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        self.ttl.is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuizQuestion> {
        vec![QuizQuestion {
            question: "Which keyword declares an immutable binding?".to_string(),
            options: vec![
                "let".to_string(),
                "mut".to_string(),
                "var".to_string(),
                "const fn".to_string(),
            ],
            correct_index: 0,
        }]
    }

    #[test]
    fn cache_key_ignores_topic_case_and_spacing() {
        let a = GenerationParams::new("Rust  Ownership", Difficulty::Easy, 5).cache_key();
        let b = GenerationParams::new("  rust ownership ", Difficulty::Easy, 5).cache_key();
        assert_eq!(a, b);
    }

    #[test]
    fn cache_key_distinguishes_difficulty_and_count() {
        let base = GenerationParams::new("rust", Difficulty::Easy, 5).cache_key();
        assert_ne!(base, GenerationParams::new("rust", Difficulty::Hard, 5).cache_key());
        assert_ne!(base, GenerationParams::new("rust", Difficulty::Easy, 6).cache_key());
    }

    #[actix_web::test]
    async fn insert_then_get_returns_questions() {
        let cache = QuizCache::new(None);
        let key = GenerationParams::new("rust", Difficulty::Medium, 1).cache_key();

        assert!(cache.get(&key).await.is_none());
        cache.insert(key.clone(), questions()).await;

        assert_eq!(cache.get(&key).await, Some(questions()));
        assert_eq!(cache.len().await, 1);
    }

    #[actix_web::test]
    async fn expired_entry_is_a_miss_and_is_dropped() {
        let cache = QuizCache::new(Some(Duration::ZERO));
        let key = GenerationParams::new("rust", Difficulty::Medium, 1).cache_key();

        cache.insert(key.clone(), questions()).await;

        assert!(cache.get(&key).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[actix_web::test]
    async fn zero_ttl_secs_disables_expiry() {
        let cache = QuizCache::from_ttl_secs(0);
        let key = GenerationParams::new("rust", Difficulty::Medium, 1).cache_key();

        cache.insert(key.clone(), questions()).await;
        assert!(cache.get(&key).await.is_some());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
