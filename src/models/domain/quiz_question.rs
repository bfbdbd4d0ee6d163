use async_graphql::SimpleObject;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(deny_unknown_fields)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: i32, // always within options
}

impl QuizQuestion {
    pub fn is_valid_choice(&self, index: i32) -> bool {
        index >= 0 && (index as usize) < self.options.len()
    }

    pub fn option_text(&self, index: i32) -> Option<&str> {
        if !self.is_valid_choice(index) {
            return None;
        }
        self.options.get(index as usize).map(String::as_str)
    }

    pub fn correct_answer(&self) -> &str {
        self.option_text(self.correct_index).unwrap_or_default()
    }

    /// Reorders the options while keeping `correct_index` on the same answer.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let correct = self.correct_answer().to_string();
        self.options.shuffle(rng);
        self.correct_index = self
            .options
            .iter()
            .position(|option| *option == correct)
            .map(|pos| pos as i32)
            .unwrap_or(self.correct_index);
    }
}
