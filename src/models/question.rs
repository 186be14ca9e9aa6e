// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A single timed question as served by the communities API.
/// The correct answer is withheld until the attempt has been graded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: String,

    /// The prompt shown to the user.
    /// Mapped from the upstream field 'question'.
    #[serde(rename = "question")]
    pub prompt: String,

    /// Selectable options, in display order.
    pub options: Vec<String>,

    /// Allotted answer time in seconds.
    pub time: u32,
}

impl Question {
    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option == answer)
    }
}
