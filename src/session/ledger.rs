use crate::models::exam::SubmitAnswerDto;

/// In-memory record of the student's current answers for one attempt, in
/// insertion order. An entry exists for a question if and only if the student
/// has given a non-blank response; blanking a field removes the entry.
#[derive(Debug, Clone, Default)]
pub struct AnswerLedger {
    entries: Vec<(i32, String)>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the trimmed answer for `question_id`, keeping the question's
    /// original position on overwrite. A blank answer removes the entry.
    pub fn set(&mut self, question_id: i32, raw: &str) {
        let trimmed = raw.trim();
        let existing = self.entries.iter().position(|(id, _)| *id == question_id);

        match (trimmed.is_empty(), existing) {
            (true, Some(pos)) => {
                self.entries.remove(pos);
            }
            (true, None) => {}
            (false, Some(pos)) => {
                self.entries[pos].1 = trimmed.to_string();
            }
            (false, None) => {
                self.entries.push((question_id, trimmed.to_string()));
            }
        }
    }

    pub fn get(&self, question_id: i32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| *id == question_id)
            .map(|(_, answer)| answer.as_str())
    }

    pub fn is_answered(&self, question_id: i32) -> bool {
        self.get(question_id).is_some()
    }

    /// Number of answered questions.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Wire-format answers in insertion order.
    pub fn to_payload(&self) -> Vec<SubmitAnswerDto> {
        self.entries
            .iter()
            .map(|(question_id, answer)| SubmitAnswerDto {
                question_id: *question_id,
                student_answer: answer.clone(),
            })
            .collect()
    }
}
