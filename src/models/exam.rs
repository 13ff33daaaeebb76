use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl TryFrom<i32> for QuestionType {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(QuestionType::MultipleChoice),
            1 => Ok(QuestionType::TrueFalse),
            2 => Ok(QuestionType::ShortAnswer),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}

impl From<QuestionType> for i32 {
    fn from(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::MultipleChoice => 0,
            QuestionType::TrueFalse => 1,
            QuestionType::ShortAnswer => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub exam_id: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub score: i32,
    /// Answer options; empty for short-answer questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// The shared backend model ships this to the client as-is.
    #[serde(default)]
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Total duration as `HH:MM:SS`.
    pub duration: String,
    pub passing_score: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    /// Present on `/Exam/{id}/questions`; list endpoints omit it.
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamDto {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    pub description: String,
    pub duration: String,
    #[validate(range(min = 0, max = 100, message = "Passing score must be between 0 and 100"))]
    pub passing_score: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExamDto {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    pub description: String,
    pub duration: String,
    #[validate(range(min = 0, max = 100, message = "Passing score must be between 0 and 100"))]
    pub passing_score: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionDto {
    pub exam_id: i32,
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(range(min = 1, message = "Score must be at least 1"))]
    pub score: i32,
    pub options: Vec<String>,
    #[validate(length(min = 1, message = "Correct answer cannot be empty"))]
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionDto {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(range(min = 1, message = "Score must be at least 1"))]
    pub score: i32,
    pub options: Vec<String>,
    #[validate(length(min = 1, message = "Correct answer cannot be empty"))]
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDto {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub exam_id: i32,
    pub exam_title: String,
    pub total_score: i32,
    pub is_passed: bool,
    pub submission_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetailDto {
    #[serde(flatten)]
    pub result: ResultDto,
    pub answers: Vec<AnswerDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: i32,
    pub question_id: i32,
    pub student_answer: String,
    pub score: Option<i32>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerDto {
    pub question_id: i32,
    pub student_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamDto {
    pub exam_id: i32,
    pub answers: Vec<SubmitAnswerDto>,
}
