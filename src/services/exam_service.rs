use crate::error::Result;
use crate::models::exam::{
    CreateExamDto, CreateQuestionDto, Exam, Question, ResultDetailDto, ResultDto, SubmitExamDto,
    UpdateExamDto, UpdateQuestionDto,
};
use crate::services::api_client::ApiClient;
use crate::utils::validation::validate;

#[derive(Clone)]
pub struct ExamService {
    api: ApiClient,
}

impl ExamService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // Exam management (admin)

    pub async fn get_all_exams(&self) -> Result<Vec<Exam>> {
        self.api.get("/Exam").await
    }

    pub async fn get_exam(&self, id: i32) -> Result<Exam> {
        self.api.get(&format!("/Exam/{}", id)).await
    }

    pub async fn create_exam(&self, dto: &CreateExamDto) -> Result<Exam> {
        validate(dto)?;
        crate::utils::time::parse_duration(&dto.duration)?;
        self.api.post("/Exam", dto).await
    }

    pub async fn update_exam(&self, id: i32, dto: &UpdateExamDto) -> Result<Exam> {
        validate(dto)?;
        crate::utils::time::parse_duration(&dto.duration)?;
        self.api.put(&format!("/Exam/{}", id), dto).await
    }

    pub async fn delete_exam(&self, id: i32) -> Result<bool> {
        self.api.delete(&format!("/Exam/{}", id)).await
    }

    // Question management (admin)

    /// Returns the exam with its full question list; used both for admin
    /// question management and to start a student attempt.
    pub async fn get_exam_with_questions(&self, exam_id: i32) -> Result<Exam> {
        self.api.get(&format!("/Exam/{}/questions", exam_id)).await
    }

    pub async fn get_question(&self, id: i32) -> Result<Question> {
        self.api.get(&format!("/Question/{}", id)).await
    }

    pub async fn create_question(&self, dto: &CreateQuestionDto) -> Result<Question> {
        validate(dto)?;
        self.api.post("/Question", dto).await
    }

    pub async fn update_question(&self, id: i32, dto: &UpdateQuestionDto) -> Result<Question> {
        validate(dto)?;
        self.api.put(&format!("/Question/{}", id), dto).await
    }

    pub async fn delete_question(&self, id: i32) -> Result<bool> {
        self.api.delete(&format!("/Question/{}", id)).await
    }

    // Student operations

    pub async fn get_available_exams(&self) -> Result<Vec<Exam>> {
        self.api.get("/Exam/active").await
    }

    /// Student entry point for an attempt: one fetch of the exam snapshot.
    pub async fn start_exam(&self, exam_id: i32) -> Result<Exam> {
        self.get_exam_with_questions(exam_id).await
    }

    pub async fn submit_exam(&self, dto: &SubmitExamDto) -> Result<ResultDto> {
        self.api.post("/Student/submit-exam", dto).await
    }

    pub async fn get_student_results(&self) -> Result<Vec<ResultDto>> {
        self.api.get("/Student/results").await
    }

    pub async fn get_exam_result(&self, exam_id: i32) -> Result<ResultDetailDto> {
        self.api.get(&format!("/Student/results/{}", exam_id)).await
    }

    /// The backend exposes no admin-wide results endpoint; the admin views
    /// reuse the student listing.
    pub async fn get_all_results(&self) -> Result<Vec<ResultDto>> {
        self.api.get("/Student/results").await
    }
}
