use crate::models::exam::SubmitExamDto;
use crate::session::ledger::AnswerLedger;

/// Assembles the wire-format submission from the current ledger state.
pub fn build_submission(exam_id: i32, ledger: &AnswerLedger) -> SubmitExamDto {
    SubmitExamDto {
        exam_id,
        answers: ledger.to_payload(),
    }
}
