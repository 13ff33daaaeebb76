use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::exam::{Exam, Question, QuestionType, ResultDto, SubmitExamDto};
use crate::session::ledger::AnswerLedger;
use crate::session::navigator::QuestionNavigator;
use crate::session::submission::build_submission;
use crate::utils::time::{format_clock, parse_duration};

/// Remaining-time thresholds for the one-shot attempt warnings, in seconds.
pub const WARNING_THRESHOLD_SECS: u32 = 600;
pub const CRITICAL_THRESHOLD_SECS: u32 = 300;

/// Free-text answers shorter than this count as unanswered for the save
/// acknowledgment. They are still kept in the ledger and never block
/// navigation.
pub const MIN_TEXT_ANSWER_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    InProgress,
    Submitting,
    Completed(ResultDto),
    Failed(String),
}

/// Side effects surfaced by a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Remaining time just reached the ten-minute mark.
    Warning(u32),
    /// Remaining time just reached the five-minute mark.
    Critical(u32),
    /// Remaining time reached zero; the attempt must be submitted now.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// No answer given for the current question.
    Empty,
    /// Free-text answer under the minimum length.
    TooShort,
}

/// State machine for one exam attempt. Owns the exam snapshot, the answer
/// ledger, the navigator and the countdown state; the caller drives it from
/// clock events and user input.
///
/// The `Loading` stage of an attempt lives outside: a session is only
/// constructed from a successfully fetched exam.
#[derive(Debug)]
pub struct ExamSession {
    exam: Exam,
    ledger: AnswerLedger,
    navigator: QuestionNavigator,
    /// The current question's input field. Flushed to the ledger on every
    /// navigation and save; re-primed from the ledger on arrival.
    draft: String,
    total_seconds: u32,
    remaining_seconds: u32,
    warning_fired: bool,
    critical_fired: bool,
    phase: Phase,
}

impl ExamSession {
    pub fn new(exam: Exam) -> Result<Self> {
        if exam.questions.is_empty() {
            return Err(Error::BadRequest(format!(
                "Exam '{}' has no questions",
                exam.title
            )));
        }
        let total_seconds = parse_duration(&exam.duration)?;
        if total_seconds == 0 {
            return Err(Error::BadRequest(format!(
                "Exam '{}' has a zero duration",
                exam.title
            )));
        }

        let navigator = QuestionNavigator::new(exam.questions.len());
        info!(
            "Starting attempt on exam '{}' ({} questions, {} seconds)",
            exam.title,
            exam.questions.len(),
            total_seconds
        );

        Ok(Self {
            exam,
            ledger: AnswerLedger::new(),
            navigator,
            draft: String::new(),
            total_seconds,
            remaining_seconds: total_seconds,
            warning_fired: false,
            critical_fired: false,
            phase: Phase::InProgress,
        })
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn format_remaining(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current()
    }

    pub fn question_count(&self) -> usize {
        self.navigator.question_count()
    }

    pub fn current_question(&self) -> &Question {
        &self.exam.questions[self.navigator.current()]
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_answered(&self, question_id: i32) -> bool {
        self.ledger.is_answered(question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.ledger.count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.exam.questions.len() - self.ledger.count()
    }

    pub fn progress_percent(&self) -> u32 {
        (((self.navigator.current() + 1) * 100) / self.exam.questions.len()) as u32
    }

    /// Edits the current question's input field.
    pub fn set_draft(&mut self, text: &str) {
        if self.is_in_progress() {
            self.draft = text.to_string();
        }
    }

    fn flush_draft(&mut self) {
        let question_id = self.current_question().id;
        let draft = std::mem::take(&mut self.draft);
        self.ledger.set(question_id, &draft);
        self.draft = draft;
    }

    fn arrive(&mut self) {
        self.draft = self
            .ledger
            .get(self.current_question().id)
            .unwrap_or("")
            .to_string();
    }

    /// Moves to the next question, persisting the outgoing draft first.
    /// No-op on the last question.
    pub fn next(&mut self) {
        if !self.is_in_progress() {
            return;
        }
        self.flush_draft();
        self.navigator.next();
        self.arrive();
    }

    /// Moves to the previous question, persisting the outgoing draft first.
    /// No-op on the first question.
    pub fn previous(&mut self) {
        if !self.is_in_progress() {
            return;
        }
        self.flush_draft();
        self.navigator.previous();
        self.arrive();
    }

    /// Jumps to the 0-based `index`; out-of-range jumps are ignored.
    pub fn go_to(&mut self, index: usize) {
        if !self.is_in_progress() {
            return;
        }
        self.flush_draft();
        self.navigator.go_to(index);
        self.arrive();
    }

    /// Explicit save of the current draft with an advisory acknowledgment.
    pub fn save_answer(&mut self) -> SaveOutcome {
        if !self.is_in_progress() {
            return SaveOutcome::Empty;
        }
        self.flush_draft();

        let question = self.current_question();
        match self.ledger.get(question.id) {
            None => SaveOutcome::Empty,
            Some(answer)
                if question.question_type == QuestionType::ShortAnswer
                    && answer.chars().count() < MIN_TEXT_ANSWER_CHARS =>
            {
                SaveOutcome::TooShort
            }
            Some(_) => SaveOutcome::Saved,
        }
    }

    /// Advances the countdown by one second. Returns the threshold warnings
    /// exactly once each, and `Expired` when time runs out.
    pub fn on_tick(&mut self) -> Option<TickEvent> {
        if !self.is_in_progress() {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        if self.remaining_seconds == WARNING_THRESHOLD_SECS && !self.warning_fired {
            self.warning_fired = true;
            return Some(TickEvent::Warning(self.remaining_seconds));
        }
        if self.remaining_seconds == CRITICAL_THRESHOLD_SECS && !self.critical_fired {
            self.critical_fired = true;
            return Some(TickEvent::Critical(self.remaining_seconds));
        }
        if self.remaining_seconds == 0 {
            return Some(TickEvent::Expired);
        }

        None
    }

    /// The single transition into `Submitting`, shared by timer expiry and
    /// manual confirmation. The first caller wins and receives the payload;
    /// later calls are no-ops, which is what prevents a double submission.
    pub fn begin_submission(&mut self) -> Option<SubmitExamDto> {
        if !self.is_in_progress() {
            debug!("Submission already begun; ignoring duplicate trigger");
            return None;
        }
        self.flush_draft();
        self.phase = Phase::Submitting;
        info!(
            "Submitting exam {} with {} answered of {} questions",
            self.exam.id,
            self.ledger.count(),
            self.exam.questions.len()
        );
        Some(build_submission(self.exam.id, &self.ledger))
    }

    /// Records the backend's acceptance. Only meaningful while `Submitting`.
    pub fn complete(&mut self, result: ResultDto) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Completed(result);
        }
    }

    /// Records a terminal failure for this attempt.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Failed(reason.into());
        }
    }
}
