use chrono::{Duration, Utc};
use examera::models::exam::{Exam, Question, QuestionType, SubmitAnswerDto};
use examera::session::controller::{ExamSession, Phase, SaveOutcome, TickEvent};
use examera::session::ledger::AnswerLedger;
use examera::session::navigator::QuestionNavigator;
use examera::session::submission::build_submission;
use examera::utils::time::{format_clock, parse_duration};

fn question(id: i32, question_type: QuestionType, options: &[&str]) -> Question {
    Question {
        id,
        exam_id: 1,
        text: format!("Question {}", id),
        question_type,
        score: 5,
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer: String::new(),
    }
}

fn exam(duration: &str, questions: Vec<Question>) -> Exam {
    Exam {
        id: 1,
        title: "Algebra Basics".to_string(),
        description: String::new(),
        duration: duration.to_string(),
        passing_score: 60,
        start_date: Utc::now(),
        end_date: Utc::now() + Duration::days(1),
        is_active: true,
        questions,
    }
}

fn three_question_exam(duration: &str) -> Exam {
    exam(
        duration,
        vec![
            question(1, QuestionType::ShortAnswer, &[]),
            question(2, QuestionType::MultipleChoice, &["1", "2", "3"]),
            question(3, QuestionType::TrueFalse, &["True", "False"]),
        ],
    )
}

#[test]
fn ledger_counts_distinct_nonblank_answers() {
    let mut ledger = AnswerLedger::new();
    ledger.set(1, "first");
    ledger.set(2, "  second  ");
    ledger.set(1, "revised");
    ledger.set(3, "   ");

    assert_eq!(ledger.count(), 2);
    assert_eq!(ledger.get(1), Some("revised"));
    assert_eq!(ledger.get(2), Some("second"));
    assert_eq!(ledger.get(3), None);
    assert!(ledger.is_answered(1));
    assert!(!ledger.is_answered(3));
}

#[test]
fn blank_answer_removes_the_entry() {
    let mut ledger = AnswerLedger::new();
    ledger.set(1, "kept");
    ledger.set(1, "   ");

    assert_eq!(ledger.get(1), None);
    assert_eq!(ledger.count(), 0);

    // Blanking a question that was never answered is a no-op.
    ledger.set(9, "");
    assert_eq!(ledger.count(), 0);
}

#[test]
fn payload_preserves_insertion_order_and_length() {
    let mut ledger = AnswerLedger::new();
    ledger.set(3, "c");
    ledger.set(1, "a");
    ledger.set(2, "b");
    ledger.set(3, "c2");

    let payload = build_submission(7, &ledger);
    assert_eq!(payload.exam_id, 7);
    assert_eq!(payload.answers.len(), ledger.count());
    assert_eq!(
        payload.answers,
        vec![
            SubmitAnswerDto { question_id: 3, student_answer: "c2".to_string() },
            SubmitAnswerDto { question_id: 1, student_answer: "a".to_string() },
            SubmitAnswerDto { question_id: 2, student_answer: "b".to_string() },
        ]
    );
}

#[test]
fn navigator_is_bounded() {
    let mut nav = QuestionNavigator::new(3);
    assert_eq!(nav.current(), 0);

    nav.previous();
    assert_eq!(nav.current(), 0);

    nav.next();
    nav.next();
    assert_eq!(nav.current(), 2);
    nav.next();
    assert_eq!(nav.current(), 2);

    nav.go_to(5);
    assert_eq!(nav.current(), 2);
    nav.go_to(1);
    assert_eq!(nav.current(), 1);
}

#[test]
fn expiry_auto_submits_with_the_answered_subset() {
    let mut session = ExamSession::new(three_question_exam("00:00:05")).unwrap();

    session.set_draft("2x");
    session.next();
    // Question 2 left blank.
    session.next();
    session.set_draft("True");

    let mut events = Vec::new();
    for _ in 0..5 {
        if let Some(event) = session.on_tick() {
            events.push(event);
        }
    }
    assert_eq!(events, vec![TickEvent::Expired]);

    let payload = session.begin_submission().expect("first trigger wins");
    assert_eq!(payload.exam_id, 1);
    assert_eq!(
        payload.answers,
        vec![
            SubmitAnswerDto { question_id: 1, student_answer: "2x".to_string() },
            SubmitAnswerDto { question_id: 3, student_answer: "True".to_string() },
        ]
    );
    assert_eq!(*session.phase(), Phase::Submitting);

    // The racing manual path is a no-op, and ticks no longer advance anything.
    assert!(session.begin_submission().is_none());
    assert!(session.on_tick().is_none());
}

#[test]
fn threshold_warnings_fire_exactly_once() {
    let mut session = ExamSession::new(three_question_exam("00:10:02")).unwrap();

    assert_eq!(session.on_tick(), None); // 601
    assert_eq!(session.on_tick(), Some(TickEvent::Warning(600)));
    assert_eq!(session.on_tick(), None); // 599
    assert_eq!(session.on_tick(), None);

    let mut session = ExamSession::new(three_question_exam("00:05:01")).unwrap();
    assert_eq!(session.on_tick(), Some(TickEvent::Critical(300)));
    assert_eq!(session.on_tick(), None);
}

#[test]
fn save_acknowledgment_reflects_answer_quality() {
    let mut session = ExamSession::new(three_question_exam("01:00:00")).unwrap();

    // Question 1 is free text: short responses are kept but flagged.
    session.set_draft("2x");
    assert_eq!(session.save_answer(), SaveOutcome::TooShort);
    assert!(session.is_answered(1));

    session.set_draft("x equals two");
    assert_eq!(session.save_answer(), SaveOutcome::Saved);

    // A short answer never blocks navigation.
    session.set_draft("2x");
    session.next();
    assert_eq!(session.current_index(), 1);

    session.set_draft("   ");
    assert_eq!(session.save_answer(), SaveOutcome::Empty);
    assert!(!session.is_answered(2));
}

#[test]
fn revisiting_a_question_repopulates_from_the_ledger() {
    let mut session = ExamSession::new(three_question_exam("01:00:00")).unwrap();

    session.set_draft("my first answer");
    session.next();
    assert_eq!(session.draft(), "");

    session.previous();
    assert_eq!(session.draft(), "my first answer");

    // Blanking the field removes the stored answer on the next flush.
    session.set_draft("");
    session.next();
    assert!(!session.is_answered(1));
    assert_eq!(session.answered_count(), 0);
}

#[test]
fn navigation_persists_the_outgoing_draft() {
    let mut session = ExamSession::new(three_question_exam("01:00:00")).unwrap();

    session.set_draft("kept on jump");
    session.go_to(2);
    assert!(session.is_answered(1));
    assert_eq!(session.current_index(), 2);

    // Out-of-range jumps change nothing.
    session.go_to(17);
    assert_eq!(session.current_index(), 2);
}

#[test]
fn completed_attempt_rejects_further_edits() {
    let mut session = ExamSession::new(three_question_exam("01:00:00")).unwrap();
    session.set_draft("answer one");

    let payload = session.begin_submission().unwrap();
    assert_eq!(payload.answers.len(), 1);

    session.set_draft("too late");
    session.next();
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.draft(), "answer one");

    let result = examera::models::exam::ResultDto {
        id: 1,
        user_id: 7,
        username: "amina".to_string(),
        exam_id: 1,
        exam_title: "Algebra Basics".to_string(),
        total_score: 80,
        is_passed: true,
        submission_date: Utc::now(),
    };
    session.complete(result);
    assert!(matches!(session.phase(), Phase::Completed(r) if r.total_score == 80));
}

#[test]
fn rejects_unusable_exams() {
    assert!(ExamSession::new(exam("01:00:00", Vec::new())).is_err());
    assert!(ExamSession::new(three_question_exam("00:00:00")).is_err());
    assert!(ExamSession::new(three_question_exam("ninety minutes")).is_err());
}

#[test]
fn durations_parse_and_render() {
    assert_eq!(parse_duration("01:30:00").unwrap(), 5400);
    assert_eq!(parse_duration("00:00:05").unwrap(), 5);
    assert!(parse_duration("90:00").is_err());
    assert!(parse_duration("00:61:00").is_err());

    assert_eq!(format_clock(3661), "1:01:01");
    assert_eq!(format_clock(3600), "1:00:00");
    assert_eq!(format_clock(600), "10:00");
    assert_eq!(format_clock(59), "0:59");
    assert_eq!(format_clock(0), "0:00");
}
