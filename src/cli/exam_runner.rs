use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::error;

use crate::error::{Error, Result};
use crate::models::exam::{QuestionType, ResultDto};
use crate::session::clock::{ClockEvent, SessionClock};
use crate::session::controller::{ExamSession, SaveOutcome, TickEvent};
use crate::AppState;

/// Runs one interactive, timed exam attempt: fetches the exam, starts the
/// countdown, and multiplexes clock events with stdin commands until the
/// attempt is submitted (manually or on expiry) or abandoned.
pub async fn run(state: &AppState, exam_id: i32) -> Result<()> {
    println!("Loading exam {}...", exam_id);
    let exam = state.exam_service.start_exam(exam_id).await.map_err(|e| {
        error!("Unable to load exam {}: {}", exam_id, e);
        e
    })?;

    let mut session = ExamSession::new(exam)?;
    let (events_tx, mut events_rx) = mpsc::channel(32);
    let mut clock = SessionClock::new();
    clock.start(session.total_seconds(), events_tx)?;

    print_intro(&session);
    render_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut awaiting_confirmation = false;

    let payload = loop {
        tokio::select! {
            event = events_rx.recv() => {
                match event {
                    Some(ClockEvent::Tick(_)) => match session.on_tick() {
                        Some(TickEvent::Warning(_)) => {
                            println!("\n[!] 10 minutes remaining in your examination.");
                        }
                        Some(TickEvent::Critical(_)) => {
                            println!("\n[!!] Only 5 minutes remaining. Review and submit soon.");
                        }
                        Some(TickEvent::Expired) => {
                            println!("\nTime expired. Your examination is being submitted automatically.");
                            break session.begin_submission();
                        }
                        None => {}
                    },
                    // The final tick already drove the expiry transition; a
                    // trailing Expired event (or a closed channel) is redundant.
                    Some(ClockEvent::Expired) | None => {
                        if session.is_in_progress() {
                            break session.begin_submission();
                        }
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    clock.stop();
                    println!("Input closed; leaving the attempt without submitting.");
                    return Ok(());
                };
                let input = line.trim();

                if awaiting_confirmation {
                    if input.eq_ignore_ascii_case("yes") {
                        break session.begin_submission();
                    }
                    awaiting_confirmation = false;
                    println!("Submission cancelled.");
                    continue;
                }

                match input {
                    "" => {}
                    ":quit" => {
                        clock.stop();
                        println!("Leaving the attempt without submitting.");
                        return Ok(());
                    }
                    ":next" | ":n" => {
                        session.next();
                        render_question(&session);
                    }
                    ":prev" | ":p" => {
                        session.previous();
                        render_question(&session);
                    }
                    ":save" | ":s" => match session.save_answer() {
                        SaveOutcome::Saved => println!("Answer saved."),
                        SaveOutcome::Empty => println!("Please provide an answer before saving."),
                        SaveOutcome::TooShort => println!(
                            "A response of at least 10 characters is recommended; the answer was kept but counts as incomplete."
                        ),
                    },
                    ":status" => print_status(&session),
                    ":help" => print_help(),
                    ":submit" => {
                        let unanswered = session.unanswered_count();
                        if unanswered > 0 {
                            println!(
                                "You have {} unanswered question(s). Submit anyway? Type 'yes' to confirm.",
                                unanswered
                            );
                        } else {
                            println!("Submit your examination? This cannot be undone. Type 'yes' to confirm.");
                        }
                        awaiting_confirmation = true;
                    }
                    command if command.starts_with(":goto") || command.starts_with(":g ") => {
                        match command.split_whitespace().nth(1).and_then(|n| n.parse::<usize>().ok()) {
                            Some(number) if number >= 1 => {
                                session.go_to(number - 1);
                                render_question(&session);
                            }
                            _ => println!("Usage: :goto <question number>"),
                        }
                    }
                    command if command.starts_with(':') => {
                        println!("Unknown command '{}'. Type :help for commands.", command);
                    }
                    answer => {
                        session.set_draft(&resolve_answer(&session, answer));
                        println!("Noted. Use :save to confirm, or navigate on.");
                    }
                }
            }
        }
    };

    clock.stop();

    let Some(payload) = payload else {
        // Both submission paths raced and the other one already won.
        return Err(Error::Internal(
            "Attempt is already being submitted".to_string(),
        ));
    };

    println!("Submitting your examination...");
    match state.exam_service.submit_exam(&payload).await {
        Ok(result) => {
            print_result(&result);
            session.complete(result);
            Ok(())
        }
        Err(e) => {
            session.fail(e.to_string());
            println!("Submission failed: {}. This attempt cannot be retried.", e);
            Err(e)
        }
    }
}

/// For choice questions a bare option number stands in for the option text.
fn resolve_answer(session: &ExamSession, input: &str) -> String {
    let question = session.current_question();
    match question.question_type {
        QuestionType::MultipleChoice | QuestionType::TrueFalse => {
            match input.parse::<usize>() {
                Ok(number) if number >= 1 && number <= question.options.len() => {
                    question.options[number - 1].clone()
                }
                _ => input.to_string(),
            }
        }
        QuestionType::ShortAnswer => input.to_string(),
    }
}

fn print_intro(session: &ExamSession) {
    let exam = session.exam();
    println!();
    println!("=== {} ===", exam.title);
    if !exam.description.is_empty() {
        println!("{}", exam.description);
    }
    println!(
        "{} questions, {} on the clock. Type :help for commands.",
        session.question_count(),
        session.format_remaining()
    );
}

fn render_question(session: &ExamSession) {
    let question = session.current_question();
    println!();
    println!(
        "--- Question {} of {} [{} pts] ({} remaining) ---",
        session.current_index() + 1,
        session.question_count(),
        question.score,
        session.format_remaining()
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    if question.question_type == QuestionType::ShortAnswer {
        println!("  (free text; at least 10 characters recommended)");
    }
    if !session.draft().is_empty() {
        println!("Current answer: {}", session.draft());
    }
}

fn print_status(session: &ExamSession) {
    println!(
        "{} of {} answered, {} remaining on the clock.",
        session.answered_count(),
        session.question_count(),
        session.format_remaining()
    );
    let markers: Vec<String> = session
        .exam()
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let marker = if i == session.current_index() {
                '>'
            } else if session.is_answered(q.id) {
                '+'
            } else {
                '.'
            };
            format!("{}{}", marker, i + 1)
        })
        .collect();
    println!("{}", markers.join(" "));
}

fn print_help() {
    println!("Commands:");
    println!("  <text>      set your answer for the current question");
    println!("  :save, :s   save the current answer");
    println!("  :next, :n   next question");
    println!("  :prev, :p   previous question");
    println!("  :goto N     jump to question N");
    println!("  :status     answered/unanswered overview");
    println!("  :submit     submit the examination");
    println!("  :quit       leave without submitting");
}

fn print_result(result: &ResultDto) {
    println!();
    println!("=== Result: {} ===", result.exam_title);
    println!(
        "Score {} - {}",
        result.total_score,
        if result.is_passed { "PASSED" } else { "FAILED" }
    );
}
