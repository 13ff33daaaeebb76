pub mod exam_runner;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::models::admin::{CreateAdminDto, UpdateUserDto};
use crate::models::exam::{
    CreateExamDto, CreateQuestionDto, QuestionType, UpdateExamDto, UpdateQuestionDto,
};
use crate::models::user::{LoginUserDto, RegisterUserDto, UserRole};
use crate::AppState;

#[derive(Debug, Parser)]
#[command(name = "examera", version, about = "Terminal client for the Examera exam platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with your credentials
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// "student" or "admin"
        #[arg(long, default_value = "student")]
        role: String,
    },
    /// Discard the cached session
    Logout,
    /// Show the currently logged-in user
    Whoami,
    /// List exams currently available to you
    Exams,
    /// Take an exam (interactive, timed)
    Take {
        exam_id: i32,
    },
    /// Show your exam results
    Results {
        /// Show the detailed result for one exam
        #[arg(long)]
        exam: Option<i32>,
    },
    /// Administration commands
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    #[command(subcommand)]
    Exams(AdminExamCommand),
    #[command(subcommand)]
    Questions(AdminQuestionCommand),
    #[command(subcommand)]
    Users(AdminUserCommand),
    /// Dashboard statistics
    Stats,
    /// All submitted results
    Results,
}

#[derive(Debug, Subcommand)]
pub enum AdminExamCommand {
    List,
    Show {
        id: i32,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Total duration as HH:MM:SS
        #[arg(long)]
        duration: String,
        #[arg(long)]
        passing_score: i32,
        /// RFC 3339 timestamp, e.g. 2026-09-01T09:00:00Z
        #[arg(long)]
        start_date: DateTime<Utc>,
        #[arg(long)]
        end_date: DateTime<Utc>,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        active: bool,
    },
    Update {
        id: i32,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        duration: String,
        #[arg(long)]
        passing_score: i32,
        #[arg(long)]
        start_date: DateTime<Utc>,
        #[arg(long)]
        end_date: DateTime<Utc>,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        active: bool,
    },
    Delete {
        id: i32,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminQuestionCommand {
    /// List the questions of an exam
    List {
        exam_id: i32,
    },
    Add {
        exam_id: i32,
        #[arg(long)]
        text: String,
        /// "multiple-choice", "true-false" or "short-answer"
        #[arg(long = "type")]
        question_type: String,
        #[arg(long, default_value_t = 1)]
        score: i32,
        /// Answer option; repeat for each choice
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        correct_answer: String,
    },
    Update {
        id: i32,
        #[arg(long)]
        text: String,
        #[arg(long = "type")]
        question_type: String,
        #[arg(long, default_value_t = 1)]
        score: i32,
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        correct_answer: String,
    },
    Delete {
        id: i32,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminUserCommand {
    Admins,
    Students,
    Show {
        id: i32,
    },
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    Update {
        id: i32,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// "student" or "admin"
        #[arg(long)]
        role: String,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        active: bool,
    },
    Delete {
        id: i32,
    },
    ToggleStatus {
        id: i32,
    },
}

pub async fn run(state: &AppState, cli: Cli) -> Result<()> {
    match cli.command {
        Command::Login { username, password } => {
            let auth = state
                .auth_service
                .login(&LoginUserDto { username, password })
                .await?;
            match auth.user {
                Some(user) => println!("Logged in as {} ({})", user.username, user.role),
                None => println!("Logged in"),
            }
            Ok(())
        }
        Command::Register {
            username,
            email,
            password,
            confirm_password,
            first_name,
            last_name,
            role,
        } => {
            let dto = RegisterUserDto {
                username,
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                role: parse_role(&role)?,
            };
            let auth = state.auth_service.register(&dto).await?;
            println!("Registered. {}", auth.message);
            Ok(())
        }
        Command::Logout => {
            state.auth_service.logout();
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            match state.auth_service.current_user() {
                Some(user) => println!(
                    "{} {} <{}> - {} ({})",
                    user.first_name, user.last_name, user.email, user.username, user.role
                ),
                None => println!("Not logged in"),
            }
            Ok(())
        }
        Command::Exams => {
            require_student(state)?;
            let exams = state.exam_service.get_available_exams().await?;
            if exams.is_empty() {
                println!("No exams are currently available.");
                return Ok(());
            }
            println!("{:<6} {:<40} {:<10} {:<8}", "ID", "TITLE", "DURATION", "PASSING");
            for exam in exams {
                println!(
                    "{:<6} {:<40} {:<10} {:<8}",
                    exam.id, exam.title, exam.duration, exam.passing_score
                );
            }
            Ok(())
        }
        Command::Take { exam_id } => {
            require_student(state)?;
            exam_runner::run(state, exam_id).await
        }
        Command::Results { exam } => {
            require_student(state)?;
            match exam {
                Some(exam_id) => {
                    let detail = state.exam_service.get_exam_result(exam_id).await?;
                    let result = &detail.result;
                    println!(
                        "{} - score {} - {}",
                        result.exam_title,
                        result.total_score,
                        if result.is_passed { "PASSED" } else { "FAILED" }
                    );
                    for answer in &detail.answers {
                        println!(
                            "  Q{}: {} [{}]",
                            answer.question_id,
                            answer.student_answer,
                            if answer.is_correct { "correct" } else { "incorrect" }
                        );
                    }
                }
                None => {
                    let results = state.exam_service.get_student_results().await?;
                    if results.is_empty() {
                        println!("No results yet.");
                        return Ok(());
                    }
                    print_results(&results);
                }
            }
            Ok(())
        }
        Command::Admin(command) => {
            require_admin(state)?;
            run_admin(state, command).await
        }
    }
}

async fn run_admin(state: &AppState, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Exams(command) => run_admin_exams(state, command).await,
        AdminCommand::Questions(command) => run_admin_questions(state, command).await,
        AdminCommand::Users(command) => run_admin_users(state, command).await,
        AdminCommand::Stats => {
            let stats = state.admin_service.get_dashboard_stats().await?;
            println!("Students:  {}", stats.total_students);
            println!("Exams:     {}", stats.total_exams);
            println!("Questions: {}", stats.total_questions);
            println!("Active:    {}", stats.active_exams);
            if !stats.recent_results.is_empty() {
                println!("\nRecent results:");
                print_results(&stats.recent_results);
            }
            Ok(())
        }
        AdminCommand::Results => {
            let results = state.exam_service.get_all_results().await?;
            if results.is_empty() {
                println!("No results yet.");
                return Ok(());
            }
            print_results(&results);
            Ok(())
        }
    }
}

async fn run_admin_exams(state: &AppState, command: AdminExamCommand) -> Result<()> {
    match command {
        AdminExamCommand::List => {
            let exams = state.exam_service.get_all_exams().await?;
            println!(
                "{:<6} {:<40} {:<10} {:<8} {:<7}",
                "ID", "TITLE", "DURATION", "PASSING", "ACTIVE"
            );
            for exam in exams {
                println!(
                    "{:<6} {:<40} {:<10} {:<8} {:<7}",
                    exam.id, exam.title, exam.duration, exam.passing_score, exam.is_active
                );
            }
            Ok(())
        }
        AdminExamCommand::Show { id } => {
            let exam = state.exam_service.get_exam(id).await?;
            println!("{} - {}", exam.id, exam.title);
            println!("{}", exam.description);
            println!(
                "Duration {} | passing score {} | active {}",
                exam.duration, exam.passing_score, exam.is_active
            );
            println!("Window: {} to {}", exam.start_date, exam.end_date);
            Ok(())
        }
        AdminExamCommand::Create {
            title,
            description,
            duration,
            passing_score,
            start_date,
            end_date,
            active,
        } => {
            let exam = state
                .exam_service
                .create_exam(&CreateExamDto {
                    title,
                    description,
                    duration,
                    passing_score,
                    start_date,
                    end_date,
                    is_active: active,
                })
                .await?;
            println!("Created exam {} ({})", exam.id, exam.title);
            Ok(())
        }
        AdminExamCommand::Update {
            id,
            title,
            description,
            duration,
            passing_score,
            start_date,
            end_date,
            active,
        } => {
            let exam = state
                .exam_service
                .update_exam(
                    id,
                    &UpdateExamDto {
                        title,
                        description,
                        duration,
                        passing_score,
                        start_date,
                        end_date,
                        is_active: active,
                    },
                )
                .await?;
            println!("Updated exam {} ({})", exam.id, exam.title);
            Ok(())
        }
        AdminExamCommand::Delete { id } => {
            state.exam_service.delete_exam(id).await?;
            println!("Deleted exam {}", id);
            Ok(())
        }
    }
}

async fn run_admin_questions(state: &AppState, command: AdminQuestionCommand) -> Result<()> {
    match command {
        AdminQuestionCommand::List { exam_id } => {
            let exam = state.exam_service.get_exam_with_questions(exam_id).await?;
            println!("{} questions in '{}':", exam.questions.len(), exam.title);
            for question in exam.questions {
                println!(
                    "  {} [{} pts] {}",
                    question.id, question.score, question.text
                );
            }
            Ok(())
        }
        AdminQuestionCommand::Add {
            exam_id,
            text,
            question_type,
            score,
            options,
            correct_answer,
        } => {
            let question_type = parse_question_type(&question_type)?;
            let options = normalize_options(question_type, options)?;
            let question = state
                .exam_service
                .create_question(&CreateQuestionDto {
                    exam_id,
                    text,
                    question_type,
                    score,
                    options,
                    correct_answer,
                })
                .await?;
            println!("Created question {}", question.id);
            Ok(())
        }
        AdminQuestionCommand::Update {
            id,
            text,
            question_type,
            score,
            options,
            correct_answer,
        } => {
            let question_type = parse_question_type(&question_type)?;
            let options = normalize_options(question_type, options)?;
            state
                .exam_service
                .update_question(
                    id,
                    &UpdateQuestionDto {
                        text,
                        question_type,
                        score,
                        options,
                        correct_answer,
                    },
                )
                .await?;
            println!("Updated question {}", id);
            Ok(())
        }
        AdminQuestionCommand::Delete { id } => {
            state.exam_service.delete_question(id).await?;
            println!("Deleted question {}", id);
            Ok(())
        }
    }
}

async fn run_admin_users(state: &AppState, command: AdminUserCommand) -> Result<()> {
    match command {
        AdminUserCommand::Admins => {
            print_users(&state.admin_service.get_all_admins().await?);
            Ok(())
        }
        AdminUserCommand::Students => {
            print_users(&state.admin_service.get_all_students().await?);
            Ok(())
        }
        AdminUserCommand::Show { id } => {
            let user = state.admin_service.get_user(id).await?;
            print_users(std::slice::from_ref(&user));
            Ok(())
        }
        AdminUserCommand::CreateAdmin {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let user = state
                .admin_service
                .create_admin(&CreateAdminDto {
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            println!("Created administrator {} ({})", user.id, user.username);
            Ok(())
        }
        AdminUserCommand::Update {
            id,
            email,
            first_name,
            last_name,
            role,
            active,
        } => {
            let user = state
                .admin_service
                .update_user(
                    id,
                    &UpdateUserDto {
                        email,
                        first_name,
                        last_name,
                        role: parse_role(&role)?,
                        is_active: active,
                    },
                )
                .await?;
            println!("Updated user {} ({})", user.id, user.username);
            Ok(())
        }
        AdminUserCommand::Delete { id } => {
            state.admin_service.delete_user(id).await?;
            println!("Deleted user {}", id);
            Ok(())
        }
        AdminUserCommand::ToggleStatus { id } => {
            state.admin_service.toggle_user_status(id).await?;
            println!("Toggled status of user {}", id);
            Ok(())
        }
    }
}

fn require_admin(state: &AppState) -> Result<()> {
    if !state.auth_service.is_authenticated() {
        return Err(Error::Auth("Please log in first".to_string()));
    }
    if !state.auth_service.is_admin() {
        return Err(Error::Auth("Administrator access required".to_string()));
    }
    Ok(())
}

fn require_student(state: &AppState) -> Result<()> {
    if !state.auth_service.is_authenticated() {
        return Err(Error::Auth("Please log in first".to_string()));
    }
    if !state.auth_service.is_student() {
        return Err(Error::Auth("Student access required".to_string()));
    }
    Ok(())
}

fn parse_role(raw: &str) -> Result<UserRole> {
    match raw.to_ascii_lowercase().as_str() {
        "admin" => Ok(UserRole::Admin),
        "student" => Ok(UserRole::Student),
        other => Err(Error::BadRequest(format!(
            "Unknown role '{}'; expected 'admin' or 'student'",
            other
        ))),
    }
}

fn parse_question_type(raw: &str) -> Result<QuestionType> {
    match raw.to_ascii_lowercase().as_str() {
        "multiple-choice" | "mc" => Ok(QuestionType::MultipleChoice),
        "true-false" | "tf" => Ok(QuestionType::TrueFalse),
        "short-answer" | "short" => Ok(QuestionType::ShortAnswer),
        other => Err(Error::BadRequest(format!(
            "Unknown question type '{}'; expected 'multiple-choice', 'true-false' or 'short-answer'",
            other
        ))),
    }
}

/// Enforces the per-type option invariants before anything goes on the wire.
fn normalize_options(question_type: QuestionType, options: Vec<String>) -> Result<Vec<String>> {
    match question_type {
        QuestionType::MultipleChoice => {
            if options.len() < 2 {
                return Err(Error::BadRequest(
                    "Multiple-choice questions need at least two --option values".to_string(),
                ));
            }
            Ok(options)
        }
        QuestionType::TrueFalse => {
            if !options.is_empty() {
                return Err(Error::BadRequest(
                    "True/false questions take no --option values".to_string(),
                ));
            }
            Ok(vec!["True".to_string(), "False".to_string()])
        }
        QuestionType::ShortAnswer => {
            if !options.is_empty() {
                return Err(Error::BadRequest(
                    "Short-answer questions take no --option values".to_string(),
                ));
            }
            Ok(Vec::new())
        }
    }
}

fn print_results(results: &[crate::models::exam::ResultDto]) {
    println!(
        "{:<6} {:<30} {:<16} {:<7} {:<8}",
        "ID", "EXAM", "STUDENT", "SCORE", "STATUS"
    );
    for result in results {
        println!(
            "{:<6} {:<30} {:<16} {:<7} {:<8}",
            result.id,
            result.exam_title,
            result.username,
            result.total_score,
            if result.is_passed { "passed" } else { "failed" }
        );
    }
}

fn print_users(users: &[crate::models::user::User]) {
    println!(
        "{:<6} {:<16} {:<28} {:<9} {:<7}",
        "ID", "USERNAME", "EMAIL", "ROLE", "ACTIVE"
    );
    for user in users {
        println!(
            "{:<6} {:<16} {:<28} {:<9} {:<7}",
            user.id, user.username, user.email, user.role.to_string(), user.is_active
        );
    }
}
