//! The `coursework take` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use coursework_core::model::Question;
use coursework_core::results::UNTITLED_TITLE;
use coursework_core::runner::AssessmentRunner;
use coursework_core::traits::Confirm;
use coursework_core::RunnerError;

use super::{prompt_line, Session, StdinConfirm};

pub async fn execute(
    config_path: Option<PathBuf>,
    assessment_id: String,
    answers: Option<String>,
) -> Result<()> {
    let session = Session::connect(config_path)?;
    let mut runner = AssessmentRunner::new(session.client, session.tokens, assessment_id);
    runner.load().await?;

    let title = runner
        .assessment()
        .and_then(|a| a.display_title())
        .unwrap_or(UNTITLED_TITLE)
        .to_string();
    let questions = runner.questions().to_vec();
    println!("{title} ({} questions)", questions.len());

    let interactive = answers.is_none();
    match answers {
        Some(spec) => {
            for (question, option) in parse_answers(&spec)? {
                runner.select_option(question, option);
            }
        }
        None => ask_questions(&mut runner, &questions),
    }

    loop {
        match runner.submit().await {
            Ok(outcome) => {
                println!("{}", outcome.message);
                println!("Score: {}/{}", outcome.score, questions.len());
                tracing::debug!(next = %outcome.next, "submission complete");
                println!("Run `coursework results` to see all your results.");
                return Ok(());
            }
            Err(e) => {
                if let Some(route) = e.redirect() {
                    eprintln!("Please log in first ({route}).");
                    return Err(e.into());
                }
                let retryable = matches!(e, RunnerError::Submission(_));
                if !interactive || !retryable {
                    return Err(e.into());
                }
                eprintln!("{e}");
                let prompt = StdinConfirm { assume_yes: false };
                if !prompt.confirm("Retry submission?") {
                    return Err(e.into());
                }
            }
        }
    }
}

/// Print each question and read the chosen option number from stdin.
/// End of input leaves the remaining questions unanswered.
fn ask_questions(runner: &mut AssessmentRunner, questions: &[Question]) {
    for (idx, question) in questions.iter().enumerate() {
        println!();
        println!("{}. {}", idx + 1, question.prompt);
        for (opt_idx, option) in question.options.iter().enumerate() {
            println!("   {}) {option}", opt_idx + 1);
        }
        if question.options.is_empty() {
            continue;
        }

        let count = question.options.len();
        loop {
            let Some(line) = prompt_line(&format!("Answer [1-{count}, blank to skip]: ")) else {
                return;
            };
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => {
                    runner.select_option(idx, n - 1);
                    break;
                }
                _ => eprintln!("Please enter a number between 1 and {count}."),
            }
        }
    }
    println!();
}

/// Parse `--answers`: comma-separated option numbers starting at 1, one per
/// question in order. Empty entries leave the question unanswered.
///
/// Returns `(question index, option index)` pairs, both 0-based.
fn parse_answers(spec: &str) -> Result<Vec<(usize, usize)>> {
    let mut selections = Vec::new();
    for (question, entry) in spec.split(',').enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let number: usize = entry
            .parse()
            .with_context(|| format!("invalid answer for question {}: '{entry}'", question + 1))?;
        anyhow::ensure!(
            number >= 1,
            "invalid answer for question {}: option numbers start at 1",
            question + 1
        );
        selections.push((question, number - 1));
    }
    Ok(selections)
}
