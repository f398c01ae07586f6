//! The `coursework assessments` commands.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coursework_core::directory::{filter_by_title, AssessmentDirectory};

use super::{Session, StdinConfirm};

pub async fn list(
    config_path: Option<PathBuf>,
    course_id: String,
    filter: Option<String>,
) -> Result<()> {
    let session = Session::connect(config_path)?;
    let mut directory = AssessmentDirectory::new(session.client);
    directory.load_for_course(&course_id).await?;

    let assessments = filter_by_title(directory.assessments(), filter.as_deref().unwrap_or(""));
    if assessments.is_empty() {
        println!("No assessments for course {course_id}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Questions"]);
    for assessment in &assessments {
        let questions = match assessment.questions() {
            Ok(q) => q.len().to_string(),
            Err(_) => "?".to_string(),
        };
        table.add_row(vec![
            Cell::new(&assessment.id),
            Cell::new(assessment.display_title().unwrap_or("(untitled)")),
            Cell::new(questions),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub async fn delete(config_path: Option<PathBuf>, id: String, yes: bool) -> Result<()> {
    let session = Session::connect(config_path)?;
    let mut directory = AssessmentDirectory::new(session.client);

    if directory.delete(&id, &StdinConfirm { assume_yes: yes }).await? {
        println!("Deleted assessment {id}");
    } else {
        println!("Cancelled.");
    }
    Ok(())
}
