//! The `coursework courses` commands.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coursework_core::directory::CourseDirectory;
use coursework_core::model::MediaKind;

use super::{Session, StdinConfirm};

pub async fn list(config_path: Option<PathBuf>, filter: Option<String>) -> Result<()> {
    let session = Session::connect(config_path)?;
    let mut directory = CourseDirectory::new(session.client);
    directory.load().await?;

    if let Some(term) = filter {
        directory.set_filter(term);
    }

    if directory.visible().is_empty() {
        println!("No courses available.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Description", "Media"]);
    for course in directory.visible() {
        let media = match course.media_kind() {
            MediaKind::Image => "image".to_string(),
            MediaKind::Link => course.media_url.clone().unwrap_or_default(),
            MediaKind::None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&course.course_id),
            Cell::new(&course.title),
            Cell::new(&course.description),
            Cell::new(media),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub async fn delete(config_path: Option<PathBuf>, id: String, yes: bool) -> Result<()> {
    let session = Session::connect(config_path)?;
    let mut directory = CourseDirectory::new(session.client);

    if directory.delete(&id, &StdinConfirm { assume_yes: yes }).await? {
        println!("Deleted course {id}");
    } else {
        println!("Cancelled.");
    }
    Ok(())
}
