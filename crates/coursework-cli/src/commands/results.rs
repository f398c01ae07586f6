//! The `coursework results` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coursework_core::identity::current_user_id;
use coursework_core::results::ResultsViewer;

use super::Session;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let session = Session::connect(config_path)?;
    if current_user_id(session.tokens.as_ref()).is_none() {
        eprintln!("Not logged in: set COURSEWORK_TOKEN or write a token file.");
    }

    let mut viewer = ResultsViewer::new(session.client, session.tokens);
    let results = viewer.load().await?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Assessment", "Score"]);
    for r in results {
        table.add_row(vec![
            Cell::new(&r.assessment_title),
            Cell::new(r.result.score),
        ]);
    }
    println!("Your Assessment Results");
    println!("{table}");

    Ok(())
}
