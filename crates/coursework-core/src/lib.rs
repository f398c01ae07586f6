//! coursework-core: data model, scoring, and the assessment flow.
//!
//! This crate holds everything that does not depend on a concrete HTTP
//! stack: the components talk to the backend through the [`traits::ApiClient`]
//! trait and read the logged-in user through [`traits::TokenStore`].

pub mod directory;
pub mod error;
pub mod identity;
pub mod mock;
pub mod model;
pub mod results;
pub mod runner;
pub mod scoring;
pub mod traits;

pub use error::{ApiError, DirectoryError, ResultsError, RunnerError};
pub use runner::{AssessmentRunner, RunnerState, SubmitOutcome};
