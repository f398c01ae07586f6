//! Course and assessment directories.
//!
//! Each directory owns the snapshot it fetched. Selections are reported to
//! the parent as [`DirectoryEvent`] return values; deletions require a
//! confirmation and only touch local state once the server has agreed.

use std::sync::Arc;

use tracing::instrument;

use crate::error::DirectoryError;
use crate::model::{Assessment, Course, Route};
use crate::traits::{get_json, ApiClient, Confirm};

/// Something the user picked in a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEvent {
    CourseSelected(Course),
    AssessmentSelected(Assessment),
}

impl DirectoryEvent {
    /// Navigation implied by the event, if any.
    pub fn route(&self) -> Option<Route> {
        match self {
            DirectoryEvent::CourseSelected(_) => None,
            DirectoryEvent::AssessmentSelected(a) => Some(Route::TakeAssessment(a.id.clone())),
        }
    }
}

/// Items that can be filtered by title.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for Course {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for Assessment {
    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// Case-insensitive substring match against the title. An empty term
/// matches everything.
pub fn matches_title(title: &str, term: &str) -> bool {
    title.to_lowercase().contains(&term.to_lowercase())
}

/// Keep the items whose title contains `term`, ignoring case.
pub fn filter_by_title<T: Titled + Clone>(items: &[T], term: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches_title(item.title(), term))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// All courses, plus the subset matching the current filter.
pub struct CourseDirectory {
    client: Arc<dyn ApiClient>,
    courses: Vec<Course>,
    filter: String,
    visible: Vec<Course>,
}

impl CourseDirectory {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            courses: Vec::new(),
            filter: String::new(),
            visible: Vec::new(),
        }
    }

    /// Fetch every course. The current filter is reapplied.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), DirectoryError> {
        let courses: Vec<Course> = get_json(self.client.as_ref(), "/Courses")
            .await
            .map_err(|e| {
                tracing::error!("error fetching courses: {e}");
                DirectoryError::LoadCourses(e)
            })?;
        tracing::debug!(count = courses.len(), "fetched courses");
        self.courses = courses;
        self.refilter();
        Ok(())
    }

    /// Change the filter text; no request is made.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = filter_by_title(&self.courses, &self.filter);
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Courses matching the current filter.
    pub fn visible(&self) -> &[Course] {
        &self.visible
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn get(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    pub fn select(&self, course_id: &str) -> Option<DirectoryEvent> {
        self.get(course_id)
            .cloned()
            .map(DirectoryEvent::CourseSelected)
    }

    /// Delete a course after confirmation.
    ///
    /// Returns `Ok(false)` if the user declined. The course is removed
    /// locally only after the server accepted the delete.
    #[instrument(skip(self, confirm))]
    pub async fn delete(
        &mut self,
        course_id: &str,
        confirm: &dyn Confirm,
    ) -> Result<bool, DirectoryError> {
        if !confirm.confirm("Are you sure you want to delete this course?") {
            return Ok(false);
        }

        let path = format!("/Courses/{}", urlencoding::encode(course_id));
        self.client.delete(&path).await.map_err(|e| {
            tracing::error!("failed to delete course {course_id}: {e}");
            DirectoryError::DeleteCourse(e)
        })?;

        self.courses.retain(|c| c.course_id != course_id);
        self.refilter();
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Assessments
// ---------------------------------------------------------------------------

/// Assessments of one course.
pub struct AssessmentDirectory {
    client: Arc<dyn ApiClient>,
    course_id: Option<String>,
    assessments: Vec<Assessment>,
}

impl AssessmentDirectory {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            course_id: None,
            assessments: Vec::new(),
        }
    }

    /// Fetch the assessments of a course (filtered server-side).
    #[instrument(skip(self))]
    pub async fn load_for_course(&mut self, course_id: &str) -> Result<(), DirectoryError> {
        let path = format!("/Assessments?courseId={}", urlencoding::encode(course_id));
        let assessments: Vec<Assessment> =
            get_json(self.client.as_ref(), &path).await.map_err(|e| {
                tracing::error!("error fetching assessments for course {course_id}: {e}");
                DirectoryError::LoadAssessments(e)
            })?;
        self.course_id = Some(course_id.to_string());
        self.assessments = assessments;
        Ok(())
    }

    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_deref()
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn select(&self, assessment_id: &str) -> Option<DirectoryEvent> {
        self.assessments
            .iter()
            .find(|a| a.id == assessment_id)
            .cloned()
            .map(DirectoryEvent::AssessmentSelected)
    }

    /// Delete an assessment after confirmation. See [`CourseDirectory::delete`].
    #[instrument(skip(self, confirm))]
    pub async fn delete(
        &mut self,
        assessment_id: &str,
        confirm: &dyn Confirm,
    ) -> Result<bool, DirectoryError> {
        if !confirm.confirm("Are you sure you want to delete this assessment?") {
            return Ok(false);
        }

        let path = format!("/Assessments/{}", urlencoding::encode(assessment_id));
        self.client.delete(&path).await.map_err(|e| {
            tracing::error!("failed to delete assessment {assessment_id}: {e}");
            DirectoryError::DeleteAssessment(e)
        })?;

        self.assessments.retain(|a| a.id != assessment_id);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// Parent controller: pick a course, then browse its assessments.
pub struct CourseBrowser {
    courses: CourseDirectory,
    assessments: AssessmentDirectory,
    selected: Option<Course>,
}

impl CourseBrowser {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            courses: CourseDirectory::new(Arc::clone(&client)),
            assessments: AssessmentDirectory::new(client),
            selected: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), DirectoryError> {
        self.courses.load().await
    }

    /// Select a course and fetch its assessments.
    ///
    /// The selection only changes once the assessments are loaded; on
    /// failure the previous course and its assessments stay current.
    pub async fn select_course(&mut self, course_id: &str) -> Result<DirectoryEvent, DirectoryError> {
        let event = self
            .courses
            .select(course_id)
            .ok_or_else(|| DirectoryError::UnknownCourse(course_id.to_string()))?;
        self.assessments.load_for_course(course_id).await?;
        if let DirectoryEvent::CourseSelected(course) = &event {
            self.selected = Some(course.clone());
        }
        Ok(event)
    }

    /// Pick an assessment of the selected course.
    pub fn select_assessment(&self, assessment_id: &str) -> Option<DirectoryEvent> {
        self.assessments.select(assessment_id)
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.selected.as_ref()
    }

    pub fn courses(&self) -> &CourseDirectory {
        &self.courses
    }

    pub fn courses_mut(&mut self) -> &mut CourseDirectory {
        &mut self.courses
    }

    pub fn assessments(&self) -> &AssessmentDirectory {
        &self.assessments
    }

    pub fn assessments_mut(&mut self) -> &mut AssessmentDirectory {
        &mut self.assessments
    }
}
