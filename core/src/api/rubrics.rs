use std::fmt::Display;

use serde_json::Value;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{AssignmentRubric, Criterion, Rubric};

impl<T: Transport> CanvasClient<T> {
    /// Create `rubric` and use it for grading `assignment`.
    /// `comments` allows free-form comments instead of rating selection.
    pub fn create_rubric_for_assignment(
        &self,
        course: impl Display,
        assignment: impl Display,
        rubric: &Rubric,
        comments: bool,
    ) -> Result<Value, ApiError> {
        let association = AssignmentRubric {
            assignment_id: assignment.to_string(),
            rubric,
            free_form_criterion_comments: comments,
        };
        self.post(format!("api/v1/courses/{course}/rubrics"))
            .form(&association)
            .submit()
    }

    /// Add `criterion` as row `number` of an existing rubric.
    pub fn add_criterion_to_rubric(
        &self,
        course: impl Display,
        rubric: impl Display,
        criterion: &Criterion,
        number: usize,
    ) -> Result<Value, ApiError> {
        let mut req = self.put(format!("api/v1/courses/{course}/rubrics/{rubric}"));
        criterion.encode_at(number, req.data_mut());
        req.submit()
    }
}
