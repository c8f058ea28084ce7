use std::fmt::Display;

use serde_json::Value;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{AssignmentBucket, NewAssignment};

impl<T: Transport> CanvasClient<T> {
    /// Assignment groups of a course, each with its assignments.
    pub fn get_assignment_groups(&self, course: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/assignment_groups"))
            .add_param("include[]", "assignments")
            .submit_paginated()
    }

    /// `group_weight` is a percentage of the final grade.
    pub fn create_assignment_group(
        &self,
        course: impl Display,
        name: &str,
        position: Option<u32>,
        group_weight: f64,
    ) -> Result<Value, ApiError> {
        self.post(format!("api/v1/courses/{course}/assignment_groups"))
            .add_data("name", name)
            .add_data("group_weight", group_weight)
            .add_optional_data("position", position)
            .submit()
    }

    /// Delete an assignment group. Its assignments move to
    /// `move_assignments_to` when given and are deleted otherwise.
    pub fn delete_assignment_group(
        &self,
        course: impl Display,
        group_id: impl Display,
        move_assignments_to: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.delete(format!("api/v1/courses/{course}/assignment_groups/{group_id}"))
            .add_optional_param("move_assignments_to", move_assignments_to)
            .submit()
    }

    pub fn create_assignment(&self, course: impl Display, assignment: &NewAssignment) -> Result<Value, ApiError> {
        self.post(format!("api/v1/courses/{course}/assignments"))
            .form(assignment)
            .submit()
    }

    pub fn get_assignments(
        &self,
        course: impl Display,
        search: Option<&str>,
        bucket: Option<AssignmentBucket>,
    ) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/assignments"))
            .add_optional_param("search_term", search)
            .add_optional_param("bucket", bucket.map(|b| b.as_str()))
            .submit_paginated()
    }

    /// Create a grading standard from grade names in descending order and
    /// their lower cutoffs. `cutoffs` may be one shorter than `grades`, in
    /// which case the last grade gets a cutoff of 0.
    pub fn create_grading_standard<S: AsRef<str>>(
        &self,
        course: impl Display,
        title: &str,
        grades: &[S],
        cutoffs: &[f64],
    ) -> Result<Value, ApiError> {
        let mut cutoffs = cutoffs.to_vec();
        if cutoffs.len() + 1 == grades.len() {
            cutoffs.push(0.0);
        }
        if cutoffs.len() != grades.len() {
            return Err(ApiError::InvalidArgument(format!(
                "{} grades need {} or {} cutoffs, got {}",
                grades.len(),
                grades.len().saturating_sub(1),
                grades.len(),
                cutoffs.len()
            )));
        }

        // Canvas pairs up `grading_scheme_entry[][...]` fields by order.
        let mut req = self
            .post(format!("api/v1/courses/{course}/grading_standards"))
            .add_data("title", title);
        for (grade, cutoff) in grades.iter().zip(cutoffs) {
            req = req
                .push_data("grading_scheme_entry[][name]", grade.as_ref())
                .push_data("grading_scheme_entry[][value]", cutoff);
        }
        req.submit()
    }
}
