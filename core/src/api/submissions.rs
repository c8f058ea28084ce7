use std::fmt::Display;

use serde_json::Value;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::SubmissionQuery;

impl<T: Transport> CanvasClient<T> {
    /// Submissions selected by `query`.
    ///
    /// One assignment and one student is a single-submission request, one
    /// assignment and every student is the assignment's submission list, and
    /// anything else goes through the course-wide multi-student endpoint.
    pub fn get_submissions(&self, course: impl Display, query: &SubmissionQuery) -> Result<Vec<Value>, ApiError> {
        match (query.assignment_ids.as_slice(), query.student_ids.as_slice()) {
            ([assignment], [student]) => {
                let submission = self
                    .get(format!(
                        "api/v1/courses/{course}/assignments/{assignment}/submissions/{student}"
                    ))
                    .submit()?;
                Ok(vec![submission])
            }
            ([assignment], []) => self
                .get(format!("api/v1/courses/{course}/assignments/{assignment}/submissions"))
                .submit_paginated(),
            (assignments, students) => {
                let mut req = self
                    .get(format!("api/v1/courses/{course}/students/submissions"))
                    .add_param("grouped", query.grouped);
                if students.is_empty() {
                    req = req.add_param("student_ids[]", "all");
                }
                for student in students {
                    req = req.add_param("student_ids[]", student);
                }
                for assignment in assignments {
                    req = req.add_param("assignment_ids[]", assignment);
                }
                req.submit_paginated()
            }
        }
    }

    /// Post several grades for one assignment. `grades` pairs a student id
    /// with a grade (points, percentage or letter).
    pub fn update_grades<S: Display, G: Display>(
        &self,
        course: impl Display,
        assignment: impl Display,
        grades: &[(S, G)],
    ) -> Result<Value, ApiError> {
        let mut req = self.post(format!(
            "api/v1/courses/{course}/assignments/{assignment}/submissions/update_grades"
        ));
        {
            let mut grade_data = req.data_mut().nest("grade_data");
            for (student, grade) in grades {
                grade_data
                    .nest(&student.to_string())
                    .add("posted_grade", grade.to_string());
            }
        }
        req.submit()
    }

    pub fn update_grade(
        &self,
        course: impl Display,
        assignment: impl Display,
        student: impl Display,
        grade: &str,
    ) -> Result<Value, ApiError> {
        self.put(format!(
            "api/v1/courses/{course}/assignments/{assignment}/submissions/{student}"
        ))
        .add_data("submission[posted_grade]", grade)
        .submit()
    }

    pub fn comment_on_submission(
        &self,
        course: impl Display,
        assignment: impl Display,
        student: impl Display,
        comment: &str,
    ) -> Result<Value, ApiError> {
        self.put(format!(
            "api/v1/courses/{course}/assignments/{assignment}/submissions/{student}"
        ))
        .add_data("comment[text_comment]", comment)
        .submit()
    }

    pub fn get_quiz_submissions(&self, course: impl Display, quiz: impl Display) -> Result<Value, ApiError> {
        self.get(format!("api/v1/courses/{course}/quizzes/{quiz}/submissions"))
            .submit()
    }

    /// Answers of one quiz submission.
    pub fn get_quiz_submission_answers(&self, submission: impl Display) -> Result<Value, ApiError> {
        self.get(format!("api/v1/quiz_submissions/{submission}/questions"))
            .submit()
    }
}
