use std::fmt::Display;

use serde_json::Value;
use tracing::debug;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{EnrollmentTask, NewAppointmentGroup, NewConversation};

impl<T: Transport> CanvasClient<T> {
    pub fn get_students(&self, course: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/users"))
            .add_param("enrollment_type", "student")
            .submit_paginated()
    }

    /// Profile of the user with the given SIS login id.
    pub fn find_user_by_login_id(&self, login_id: &str) -> Result<Value, ApiError> {
        self.get(format!("api/v1/users/sis_login_id:{login_id}/profile"))
            .submit()
    }

    /// Look the user up by SIS login id and enroll them as active.
    pub fn enroll_user_by_login_id(&self, course: impl Display, login_id: &str) -> Result<Value, ApiError> {
        let profile = self.find_user_by_login_id(login_id)?;
        let user_id = match (&profile["login_id"], &profile["id"]) {
            (Value::String(found), id) if found == login_id && !id.is_null() => id.clone(),
            _ => {
                return Err(ApiError::InvalidArgument(format!(
                    "could not find user with login id {login_id}"
                )))
            }
        };
        debug!(login_id, %user_id, "enrolling user");

        let user_id = match user_id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let mut req = self.post(format!("api/v1/courses/{course}/enrollments"));
        req.data_mut()
            .nest("enrollment")
            .add("user_id", user_id)
            .add("enrollment_state", "active");
        req.submit()
    }

    pub fn get_enrollments(&self, course: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/enrollments"))
            .submit_paginated()
    }

    /// Conclude, delete or deactivate an enrollment.
    pub fn enrollment_stop(
        &self,
        course: impl Display,
        enrollment_id: impl Display,
        task: EnrollmentTask,
    ) -> Result<Value, ApiError> {
        self.delete(format!("api/v1/courses/{course}/enrollments/{enrollment_id}"))
            .add_param("task", task.as_str())
            .submit()
    }

    pub fn get_group_categories(&self, course: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/group_categories"))
            .submit_paginated()
    }

    /// Groups of a course, or only those of `category` when given (the
    /// course is then not part of the request).
    pub fn get_groups(&self, course: impl Display, category: Option<&str>) -> Result<Vec<Value>, ApiError> {
        let path = match category {
            Some(category) => format!("api/v1/group_categories/{category}/groups"),
            None => format!("api/v1/courses/{course}/groups"),
        };
        self.get(path).submit_paginated()
    }

    pub fn get_group_members(&self, group: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/groups/{group}/users"))
            .submit_paginated()
    }

    pub fn create_appointment_group(&self, group: &NewAppointmentGroup) -> Result<Value, ApiError> {
        self.post("api/v1/appointment_groups").form(group).submit()
    }

    pub fn create_conversation(&self, conversation: &NewConversation) -> Result<Value, ApiError> {
        self.post("api/v1/conversations").form(conversation).submit()
    }
}
