use std::fmt::Display;

use serde_json::Value;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::params::Params;
use crate::transport::Transport;
use crate::types::NewExternalTool;

const REDIRECT_TOOL_URL: &str = "https://www.edu-apps.org/redirect";

impl<T: Transport> CanvasClient<T> {
    /// Update course settings. Keys are the names inside the brackets of the
    /// "Update a course" parameters, e.g. `default_view` for
    /// `course[default_view]`.
    pub fn course_settings_set(&self, course: impl Display, settings: &Params) -> Result<Value, ApiError> {
        let mut req = self.put(format!("api/v1/courses/{course}"));
        {
            let mut fields = req.data_mut().nest("course");
            for (key, value) in settings.iter() {
                fields.add(key, value.clone());
            }
        }
        req.submit()
    }

    /// Add a course navigation entry that redirects to `url`.
    pub fn create_redirect_tool(
        &self,
        course: impl Display,
        text: &str,
        url: &str,
        new_tab: bool,
        enabled_by_default: bool,
    ) -> Result<Value, ApiError> {
        let mut req = self
            .post(format!("api/v1/courses/{course}/external_tools"))
            .add_data("name", format!("Redirect to {text}"))
            .add_data("privacy_level", "anonymous")
            .add_data("consumer_key", "N/A")
            .add_data("shared_secret", "hjkl")
            .add_data("url", REDIRECT_TOOL_URL)
            .add_data("text", text)
            .add_data("not_selectable", true)
            .add_data("description", format!("Redirects to {url}"));
        req.data_mut()
            .nest("custom_fields")
            .add("url", url)
            .add("new_tab", u8::from(new_tab));
        req.data_mut()
            .nest("course_navigation")
            .add("enabled", true)
            .add("text", text)
            .add("default", enabled_by_default);
        req.submit()
    }

    pub fn create_external_tool(&self, course: impl Display, tool: &NewExternalTool) -> Result<Value, ApiError> {
        self.post(format!("api/v1/courses/{course}/external_tools"))
            .form(tool)
            .submit()
    }

    /// Courses of the current user.
    pub fn get_list_of_courses(&self) -> Result<Vec<Value>, ApiError> {
        self.get("api/v1/courses").submit_paginated()
    }

    pub fn get_favorite_courses(&self) -> Result<Vec<Value>, ApiError> {
        self.get("api/v1/users/self/favorites/courses").submit_paginated()
    }

    /// No-op on the server if the course already is a favorite.
    pub fn add_course_to_favorites(&self, course: impl Display) -> Result<Value, ApiError> {
        self.post(format!("api/v1/users/self/favorites/courses/{course}"))
            .submit()
    }

    pub fn remove_course_from_favorites(&self, course: impl Display) -> Result<Value, ApiError> {
        self.delete(format!("api/v1/users/self/favorites/courses/{course}"))
            .submit()
    }

    /// Navigation tabs, external tools included.
    pub fn get_course_tabs(&self, course: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/tabs"))
            .add_param("include[]", "external")
            .submit_paginated()
    }

    /// Move or hide a navigation tab. `position` is 1-based.
    pub fn update_course_tab(
        &self,
        course: impl Display,
        tab: &str,
        position: u32,
        hidden: bool,
    ) -> Result<Value, ApiError> {
        self.put(format!("api/v1/courses/{course}/tabs/{tab}"))
            .add_data("hidden", hidden)
            .add_data("position", position)
            .submit()
    }
}
