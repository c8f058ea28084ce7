use std::fmt::Display;

use serde_json::Value;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::request::RequestBuilder;
use crate::transport::Transport;
use crate::types::{NewModule, NewModuleItem};

/// `include[]` values for module listings. Details only apply with items.
fn with_items<T: Transport>(req: RequestBuilder<'_, T>, items: bool, details: bool) -> RequestBuilder<'_, T> {
    match (items, details) {
        (false, _) => req,
        (true, false) => req.add_param("include[]", "items"),
        (true, true) => req
            .add_param("include[]", "items")
            .add_param("include[]", "content_details"),
    }
}

impl<T: Transport> CanvasClient<T> {
    /// Modules of a course. `student` adds that student's completion state.
    pub fn list_modules(
        &self,
        course: impl Display,
        items: bool,
        details: bool,
        search: Option<&str>,
        student: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        with_items(self.get(format!("api/v1/courses/{course}/modules")), items, details)
            .add_optional_param("search_term", search)
            .add_optional_param("student_id", student)
            .submit_paginated()
    }

    pub fn show_module(
        &self,
        course: impl Display,
        module: impl Display,
        items: bool,
        details: bool,
        student: Option<&str>,
    ) -> Result<Value, ApiError> {
        with_items(
            self.get(format!("api/v1/courses/{course}/modules/{module}")),
            items,
            details,
        )
        .add_optional_param("student_id", student)
        .submit()
    }

    pub fn create_module(&self, course: impl Display, module: &NewModule) -> Result<Value, ApiError> {
        self.post(format!("api/v1/courses/{course}/modules"))
            .form(module)
            .submit()
    }

    pub fn delete_module(&self, course: impl Display, module: impl Display) -> Result<Value, ApiError> {
        self.delete(format!("api/v1/courses/{course}/modules/{module}"))
            .submit()
    }

    pub fn list_module_items(
        &self,
        course: impl Display,
        module: impl Display,
        details: bool,
        search: Option<&str>,
        student: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let mut req = self.get(format!("api/v1/courses/{course}/modules/{module}/items"));
        if details {
            req = req.add_param("include[]", "content_details");
        }
        req.add_optional_param("search_term", search)
            .add_optional_param("student_id", student)
            .submit_paginated()
    }

    pub fn show_module_item(
        &self,
        course: impl Display,
        module: impl Display,
        item: impl Display,
        details: bool,
        student: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut req = self.get(format!("api/v1/courses/{course}/modules/{module}/items/{item}"));
        if details {
            req = req.add_param("include[]", "content_details");
        }
        req.add_optional_param("student_id", student).submit()
    }

    pub fn create_module_item(
        &self,
        course: impl Display,
        module: impl Display,
        item: &NewModuleItem,
    ) -> Result<Value, ApiError> {
        self.post(format!("api/v1/courses/{course}/modules/{module}/items"))
            .form(item)
            .submit()
    }

    pub fn delete_module_item(
        &self,
        course: impl Display,
        module: impl Display,
        item: impl Display,
    ) -> Result<Value, ApiError> {
        self.delete(format!("api/v1/courses/{course}/modules/{module}/items/{item}"))
            .submit()
    }
}
