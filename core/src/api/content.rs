use std::fmt::Display;

use serde_json::Value;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::markdown::convert_markdown;
use crate::transport::Transport;
use crate::types::NewDiscussion;

impl<T: Transport> CanvasClient<T> {
    pub fn upload_syllabus_from_markdown(
        &self,
        course: impl Display,
        markdown_body: &str,
        use_pandoc: bool,
    ) -> Result<Value, ApiError> {
        self.put(format!("api/v1/courses/{course}"))
            .add_data("course[syllabus_body]", convert_markdown(markdown_body, use_pandoc))
            .submit()
    }

    pub fn post_announcement_from_markdown(
        &self,
        course: impl Display,
        title: &str,
        markdown_body: &str,
        use_pandoc: bool,
    ) -> Result<Value, ApiError> {
        self.announce(format!("api/v1/courses/{course}/discussion_topics"), title, markdown_body, use_pandoc)
    }

    pub fn post_group_announcement_from_markdown(
        &self,
        group: impl Display,
        title: &str,
        markdown_body: &str,
        use_pandoc: bool,
    ) -> Result<Value, ApiError> {
        self.announce(format!("api/v1/groups/{group}/discussion_topics"), title, markdown_body, use_pandoc)
    }

    fn announce(&self, path: String, title: &str, markdown_body: &str, use_pandoc: bool) -> Result<Value, ApiError> {
        self.post(path)
            .add_data("title", title)
            .add_data("message", convert_markdown(markdown_body, use_pandoc))
            .add_data("is_announcement", true)
            .submit()
    }

    pub fn create_discussion(&self, course: impl Display, discussion: &NewDiscussion) -> Result<Value, ApiError> {
        self.post(format!("api/v1/courses/{course}/discussion_topics"))
            .form(discussion)
            .submit()
    }

    /// Create a wiki page.
    pub fn create_page_from_markdown(
        &self,
        course: impl Display,
        title: &str,
        markdown_body: &str,
        published: bool,
        use_pandoc: bool,
    ) -> Result<Value, ApiError> {
        let mut req = self.post(format!("api/v1/courses/{course}/pages"));
        req.data_mut()
            .nest("wiki_page")
            .add("title", title)
            .add("body", convert_markdown(markdown_body, use_pandoc))
            .add("published", published);
        req.submit()
    }

    /// Replace a wiki page, addressed by its `url` slug.
    pub fn update_page_from_markdown(
        &self,
        course: impl Display,
        page_url: &str,
        title: &str,
        markdown_body: &str,
        published: bool,
        use_pandoc: bool,
    ) -> Result<Value, ApiError> {
        let mut req = self.put(format!("api/v1/courses/{course}/pages/{page_url}"));
        req.data_mut()
            .nest("wiki_page")
            .add("title", title)
            .add("body", convert_markdown(markdown_body, use_pandoc))
            .add("published", published);
        req.submit()
    }
}
