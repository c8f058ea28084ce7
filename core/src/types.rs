//! Structured options for Canvas endpoints.
//!
//! # Design
//! Each type mirrors one Canvas request payload and implements `FormEncode`,
//! so the bracketed field names (`module_item[type]`,
//! `rubric[criteria][0][ratings][1][points]`, ...) live here and nowhere
//! else. Responses stay as `serde_json::Value`; callers that want typed
//! results use `RequestBuilder::submit_as`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::markdown::convert_markdown;
use crate::params::{FormEncode, Params};

/// `course_<id>` context code.
pub fn course_context(id: impl fmt::Display) -> String {
    format!("course_{id}")
}

/// `group_<id>` context code.
pub fn group_context(id: impl fmt::Display) -> String {
    format!("group_{id}")
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(DiscussionType {
    Threaded => "threaded",
    SideComment => "side_comment",
});

wire_enum!(
    /// How students hand in an assignment.
    SubmissionType {
        OnlineQuiz => "online_quiz",
        None => "none",
        OnPaper => "on_paper",
        DiscussionTopic => "discussion_topic",
        ExternalTool => "external_tool",
        OnlineUpload => "online_upload",
        OnlineTextEntry => "online_text_entry",
        OnlineUrl => "online_url",
        MediaRecording => "media_recording",
    }
);

wire_enum!(
    /// Assignment filter by due date and submission status.
    AssignmentBucket {
        Past => "past",
        Overdue => "overdue",
        Undated => "undated",
        Ungraded => "ungraded",
        Upcoming => "upcoming",
        Future => "future",
    }
);

wire_enum!(EnrollmentTask {
    Conclude => "conclude",
    Delete => "delete",
    Inactivate => "inactivate",
    Deactivate => "deactivate",
});

wire_enum!(PrivacyLevel {
    Anonymous => "anonymous",
    NameOnly => "name_only",
    Public => "public",
});

wire_enum!(ModuleItemType {
    File => "File",
    Page => "Page",
    Discussion => "Discussion",
    Assignment => "Assignment",
    Quiz => "Quiz",
    SubHeader => "SubHeader",
    ExternalUrl => "ExternalUrl",
    ExternalTool => "ExternalTool",
});

/// A new discussion topic or announcement. `message` is markdown.
#[derive(Debug, Clone)]
pub struct NewDiscussion {
    pub title: String,
    pub message: String,
    pub discussion_type: DiscussionType,
    pub position_after: Option<String>,
    pub published: bool,
    pub allow_rating: bool,
    pub sort_by_rating: bool,
    pub only_graders_can_rate: bool,
    pub podcast_enabled: bool,
    pub podcast_has_student_posts: bool,
    pub require_initial_post: bool,
    pub pinned: bool,
    /// Turns the topic into a group discussion in this group category.
    pub group_category_id: Option<String>,
    pub use_pandoc: bool,
}

impl NewDiscussion {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            discussion_type: DiscussionType::Threaded,
            position_after: None,
            published: true,
            allow_rating: false,
            sort_by_rating: false,
            only_graders_can_rate: false,
            podcast_enabled: false,
            podcast_has_student_posts: false,
            require_initial_post: false,
            pinned: false,
            group_category_id: None,
            use_pandoc: false,
        }
    }
}

impl FormEncode for NewDiscussion {
    fn encode(&self, params: &mut Params) {
        params.add("title", &self.title, true);
        params.add("message", convert_markdown(&self.message, self.use_pandoc), true);
        params.add("is_announcement", false, true);
        params.add("discussion_type", self.discussion_type.as_str(), true);
        params.add("published", self.published, true);
        params.add("allow_rating", self.allow_rating, true);
        params.add("sort_by_rating", self.sort_by_rating, true);
        params.add("only_graders_can_rate", self.only_graders_can_rate, true);
        params.add("podcast_enabled", self.podcast_enabled, true);
        params.add("podcast_has_student_posts", self.podcast_has_student_posts, true);
        params.add("require_initial_post", self.require_initial_post, true);
        params.add("pinned", self.pinned, true);
        params.add_optional("group_category_id", self.group_category_id.as_ref(), true);
        params.add_optional("position_after", self.position_after.as_ref(), true);
    }
}

/// Link an assignment to an external tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalToolTag {
    pub url: String,
    pub new_tab: bool,
}

/// A new assignment. `description` is markdown.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub name: String,
    pub description: String,
    pub points_possible: f64,
    /// ISO 8601 due date.
    pub due_at: Option<String>,
    pub assignment_group_id: Option<String>,
    pub submission_types: Vec<SubmissionType>,
    /// Only meaningful with `SubmissionType::OnlineUpload`.
    pub allowed_extensions: Vec<String>,
    pub peer_reviews: bool,
    pub automatic_peer_reviews: bool,
    pub external_tool: Option<ExternalToolTag>,
    pub published: bool,
    pub use_pandoc: bool,
}

impl NewAssignment {
    pub fn new(name: impl Into<String>, description: impl Into<String>, points_possible: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            points_possible,
            due_at: None,
            assignment_group_id: None,
            submission_types: vec![SubmissionType::OnPaper],
            allowed_extensions: Vec::new(),
            peer_reviews: false,
            automatic_peer_reviews: false,
            external_tool: None,
            published: true,
            use_pandoc: true,
        }
    }
}

impl FormEncode for NewAssignment {
    fn encode(&self, params: &mut Params) {
        let mut assignment = params.nest("assignment");
        assignment
            .add("name", &self.name)
            .add("description", convert_markdown(&self.description, self.use_pandoc))
            .add_array(
                "submission_types",
                self.submission_types.iter().map(|t| t.as_str()).collect(),
            )
            .add("points_possible", self.points_possible)
            .add_optional("due_at", self.due_at.as_ref())
            .add_optional("assignment_group_id", self.assignment_group_id.as_ref())
            .add("published", self.published)
            .add("peer_reviews", self.peer_reviews)
            .add("automatic_peer_reviews", self.automatic_peer_reviews)
            .add_array("allowed_extensions", self.allowed_extensions.clone());
        // Canvas answers 500 to a nested hash here; the fields must be sent
        // one by one.
        if let Some(tool) = &self.external_tool {
            assignment
                .nest("external_tool_tag_attributes")
                .add("url", &tool.url)
                .add("new_tab", tool.new_tab);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewModule {
    pub name: String,
    /// 1-based position in the course.
    pub position: u32,
    pub unlock_at: Option<String>,
    pub require_sequential_progress: bool,
    pub prerequisite_module_ids: Vec<String>,
    pub publish_final_grade: bool,
}

impl FormEncode for NewModule {
    fn encode(&self, params: &mut Params) {
        params
            .nest("module")
            .add("name", &self.name)
            .add("position", self.position)
            .add("require_sequential_progress", self.require_sequential_progress)
            .add("publish_final_grade", self.publish_final_grade)
            .add_optional("unlock_at", self.unlock_at.as_ref())
            .add_array("prerequisite_module_ids", self.prerequisite_module_ids.clone());
    }
}

/// A new module item. Which of `content_id`, `page_url` and `external_url`
/// is required depends on `item_type`; the server validates the combination.
#[derive(Debug, Clone)]
pub struct NewModuleItem {
    pub title: String,
    pub item_type: ModuleItemType,
    pub position: u32,
    pub indent: u32,
    pub content_id: Option<String>,
    pub page_url: Option<String>,
    pub external_url: Option<String>,
    pub new_tab: bool,
}

impl NewModuleItem {
    pub fn new(title: impl Into<String>, item_type: ModuleItemType, position: u32) -> Self {
        Self {
            title: title.into(),
            item_type,
            position,
            indent: 0,
            content_id: None,
            page_url: None,
            external_url: None,
            new_tab: true,
        }
    }
}

impl FormEncode for NewModuleItem {
    fn encode(&self, params: &mut Params) {
        params
            .nest("module_item")
            .add("title", &self.title)
            .add("type", self.item_type.as_str())
            .add("position", self.position)
            .add("indent", self.indent)
            .add("new_tab", self.new_tab)
            .add_optional("content_id", self.content_id.as_ref())
            .add_optional("page_url", self.page_url.as_ref())
            .add_optional("external_url", self.external_url.as_ref());
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointmentGroup {
    /// Students of these courses may sign up.
    pub course_ids: Vec<String>,
    pub title: String,
    pub description: String,
    pub location_name: String,
    /// `(start, end)` pairs, ISO 8601.
    pub time_slots: Vec<(String, String)>,
    /// Publishing cannot be undone.
    pub publish: bool,
    pub participants_per_appointment: Option<u32>,
    pub min_appointments_per_participant: Option<u32>,
    pub max_appointments_per_participant: Option<u32>,
    /// Hide participants' names from each other.
    pub private: bool,
}

impl NewAppointmentGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            course_ids: Vec::new(),
            title: title.into(),
            description: String::new(),
            location_name: String::new(),
            time_slots: Vec::new(),
            publish: false,
            participants_per_appointment: None,
            min_appointments_per_participant: None,
            max_appointments_per_participant: Some(1),
            private: true,
        }
    }
}

impl FormEncode for NewAppointmentGroup {
    fn encode(&self, params: &mut Params) {
        let mut group = params.nest("appointment_group");
        group
            .add_array(
                "context_codes",
                self.course_ids.iter().map(|id| course_context(id)).collect(),
            )
            .add("title", &self.title)
            .add("description", &self.description)
            .add("location_name", &self.location_name)
            .add_optional("participants_per_appointment", self.participants_per_appointment)
            .add_optional("max_appointments_per_participant", self.max_appointments_per_participant)
            .add_optional("min_appointments_per_participant", self.min_appointments_per_participant)
            .add(
                "participant_visibility",
                if self.private { "private" } else { "protected" },
            )
            .add("publish", self.publish);
        let mut slots = group.nest("new_appointments");
        for (i, (start, end)) in self.time_slots.iter().enumerate() {
            slots.add_array(&(i + 1).to_string(), vec![start.as_str(), end.as_str()]);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    /// User ids, or `course_<id>` / `group_<id>` context codes.
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub force_new: bool,
    /// One group conversation instead of one conversation per recipient.
    pub group_conversation: bool,
    pub context_code: Option<String>,
}

impl FormEncode for NewConversation {
    fn encode(&self, params: &mut Params) {
        params.add("recipients[]", self.recipients.clone(), true);
        params.add("subject", &self.subject, true);
        params.add("body", &self.body, true);
        params.add("force_new", self.force_new, true);
        params.add("group_conversation", self.group_conversation, true);
        params.add_optional("context_code", self.context_code.as_ref(), true);
    }
}

/// What an external tool's launch links are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolMatch {
    Url(String),
    Domain(String),
}

#[derive(Debug, Clone)]
pub struct NewExternalTool {
    pub name: String,
    pub privacy_level: PrivacyLevel,
    pub consumer_key: String,
    pub shared_secret: String,
    pub matching: ToolMatch,
}

impl FormEncode for NewExternalTool {
    fn encode(&self, params: &mut Params) {
        params.add("name", &self.name, true);
        params.add("privacy_level", self.privacy_level.as_str(), true);
        params.add("consumer_key", &self.consumer_key, true);
        params.add("shared_secret", &self.shared_secret, true);
        match &self.matching {
            ToolMatch::Url(url) => params.add("url", url, true),
            ToolMatch::Domain(domain) => params.add("domain", domain, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub description: String,
    pub points: f64,
}

/// One rubric row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    pub points: f64,
    #[serde(default)]
    pub use_range: Option<bool>,
    /// Empty means the default "Full Points" / "No Points" pair.
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl Criterion {
    /// Write this criterion as `rubric[criteria][<number>][...]`.
    pub fn encode_at(&self, number: usize, params: &mut Params) {
        let mut rubric = params.nest("rubric");
        let mut criteria = rubric.nest("criteria");
        let mut criterion = criteria.nest(&number.to_string());
        criterion
            .add("description", &self.description)
            .add_optional("long_description", self.long_description.as_ref())
            .add("points", self.points)
            .add_optional("criterion_use_range", self.use_range);

        // Canvas generates default ratings itself but gets their points wrong.
        let defaults;
        let ratings = if self.ratings.is_empty() {
            defaults = [
                Rating {
                    description: "Full Points".to_string(),
                    points: self.points,
                },
                Rating {
                    description: "No Points".to_string(),
                    points: 0.0,
                },
            ];
            &defaults[..]
        } else {
            &self.ratings[..]
        };
        let mut rows = criterion.nest("ratings");
        for (j, rating) in ratings.iter().enumerate() {
            rows.nest(&j.to_string())
                .add("description", &rating.description)
                .add("points", rating.points);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// A rubric plus its grading association with one assignment.
#[derive(Debug, Clone)]
pub struct AssignmentRubric<'a> {
    pub assignment_id: String,
    pub rubric: &'a Rubric,
    pub free_form_criterion_comments: bool,
}

impl FormEncode for AssignmentRubric<'_> {
    fn encode(&self, params: &mut Params) {
        params
            .nest("rubric_association")
            .add("association_id", &self.assignment_id)
            .add("association_type", "Assignment")
            .add("use_for_grading", true)
            .add("purpose", "grading");
        params
            .nest("rubric")
            .add("free_form_criterion_comments", self.free_form_criterion_comments)
            .add("title", &self.rubric.title)
            .add("description", &self.rubric.description);
        for (i, criterion) in self.rubric.criteria.iter().enumerate() {
            criterion.encode_at(i, params);
        }
    }
}

/// Which submissions to fetch. Empty lists mean "all".
#[derive(Debug, Clone, Default)]
pub struct SubmissionQuery {
    pub assignment_ids: Vec<String>,
    pub student_ids: Vec<String>,
    /// Group multi-student results by student.
    pub grouped: bool,
}

impl SubmissionQuery {
    pub fn assignment(id: impl fmt::Display) -> Self {
        Self {
            assignment_ids: vec![id.to_string()],
            ..Self::default()
        }
    }

    pub fn student(mut self, id: impl fmt::Display) -> Self {
        let id = id.to_string();
        if !self.student_ids.contains(&id) {
            self.student_ids.push(id);
        }
        self
    }

    pub fn and_assignment(mut self, id: impl fmt::Display) -> Self {
        let id = id.to_string();
        if !self.assignment_ids.contains(&id) {
            self.assignment_ids.push(id);
        }
        self
    }

    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }
}
