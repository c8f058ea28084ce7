//! Endpoint wrappers, grouped by Canvas API area.
//!
//! Each file adds an `impl CanvasClient<T>` block. Single resources come
//! back as `serde_json::Value`; list endpoints go through the page
//! aggregator and return every item.

mod assignments;
mod calendar;
mod content;
mod courses;
mod files;
mod modules;
mod rubrics;
mod submissions;
mod users;
