//! Markdown to HTML for page bodies, syllabi, announcements and
//! assignment descriptions.

use std::io::Write;
use std::process::{Command, Stdio};

use pulldown_cmark::{html, Options, Parser};
use tracing::warn;

/// Convert markdown to HTML.
///
/// With `use_pandoc`, the external `pandoc` binary renders the body with
/// MathML output; if it is missing or fails, a warning is logged and the
/// built-in renderer is used instead.
pub fn convert_markdown(body: &str, use_pandoc: bool) -> String {
    if use_pandoc {
        match pandoc(body) {
            Ok(html) => return html,
            Err(e) => warn!(error = %e, "pandoc unavailable, using built-in markdown renderer"),
        }
    }
    render(body)
}

/// Built-in CommonMark renderer with tables, footnotes and strikethrough.
pub fn render(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn pandoc(body: &str) -> std::io::Result<String> {
    let mut child = Command::new("pandoc")
        .args(["--from", "markdown", "--to", "html", "--mathml"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(body.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }
    String::from_utf8(output.stdout).map_err(std::io::Error::other)
}
