//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. Endpoint code builds `HttpRequest`
//! values and parses `HttpResponse` values; only a `Transport` implementation
//! touches the network. Query strings are encoded into `url` at build time,
//! and bodies are either url-encoded form pairs or a multipart form kept as
//! fields plus one file. The transport owns the multipart wire encoding.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL, query string included.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => FORM_CONTENT_TYPE,
            RequestBody::Multipart(_) => "multipart/form-data",
        }
    }

    /// Form pairs, if this is a url-encoded body.
    pub fn form_pairs(&self) -> Option<&[(String, String)]> {
        match self {
            RequestBody::Form(pairs) => Some(pairs),
            RequestBody::Multipart(_) => None,
        }
    }
}

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Url-encode form pairs, keeping their order.
pub fn encode_form(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// A `multipart/form-data` body: text fields followed by a single file part.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MultipartForm {
    pub fn new(fields: Vec<(String, String)>, file: FilePart) -> Self {
        Self { fields, file }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// URL the response was obtained from.
    pub url: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Target of the `rel="next"` entry, searching every `Link` header.
    pub fn next_link(&self) -> Option<String> {
        self.headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("link"))
            .find_map(|(_, value)| find_link(value, "next"))
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Find the target of the link with relation `rel` in an RFC 8288 `Link`
/// header value. Entries look like `<url>; rel="next"`; `rel` may hold
/// several space-separated relation types.
pub fn find_link(header: &str, rel: &str) -> Option<String> {
    let mut rest = header;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let target = &after[..end];
        let params_part = &after[end + 1..];
        let params_end = params_part.find('<').unwrap_or(params_part.len());
        let params = &params_part[..params_end];

        let matches = params.split(';').any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_end_matches(',')
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case(rel))
        });
        if matches {
            return Some(target.to_string());
        }
        rest = &params_part[params_end..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_link(link: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("Link".to_string(), link.to_string())],
            body: "[]".to_string(),
            url: "http://localhost/api/v1/courses".to_string(),
        }
    }

    #[test]
    fn next_link_is_found_among_other_relations() {
        let resp = response_with_link(
            "<http://localhost/api/v1/courses?page=1>; rel=\"current\",\
             <http://localhost/api/v1/courses?page=2>; rel=\"next\",\
             <http://localhost/api/v1/courses?page=5>; rel=\"last\"",
        );
        assert_eq!(
            resp.next_link().as_deref(),
            Some("http://localhost/api/v1/courses?page=2")
        );
    }

    #[test]
    fn next_link_absent_on_last_page() {
        let resp = response_with_link(
            "<http://localhost/api/v1/courses?page=1>; rel=\"first\", \
             <http://localhost/api/v1/courses?page=5>; rel=\"last\"",
        );
        assert!(resp.next_link().is_none());
    }

    #[test]
    fn next_link_handles_unquoted_rel_and_commas_in_url() {
        assert_eq!(
            find_link("<http://h/a?ids=1,2&page=3>; rel=next", "next").as_deref(),
            Some("http://h/a?ids=1,2&page=3")
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let resp = response_with_link("<http://h/x>; rel=\"next\"");
        assert!(resp.header("LINK").is_some());
        assert!(resp.header("content-type").is_none());
    }

    #[test]
    fn next_link_is_found_in_a_later_link_header() {
        let resp = HttpResponse {
            status: 200,
            headers: vec![
                ("link".to_string(), "<http://h/x?page=1>; rel=\"current\"".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
                ("link".to_string(), "<http://h/x?page=2>; rel=\"next\"".to_string()),
            ],
            body: "[]".to_string(),
            url: "http://h/x?page=1".to_string(),
        };
        assert_eq!(resp.next_link().as_deref(), Some("http://h/x?page=2"));
    }

    #[test]
    fn form_body_is_url_encoded_in_order() {
        let pairs = vec![
            ("assignment[name]".to_string(), "Homework 1".to_string()),
            ("include[]".to_string(), "a&b".to_string()),
        ];
        assert_eq!(
            encode_form(&pairs),
            "assignment%5Bname%5D=Homework+1&include%5B%5D=a%26b"
        );
        let body = RequestBody::Form(pairs);
        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
        assert!(body.form_pairs().is_some());
    }

    #[test]
    fn multipart_body_keeps_fields_and_file_as_data() {
        let form = MultipartForm::new(
            vec![("key".to_string(), "signed".to_string())],
            FilePart {
                field: "file".to_string(),
                file_name: "notes.txt".to_string(),
                content_type: "application/octet-stream".to_string(),
                bytes: b"hello".to_vec(),
            },
        );
        assert_eq!(form.fields, vec![("key".to_string(), "signed".to_string())]);
        assert_eq!(form.file.file_name, "notes.txt");
        assert_eq!(form.file.bytes, b"hello");
        let body = RequestBody::Multipart(form);
        assert_eq!(body.content_type(), "multipart/form-data");
        assert!(body.form_pairs().is_none());
    }
}
