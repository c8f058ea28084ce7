//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file lists inputs, the expected request (method, path, form
//! fields in order) and optionally a simulated response with the expected
//! result or error. Parsed JSON is compared, not raw strings.

mod common;

use canvas_core::types::{Rubric, SubmissionQuery};
use canvas_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use common::{client, form, ok, BASE_URL};
use serde_json::{json, Value};

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn expected_pairs(list: &Value) -> Vec<(String, String)> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (
                arr[0].as_str().unwrap().to_string(),
                arr[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    if sim.is_null() {
        return ok(json!({}));
    }
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
        url: String::new(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(
        req.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    if let Some(path) = expected["path"].as_str() {
        assert_eq!(req.url, format!("{BASE_URL}{path}"), "{name}: path");
    }
    if let Some(url) = expected["url"].as_str() {
        assert_eq!(req.url, format!("{BASE_URL}{url}"), "{name}: url");
    }
    if !expected["headers"].is_null() {
        assert_eq!(req.headers, expected_pairs(&expected["headers"]), "{name}: headers");
    }
    if !expected["form"].is_null() {
        assert_eq!(form(req), expected_pairs(&expected["form"]), "{name}: form");
    }
}

fn check_outcome(name: &str, result: Result<Value, ApiError>, case: &Value) {
    let expected_error = &case["expected_error"];
    if expected_error.is_null() {
        let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
        if !case["expected_result"].is_null() {
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
        return;
    }
    let err = result.expect_err(name);
    if let Some(status) = expected_error["status"].as_u64() {
        assert_eq!(err.status(), Some(status as u16), "{name}: status");
    }
    if expected_error["kind"] == "InvalidArgument" {
        assert!(matches!(err, ApiError::InvalidArgument(_)), "{name}: {err:?}");
    }
}

fn string(v: &Value) -> &str {
    v.as_str().unwrap()
}

fn strings(v: &Value) -> Vec<String> {
    v.as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn calendar_event_vectors() {
    for case in load(include_str!("../../test-vectors/calendar_event.json")) {
        let name = string(&case["name"]);
        let input = &case["input"];
        let c = client(vec![simulated(&case)]);

        let result = c.create_calendar_event(
            string(&input["course"]),
            string(&input["title"]),
            string(&input["description"]),
            string(&input["start_at"]),
            string(&input["end_at"]),
        );
        check_request(name, &c.transport().last(), &case["expected_request"]);
        check_outcome(name, result, &case);
    }
}

#[test]
fn grading_standard_vectors() {
    for case in load(include_str!("../../test-vectors/grading_standard.json")) {
        let name = string(&case["name"]);
        let input = &case["input"];
        let c = client(vec![simulated(&case)]);
        let cutoffs: Vec<f64> = serde_json::from_value(input["cutoffs"].clone()).unwrap();

        let result = c.create_grading_standard(
            string(&input["course"]),
            string(&input["title"]),
            &strings(&input["grades"]),
            &cutoffs,
        );
        if case["expected_request"].is_null() {
            assert!(c.transport().requests.borrow().is_empty(), "{name}: no request");
        } else {
            check_request(name, &c.transport().last(), &case["expected_request"]);
        }
        check_outcome(name, result, &case);
    }
}

#[test]
fn rubric_vectors() {
    for case in load(include_str!("../../test-vectors/rubric.json")) {
        let name = string(&case["name"]);
        let input = &case["input"];
        let rubric: Rubric = serde_json::from_value(input["rubric"].clone()).unwrap();
        let c = client(vec![simulated(&case)]);

        let result = c.create_rubric_for_assignment(
            string(&input["course"]),
            string(&input["assignment"]),
            &rubric,
            input["comments"].as_bool().unwrap(),
        );
        check_request(name, &c.transport().last(), &case["expected_request"]);
        check_outcome(name, result, &case);
    }
}

#[test]
fn submission_vectors() {
    for case in load(include_str!("../../test-vectors/submissions.json")) {
        let name = string(&case["name"]);
        let input = &case["input"];
        let query = SubmissionQuery {
            assignment_ids: strings(&input["assignments"]),
            student_ids: strings(&input["students"]),
            grouped: input["grouped"].as_bool().unwrap(),
        };
        let c = client(vec![ok(json!([]))]);

        c.get_submissions(string(&input["course"]), &query)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        let requests = c.transport().requests.borrow();
        assert_eq!(requests.len(), 1, "{name}: one request");
        check_request(name, &requests[0], &case["expected_request"]);
    }
}
