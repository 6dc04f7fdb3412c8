//! Verify request building and error classification against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Request bodies are compared as parsed JSON (not raw strings) to avoid
//! false negatives from field ordering.

use spycat_core::{
    AssignMission, ApiErrorKind, ClientConfig, CreateMission, CreateSpyCat, HttpMethod,
    HttpRequest, HttpResponse, SpyCatClient, UpdateSpyCat, UpdateTarget,
};

const BASE_URL: &str = "http://localhost:8000";

fn client() -> SpyCatClient {
    SpyCatClient::new(ClientConfig::new(BASE_URL)).unwrap()
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

fn build(c: &SpyCatClient, case: &serde_json::Value) -> HttpRequest {
    let id = case["id"].as_i64().unwrap_or_default();
    let input = case["input"].clone();
    match case["operation"].as_str().unwrap() {
        "list_cats" => c.build_list_cats(),
        "get_cat" => c.build_get_cat(id),
        "create_cat" => {
            let input: CreateSpyCat = serde_json::from_value(input).unwrap();
            c.build_create_cat(&input).unwrap()
        }
        "update_cat" => {
            let input: UpdateSpyCat = serde_json::from_value(input).unwrap();
            c.build_update_cat(id, &input).unwrap()
        }
        "delete_cat" => c.build_delete_cat(id),
        "list_missions" => c.build_list_missions(),
        "get_mission" => c.build_get_mission(id),
        "create_mission" => {
            let input: CreateMission = serde_json::from_value(input).unwrap();
            c.build_create_mission(&input).unwrap()
        }
        "assign_mission" => {
            let input: AssignMission = serde_json::from_value(input).unwrap();
            c.build_assign_mission(id, &input).unwrap()
        }
        "delete_mission" => c.build_delete_mission(id),
        "update_target" => {
            let input: UpdateTarget = serde_json::from_value(input).unwrap();
            c.build_update_target(id, &input).unwrap()
        }
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["operation"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&c, case);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(req.url, format!("{BASE_URL}{}", req.path), "{name}: url");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())],
            "{name}: headers"
        );

        match req.body.as_deref() {
            Some(body) => {
                let body: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(body, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Status classification
// ---------------------------------------------------------------------------

#[test]
fn status_test_vectors() {
    let raw = include_str!("../../test-vectors/status.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let status = sim["status"].as_u64().unwrap() as u16;
        let response = HttpResponse {
            status,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };

        let err = c.parse_empty(response).unwrap_err();
        let expected = &case["expected"];
        assert_eq!(err.kind(), ApiErrorKind::HttpStatus, "{name}: kind");
        assert_eq!(err.status(), Some(status), "{name}: status");
        assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(err.details(), expected["details"].as_str(), "{name}: details");
    }
}
