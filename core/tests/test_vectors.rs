//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Request vectors give positional values per version and method and the exact
//! request expected on the wire. Response vectors give a raw body, the payload
//! type to decode it as, and the expected envelope, summary and (optionally)
//! the decoded payload serialized back to JSON.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use smugmug_core::payloads::{
    AlbumList, AlbumTemplateList, CategoryCreated, LoginResult, Tree, VideoTransferStats,
};
use smugmug_core::{
    ApiError, ApiVersion, ClientConfig, Core, FormatError, HttpMethod, Method, Payload, Response, UreqTransport,
};

fn core(version: &str) -> Core {
    let version = match version {
        "1.2.0" => ApiVersion::V1_2_0,
        "1.2.1" => ApiVersion::V1_2_1,
        other => panic!("unknown version: {other}"),
    };
    Core::new(version, &ClientConfig::default(), Arc::new(UreqTransport::default()))
}

fn method(name: &str) -> Method {
    Method::ALL
        .into_iter()
        .find(|m| format!("{m:?}") == name)
        .unwrap_or_else(|| panic!("unknown method: {name}"))
}

fn parse_http_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown HTTP method: {other}"),
    }
}

fn values(case: &Value) -> Vec<Option<String>> {
    case["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let core = core(case["version"].as_str().unwrap());
        let method = method(case["method"].as_str().unwrap());
        let invoker = core.invoker(method);
        let values = values(case);

        let result = match case.get("file_name").and_then(Value::as_str) {
            Some(file_name) => {
                let body = case["upload"].as_str().unwrap().as_bytes().to_vec();
                invoker.build_binary_request(&core.binary_upload_url(file_name), &values, body)
            }
            None => invoker.build_request(&core.server_url(method).unwrap(), &values),
        };

        if let Some(expected) = case.get("expected_error") {
            match result.unwrap_err() {
                ApiError::ArgumentCount {
                    method,
                    expected: want,
                    actual,
                } => {
                    assert_eq!(expected["kind"], "ArgumentCount", "{name}: kind");
                    assert_eq!(method, expected["method"].as_str().unwrap(), "{name}: method");
                    assert_eq!(want as u64, expected["expected"].as_u64().unwrap(), "{name}: expected");
                    assert_eq!(actual as u64, expected["actual"].as_u64().unwrap(), "{name}: actual");
                }
                other => panic!("{name}: expected argument-count error, got {other}"),
            }
            continue;
        }

        let req = result.unwrap();
        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_http_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(
            req.header("content-type"),
            expected["content_type"].as_str(),
            "{name}: content type"
        );
        assert!(req.header("User-Agent").is_some(), "{name}: user agent");
        let body = String::from_utf8(req.body.clone().unwrap()).unwrap();
        assert_eq!(body, expected["body"].as_str().unwrap(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Parse `body` as `P` and project the result onto the vector's fields.
fn parse_as<P: Payload + Serialize>(body: &str) -> Result<Value, ApiError> {
    let response = Response::<P>::parse(body)?;
    Ok(serde_json::json!({
        "is_error": response.is_error(),
        "code": response.error_code(),
        "message": response.error_message(),
        "summary": response.summary(),
        "payload": serde_json::to_value(response.payload()).unwrap(),
    }))
}

fn parse_case(payload: &str, body: &str) -> Result<Value, ApiError> {
    match payload {
        "AlbumList" => parse_as::<AlbumList>(body),
        "AlbumTemplateList" => parse_as::<AlbumTemplateList>(body),
        "CategoryCreated" => parse_as::<CategoryCreated>(body),
        "LoginResult" => parse_as::<LoginResult>(body),
        "Tree" => parse_as::<Tree>(body),
        "VideoTransferStats" => parse_as::<VideoTransferStats>(body),
        "None" => parse_as::<()>(body),
        other => panic!("unknown payload type: {other}"),
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = parse_case(case["payload"].as_str().unwrap(), case["body"].as_str().unwrap());

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            let ApiError::ResponseFormat(format) = &err else {
                panic!("{name}: expected response format error, got {err}");
            };
            let kind = match format {
                FormatError::Json(_) => "Json",
                FormatError::NotAnObject => "NotAnObject",
                FormatError::MissingStatus => "MissingStatus",
                FormatError::UnknownStatus(_) => "UnknownStatus",
            };
            assert_eq!(kind, expected_error.as_str().unwrap(), "{name}: format error kind");
            continue;
        }

        let parsed = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected"];
        for field in ["is_error", "code", "message", "summary"] {
            assert_eq!(parsed[field], expected[field], "{name}: {field}");
        }
        if let Some(payload) = case.get("expected_payload") {
            assert_eq!(&parsed["payload"], payload, "{name}: payload");
        }
    }
}

#[test]
fn response_parsing_is_idempotent() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        if case.get("expected_error").is_some() {
            continue;
        }
        let payload = case["payload"].as_str().unwrap();
        let body = case["body"].as_str().unwrap();
        let first = parse_case(payload, body).unwrap();
        let second = parse_case(payload, body).unwrap();
        assert_eq!(first, second, "{}", case["name"]);
    }
}
