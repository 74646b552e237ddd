//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use wallet_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, Location, NewProject, NewTemplate, Page,
    ProjectUpdate, ResourceId, Result, TemplateUpdate, WalletClient,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> WalletClient {
    WalletClient::new(BASE_URL)
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

/// Numbers address by server id, strings by external id.
fn resource(value: &Value) -> ResourceId {
    match value {
        Value::Number(n) => ResourceId::from(n.as_i64().unwrap()),
        Value::String(s) => ResourceId::from(s.as_str()),
        other => panic!("not a resource id: {other}"),
    }
}

fn page(value: &Value) -> Page {
    Page::new(
        value["page_size"].as_u64().unwrap() as u32,
        value["page"].as_u64().unwrap() as u32,
    )
}

fn object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn input<T: DeserializeOwned>(value: &Value) -> T {
    serde_json::from_value(value.clone()).unwrap()
}

fn check_request(name: &str, request: &HttpRequest, expected: &Value) {
    assert_eq!(
        request.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    assert_eq!(
        request.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(request.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(request.body.is_none(), "{name}: unexpected body"),
    }
}

fn check_error(name: &str, err: ApiError, expected: &str) {
    match expected.split_once(':') {
        Some(("HttpError", status)) => {
            let status: u16 = status.parse().unwrap();
            assert!(
                matches!(err, ApiError::HttpError { status: s, .. } if s == status),
                "{name}: expected HTTP {status}, got {err:?}"
            );
        }
        _ => {
            let matched = match expected {
                "NotFound" => matches!(err, ApiError::NotFound),
                "InvalidParameter" => matches!(err, ApiError::InvalidParameter(_)),
                "DeserializationError" => matches!(err, ApiError::DeserializationError(_)),
                other => panic!("{name}: unknown expected error: {other}"),
            };
            assert!(matched, "{name}: expected {expected}, got {err:?}");
        }
    }
}

/// Run one vector: build, compare the request, then parse the simulated
/// response and compare the outcome.
fn run_case<T>(
    name: &str,
    case: &Value,
    request: Result<HttpRequest>,
    parse: impl FnOnce(HttpResponse) -> Result<T>,
) where
    T: DeserializeOwned + PartialEq + Debug,
{
    if let Some(expected) = case.get("expected_build_error") {
        check_error(name, request.unwrap_err(), expected.as_str().unwrap());
        return;
    }
    let request = request.unwrap();
    check_request(name, &request, &case["expected_request"]);

    let sim = &case["simulated_response"];
    let response = HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    );
    let result = parse(response);
    match case.get("expected_error") {
        Some(expected) => check_error(name, result.unwrap_err(), expected.as_str().unwrap()),
        None => {
            let expected: T = input(&case["expected_result"]);
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

#[test]
fn pass_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/pass.json")) {
        let name = case["name"].as_str().unwrap();
        let args = &case["input"];
        match case["op"].as_str().unwrap() {
            "list_passes" => run_case(name, &case, c.build_list_passes(page(&args["page"])), |r| {
                c.parse_list_passes(r)
            }),
            "get_pass" => run_case(name, &case, c.build_get_pass(resource(&args["pass"])), |r| {
                c.parse_get_pass(r)
            }),
            "create_pass" => run_case(
                name,
                &case,
                c.build_create_pass(
                    resource(&args["template"]),
                    args["external_id"].as_str(),
                    &object(&args["fields"]),
                ),
                |r| c.parse_create_pass(r),
            ),
            "delete_pass" => run_case(name, &case, c.build_delete_pass(resource(&args["pass"])), |r| {
                c.parse_delete_pass(r)
            }),
            "get_pass_tags" => run_case(
                name,
                &case,
                c.build_get_pass_tags(resource(&args["pass"])),
                |r| c.parse_get_pass_tags(r),
            ),
            "add_pass_tags" => {
                let tags: Vec<String> = input(&args["tags"]);
                run_case(
                    name,
                    &case,
                    c.build_add_pass_tags(resource(&args["pass"]), &tags),
                    |r| c.parse_add_pass_tags(r),
                )
            }
            "add_pass_locations" => {
                let locations: Vec<Location> = input(&args["locations"]);
                run_case(
                    name,
                    &case,
                    c.build_add_pass_locations(resource(&args["pass"]), &locations),
                    |r| c.parse_add_pass_locations(r),
                )
            }
            "delete_pass_location" => run_case(
                name,
                &case,
                c.build_delete_pass_location(
                    resource(&args["pass"]),
                    args["location_id"].as_i64().unwrap(),
                ),
                |r| c.parse_delete_pass_location(r),
            ),
            "download_pass" => run_case(
                name,
                &case,
                c.build_download_pass(resource(&args["pass"])),
                |r| c.parse_download_pass(r),
            ),
            "view_pass_json" => run_case(
                name,
                &case,
                c.build_view_pass_json(resource(&args["pass"])),
                |r| c.parse_view_pass_json(r),
            ),
            "push_pass" => run_case(name, &case, c.build_push_pass(resource(&args["pass"])), |r| {
                c.parse_push_pass(r)
            }),
            other => panic!("{name}: unknown op {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[test]
fn project_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/project.json")) {
        let name = case["name"].as_str().unwrap();
        let args = &case["input"];
        match case["op"].as_str().unwrap() {
            "list_projects" => run_case(
                name,
                &case,
                c.build_list_projects(page(&args["page"])),
                |r| c.parse_list_projects(r),
            ),
            "get_project" => run_case(
                name,
                &case,
                c.build_get_project(resource(&args["project"])),
                |r| c.parse_get_project(r),
            ),
            "create_project" => {
                let project: NewProject = input(&args["project"]);
                run_case(name, &case, c.build_create_project(&project), |r| {
                    c.parse_create_project(r)
                })
            }
            "update_project" => {
                let update: ProjectUpdate = input(&args["update"]);
                run_case(
                    name,
                    &case,
                    c.build_update_project(resource(&args["project"]), &update),
                    |r| c.parse_update_project(r),
                )
            }
            "delete_project" => run_case(
                name,
                &case,
                c.build_delete_project(resource(&args["project"])),
                |r| c.parse_delete_project(r),
            ),
            other => panic!("{name}: unknown op {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[test]
fn template_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/template.json")) {
        let name = case["name"].as_str().unwrap();
        let args = &case["input"];
        match case["op"].as_str().unwrap() {
            "list_template_headers" => {
                let paging = (!args["page"].is_null()).then(|| page(&args["page"]));
                run_case(name, &case, c.build_list_template_headers(paging), |r| {
                    c.parse_list_template_headers(r)
                })
            }
            "get_template" => run_case(
                name,
                &case,
                c.build_get_template(resource(&args["template"])),
                |r| c.parse_get_template(r),
            ),
            "create_template" => {
                let template: NewTemplate = input(&args["template"]);
                run_case(name, &case, c.build_create_template(&template), |r| {
                    c.parse_create_template(r)
                })
            }
            "update_template" => {
                let update: TemplateUpdate = input(&args["update"]);
                run_case(
                    name,
                    &case,
                    c.build_update_template(resource(&args["template"]), &update),
                    |r| c.parse_update_template(r),
                )
            }
            "duplicate_template" => run_case(
                name,
                &case,
                c.build_duplicate_template(resource(&args["template"])),
                |r| c.parse_duplicate_template(r),
            ),
            "delete_template" => run_case(
                name,
                &case,
                c.build_delete_template(resource(&args["template"])),
                |r| c.parse_delete_template(r),
            ),
            "add_template_locations" => {
                let locations: Vec<Location> = input(&args["locations"]);
                run_case(
                    name,
                    &case,
                    c.build_add_template_locations(resource(&args["template"]), &locations),
                    |r| c.parse_add_template_locations(r),
                )
            }
            "delete_template_location" => run_case(
                name,
                &case,
                c.build_delete_template_location(
                    resource(&args["template"]),
                    args["location_id"].as_i64().unwrap(),
                ),
                |r| c.parse_delete_template_location(r),
            ),
            other => panic!("{name}: unknown op {other}"),
        }
    }
}
