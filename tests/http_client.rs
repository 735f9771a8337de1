//! End-to-end tests of the HTTP client against an in-process fake service.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use licensing::{
    FETCH_FAILED_MESSAGE, FetchError, Field, Form, HttpClient, Report, ReportService, Submission,
};
use serde_json::{Value, json};

type Recorded = Arc<Mutex<Vec<Value>>>;

fn structured_response(input: &Value) -> Value {
    let requirements: Vec<Value> = (1..=3)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("דרישה {id}"),
                "importance": "חשוב",
                "category": "תברואה",
                "plain_explanation": "יש להפריד בין אזור הכנת בשר לאזור ירקות",
                "estimated_cost": {"min": 2000, "max": 5000},
                "estimated_time_days": 7,
            })
        })
        .collect();

    json!({
        "user_input": input,
        "total_regulations": 42,
        "relevant_regulations": 3,
        "report": {
            "summary": "מסעדה בינונית עם מטבח גז",
            "requirements": requirements,
        },
        "raw_regulations": [
            {"id": 1, "category": "health", "hebrew_text": "חובת כיור לרחיצת ידיים", "source_page": 12, "priority": "critical"}
        ],
    })
}

async fn record_report(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    let response = structured_response(&body);
    recorded.lock().unwrap().push(body);
    Json(response)
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    format!("http://{addr}")
}

async fn recording_service() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/report", post(record_report))
        .with_state(recorded.clone());
    (serve(app).await, recorded)
}

fn filled_form() -> Form {
    let mut form = Form::new();
    form.set_field(Field::Size, "150");
    form.set_field(Field::Seats, "40");
    form.set_field(Field::UsesGas, true);
    form
}

#[tokio::test]
async fn form_submission_posts_the_input_once() {
    let (base_url, recorded) = recording_service().await;
    let client = HttpClient::new(&base_url).unwrap();
    let mut form = filled_form();

    let state = form.submit(&client).await.unwrap();

    let Submission::Success(response) = state else {
        panic!("expected a report, got {state:?}");
    };
    assert_eq!(response.relevant_regulations, 3);
    assert_eq!(response.raw_regulations[0].source_page, "12");
    let Report::Structured(report) = &response.report else {
        panic!("expected a structured report");
    };
    assert_eq!(report.requirements.len(), 3);
    assert!(!form.state().is_loading());
    assert_eq!(form.state().error(), None);

    let recorded = recorded.lock().unwrap();
    assert_eq!(
        *recorded,
        vec![json!({"size": 150.0, "seats": 40.0, "usesGas": true, "servesMeat": false})]
    );
}

#[tokio::test]
async fn base_path_prefixes_every_endpoint() {
    let recorded = Recorded::default();
    let inner = Router::new()
        .route("/api/report", post(record_report))
        .with_state(recorded.clone());
    let base_url = serve(Router::new().nest("/licensing", inner)).await;
    let client = HttpClient::new(&format!("{base_url}/licensing")).unwrap();

    client.report(filled_form().input()).await.unwrap();

    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unparseable_numbers_are_sent_as_null() {
    let (base_url, recorded) = recording_service().await;
    let client = HttpClient::new(&base_url).unwrap();
    let mut form = Form::new();
    form.set_field(Field::Size, "large");

    // The fake echoes the input back, so the response decodes NaN again.
    form.submit(&client).await.unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded[0]["size"], Value::Null);
    assert_eq!(recorded[0]["seats"], json!(0.0));
}

#[tokio::test]
async fn text_reports_are_kept_as_text() {
    let app = Router::new().route(
        "/api/report",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "user_input": body,
                "total_regulations": 42,
                "relevant_regulations": 0,
                "report": "## דוח רישוי\n1. רישיון עסק",
            }))
        }),
    );
    let client = HttpClient::new(&serve(app).await).unwrap();

    let response = client.fetch_report(filled_form().input()).await.unwrap();

    assert_eq!(
        response.report,
        Report::Text("## דוח רישוי\n1. רישיון עסק".to_string())
    );
    assert!(response.raw_regulations.is_empty());
}

#[tokio::test]
async fn server_error_is_a_status_failure() {
    let app = Router::new().route(
        "/api/report",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let client = HttpClient::new(&serve(app).await).unwrap();

    let error = client.report(filled_form().input()).await.unwrap_err();

    assert!(matches!(
        error,
        FetchError::Status { status, .. } if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_failure() {
    let app = Router::new().route(
        "/api/report",
        post(|| async { Json(json!({"report": "missing everything else"})) }),
    );
    let client = HttpClient::new(&serve(app).await).unwrap();

    let error = client.report(filled_form().input()).await.unwrap_err();

    assert!(matches!(error, FetchError::Decode(_)));
}

#[tokio::test]
async fn failed_submission_shows_the_fixed_message() {
    let app = Router::new().route(
        "/api/report",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let client = HttpClient::new(&serve(app).await).unwrap();
    let mut form = filled_form();

    let state = form.submit(&client).await.unwrap();

    assert_eq!(state, &Submission::Failed(FETCH_FAILED_MESSAGE.to_string()));
    assert!(form.state().report().is_none());
    assert!(form.state().can_submit());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let client = HttpClient::new(&format!("http://{addr}")).unwrap();

    let error = client.report(filled_form().input()).await.unwrap_err();

    assert!(matches!(error, FetchError::Transport { .. }));
}

#[tokio::test]
async fn health_and_catalog_are_decoded() {
    let app = Router::new()
        .route(
            "/api/health",
            get(|| async { Json(json!({"status": "alive", "regulations_loaded": 42})) }),
        )
        .route(
            "/api/regulations",
            get(|| async {
                Json(json!({
                    "regulations": [
                        {"id": 1, "category": "fire_safety", "hebrew_text": "מטף כיבוי", "source_page": "10-48", "priority": "critical"},
                        {"id": 2, "category": "health", "hebrew_text": "כיור", "source_page": "manual", "priority": "high"}
                    ],
                    "source_file": "18-07-2022_4.2A.pdf",
                }))
            }),
        );
    let client = HttpClient::new(&serve(app).await).unwrap();

    let health = client.health().await.unwrap();
    let catalog = client.regulations().await.unwrap();

    assert!(health.is_alive());
    assert_eq!(health.regulations_loaded, 42);
    assert_eq!(catalog.regulations.len(), 2);
    assert!(catalog.regulations[0].is_critical());
    assert_eq!(catalog.source_file.as_deref(), Some("18-07-2022_4.2A.pdf"));
    assert_eq!(catalog.extraction_date, None);
}
