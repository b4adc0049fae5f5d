// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests of the HTTP surface over an in-memory database.

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	Router,
};
use escalate_common_http::RetryPolicy;
use escalate_server::{create_router, AppState, RateLimiter};
use escalate_server_db::testing::{create_test_pool, new_record};
use escalate_server_db::{ChangeNotifier, RecordRepository};
use escalate_server_llm_gemini::testing::StaticGenerator;
use escalate_server_llm_gemini::FilterTranslator;
use escalate_server_smtp::testing::ScriptedTransport;
use escalate_server_smtp::{Mailer, SmtpError};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

const BOUNDARY: &str = "escalate-test-boundary";

const SHEET_HEADER: &str = "Department,File/Activity,Current Level,Pending Since (Days),TAT (Days),Next Level,Escalation Authority Email,Remarks,Mail Sent Status";

const GENERATED: &str = "```json\n{\"filters\":[{\"id\":\"finance\",\"logic\":\"AND\",\"conditions\":[{\"column\":\"department\",\"operator\":\"equals\",\"value\":\"Finance\"}]}]}\n```";

struct Harness {
	state: AppState,
	transport: Arc<ScriptedTransport>,
	pool: SqlitePool,
}

struct Options {
	transport: ScriptedTransport,
	mail_configured: bool,
	reply: &'static str,
	per_minute: u32,
	max_upload_size_mb: u64,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			transport: ScriptedTransport::new(),
			mail_configured: true,
			reply: GENERATED,
			per_minute: 100,
			max_upload_size_mb: 10,
		}
	}
}

impl Harness {
	async fn new() -> Self {
		Self::with(Options::default()).await
	}

	async fn with(options: Options) -> Self {
		let transport = Arc::new(options.transport);
		let mailer = if options.mail_configured {
			Mailer::new(transport.clone(), "example.com").with_policy(RetryPolicy::immediate(3))
		} else {
			Mailer::unconfigured()
		};
		let pool = create_test_pool().await;
		let state = AppState::new(
			pool.clone(),
			ChangeNotifier::default(),
			mailer,
			FilterTranslator::new(Arc::new(StaticGenerator::text(options.reply))),
			RateLimiter::per_minute(options.per_minute),
			options.max_upload_size_mb,
		);
		Self {
			state,
			transport,
			pool,
		}
	}

	fn app(&self) -> Router {
		create_router(self.state.clone())
	}

	/// Stores a Finance row that is overdue and an HR row that is not.
	async fn seed(&self) -> (i64, i64) {
		self
			.state
			.records
			.replace_upload(
				"seed.csv",
				&[new_record("Finance", 10, 5), new_record("HR", 2, 5)],
			)
			.await
			.unwrap();
		let records = self.state.records.get_all_records().await.unwrap();
		let id_of = |department: &str| {
			records
				.iter()
				.find(|r| r.department == department)
				.map(|r| r.id)
				.unwrap()
		};
		(id_of("Finance"), id_of("HR"))
	}

	async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
		let response = self.app().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let body = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};
		(status, body)
	}

	async fn get(&self, uri: &str) -> (StatusCode, Value) {
		self
			.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
			.await
	}

	async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
		self
			.send(
				Request::builder()
					.method(method)
					.uri(uri)
					.header(header::CONTENT_TYPE, "application/json")
					.body(Body::from(body.to_string()))
					.unwrap(),
			)
			.await
	}

	async fn delete(&self, uri: &str) -> (StatusCode, Value) {
		self
			.send(
				Request::builder()
					.method(Method::DELETE)
					.uri(uri)
					.body(Body::empty())
					.unwrap(),
			)
			.await
	}
}

fn multipart(uri: &str, content_type: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
	let mut body = format!(
		"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
	)
	.into_bytes();
	body.extend_from_slice(bytes);
	body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header(
			header::CONTENT_TYPE,
			format!("multipart/form-data; boundary={BOUNDARY}"),
		)
		.body(Body::from(body))
		.unwrap()
}

fn sheet(rows: &[&str]) -> Vec<u8> {
	let mut out = String::from(SHEET_HEADER);
	for row in rows {
		out.push('\n');
		out.push_str(row);
	}
	out.into_bytes()
}

fn overdue_filters() -> Value {
	json!({
		"filters": [{
			"id": "overdue",
			"logic": "AND",
			"conditions": [{
				"column": "pendingSince",
				"operator": "column_greater_equal",
				"compareColumn": "tatDays"
			}]
		}]
	})
}

fn mail_request(record_id: i64, to: &str) -> Value {
	json!({
		"recordId": record_id,
		"to": to,
		"subject": "Escalation: Finance file",
		"body": "Please review."
	})
}

#[tokio::test]
async fn health_reports_every_component() {
	let harness = Harness::new().await;
	let (status, body) = harness.get("/health").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["database"]["status"], "healthy");
	assert_eq!(body["smtp"]["status"], "healthy");
	assert_eq!(body["translator"]["status"], "healthy");
	assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_is_degraded_without_mail() {
	let harness = Harness::with(Options {
		mail_configured: false,
		..Options::default()
	})
	.await;
	let (status, body) = harness.get("/health").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "degraded");
	assert_eq!(body["smtp"]["message"], "not configured");
}

#[tokio::test]
async fn openapi_document_is_served() {
	let harness = Harness::new().await;
	let (status, body) = harness.get("/api/openapi.json").await;

	assert_eq!(status, StatusCode::OK);
	assert!(body["paths"]["/api/send-mail"].is_object());
}

#[tokio::test]
async fn events_stream_is_sse() {
	let harness = Harness::new().await;
	let response = harness
		.app()
		.oneshot(Request::builder().uri("/api/events").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
	assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn filters_start_unset_and_show_every_record() {
	let harness = Harness::new().await;
	harness.seed().await;

	let (status, body) = harness.get("/api/filters").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["filters"].is_null());
	assert!(body["updatedAt"].is_null());

	let (status, body) = harness.get("/api/records").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["totalCount"], 2);
	assert_eq!(body["filteredCount"], 2);
	assert!(body["appliedConfig"].is_null());
}

#[tokio::test]
async fn saved_filters_narrow_the_records() {
	let harness = Harness::new().await;
	harness.seed().await;

	let (status, body) = harness
		.json(Method::PUT, "/api/filters", overdue_filters())
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["matchingCount"], 1);
	assert_eq!(body["totalCount"], 2);
	assert!(body["updatedAt"].is_string());

	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["filteredCount"], 1);
	assert_eq!(body["records"][0]["department"], "Finance");
	assert_eq!(body["appliedConfig"][0]["id"], "overdue");
	assert_eq!(body["stats"]["total"], 1);

	let (_, body) = harness.get("/api/filters").await;
	assert_eq!(body["filters"][0]["conditions"][0]["compareColumn"], "tatDays");
}

#[tokio::test]
async fn invalid_filters_are_rejected_and_not_stored() {
	let harness = Harness::new().await;
	let bad = json!({
		"filters": [{
			"id": "g1",
			"conditions": [{ "column": "salary", "operator": "equals", "value": "x" }]
		}]
	});

	let (status, body) = harness.json(Method::PUT, "/api/filters", bad).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "validation_error");

	let disallowed = json!({
		"filters": [{
			"id": "g1",
			"conditions": [{ "column": "department", "operator": "greater_than", "value": 3 }]
		}]
	});
	let (status, _) = harness
		.json(Method::POST, "/api/filters/preview", disallowed)
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (_, body) = harness.get("/api/filters").await;
	assert!(body["filters"].is_null());
}

#[tokio::test]
async fn preview_counts_without_saving() {
	let harness = Harness::new().await;
	harness.seed().await;
	let candidate = json!({
		"filters": [{
			"id": "hr",
			"conditions": [{ "column": "department", "operator": "equals", "value": "HR" }]
		}]
	});

	let (status, body) = harness
		.json(Method::POST, "/api/filters/preview", candidate)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["matchingCount"], 1);
	assert_eq!(body["totalCount"], 2);
	assert!(body.get("updatedAt").is_none());

	let (_, body) = harness.get("/api/filters").await;
	assert!(body["filters"].is_null());
}

#[tokio::test]
async fn reset_stores_the_default_and_delete_removes_it() {
	let harness = Harness::new().await;
	harness.seed().await;

	let (status, body) = harness
		.json(Method::POST, "/api/filters/reset", json!({}))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["filters"][0]["id"], "default");
	assert_eq!(body["matchingCount"], 1);

	let (status, body) = harness.delete("/api/filters").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["filters"].is_null());

	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["filteredCount"], 2);
}

#[tokio::test]
async fn generated_filters_are_returned_not_saved() {
	let harness = Harness::new().await;

	let (status, body) = harness
		.json(
			Method::POST,
			"/api/generate-filters",
			json!({ "prompt": "only finance" }),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["filters"][0]["id"], "finance");
	assert_eq!(body["filters"][0]["conditions"][0]["value"], "Finance");

	let (_, body) = harness.get("/api/filters").await;
	assert!(body["filters"].is_null());
}

#[tokio::test]
async fn blank_prompt_is_a_bad_request() {
	let harness = Harness::new().await;
	let (status, body) = harness
		.json(Method::POST, "/api/generate-filters", json!({ "prompt": "   " }))
		.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn unusable_model_output_is_a_server_error() {
	let harness = Harness::with(Options {
		reply: "I cannot help with that.",
		..Options::default()
	})
	.await;
	let (status, body) = harness
		.json(Method::POST, "/api/generate-filters", json!({ "prompt": "anything" }))
		.await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["error"], "translation_error");
}

#[tokio::test]
async fn draft_and_departments() {
	let harness = Harness::new().await;
	let (finance, _) = harness.seed().await;

	let (status, body) = harness
		.get(&format!("/api/records/{finance}/draft"))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["recordId"], finance);
	assert_eq!(body["to"], "boss@example.com");
	assert!(body["subject"].as_str().unwrap().contains("Finance file"));

	let (status, _) = harness.get("/api/records/9999/draft").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, body) = harness.get("/api/departments").await;
	assert_eq!(body["departments"], json!(["Finance", "HR"]));
}

#[tokio::test]
async fn table_query_narrows_the_filtered_view() {
	let harness = Harness::new().await;
	harness.seed().await;

	let (_, body) = harness.get("/api/records?department=HR").await;
	assert_eq!(body["records"].as_array().unwrap().len(), 1);
	assert_eq!(body["filteredCount"], 2);

	let (_, body) = harness.get("/api/records?search=finance").await;
	assert_eq!(body["records"][0]["department"], "Finance");

	let (_, body) = harness.get("/api/records?mailStatus=sent").await;
	assert!(body["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn record_list_follows_published_writes() {
	let harness = Harness::new().await;
	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 0);

	harness.seed().await;
	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 2);
}

#[tokio::test]
async fn refresh_picks_up_writes_from_another_process() {
	let harness = Harness::new().await;
	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 0);

	// A second repository with its own notifier stands in for another process.
	let outside = RecordRepository::new(harness.pool.clone(), ChangeNotifier::default());
	outside
		.replace_upload("other.csv", &[new_record("Finance", 10, 5)])
		.await
		.unwrap();

	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 0);

	let (status, body) = harness.get("/api/records?refresh=true").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["totalCount"], 1);
}

#[tokio::test]
async fn clearing_records_keeps_filters_and_clearing_data_does_not() {
	let harness = Harness::new().await;
	harness.seed().await;
	harness
		.json(Method::PUT, "/api/filters", overdue_filters())
		.await;

	let (status, body) = harness.delete("/api/records").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["cleared"], 2);
	let (_, body) = harness.get("/api/filters").await;
	assert_eq!(body["filters"][0]["id"], "overdue");

	harness.seed().await;
	let (status, body) = harness.delete("/api/data").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["cleared"], 2);
	let (_, body) = harness.get("/api/filters").await;
	assert!(body["filters"].is_null());
	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn upload_keeps_pending_rows_and_replaces_previous_data() {
	let harness = Harness::new().await;
	harness.seed().await;
	let bytes = sheet(&[
		"Legal,Contract,L1,12,4,L2,legal@example.com,,no",
		"Ops,Audit,L1,3,4,L2,ops@example.com,,yes",
	]);

	let (status, body) = harness
		.send(multipart("/api/uploads", "text/csv", "pending.csv", &bytes))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["filename"], "pending.csv");
	assert_eq!(body["totalRows"], 2);
	assert_eq!(body["pendingCount"], 1);
	assert!(body["uploadId"].is_i64());

	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 1);
	assert_eq!(body["records"][0]["department"], "Legal");
}

#[tokio::test]
async fn parse_only_does_not_store() {
	let harness = Harness::new().await;
	let bytes = sheet(&["Legal,Contract,L1,12,4,L2,legal@example.com,,no"]);

	let (status, body) = harness
		.send(multipart("/api/parse-excel", "text/csv", "check.csv", &bytes))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["pendingCount"], 1);
	assert!(body["uploadId"].is_string());

	let (_, body) = harness.get("/api/records").await;
	assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn upload_rejects_bad_input() {
	let harness = Harness::new().await;

	let (status, body) = harness
		.send(multipart("/api/uploads", "application/pdf", "doc.pdf", b"%PDF"))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body["message"],
		"Invalid file type. Please upload an Excel (.xlsx, .xls) or CSV file."
	);

	let bytes = sheet(&["Finance,Budget,L1,-3,5,L2,cfo@example.com,,"]);
	let (status, body) = harness
		.send(multipart("/api/uploads", "text/csv", "bad.csv", &bytes))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "invalid_upload");

	let no_file = Request::builder()
		.method(Method::POST)
		.uri("/api/uploads")
		.header(
			header::CONTENT_TYPE,
			format!("multipart/form-data; boundary={BOUNDARY}"),
		)
		.body(Body::from(format!(
			"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
		)))
		.unwrap();
	let (status, body) = harness.send(no_file).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "No file provided");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
	let harness = Harness::with(Options {
		max_upload_size_mb: 1,
		..Options::default()
	})
	.await;
	let bytes = vec![b'a'; 1024 * 1024 + 1];

	let (status, body) = harness
		.send(multipart("/api/uploads", "text/csv", "big.csv", &bytes))
		.await;
	assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
	assert_eq!(body["message"], "File too large. Maximum size is 1MB.");
}

#[tokio::test]
async fn send_mail_marks_the_record() {
	let harness = Harness::new().await;
	let (finance, _) = harness.seed().await;

	let (status, body) = harness
		.json(
			Method::POST,
			"/api/send-mail",
			mail_request(finance, "boss@example.com"),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["recordId"], finance);
	assert!(body["messageId"].is_string());

	let record = harness.state.records.get_record(finance).await.unwrap().unwrap();
	assert!(record.mail_sent);
	assert_eq!(harness.transport.sent().len(), 1);
}

#[tokio::test]
async fn already_mailed_record_is_not_sent_again() {
	let harness = Harness::new().await;
	let (finance, _) = harness.seed().await;

	let (status, _) = harness
		.json(
			Method::POST,
			"/api/send-mail",
			mail_request(finance, "boss@example.com"),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = harness
		.json(
			Method::POST,
			"/api/send-mail",
			mail_request(finance, "boss@example.com"),
		)
		.await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["error"], "conflict");
	assert_eq!(harness.transport.sent().len(), 1);
}

#[tokio::test]
async fn failed_delivery_leaves_the_record_pending() {
	let harness = Harness::with(Options {
		transport: ScriptedTransport::failing_with(vec![SmtpError::Rejected {
			code: "550".to_string(),
			message: "no such user".to_string(),
		}]),
		..Options::default()
	})
	.await;
	let (finance, _) = harness.seed().await;

	let (status, body) = harness
		.json(
			Method::POST,
			"/api/send-mail",
			mail_request(finance, "boss@example.com"),
		)
		.await;
	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["success"], false);
	assert!(body["error"].as_str().unwrap().contains("no such user"));

	let record = harness.state.records.get_record(finance).await.unwrap().unwrap();
	assert!(!record.mail_sent);
	assert_eq!(harness.transport.attempts(), 1);
}

#[tokio::test]
async fn send_mail_rejects_bad_requests() {
	let harness = Harness::new().await;
	harness.seed().await;

	let (status, body) = harness
		.json(Method::POST, "/api/send-mail", json!({ "to": "boss@example.com" }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body["message"],
		"Missing required fields: recordId, to, subject, body"
	);

	let (status, body) = harness
		.json(Method::POST, "/api/send-mail", mail_request(1, "not-an-address"))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Invalid email address format");

	let (status, body) = harness
		.json(
			Method::POST,
			"/api/send-mail",
			mail_request(9999, "boss@example.com"),
		)
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["message"], "Record not found");
	assert!(harness.transport.sent().is_empty());
}

#[tokio::test]
async fn send_mail_without_smtp_is_unavailable() {
	let harness = Harness::with(Options {
		mail_configured: false,
		..Options::default()
	})
	.await;
	let (finance, _) = harness.seed().await;

	let (status, body) = harness
		.json(
			Method::POST,
			"/api/send-mail",
			mail_request(finance, "boss@example.com"),
		)
		.await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["message"], "Email service not configured");
}

#[tokio::test]
async fn send_mail_is_rate_limited_per_client() {
	let harness = Harness::with(Options {
		per_minute: 1,
		..Options::default()
	})
	.await;
	let request = |client: &str| {
		Request::builder()
			.method(Method::POST)
			.uri("/api/send-mail")
			.header(header::CONTENT_TYPE, "application/json")
			.header("x-forwarded-for", client)
			.body(Body::from(json!({}).to_string()))
			.unwrap()
	};

	let (status, _) = harness.send(request("10.0.0.1")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	let (status, body) = harness.send(request("10.0.0.1")).await;
	assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
	assert_eq!(body["error"], "rate_limited");

	let (status, _) = harness.send(request("10.0.0.2")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}
