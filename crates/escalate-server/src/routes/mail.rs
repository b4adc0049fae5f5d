// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Escalation email HTTP handler.

use axum::{
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use escalate_common_core::is_valid_email;
use escalate_server_api::{ErrorResponse, SendMailRequest, SendMailResponse};
use escalate_server_smtp::{MailError, MailRequest};
use tracing::{info, instrument, warn};

use crate::api::AppState;
use crate::error::{Result, ServerError};
use crate::rate_limit::client_key;

/// Request fields after the presence check.
struct ValidSend {
	record_id: i64,
	mail: MailRequest,
}

fn required_fields(request: SendMailRequest) -> Result<ValidSend> {
	let present = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
	match (
		request.record_id.filter(|id| *id != 0),
		present(request.to),
		present(request.subject),
		present(request.body),
	) {
		(Some(record_id), Some(to), Some(subject), Some(body)) => Ok(ValidSend {
			record_id,
			mail: MailRequest {
				to: to.trim().to_string(),
				subject,
				body,
			},
		}),
		_ => Err(ServerError::BadRequest(
			"Missing required fields: recordId, to, subject, body".to_string(),
		)),
	}
}

#[utoipa::path(
	post,
	path = "/api/send-mail",
	request_body = SendMailRequest,
	responses(
		(status = 200, description = "Email sent and record marked", body = SendMailResponse),
		(status = 400, description = "Missing fields or malformed recipient", body = ErrorResponse),
		(status = 404, description = "Record not found", body = ErrorResponse),
		(status = 409, description = "Record already mailed, or a send for it is already running", body = ErrorResponse),
		(status = 429, description = "Rate limited", body = ErrorResponse),
		(status = 500, description = "Delivery failed", body = SendMailResponse),
		(status = 503, description = "Email service not configured", body = ErrorResponse)
	),
	tag = "mail"
)]
/// POST /api/send-mail - send an escalation email and mark the record.
///
/// Checks run in order: mail configured, rate limit, required fields,
/// recipient format, record exists, record not yet mailed. The record's
/// mail flag is set only after the mail server accepts the message.
#[instrument(skip(state, headers, request))]
pub async fn send_mail(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<SendMailRequest>,
) -> Result<Response> {
	if !state.mailer.is_configured() {
		return Err(ServerError::ServiceUnavailable(
			MailError::NotConfigured.to_string(),
		));
	}

	let client = client_key(&headers);
	if !state.rate_limiter.check(&client).await {
		return Err(ServerError::RateLimited);
	}

	let ValidSend { record_id, mail } = required_fields(request)?;
	if !is_valid_email(&mail.to) {
		return Err(ServerError::BadRequest(
			"Invalid email address format".to_string(),
		));
	}

	let Some(_claim) = state.in_flight.claim(record_id) else {
		return Err(ServerError::Conflict(
			"An email for this record is already being sent".to_string(),
		));
	};

	// Checked under the claim so a send finishing concurrently is seen.
	let record = state
		.records
		.get_record(record_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Record not found".to_string()))?;
	if record.mail_sent {
		return Err(ServerError::Conflict(
			"An escalation email has already been sent for this record".to_string(),
		));
	}

	match state.mailer.send(&mail).await {
		Ok(receipt) => {
			state.records.update_mail_sent(record_id, true).await?;
			info!(record_id, attempts = receipt.attempts, "record escalated");
			Ok(Json(SendMailResponse::sent(record_id, receipt.message_id)).into_response())
		}
		Err(MailError::NotConfigured) => Err(ServerError::ServiceUnavailable(
			MailError::NotConfigured.to_string(),
		)),
		Err(e) => {
			warn!(record_id, error = %e, "escalation email not delivered");
			Ok((
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(SendMailResponse::failed(record_id, e.cause())),
			)
				.into_response())
		}
	}
}
