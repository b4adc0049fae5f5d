// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Change notification stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
	extract::State,
	response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::api::AppState;

/// GET /api/events - SSE stream of store changes.
///
/// Event names match the change types: `records.replaced`,
/// `records.cleared`, `record.mail_sent`, `filters.updated` and
/// `filters.cleared`. Clients re-fetch `/api/records` on receipt.
#[utoipa::path(
	get,
	path = "/api/events",
	responses(
		(status = 200, description = "SSE stream connection established")
	),
	tag = "events"
)]
pub async fn stream_events(
	State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
	info!(
		subscribers = state.notifier.receiver_count() + 1,
		"client connected to change stream"
	);

	let stream = BroadcastStream::new(state.notifier.subscribe()).filter_map(|result| match result {
		Ok(event) => {
			let event_type = event.event_type();
			match serde_json::to_string(&event) {
				Ok(json) => Some(Ok::<_, Infallible>(
					Event::default().event(event_type).data(json),
				)),
				Err(e) => {
					warn!(error = %e, "failed to serialize change event");
					None
				}
			}
		}
		Err(e) => {
			debug!(error = %e, "change stream lagged");
			None
		}
	});

	Sse::new(stream).keep_alive(
		KeepAlive::new()
			.interval(Duration::from_secs(30))
			.text("heartbeat"),
	)
}
