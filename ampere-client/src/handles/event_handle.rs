use std::convert::Infallible;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::handles::control_handle::ControlState;

/// Streams user notices as they are published. Lagging clients skip what they missed.
pub async fn notice_stream(
    State(state): State<ControlState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.monitor.subscribe_notices();

    let stream = BroadcastStream::new(receiver).filter_map(|result| {
        let notice = result.ok()?;
        let data = serde_json::to_string(&notice).ok()?;

        Some(Ok(Event::default().event("notice").data(data)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
