//! Server-Sent Events for a mounted widget.
//!
//! On connect the stream sends every [`Region`] once so the page can resync,
//! then one event per widget change. Payloads are JSON so arbitrary message
//! text never breaks SSE framing.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::events::Region;
use crate::ui::widget::render_message_list;
use crate::widget::{ChatWidget, WidgetSnapshot};

/// Stream widget updates until the widget is unmounted.
pub fn build_sse_response(
    widget: ChatWidget,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    let stream = async_stream::stream! {
        // Subscribe before the resync so nothing slips between the two.
        let mut events = widget.subscribe();

        let snapshot = widget.snapshot();
        for region in Region::ALL {
            yield Ok::<_, Infallible>(region_event(region, &snapshot));
        }

        loop {
            let received = tokio::select! {
                biased;
                () = widget.unmounted() => break,
                received = events.recv() => received,
            };

            match received {
                Ok(event) => {
                    yield Ok::<_, Infallible>(region_event(event.region(), &widget.snapshot()));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(widget_id = %widget.id(), skipped, "SSE subscriber lagged, resyncing");
                    let snapshot = widget.snapshot();
                    for region in Region::ALL {
                        yield Ok::<_, Infallible>(region_event(region, &snapshot));
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Render one region of the widget as an SSE event.
pub fn region_event(region: Region, snapshot: &WidgetSnapshot) -> Event {
    Event::default()
        .event(region.sse_name())
        .data(region_payload(region, snapshot).to_string())
}

/// JSON payload for a region.
pub fn region_payload(region: Region, snapshot: &WidgetSnapshot) -> serde_json::Value {
    match region {
        Region::Panel => json!({ "open": snapshot.open }),
        Region::Messages => json!({
            "html": render_message_list(snapshot),
            "bot_typing": snapshot.bot_typing,
            "count": snapshot.messages.len(),
        }),
        Region::Input => json!({ "text": snapshot.pending_input }),
    }
}
