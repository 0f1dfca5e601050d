use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::Message;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;

use crate::notifier::ChangeNotifier;

// Upgrade to a WebSocket and forward change events until the client leaves.
// Delivery is best effort; a slow client just skips the events it missed.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    notifier: web::Data<ChangeNotifier>,
) -> actix_web::Result<HttpResponse> {
    let (response, mut session, mut msg_stream) = actix_ws::handle(&req, stream)?;
    let mut events = notifier.subscribe();
    info!("WebSocket client connected");

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(change) => {
                        let payload = match serde_json::to_string(&change) {
                            Ok(payload) => payload,
                            Err(e) => {
                                warn!("Failed to encode change event: {}", e);
                                continue;
                            }
                        };
                        if session.text(payload).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("WebSocket client lagged, {} events skipped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
                message = msg_stream.next() => match message {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        debug!("WebSocket client sent close: {:?}", reason);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket protocol error: {}", e);
                        break;
                    }
                    None => break,
                },
            }
        }

        let _ = session.close(None).await;
        info!("WebSocket client disconnected");
    });

    Ok(response)
}
