use httprouter::prelude::*;
use serde_json::json;

#[router(prefix = "/live", include_in_schema = false)]
pub struct LiveRouter;

#[routes]
impl LiveRouter {
    #[get("/health")]
    async fn health(&self) -> Json<serde_json::Value> {
        Json(json!({ "status": "ok" }))
    }

    /// Sends a greeting, then echoes text frames until the client closes
    #[websocket("/ws", name = "live_feed")]
    async fn feed(&self, mut socket: WebSocket) {
        if socket
            .send(Message::Text(json!({ "hello": "world" }).to_string().into()))
            .await
            .is_err()
        {
            return;
        }
        while let Some(Ok(message)) = socket.recv().await {
            match message {
                Message::Text(text) => {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    }
}
