use kit::{Request, Response, View};
use serde_json::json;

pub async fn about(req: Request) -> Response {
    View::render(&req, "Common/About", json!({ "title": "About" }))
}
