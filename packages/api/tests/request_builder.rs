//! Fluent builder tests against caller-supplied transports

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use hxs::header::X_API_KEY;
    use hxs::{
        CancelToken, ContentType, HttpClient, Next, RequestBody, RequestDescriptor, ResponseBody, ResponseEnvelope,
        StatusCode,
    };
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Todo {
        id: u32,
        title: String,
    }

    type Captured = Arc<Mutex<Option<RequestDescriptor>>>;

    /// Client whose transport records the request and echoes a text body back.
    fn recording_client(captured: Captured) -> HttpClient {
        HttpClient::builder()
            .base_url("https://todo.test/api")
            .custom_request(move |request: RequestDescriptor| {
                let captured = captured.clone();
                async move {
                    let body = match &request.body {
                        Some(RequestBody::Text(text)) => ResponseBody::Text(text.clone()),
                        _ => ResponseBody::Empty,
                    };
                    *captured.lock().unwrap() = Some(request.clone());
                    Ok(ResponseEnvelope::new(StatusCode::OK, request).with_body(body))
                }
            })
            .build()
            .unwrap()
    }

    fn sent(captured: &Captured) -> RequestDescriptor {
        captured.lock().unwrap().take().expect("transport was never called")
    }

    #[tokio::test]
    async fn json_body_and_typed_response() {
        let captured = Captured::default();
        let client = recording_client(captured.clone());
        let todo = Todo { id: 1, title: "write tests".into() };

        let echoed: Todo = assert_ok!(
            hxs::with_client(&client, hxs::Method::POST, "/todos")
                .json(&todo)
                .send_json()
                .await
        );
        assert_eq!(echoed, todo);

        let request = sent(&captured);
        assert_eq!(request.url, "https://todo.test/api/todos");
        assert_eq!(request.headers.get("content-type"), Some(ContentType::ApplicationJson.as_str()));
    }

    #[tokio::test]
    async fn form_body_is_urlencoded() {
        let captured = Captured::default();
        let client = recording_client(captured.clone());

        let text = assert_ok!(
            hxs::with_client(&client, hxs::Method::POST, "/login")
                .form(&json!({"user": "ada", "tags": ["a", "b"]}))
                .send_text()
                .await
        );
        assert_eq!(text, "user=ada&tags=a&tags=b");
    }

    #[tokio::test]
    async fn query_path_and_headers() {
        let captured = Captured::default();
        let client = recording_client(captured.clone());

        assert_ok!(
            hxs::with_client(&client, hxs::Method::GET, "/todos/{id}")
                .path_params([17])
                .query(&json!({"filter": {"done": false}}))
                .query(&[("page", 2)])
                .api_key("k-123")
                .bearer_auth("t-456")
                .accept(ContentType::ApplicationJson)
                .header("X-Trace", "a")
                .header("x-trace", "b")
                .send()
                .await
        );

        let request = sent(&captured);
        assert_eq!(request.url, "https://todo.test/api/todos/17?filter[done]=false&page=2");
        assert_eq!(request.headers.get(X_API_KEY), Some("k-123"));
        assert_eq!(request.headers.get("authorization"), Some("Bearer t-456"));
        assert_eq!(request.headers.get_all("X-TRACE"), ["b"]);
    }

    #[tokio::test]
    async fn call_interceptor_can_short_circuit() {
        let captured = Captured::default();
        let client = recording_client(captured.clone());

        let envelope = assert_ok!(
            hxs::with_client(&client, hxs::Method::GET, "/cached")
                .interceptor(|request: RequestDescriptor, _next: Next| async move {
                    Ok(ResponseEnvelope::new(StatusCode::NOT_MODIFIED, request))
                })
                .send()
                .await
        );

        assert_eq!(envelope.status, StatusCode::NOT_MODIFIED);
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn per_call_transport_on_the_global_client() {
        let envelope = assert_ok!(
            hxs::get("/status")
                .custom_request(|request: RequestDescriptor| async move {
                    Ok(ResponseEnvelope::new(StatusCode::OK, request)
                        .with_body(ResponseBody::Json(json!({"up": true}))))
                })
                .send()
                .await
        );

        assert_eq!(envelope.response, ResponseBody::Json(json!({"up": true})));
        assert_eq!(envelope.request.url, "/status");
    }

    #[tokio::test]
    async fn rejected_status_surfaces_as_response_error() {
        let err = assert_err!(
            hxs::delete("/todos/1")
                .custom_request(|request: RequestDescriptor| async move {
                    Ok(ResponseEnvelope::new(StatusCode::CONFLICT, request)
                        .with_body(ResponseBody::Text("locked".into())))
                })
                .send()
                .await
        );

        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.body(), Some(&ResponseBody::Text("locked".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_and_cancel_apply_to_custom_transports() {
        let slow = |request: RequestDescriptor| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ResponseEnvelope::new(StatusCode::OK, request))
        };

        let err = assert_err!(
            hxs::get("/slow")
                .timeout(Duration::from_millis(100))
                .custom_request(slow)
                .send()
                .await
        );
        assert!(err.is_timeout());

        let token = CancelToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            canceller.cancel();
        });
        let err = assert_err!(hxs::get("/slow").cancel_token(token).custom_request(slow).send().await);
        assert!(err.is_cancel());
    }

    #[test]
    fn builder_exposes_the_descriptor() {
        let request = hxs::post("/items")
            .text("hello")
            .basic_auth("ada", Some("pw"))
            .with_credentials(true)
            .into_request();

        assert_eq!(request.method, hxs::Method::POST);
        assert!(matches!(request.body, Some(RequestBody::Text(ref text)) if text == "hello"));
        assert_eq!(request.auth.as_ref().map(|c| c.username.as_str()), Some("ada"));
        assert_eq!(request.with_credentials, Some(true));
    }
}
