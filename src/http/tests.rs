use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use url::Url;

use super::test_support::spawn_http_server;
use super::*;
use crate::error::HttpError;

fn options() -> ClientOptions {
    ClientOptions {
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        user_agent: Some("speedprobe-test".to_owned()),
    }
}

fn parse_url(raw: &str) -> Result<Url, String> {
    Url::parse(raw).map_err(|err| format!("bad url '{}': {}", raw, err))
}

#[tokio::test(flavor = "current_thread")]
async fn drain_body_counts_all_chunks() -> Result<(), String> {
    let body: BodyStream = futures_util::stream::iter(vec![
        Ok(Bytes::from_static(b"abc")),
        Ok(Bytes::from_static(b"defgh")),
    ])
    .boxed();
    let total = drain_body(body).await.map_err(|err| err.to_string())?;
    if total != 8 {
        return Err(format!("Unexpected total: {}", total));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn drain_body_stops_on_chunk_error() -> Result<(), String> {
    let body: BodyStream = futures_util::stream::iter(vec![
        Ok(Bytes::from_static(b"abc")),
        Err(HttpError::body("connection reset")),
    ])
    .boxed();
    match drain_body(body).await {
        Err(err) if err.to_string() == "connection reset" => Ok(()),
        other => Err(format!("Unexpected drain result: {:?}", other)),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn collect_body_concatenates_chunks() -> Result<(), String> {
    let body: BodyStream = futures_util::stream::iter(vec![
        Ok(Bytes::from_static(b"[{\"url\":")),
        Ok(Bytes::from_static(b"\"x\"}]")),
    ])
    .boxed();
    let collected = collect_body(body).await.map_err(|err| err.to_string())?;
    if collected != b"[{\"url\":\"x\"}]" {
        return Err(format!(
            "Unexpected body: {}",
            String::from_utf8_lossy(&collected)
        ));
    }
    Ok(())
}

#[test]
fn request_spec_builders_set_method_and_headers() -> Result<(), String> {
    let url = parse_url("https://example.com/upload.php")?;
    let spec = RequestSpec::post(url, Bytes::from_static(b"content=x"))
        .header("Content-Type", "application/x-www-form-urlencoded");
    if spec.method != HttpMethod::Post {
        return Err("Expected POST".to_owned());
    }
    if spec.headers.first().map(|(name, _)| name.as_str()) != Some("Content-Type") {
        return Err("Expected content type header".to_owned());
    }
    if spec.body.as_deref() != Some(b"content=x".as_slice()) {
        return Err("Expected body".to_owned());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reqwest_executor_streams_response_body() -> Result<(), String> {
    let (base, _server) = spawn_http_server(b"0123456789")?;
    let executor = build_executor(&options()).map_err(|err| err.to_string())?;
    let url = parse_url(&format!("{}/random1000x1000.jpg", base))?;

    let response = executor
        .execute(RequestSpec::get(url))
        .await
        .map_err(|err| err.to_string())?;
    if !response.is_success() {
        return Err(format!("Unexpected status: {}", response.status));
    }
    let total = drain_body(response.body)
        .await
        .map_err(|err| err.to_string())?;
    if total != 10 {
        return Err(format!("Unexpected byte count: {}", total));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reqwest_executor_sends_body_and_headers() -> Result<(), String> {
    let (base, server) = spawn_http_server(b"ok")?;
    let executor = build_executor(&options()).map_err(|err| err.to_string())?;
    let url = parse_url(&format!("{}/upload.php", base))?;

    let request = RequestSpec::post(url, Bytes::from_static(b"content=abc"))
        .header("Content-Type", "application/x-www-form-urlencoded");
    let response = executor
        .execute(request)
        .await
        .map_err(|err| err.to_string())?;
    drain_body(response.body)
        .await
        .map_err(|err| err.to_string())?;

    let requests = server.requests();
    let raw = requests
        .first()
        .map(|request| String::from_utf8_lossy(request).into_owned())
        .ok_or_else(|| "Server saw no request".to_owned())?;
    if !raw.starts_with("POST /upload.php") {
        return Err(format!("Unexpected request line: {}", raw));
    }
    if !raw
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded")
    {
        return Err(format!("Missing content type: {}", raw));
    }
    if !raw.ends_with("content=abc") {
        return Err(format!("Missing body: {}", raw));
    }
    if !raw.contains("speedprobe-test") {
        return Err(format!("Missing user agent: {}", raw));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn reqwest_executor_reports_connect_failures() -> Result<(), String> {
    let executor = build_executor(&options()).map_err(|err| err.to_string())?;
    let url = parse_url("http://127.0.0.1:1/")?;
    match executor.execute(RequestSpec::get(url)).await {
        Err(HttpError::Connect { .. } | HttpError::Request { .. }) => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other)),
    }
}
