use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;

use crate::error::HttpError;

use super::executor::{ExecutorResponse, HttpMethod, RequestExecutor, RequestSpec};

/// Canned answer for a [`ScriptedExecutor`] route.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body { status: u16, body: Vec<u8> },
    Fail(HttpError),
    BrokenBody { prefix: Vec<u8>, error: HttpError },
}

impl Reply {
    pub(crate) fn ok(body: impl Into<Vec<u8>>) -> Self {
        Reply::Body {
            status: 200,
            body: body.into(),
        }
    }

    pub(crate) fn fail(message: &str) -> Self {
        Reply::Fail(HttpError::request(message))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Bytes>,
}

#[derive(Debug, Clone)]
struct Route {
    url: String,
    delay: Duration,
    reply: Reply,
}

/// In-memory executor that answers by URL and records every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedExecutor {
    routes: Vec<Route>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(self, url: &str, reply: Reply) -> Self {
        self.route_delayed(url, Duration::ZERO, reply)
    }

    pub(crate) fn route_delayed(mut self, url: &str, delay: Duration, reply: Reply) -> Self {
        self.routes.push(Route {
            url: url.to_owned(),
            delay,
            reply,
        });
        self
    }

    pub(crate) fn seen(&self) -> Vec<SeenRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    pub(crate) fn seen_urls(&self) -> Vec<String> {
        self.seen().into_iter().map(|request| request.url).collect()
    }

    fn find(&self, url: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.url == url)
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: RequestSpec) -> Result<ExecutorResponse, HttpError> {
        let url = request.url.to_string();
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(SeenRequest {
                method: request.method,
                url: url.clone(),
                headers: request.headers.clone(),
                body: request.body.clone(),
            });
        }

        let Some(route) = self.find(&url).cloned() else {
            return Err(HttpError::request(format!("no route for {}", url)));
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        match route.reply {
            Reply::Body { status, body } => Ok(ExecutorResponse {
                status,
                body: futures_util::stream::iter(vec![Ok(Bytes::from(body))]).boxed(),
            }),
            Reply::Fail(err) => Err(err),
            Reply::BrokenBody { prefix, error } => Ok(ExecutorResponse {
                status: 200,
                body: futures_util::stream::iter(vec![Ok(Bytes::from(prefix)), Err(error)])
                    .boxed(),
            }),
        }
    }
}

pub(crate) struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ServerHandle {
    /// Raw bytes of every request received so far.
    pub(crate) fn requests(&self) -> Vec<Vec<u8>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawns a loopback HTTP/1.1 server answering every request with `body`.
pub(crate) fn spawn_http_server(body: &'static [u8]) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let recorded = Arc::clone(&recorded);
                    thread::spawn(move || handle_client(stream, body, &recorded));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            requests,
        },
    ))
}

fn handle_client(mut stream: TcpStream, body: &[u8], recorded: &Mutex<Vec<Vec<u8>>>) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    if let Ok(mut requests) = recorded.lock() {
        requests.push(request);
    }

    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    if stream.write_all(head.as_bytes()).is_err() || stream.write_all(body).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut request = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return Some(request);
        }
        request.extend_from_slice(buffer.get(..read)?);
        if let Some(header_end) = find_header_end(&request) {
            let expected = header_end.saturating_add(content_length(&request));
            if request.len() >= expected {
                return Some(request);
            }
        }
    }
}

fn find_header_end(request: &[u8]) -> Option<usize> {
    request
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos.saturating_add(4))
}

fn content_length(request: &[u8]) -> usize {
    String::from_utf8_lossy(request)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}
