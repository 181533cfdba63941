//! Fake chat completion endpoint.
//!
//! Serves exactly one request on `127.0.0.1` and answers with a
//! chat-completions payload whose single choice carries a fixed answer. The
//! raw request is handed back through [`ChatServer::join`] so tests can check
//! the path, headers and JSON body the client sent.

use std::{
    io::{self, BufRead, BufReader, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    thread,
    time::{Duration, Instant},
};

/// A request captured by the fake server.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    /// Request line, e.g. `POST /v1/chat/completions HTTP/1.1`.
    pub request_line: String,
    /// Header lines as sent, without line terminators.
    pub headers: Vec<String>,
    /// Request body.
    pub body: String,
}

impl RecordedRequest {
    /// Value of the first header called `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then_some(value.trim())
        })
    }
}

/// Handle for a spawned fake server.
///
/// Dropping the handle unblocks and joins the server thread.
#[derive(Debug)]
#[must_use]
pub struct ChatServer {
    handle: Option<thread::JoinHandle<Option<RecordedRequest>>>,
    addr: SocketAddr,
}

impl ChatServer {
    /// Join the server thread and return the request it served, if any.
    pub fn join(mut self) -> thread::Result<Option<RecordedRequest>> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(None),
        }
    }

    fn shutdown_listener(&self) {
        // Connect to unblock the accept loop; the outcome is irrelevant.
        let _ = TcpStream::connect(self.addr);
    }
}

impl Drop for ChatServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shutdown_listener();
            let _ = handle.join();
        }
    }
}

/// Spawn a server answering one chat completion request with `answer`.
///
/// Returns the base URL to pass as `--llm-url` (it ends in `/v1`).
pub fn spawn_chat_server(answer: impl Into<String>) -> (String, ChatServer) {
    let body = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": answer.into() } }]
    })
    .to_string();
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind HTTP listener");
    listener
        .set_nonblocking(true)
        .expect("set listener non-blocking");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || serve_one(&listener, &body));
    (
        format!("http://{addr}/v1"),
        ChatServer {
            handle: Some(handle),
            addr,
        },
    )
}

fn serve_one(listener: &TcpListener, body: &str) -> Option<RecordedRequest> {
    let stream = accept_connection(listener, Instant::now() + Duration::from_secs(10))?;
    stream.set_nonblocking(false).expect("set stream blocking");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("set read timeout");
    let mut reader = BufReader::new(stream);
    let request = read_request(&mut reader)?;
    write_response(reader.get_mut(), body);
    Some(request)
}

fn accept_connection(listener: &TcpListener, deadline: Instant) -> Option<TcpStream> {
    loop {
        match listener.accept() {
            Ok((stream, _)) => return Some(stream),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return None;
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(err) => panic!("failed to accept connection: {err}"),
        }
    }
}

fn read_line(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
    }
}

fn read_request(reader: &mut BufReader<TcpStream>) -> Option<RecordedRequest> {
    let mut request = RecordedRequest {
        request_line: read_line(reader)?,
        ..RecordedRequest::default()
    };
    loop {
        let line = read_line(reader)?;
        if line.is_empty() {
            break;
        }
        request.headers.push(line);
    }
    let length = request
        .header("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).ok()?;
    request.body = String::from_utf8_lossy(&body).into_owned();
    Some(request)
}

fn write_response(stream: &mut TcpStream, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
