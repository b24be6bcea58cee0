use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

/// Behavior knobs for the in-memory admin API double.
#[derive(Clone)]
pub struct ServerOptions {
    pub token_status: u16,
    pub expires_in: u64,
    /// Answer every create with 409 while still keeping the resource, so
    /// dependent steps can observe it.
    pub conflict_on_create: bool,
    /// 1-based global create counter at which creation returns 500.
    pub fail_create_at: Option<usize>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            token_status: 200,
            expires_in: 300,
            conflict_on_create: false,
            fail_create_at: None,
        }
    }
}

pub struct ServerState {
    options: ServerOptions,
    resources: Mutex<HashMap<String, Vec<(String, String)>>>,
    create_count: AtomicUsize,
    token_requests: AtomicUsize,
    id_counter: AtomicUsize,
    request_log: Mutex<Vec<String>>,
}

impl ServerState {
    pub fn token_request_count(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn request_log(&self) -> Vec<String> {
        self.request_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn resource_count(&self, collection: &str) -> usize {
        self.resources
            .lock()
            .map(|resources| {
                resources
                    .get(collection)
                    .map(|entries| entries.len())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<ServerState>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight in-memory double of the token endpoint and the admin
/// resource API for tests.
pub fn spawn_mock_server(options: ServerOptions) -> Result<MockServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let state = Arc::new(ServerState {
        options,
        resources: Mutex::new(HashMap::new()),
        create_count: AtomicUsize::new(0),
        token_requests: AtomicUsize::new(0),
        id_counter: AtomicUsize::new(0),
        request_log: Mutex::new(Vec::new()),
    });

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let accept_state = Arc::clone(&state);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let state = Arc::clone(&accept_state);
                    thread::spawn(move || handle_client(stream, &state));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok(MockServer {
        base_url: format!("http://{}", addr),
        state,
        shutdown: shutdown_tx,
        thread: Some(handle),
    })
}

fn handle_client(mut stream: TcpStream, state: &Arc<ServerState>) {
    let Some((method, target, body)) = read_request(&mut stream) else {
        return;
    };
    let (status, response_body) = route(state, &method, &target, &body);
    write_response(&mut stream, status, &response_body);
}

fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
    if stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .is_err()
    {
        return None;
    }

    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        match stream.read(&mut chunk) {
            Ok(0) => return None,
            Ok(read) => {
                buffer.extend_from_slice(&chunk[..read]);
                if let Some(pos) = find_blank_line(&buffer) {
                    break pos;
                }
            }
            Err(_) => return None,
        }
    };

    let header_text = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = header_text.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_owned();
    let target = parts.next()?.to_owned();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => buffer.extend_from_slice(&chunk[..read]),
            Err(_) => break,
        }
    }
    let body_end = (body_start + content_length).min(buffer.len());
    let body = String::from_utf8_lossy(&buffer[body_start..body_end]).into_owned();

    Some((method, target, body))
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "OK",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn route(state: &Arc<ServerState>, method: &str, target: &str, body: &str) -> (u16, String) {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    if let Ok(mut log) = state.request_log.lock() {
        log.push(format!("{} {}", method, path));
    }

    if method == "POST" && path.ends_with("/protocol/openid-connect/token") {
        let count = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
        if state.options.token_status != 200 {
            return (
                state.options.token_status,
                json!({"error": "invalid_grant"}).to_string(),
            );
        }
        return (
            200,
            json!({
                "access_token": format!("mock-token-{}", count),
                "expires_in": state.options.expires_in,
                "token_type": "Bearer",
            })
            .to_string(),
        );
    }

    let Some(admin_path) = path.strip_prefix("/admin/realms/") else {
        return (404, json!({"error": "unknown path"}).to_string());
    };
    let Some((_realm, resource_path)) = admin_path.split_once('/') else {
        return (404, json!({"error": "missing resource"}).to_string());
    };
    let (collection, item) = match resource_path.split_once('/') {
        Some((collection, item)) => (collection.to_owned(), Some(item.to_owned())),
        None => (resource_path.to_owned(), None),
    };

    match (method, item) {
        ("POST", None) => handle_create(state, &collection, body),
        ("GET", None) => handle_list(state, &collection, query),
        ("GET", Some(item)) => handle_get_item(state, &collection, &item),
        ("PUT", Some(item)) => handle_mutate(state, &collection, &item, false),
        ("DELETE", Some(item)) => handle_mutate(state, &collection, &item, true),
        _ => (404, json!({"error": "unsupported"}).to_string()),
    }
}

fn handle_create(state: &Arc<ServerState>, collection: &str, body: &str) -> (u16, String) {
    let count = state.create_count.fetch_add(1, Ordering::SeqCst) + 1;
    if state.options.fail_create_at == Some(count) {
        return (500, json!({"error": "simulated create failure"}).to_string());
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return (400, json!({"error": "bad payload"}).to_string()),
    };
    let name = ["username", "clientId", "name"]
        .iter()
        .find_map(|field| parsed.get(*field).and_then(Value::as_str))
        .map(str::to_owned);
    let Some(name) = name else {
        return (400, json!({"error": "missing name"}).to_string());
    };

    let Ok(mut resources) = state.resources.lock() else {
        return (500, json!({"error": "poisoned"}).to_string());
    };
    let entries = resources.entry(collection.to_owned()).or_default();
    let already_exists = entries.iter().any(|(_, existing)| existing == &name);

    if state.options.conflict_on_create {
        if !already_exists {
            let id = next_id(state, collection, &name);
            entries.push((id, name));
        }
        return (
            409,
            json!({"errorMessage": "resource already exists"}).to_string(),
        );
    }
    if already_exists {
        return (
            409,
            json!({"errorMessage": "resource already exists"}).to_string(),
        );
    }

    let id = next_id(state, collection, &name);
    entries.push((id, name));
    (201, String::new())
}

fn next_id(state: &Arc<ServerState>, collection: &str, name: &str) -> String {
    // Roles are addressed by name on the item endpoints.
    if collection == "roles" {
        name.to_owned()
    } else {
        let id = state.id_counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("id-{}", id)
    }
}

fn handle_list(state: &Arc<ServerState>, collection: &str, query: Option<&str>) -> (u16, String) {
    let filter = query.and_then(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(_, value)| value.to_owned())
            .next()
    });

    let Ok(resources) = state.resources.lock() else {
        return (500, json!({"error": "poisoned"}).to_string());
    };
    let entries: Vec<Value> = resources
        .get(collection)
        .map(|entries| {
            entries
                .iter()
                .filter(|(_, name)| {
                    filter
                        .as_deref()
                        .map(|filter| name.as_str() == filter)
                        .unwrap_or(true)
                })
                .map(|(id, name)| {
                    json!({
                        "id": id,
                        "name": name,
                        "username": name,
                        "clientId": name,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    (200, Value::Array(entries).to_string())
}

fn handle_get_item(state: &Arc<ServerState>, collection: &str, item: &str) -> (u16, String) {
    let Ok(resources) = state.resources.lock() else {
        return (500, json!({"error": "poisoned"}).to_string());
    };
    let found = resources.get(collection).and_then(|entries| {
        entries
            .iter()
            .find(|(id, name)| id.as_str() == item || name.as_str() == item)
            .cloned()
    });
    match found {
        Some((id, name)) => (200, json!({"id": id, "name": name}).to_string()),
        None => (404, json!({"error": "not found"}).to_string()),
    }
}

fn handle_mutate(
    state: &Arc<ServerState>,
    collection: &str,
    item: &str,
    remove: bool,
) -> (u16, String) {
    let Ok(mut resources) = state.resources.lock() else {
        return (500, json!({"error": "poisoned"}).to_string());
    };
    let Some(entries) = resources.get_mut(collection) else {
        return (404, json!({"error": "not found"}).to_string());
    };
    let position = entries
        .iter()
        .position(|(id, name)| id.as_str() == item || name.as_str() == item);
    match position {
        Some(position) => {
            if remove {
                entries.remove(position);
            }
            (204, String::new())
        }
        None => (404, json!({"error": "not found"}).to_string()),
    }
}

/// Run the `kcload` binary and capture output.
pub fn run_kcload<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_kcload"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run kcload failed: {}", err))
}
