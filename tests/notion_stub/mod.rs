use std::collections::HashMap;
use std::io::Read as _;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

/// In-memory page tree behind a tiny_http server speaking just enough of
/// the blocks-and-pages API for the tests: child listing, page creation,
/// child append, and page retrieval.
pub struct NotionStub {
    pub base_url: String,
    pub root_id: String,
    state: Arc<Mutex<StubState>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[derive(Default)]
struct StubState {
    pages: HashMap<String, StubPage>,
    created_titles: Vec<String>,
    appended: Vec<Value>,
    child_listings: usize,
    fail_append: bool,
    next_id: usize,
}

struct StubPage {
    title: String,
    children: Vec<String>,
}

impl NotionStub {
    pub fn spawn(root_title: &str) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start notion stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/v1");

        let root_id = "page-0".to_owned();
        let mut initial = StubState {
            next_id: 1,
            ..StubState::default()
        };
        initial.pages.insert(
            root_id.clone(),
            StubPage {
                title: root_title.to_owned(),
                children: Vec::new(),
            },
        );
        let state = Arc::new(Mutex::new(initial));

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let thread_state = Arc::clone(&state);

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                handle_request(&thread_state, request);
            }
        });

        Self {
            base_url,
            root_id,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

#[allow(dead_code)]
impl NotionStub {
    /// Seeds a child page directly, bypassing the HTTP surface.
    pub fn add_page(&self, parent_id: &str, title: &str) -> String {
        let mut state = self.state.lock().expect("lock stub state");
        let id = format!("page-{}", state.next_id);
        state.next_id += 1;
        state.pages.insert(
            id.clone(),
            StubPage {
                title: title.to_owned(),
                children: Vec::new(),
            },
        );
        if let Some(parent) = state.pages.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        id
    }

    pub fn set_fail_append(&self, fail: bool) {
        self.state.lock().expect("lock stub state").fail_append = fail;
    }

    /// Titles created through `POST /pages`, in order.
    pub fn created_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("lock stub state")
            .created_titles
            .clone()
    }

    /// Bodies received by `PATCH /blocks/{id}/children`, in order.
    pub fn appended(&self) -> Vec<Value> {
        self.state.lock().expect("lock stub state").appended.clone()
    }

    /// Number of `GET /blocks/{id}/children` requests served.
    pub fn child_listings(&self) -> usize {
        self.state.lock().expect("lock stub state").child_listings
    }
}

impl Drop for NotionStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_request(state: &Mutex<StubState>, mut request: tiny_http::Request) {
    let path = request
        .url()
        .split('?')
        .next()
        .unwrap_or_default()
        .to_owned();
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    let mut body = String::new();
    if request.as_reader().read_to_string(&mut body).is_err() {
        respond(request, 400, &json!({ "message": "invalid request body" }));
        return;
    }
    let method = request.method().clone();

    let mut state = state.lock().expect("lock stub state");
    match (method, segments.as_slice()) {
        (tiny_http::Method::Get, ["v1", "blocks", id, "children"]) => {
            state.child_listings += 1;
            let Some(page) = state.pages.get(*id) else {
                respond(
                    request,
                    404,
                    &json!({ "message": format!("Could not find block with ID: {id}") }),
                );
                return;
            };
            let results: Vec<Value> = page
                .children
                .iter()
                .filter_map(|child_id| {
                    state.pages.get(child_id).map(|child| {
                        json!({
                            "object": "block",
                            "id": child_id,
                            "type": "child_page",
                            "child_page": { "title": child.title }
                        })
                    })
                })
                .collect();
            respond(
                request,
                200,
                &json!({ "object": "list", "results": results, "has_more": false }),
            );
        }
        (tiny_http::Method::Post, ["v1", "pages"]) => {
            let parsed: Value = match serde_json::from_str(&body) {
                Ok(value) => value,
                Err(_) => {
                    respond(request, 400, &json!({ "message": "body failed validation" }));
                    return;
                }
            };
            let Some(parent_id) = parsed.pointer("/parent/page_id").and_then(Value::as_str)
            else {
                respond(request, 400, &json!({ "message": "missing parent.page_id" }));
                return;
            };
            let Some(title) = parsed
                .pointer("/properties/title/title/0/text/content")
                .and_then(Value::as_str)
            else {
                respond(request, 400, &json!({ "message": "missing title" }));
                return;
            };
            if !state.pages.contains_key(parent_id) {
                respond(
                    request,
                    404,
                    &json!({ "message": format!("Could not find page with ID: {parent_id}") }),
                );
                return;
            }

            let parent_id = parent_id.to_owned();
            let title = title.to_owned();
            let id = format!("page-{}", state.next_id);
            state.next_id += 1;
            state.pages.insert(
                id.clone(),
                StubPage {
                    title: title.clone(),
                    children: Vec::new(),
                },
            );
            if let Some(parent) = state.pages.get_mut(&parent_id) {
                parent.children.push(id.clone());
            }
            state.created_titles.push(title);
            respond(request, 200, &json!({ "object": "page", "id": id }));
        }
        (tiny_http::Method::Patch, ["v1", "blocks", id, "children"]) => {
            if state.fail_append {
                respond(request, 500, &json!({ "message": "stub append failure" }));
                return;
            }
            let parsed: Value = match serde_json::from_str(&body) {
                Ok(value) => value,
                Err(_) => {
                    respond(request, 400, &json!({ "message": "body failed validation" }));
                    return;
                }
            };
            if !state.pages.contains_key(*id) {
                respond(
                    request,
                    404,
                    &json!({ "message": format!("Could not find block with ID: {id}") }),
                );
                return;
            }
            state.appended.push(parsed);
            respond(request, 200, &json!({ "object": "list", "results": [] }));
        }
        (tiny_http::Method::Get, ["v1", "pages", id]) => {
            let Some(page) = state.pages.get(*id) else {
                respond(
                    request,
                    404,
                    &json!({ "message": format!("Could not find page with ID: {id}") }),
                );
                return;
            };
            respond(
                request,
                200,
                &json!({
                    "object": "page",
                    "id": id,
                    "properties": { "title": { "title": [{ "plain_text": page.title }] } }
                }),
            );
        }
        _ => {
            respond(request, 404, &json!({ "message": format!("no route: {path}") }));
        }
    }
}

fn respond(request: tiny_http::Request, status: u16, body: &Value) {
    let mut response =
        tiny_http::Response::from_string(body.to_string()).with_status_code(status);
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("build header");
    response = response.with_header(header);
    let _ = request.respond(response);
}
