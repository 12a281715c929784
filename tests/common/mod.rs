#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use dsa_gateway::config::AppConfig;
use serde_json::{Value, json};

/// Runs `configure` as a real HTTP server on an ephemeral port.
pub async fn spawn_stub<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

/// An address nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn gateway_config(tree_api_url: &str, persistence_url: &str) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        tree_api_url: tree_api_url.into(),
        github_token: None,
        persistence_url: persistence_url.into(),
        tree_timeout: Duration::from_secs(5),
        create_timeout: Duration::from_secs(5),
        fallback_catalog: None,
        log_dir: std::env::temp_dir(),
    }
}

/// Listing service serving canned responses keyed by request path.
#[derive(Clone, Default)]
pub struct TreeStub {
    responses: Arc<HashMap<String, (u16, String)>>,
    root_hits: Arc<AtomicUsize>,
    root_headers: Arc<Mutex<HashMap<String, String>>>,
    delay: Option<Duration>,
}

impl TreeStub {
    pub fn new(responses: &[(&str, u16, Value)]) -> Self {
        let responses = responses
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        Self {
            responses: Arc::new(responses),
            ..Self::default()
        }
    }

    /// Answers every request only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Header of the last `/contents` request, lowercased name.
    pub fn root_header(&self, name: &str) -> Option<String> {
        self.root_headers.lock().unwrap().get(name).cloned()
    }

    pub fn root_hits(&self) -> usize {
        self.root_hits.load(Ordering::SeqCst)
    }

    pub fn configure(&self) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static + use<> {
        let stub = web::Data::new(self.clone());
        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(stub.clone())
                .default_service(web::to(serve_contents));
        }
    }
}

async fn serve_contents(req: HttpRequest, stub: web::Data<TreeStub>) -> HttpResponse {
    if req.path() == "/contents" {
        stub.root_hits.fetch_add(1, Ordering::SeqCst);
        let headers = req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        *stub.root_headers.lock().unwrap() = headers;
    }
    if let Some(delay) = stub.delay {
        actix_web::rt::time::sleep(delay).await;
    }
    match stub.responses.get(req.path()) {
        Some((status, body)) => HttpResponse::build(
            actix_web::http::StatusCode::from_u16(*status).expect("valid status"),
        )
        .content_type("application/json")
        .body(body.clone()),
        None => HttpResponse::NotFound().json(json!({"message": "Not Found"})),
    }
}

/// Persistence service that keeps files in memory and versions as `name_vN.ext`.
#[derive(Clone, Default)]
pub struct PersistenceStub {
    files: Arc<Mutex<HashSet<String>>>,
    actions: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl PersistenceStub {
    /// Answers every request only after `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn configure(&self) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static + use<> {
        let stub = web::Data::new(self.clone());
        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(stub.clone())
                .route("/create-file", web::post().to(persist));
        }
    }
}

async fn persist(stub: web::Data<PersistenceStub>, body: web::Json<Value>) -> HttpResponse {
    let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();
    let (top, sub, filename, action) = (
        field("topFolder"),
        field("subFolder"),
        field("filename"),
        field("action"),
    );
    stub.actions.lock().unwrap().push(action.clone());
    if let Some(delay) = stub.delay {
        actix_web::rt::time::sleep(delay).await;
    }

    let base = format!("{top}/{sub}");
    let path = format!("{base}/{filename}");
    let mut files = stub.files.lock().unwrap();

    match action.as_str() {
        "check" if files.contains(&path) => {
            HttpResponse::Ok().json(json!({"exists": true, "path": path}))
        }
        "check" | "overwrite" => {
            files.insert(path.clone());
            HttpResponse::Ok().json(json!({"success": true, "path": path}))
        }
        "version" => {
            let (stem, ext) = match filename.rsplit_once('.') {
                Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
                None => (filename.clone(), String::new()),
            };
            let versioned = (2..)
                .map(|n| format!("{base}/{stem}_v{n}{ext}"))
                .find(|candidate| !files.contains(candidate))
                .expect("free version");
            files.insert(versioned.clone());
            HttpResponse::Ok().json(json!({"success": true, "path": versioned, "versioned": true}))
        }
        "reject" => HttpResponse::Ok()
            .json(json!({"success": false, "message": "Operation cancelled by user"})),
        _ => HttpResponse::BadRequest().json(json!({"error": "Invalid action"})),
    }
}
