use std::{collections::HashMap, sync::Arc, sync::LazyLock};

use axum::{
    extract::{Request, State},
    http::{header, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Request paths in arrival order, shared with tests.
pub type Hits = Arc<RwLock<Vec<String>>>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub notes: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ReportRequest {
    pub category: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    #[serde(rename = "timeISO")]
    pub time_iso: String,
    #[serde(rename = "locationText")]
    pub location_text: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub image_data_url: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// A fixed response served by `scripted`.
#[derive(Clone, Debug)]
pub struct Canned {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: body.to_string(),
        }
    }
}

impl IntoResponse for Canned {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

const MIN_IMAGE_BYTES: usize = 200;
const MAX_IMAGE_BYTES: usize = 6_000_000;

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:image/(png|jpeg|jpg|webp);base64,(.+)$").expect("data URL pattern compiles")
});

pub fn official_resources() -> Vec<Resource> {
    let entry = |name: &str, kind: &str, value: &str, notes: &str| Resource {
        name: name.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
        notes: notes.to_string(),
    };
    vec![
        entry(
            "National Scam Response Centre (NSRC)",
            "phone",
            "997",
            "Malaysia. For online financial fraud / funds moved.",
        ),
        entry(
            "PDRM Semak Mule",
            "url",
            "https://semakmule.rmp.gov.my/",
            "Check mule accounts/phone numbers.",
        ),
        entry(
            "Cyber999 email",
            "email",
            "cyber999@cybersecurity.my",
            "CyberSecurity Malaysia / MyCERT.",
        ),
        entry(
            "NFCC (National Anti-Financial Crime Centre)",
            "url",
            "https://nfcc.jpm.gov.my/",
            "NSRC owner agency info.",
        ),
    ]
}

/// The backend as a real deployment exposes it: report lives under
/// `/api/report`, chat under `/chat`, everything else is 404.
pub fn app() -> Router {
    app_with_hits().0
}

pub fn app_with_hits() -> (Router, Hits) {
    let hits: Hits = Arc::new(RwLock::new(Vec::new()));
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/report", post(generate_report))
        .route("/chat", post(chat))
        .route("/analyze", post(analyze))
        .route("/resources", get(resources))
        .route("/hotlines", get(hotlines))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(hits.clone(), record));
    (router, hits)
}

/// A backend that answers only the given paths, with fixed responses, for
/// any method. Unlisted paths are 404.
pub fn scripted<I>(routes: I) -> (Router, Hits)
where
    I: IntoIterator<Item = (&'static str, Canned)>,
{
    let hits: Hits = Arc::new(RwLock::new(Vec::new()));
    let table: Arc<HashMap<String, Canned>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, canned)| (path.to_string(), canned))
            .collect(),
    );
    let router = Router::new()
        .fallback(move |uri: Uri| {
            let table = table.clone();
            async move {
                match table.get(uri.path()) {
                    Some(canned) => canned.clone().into_response(),
                    None => StatusCode::NOT_FOUND.into_response(),
                }
            }
        })
        .layer(middleware::from_fn_with_state(hits.clone(), record));
    (router, hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn record(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    tracing::debug!(method = %request.method(), %path, "request");
    hits.write().await.push(path);
    next.run(request).await
}

async fn root() -> Json<Value> {
    Json(json!({"ok": true, "service": "berani-mock"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn generate_report(Json(input): Json<ReportRequest>) -> Json<Value> {
    let id = Uuid::new_v4();
    let or_dash = |s: &str| if s.trim().is_empty() { "-".to_string() } else { s.trim().to_string() };
    let report = format!(
        "INCIDENT REPORT\nReference: {id}\nCategory: {}\nDate: {}\nTime: {}\nLocation: {}\n\nSummary:\n{}",
        or_dash(&input.category),
        or_dash(&input.date_iso),
        or_dash(&input.time_iso),
        or_dash(&input.location_text),
        or_dash(&input.description),
    );
    Json(json!({"id": id, "report": report}))
}

async fn chat(Json(input): Json<ChatRequest>) -> Json<Value> {
    let last = input
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.trim())
        .unwrap_or("");
    let reply = if last.is_empty() {
        "Tell me what happened and I'll help you write it down.".to_string()
    } else {
        format!("I hear you: \"{last}\". You're not alone. If you're in danger, call 999.")
    };
    Json(json!({"reply": reply}))
}

async fn analyze(Json(input): Json<AnalyzeRequest>) -> Response {
    if let Err(detail) = validate_image_data_url(&input.image_data_url) {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": detail}))).into_response();
    }
    let lang = match input.lang.as_deref().map(|l| l.trim().to_uppercase()) {
        Some(l) if ["EN", "MS", "ZH", "TA"].contains(&l.as_str()) => l,
        _ => "EN".to_string(),
    };
    let result = json!({
        "lang": lang,
        "out_of_scope": false,
        "malaysia_relevance": "Mentions a Malaysian courier and a local bank.",
        "scenario": "COURIER_PARCEL",
        "verdict": "SUSPICIOUS",
        "risk": "MEDIUM",
        "what_the_screenshot_suggests": "A message asking for a redelivery fee via a link. Sender +60 12-345 6789.",
        "key_red_flags": ["Urgent payment request", "Shortened link"],
        "what_to_do_next": ["Do not click the link", "Check the tracking number on the courier's official site"],
        "who_to_contact": ["National Scam Response Centre (NSRC)", "your bank's 24/7 hotline"],
        "evidence_to_save": ["Screenshot of the message", "Sender number"],
        "message_you_can_copy": "I received a suspicious parcel fee request. Please do not pay it.",
        "disclaimer": "This is AI-generated guidance based on the screenshot and may be wrong or incomplete.",
        "official_resources": official_resources(),
    });
    Json(json!({"result": result})).into_response()
}

async fn resources() -> Json<Value> {
    Json(json!({"result": official_resources()}))
}

async fn hotlines() -> Json<Value> {
    Json(json!({"ok": true, "resources": official_resources()}))
}

fn validate_image_data_url(image_data_url: &str) -> Result<(), String> {
    let trimmed = image_data_url.trim();
    if trimmed.is_empty() {
        return Err("image_data_url is required.".to_string());
    }
    let caps = DATA_URL
        .captures(trimmed)
        .ok_or_else(|| "Invalid image_data_url. Must be a data URL like data:image/jpeg;base64,...".to_string())?;
    let raw = STANDARD
        .decode(&caps[2])
        .map_err(|_| "Invalid base64 in image_data_url.".to_string())?;
    if raw.len() < MIN_IMAGE_BYTES {
        return Err("Image data is too small. Please pick a real screenshot.".to_string());
    }
    if raw.len() > MAX_IMAGE_BYTES {
        return Err("Image too large. Try a smaller screenshot.".to_string());
    }
    Ok(())
}
