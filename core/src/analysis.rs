//! Stateless request builder and response parser for screenshot analysis.
//!
//! # Design
//! `AnalysisClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the caller executes the round-trip. Unlike
//! report generation there is no candidate probing and no fallback: errors
//! are returned so the verify screen can show them.

use std::fmt;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::redact::redact_identifiers;
use crate::scenario::Scenario;
use crate::verdict::{display_risk, display_verdict};

/// Smallest decoded screenshot accepted, in bytes.
pub const MIN_IMAGE_BYTES: usize = 200;
/// Largest decoded screenshot accepted, in bytes.
pub const MAX_IMAGE_BYTES: usize = 6_000_000;

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:image/(png|jpeg|jpg|webp);base64,(.+)$").expect("data URL pattern compiles")
});

/// Response language requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Ms,
    Zh,
    Ta,
}

impl Lang {
    /// Lenient parse; anything unrecognized is English.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "MS" => Lang::Ms,
            "ZH" => Lang::Zh,
            "TA" => Lang::Ta,
            _ => Lang::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "EN",
            Lang::Ms => "MS",
            Lang::Zh => "ZH",
            Lang::Ta => "TA",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Lang {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Lang {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Lang::parse(&raw))
    }
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub image_data_url: String,
    pub lang: Lang,
}

impl AnalyzeRequest {
    pub fn new(image_data_url: impl Into<String>, lang: Lang) -> Self {
        Self {
            image_data_url: image_data_url.into(),
            lang,
        }
    }

    /// Build a request from raw image bytes and their MIME subtype
    /// (`png`, `jpeg`, `webp`).
    pub fn from_image_bytes(subtype: &str, bytes: &[u8], lang: Lang) -> Self {
        Self::new(
            format!("data:image/{subtype};base64,{}", STANDARD.encode(bytes)),
            lang,
        )
    }
}

/// Check that a data URL holds a plausibly sized base64 screenshot.
pub fn validate_image_data_url(image_data_url: &str) -> Result<(), ApiError> {
    let trimmed = image_data_url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("image_data_url is required".to_string()));
    }
    let caps = DATA_URL.captures(trimmed).ok_or_else(|| {
        ApiError::InvalidInput(
            "image_data_url must be a data URL like data:image/jpeg;base64,...".to_string(),
        )
    })?;
    let raw = STANDARD
        .decode(&caps[2])
        .map_err(|_| ApiError::InvalidInput("invalid base64 in image_data_url".to_string()))?;
    if raw.len() < MIN_IMAGE_BYTES {
        return Err(ApiError::InvalidInput(
            "image data is too small, pick a real screenshot".to_string(),
        ));
    }
    if raw.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::InvalidInput(
            "image too large, try a smaller screenshot".to_string(),
        ));
    }
    Ok(())
}

/// Kind of contact an official resource points to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Phone,
    Url,
    Email,
    #[serde(other)]
    Other,
}

/// A hotline, website, or mailbox vetted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfficialResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parsed result of a screenshot analysis. Every field is optional on the
/// wire and defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScreenshotAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub lang: Lang,
    #[serde(deserialize_with = "null_as_default")]
    pub out_of_scope: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub malaysia_relevance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scenario: String,
    #[serde(deserialize_with = "null_as_default")]
    pub verdict: String,
    #[serde(deserialize_with = "null_as_default")]
    pub risk: String,
    #[serde(deserialize_with = "null_as_default")]
    pub what_the_screenshot_suggests: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_red_flags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub what_to_do_next: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub who_to_contact: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub evidence_to_save: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub message_you_can_copy: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disclaimer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub official_resources: Vec<OfficialResource>,
}

impl ScreenshotAnalysis {
    /// Copy with emails and long numbers removed from every free-text field.
    /// Official resources are left untouched.
    pub fn redacted(&self) -> Self {
        let list = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| redact_identifiers(s))
                .collect()
        };
        Self {
            lang: self.lang,
            out_of_scope: self.out_of_scope,
            malaysia_relevance: redact_identifiers(&self.malaysia_relevance),
            scenario: self.scenario.clone(),
            verdict: self.verdict.clone(),
            risk: self.risk.clone(),
            what_the_screenshot_suggests: redact_identifiers(&self.what_the_screenshot_suggests),
            key_red_flags: list(&self.key_red_flags),
            what_to_do_next: list(&self.what_to_do_next),
            who_to_contact: list(&self.who_to_contact),
            evidence_to_save: list(&self.evidence_to_save),
            message_you_can_copy: redact_identifiers(&self.message_you_can_copy),
            disclaimer: redact_identifiers(&self.disclaimer),
            official_resources: self.official_resources.clone(),
        }
    }

    pub fn verdict_label(&self) -> String {
        display_verdict(&self.verdict, &self.risk)
    }

    pub fn risk_label(&self) -> &'static str {
        display_risk(&self.risk)
    }

    pub fn scenario_key(&self) -> Scenario {
        Scenario::normalize(&self.scenario)
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Synchronous, stateless client for the analysis endpoints.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn build_analyze(&self, input: &AnalyzeRequest) -> Result<HttpRequest, ApiError> {
        validate_image_data_url(&input.image_data_url)?;
        let body = AnalyzeRequest {
            image_data_url: input.image_data_url.trim().to_string(),
            lang: input.lang,
        };
        let body = serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest::post_json(format!("{}/analyze", self.base_url), body))
    }

    pub fn build_resources(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/resources", self.base_url))
    }

    pub fn parse_analyze(&self, response: HttpResponse) -> Result<ScreenshotAnalysis, ApiError> {
        check_status(&response)?;
        let value = unwrap_result(parse_json(&response.body)?);
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Accepts a bare list, `{"result": [...]}`, or the `/hotlines` shape
    /// `{"ok": true, "resources": [...]}`.
    pub fn parse_resources(&self, response: HttpResponse) -> Result<Vec<OfficialResource>, ApiError> {
        check_status(&response)?;
        let mut value = unwrap_result(parse_json(&response.body)?);
        if let Some(resources) = value.get_mut("resources").map(Value::take) {
            value = resources;
        }
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

fn parse_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Responses come either wrapped as `{"result": ...}` or bare.
fn unwrap_result(mut value: Value) -> Value {
    match value.get_mut("result").map(Value::take) {
        Some(inner) if !inner.is_null() => inner,
        _ => value,
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: error_detail(response),
    })
}

/// Human-readable message from an error body. FastAPI puts it in `detail`.
fn error_detail(response: &HttpResponse) -> String {
    let detail = serde_json::from_str::<Value>(&response.body).ok().and_then(|value| {
        ["detail", "error", "message"]
            .iter()
            .filter_map(|field| value.get(*field))
            .find(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    });
    match detail {
        Some(detail) => detail,
        None if !response.body.trim().is_empty() => response.body.clone(),
        None => format!("HTTP {}", response.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AnalysisClient {
        AnalysisClient::new("http://localhost:8000/")
    }

    fn screenshot() -> AnalyzeRequest {
        AnalyzeRequest::from_image_bytes("png", &[7u8; 512], Lang::Ms)
    }

    #[test]
    fn build_analyze_produces_correct_request() {
        let req = client().build_analyze(&screenshot()).unwrap();
        assert_eq!(req.method, crate::http::HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/analyze");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["lang"], "MS");
        assert!(body["image_data_url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn build_analyze_rejects_bad_images() {
        let c = client();
        let cases = [
            AnalyzeRequest::new("", Lang::En),
            AnalyzeRequest::new("https://example.com/x.png", Lang::En),
            AnalyzeRequest::new("data:image/gif;base64,R0lGOD", Lang::En),
            AnalyzeRequest::new("data:image/png;base64,***", Lang::En),
            AnalyzeRequest::from_image_bytes("jpeg", &[1u8; 20], Lang::En),
        ];
        for case in cases {
            let err = c.build_analyze(&case).unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)), "{err}");
        }
    }

    #[test]
    fn data_url_prefix_is_case_insensitive() {
        let req = AnalyzeRequest::from_image_bytes("PNG", &[0u8; 300], Lang::En);
        assert!(validate_image_data_url(&req.image_data_url).is_ok());
    }

    #[test]
    fn build_resources_is_get() {
        let req = client().build_resources();
        assert_eq!(req.method, crate::http::HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/resources");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_analyze_unwraps_result() {
        let body = r#"{"result":{"lang":"ms","verdict":"LIKELY_SCAM","risk":"HIGH",
            "scenario":"COURIER_PARCEL","key_red_flags":["Urgent fee"],
            "official_resources":[{"name":"NSRC","type":"phone","value":"997"}]}}"#;
        let analysis = client().parse_analyze(HttpResponse::json(200, body)).unwrap();
        assert_eq!(analysis.lang, Lang::Ms);
        assert_eq!(analysis.verdict_label(), "HIGH RISK INDICATORS");
        assert_eq!(analysis.risk_label(), "HIGH");
        assert_eq!(analysis.scenario_key(), Scenario::Courier);
        assert_eq!(analysis.official_resources[0].kind, ResourceKind::Phone);
        assert!(analysis.what_to_do_next.is_empty());
    }

    #[test]
    fn parse_analyze_accepts_bare_object() {
        let analysis = client()
            .parse_analyze(HttpResponse::json(200, r#"{"out_of_scope":true}"#))
            .unwrap();
        assert!(analysis.out_of_scope);
    }

    #[test]
    fn parse_analyze_tolerates_null_fields() {
        let body = r#"{"result":{
            "lang": null,
            "verdict": "SUSPICIOUS",
            "risk": null,
            "out_of_scope": null,
            "key_red_flags": null,
            "what_to_do_next": ["Do not pay"],
            "who_to_contact": null,
            "evidence_to_save": null,
            "message_you_can_copy": null,
            "official_resources": null
        }}"#;
        let analysis = client().parse_analyze(HttpResponse::json(200, body)).unwrap();
        assert_eq!(analysis.lang, Lang::En);
        assert_eq!(analysis.verdict, "SUSPICIOUS");
        assert_eq!(analysis.risk, "");
        assert!(!analysis.out_of_scope);
        assert!(analysis.key_red_flags.is_empty());
        assert_eq!(analysis.what_to_do_next, vec!["Do not pay"]);
        assert!(analysis.official_resources.is_empty());
        assert_eq!(analysis.risk_label(), "LOW");
    }

    #[test]
    fn parse_analyze_surfaces_detail() {
        let resp = HttpResponse::json(400, r#"{"detail":"Invalid base64 in image_data_url."}"#);
        let err = client().parse_analyze(resp).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                body: "Invalid base64 in image_data_url.".to_string()
            }
        );
    }

    #[test]
    fn parse_analyze_error_without_body() {
        let err = client().parse_analyze(HttpResponse::new(503, "")).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 503,
                body: "HTTP 503".to_string()
            }
        );
        let err = client().parse_analyze(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_analyze_bad_json() {
        let err = client()
            .parse_analyze(HttpResponse::json(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_resources_accepts_all_shapes() {
        let item = r#"{"name":"Cyber999 email","type":"email","value":"cyber999@cybersecurity.my"}"#;
        let shapes = [
            format!("[{item}]"),
            format!(r#"{{"result":[{item}]}}"#),
            format!(r#"{{"ok":true,"resources":[{item}]}}"#),
        ];
        for body in shapes {
            let resources = client().parse_resources(HttpResponse::json(200, body)).unwrap();
            assert_eq!(resources.len(), 1);
            assert_eq!(resources[0].kind, ResourceKind::Email);
            assert_eq!(resources[0].notes, None);
        }
    }

    #[test]
    fn unknown_resource_kind_is_other() {
        let body = r#"[{"name":"Clinic","type":"address","value":"Jalan 1"}]"#;
        let resources = client().parse_resources(HttpResponse::json(200, body)).unwrap();
        assert_eq!(resources[0].kind, ResourceKind::Other);
    }

    #[test]
    fn redacted_strips_identifiers_but_keeps_resources() {
        let analysis = ScreenshotAnalysis {
            what_the_screenshot_suggests: "Sender 0123456789 asks for payment".to_string(),
            key_red_flags: vec!["Reply to pay@fake.my".to_string(), String::new()],
            official_resources: vec![OfficialResource {
                name: "Cyber999 email".to_string(),
                kind: ResourceKind::Email,
                value: "cyber999@cybersecurity.my".to_string(),
                notes: None,
            }],
            ..ScreenshotAnalysis::default()
        };
        let safe = analysis.redacted();
        assert_eq!(
            safe.what_the_screenshot_suggests,
            "Sender [redacted number] asks for payment"
        );
        assert_eq!(safe.key_red_flags, vec!["Reply to [redacted email]".to_string()]);
        assert_eq!(safe.official_resources[0].value, "cyber999@cybersecurity.my");
    }

    #[test]
    fn lang_parse_is_lenient() {
        assert_eq!(Lang::parse(" ta "), Lang::Ta);
        assert_eq!(Lang::parse("fr"), Lang::En);
        assert_eq!(Lang::Zh.to_string(), "ZH");
    }
}
