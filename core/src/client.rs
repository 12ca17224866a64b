//! The resilient Berani API client.
//!
//! # Design
//! `BeraniClient` owns an injected `ClientConfig` and a `Transport`, and
//! carries no mutable state between calls. `generate_report` and
//! `send_message` probe their candidate endpoints one at a time through
//! `probe::try_in_order` and turn exhaustion into a local fallback, so they
//! return a `Reply` rather than a `Result`. The analysis endpoints go through
//! `AnalysisClient` and do return errors.

use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::analysis::{AnalysisClient, AnalyzeRequest, OfficialResource, ScreenshotAnalysis};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::extract;
use crate::fallback;
use crate::http::HttpRequest;
use crate::probe::{self, Attempt, Candidate, FallbackReason, ProbeOutcome, Step};
use crate::transport::{Transport, UreqTransport};
use crate::types::{ChatPayload, Operation, ReportPayload};

/// Where a reply's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOrigin {
    Remote { url: String },
    Fallback(FallbackReason),
}

/// Text shown to the user, plus a record of how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub origin: ReplyOrigin,
    pub attempts: Vec<Attempt>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, ReplyOrigin::Fallback(_))
    }
}

#[derive(Debug, Clone)]
pub struct BeraniClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl BeraniClient<UreqTransport> {
    /// Client using a blocking `ureq` transport with the configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self { config, transport }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<T: Transport> BeraniClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn report_candidates(&self) -> Vec<Candidate> {
        probe::candidates(
            &self.config.base_url,
            self.config.report_path.as_deref(),
            Operation::GenerateReport.default_paths(),
        )
    }

    pub fn chat_candidates(&self) -> Vec<Candidate> {
        probe::candidates(
            &self.config.base_url,
            self.config.chat_path.as_deref(),
            Operation::SendMessage.default_paths(),
        )
    }

    /// Draft an incident report. Never fails; see `Reply::origin`.
    pub fn generate_report(&self, payload: &ReportPayload) -> Reply {
        self.deliver(
            Operation::GenerateReport,
            &self.report_candidates(),
            payload,
            || fallback::report(payload),
        )
    }

    /// Ask the support assistant. Never fails; see `Reply::origin`.
    pub fn send_message(&self, payload: &ChatPayload) -> Reply {
        self.deliver(
            Operation::SendMessage,
            &self.chat_candidates(),
            payload,
            || fallback::chat(payload),
        )
    }

    pub fn analyze_screenshot(&self, input: &AnalyzeRequest) -> Result<ScreenshotAnalysis, ApiError> {
        let analysis = self.analysis_client()?;
        let request = analysis.build_analyze(input)?;
        analysis.parse_analyze(self.transport.execute(&request)?)
    }

    pub fn resources(&self) -> Result<Vec<OfficialResource>, ApiError> {
        let analysis = self.analysis_client()?;
        let request = analysis.build_resources();
        analysis.parse_resources(self.transport.execute(&request)?)
    }

    /// Request builder for the analysis endpoints; a `Config` error when offline.
    pub fn analysis_client(&self) -> Result<AnalysisClient, ApiError> {
        if self.config.is_offline() {
            return Err(ApiError::Config("no backend base URL configured".to_string()));
        }
        Ok(AnalysisClient::new(&self.config.base_url))
    }

    fn deliver<P, F>(&self, op: Operation, candidates: &[Candidate], payload: &P, fallback: F) -> Reply
    where
        P: Serialize,
        F: FnOnce() -> String,
    {
        let _span = info_span!("deliver", op = op.name()).entered();

        let probe = match serde_json::to_string(payload) {
            Ok(body) => probe::try_in_order(candidates, |candidate| self.attempt(op, candidate, &body)),
            Err(e) => {
                warn!(error = %e, "payload did not serialize, skipping network");
                probe::Probe {
                    outcome: ProbeOutcome::Exhausted(FallbackReason::Failed {
                        last_error: ApiError::Serialization(e.to_string()).to_string(),
                    }),
                    attempts: Vec::new(),
                }
            }
        };

        match probe.outcome {
            ProbeOutcome::Found { url, value } => {
                info!(url = %url, attempts = probe.attempts.len(), "remote reply");
                Reply {
                    text: value,
                    origin: ReplyOrigin::Remote { url },
                    attempts: probe.attempts,
                }
            }
            ProbeOutcome::Exhausted(reason) => {
                match &reason {
                    FallbackReason::Failed { last_error } => warn!(
                        reason = reason.label(),
                        attempts = probe.attempts.len(),
                        last_error = %last_error,
                        "all candidates exhausted, using local fallback"
                    ),
                    _ => info!(
                        reason = reason.label(),
                        attempts = probe.attempts.len(),
                        "using local fallback"
                    ),
                }
                Reply {
                    text: fallback(),
                    origin: ReplyOrigin::Fallback(reason),
                    attempts: probe.attempts,
                }
            }
        }
    }

    fn attempt(&self, op: Operation, candidate: &Candidate, body: &str) -> Step<String> {
        let request = HttpRequest::post_json(candidate.url.clone(), body.to_string());
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => return Step::Failed(e),
        };
        if response.status == 404 {
            return Step::NotFound;
        }
        if !response.is_success() {
            return Step::Failed(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        let text = extract::response_text(&response, op.result_fields());
        if text.trim().is_empty() {
            return Step::Failed(ApiError::Deserialization("empty response body".to_string()));
        }
        Step::Done(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::http::{HttpMethod, HttpResponse};
    use crate::probe::AttemptOutcome;
    use crate::types::ChatMessage;

    const BASE: &str = "http://api.test";

    /// Answers by URL path; unknown paths get 404. Records every request.
    #[derive(Default)]
    struct Scripted {
        routes: HashMap<String, Result<HttpResponse, ApiError>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn route(mut self, path: &str, response: Result<HttpResponse, ApiError>) -> Self {
            self.routes.insert(format!("{BASE}{path}"), response);
            self
        }

        fn paths(&self) -> Vec<String> {
            self.seen
                .borrow()
                .iter()
                .map(|r| r.url.trim_start_matches(BASE).to_string())
                .collect()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            self.routes
                .get(&request.url)
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        }
    }

    fn client(script: Scripted) -> BeraniClient<Scripted> {
        BeraniClient::with_transport(ClientConfig::new(BASE), script)
    }

    fn report() -> ReportPayload {
        ReportPayload::new("Other", "Someone threatened me")
    }

    #[test]
    fn report_posts_json_to_first_candidate() {
        let c = client(Scripted::default().route("/report", Ok(HttpResponse::json(200, r#"{"report":"Drafted"}"#))));
        let reply = c.generate_report(&report());

        assert_eq!(reply.text, "Drafted");
        assert_eq!(
            reply.origin,
            ReplyOrigin::Remote {
                url: format!("{BASE}/report")
            }
        );
        let seen = c.transport().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(
            seen[0].headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["category"], "Other");
        assert_eq!(body["description"], "Someone threatened me");
        assert_eq!(body["locationText"], "");
    }

    #[test]
    fn success_at_each_position_stops_probing() {
        let paths = Operation::GenerateReport.default_paths();
        for (n, winner) in paths.iter().enumerate() {
            let c = client(Scripted::default().route(winner, Ok(HttpResponse::json(200, r#"{"report":"ok"}"#))));
            let reply = c.generate_report(&report());
            assert!(!reply.is_fallback());
            let expected: Vec<String> = paths[..=n].iter().map(|p| p.to_string()).collect();
            assert_eq!(c.transport().paths(), expected, "winner {winner}");
        }
    }

    #[test]
    fn override_is_tried_first() {
        let config = ClientConfig::new(BASE).with_chat_path("/assistant");
        let script = Scripted::default().route("/assistant", Ok(HttpResponse::json(200, r#"{"answer":"hi"}"#)));
        let c = BeraniClient::with_transport(config, script);
        let reply = c.send_message(&ChatPayload::new(vec![ChatMessage::user("hello")]));
        assert_eq!(reply.text, "hi");
        assert_eq!(c.transport().paths(), vec!["/assistant"]);
    }

    #[test]
    fn all_not_found_falls_back() {
        let c = client(Scripted::default());
        let reply = c.generate_report(&report());
        assert_eq!(reply.origin, ReplyOrigin::Fallback(FallbackReason::AllNotFound));
        assert_eq!(reply.text, fallback::report(&report()));
        assert_eq!(reply.attempts.len(), Operation::GenerateReport.default_paths().len());
        assert!(reply
            .attempts
            .iter()
            .all(|a| a.outcome == AttemptOutcome::NotFound));
    }

    #[test]
    fn every_candidate_failing_still_replies() {
        let failing = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection reset".to_string()))
        };
        let c = BeraniClient::with_transport(ClientConfig::new(BASE), failing);

        let reply = c.generate_report(&report());
        assert!(reply.is_fallback());
        assert!(reply.text.contains("999"));
        assert!(reply.text.contains("Talian Kasih 15999"));
        match &reply.origin {
            ReplyOrigin::Fallback(FallbackReason::Failed { last_error }) => {
                assert!(last_error.contains("connection reset"));
            }
            other => panic!("unexpected origin: {other:?}"),
        }

        let reply = c.send_message(&ChatPayload::default());
        assert_eq!(reply.text, fallback::chat(&ChatPayload::default()));
        assert_eq!(reply.attempts.len(), Operation::SendMessage.default_paths().len());
    }

    #[test]
    fn server_error_does_not_abort_sequence() {
        let c = client(
            Scripted::default()
                .route("/report", Ok(HttpResponse::new(500, "internal error")))
                .route("/api/report", Ok(HttpResponse::json(200, r#"{"summary":"From summary"}"#))),
        );
        let reply = c.generate_report(&report());
        assert_eq!(reply.text, "From summary");
        assert_eq!(
            reply.attempts[0].outcome,
            AttemptOutcome::Failed("HTTP 500: internal error".to_string())
        );
    }

    #[test]
    fn empty_base_url_makes_no_requests() {
        let calls = RefCell::new(0);
        let counting = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            *calls.borrow_mut() += 1;
            Ok(HttpResponse::json(200, r#"{"report":"never"}"#))
        };
        let c = BeraniClient::with_transport(ClientConfig::new("  "), counting);
        let reply = c.generate_report(&report());
        assert_eq!(reply.origin, ReplyOrigin::Fallback(FallbackReason::NoBaseUrl));
        assert!(reply.attempts.is_empty());
        drop(c);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn plain_text_success_is_raw() {
        let c = client(Scripted::default().route(
            "/chat",
            Ok(HttpResponse::new(200, "Stay safe.").with_header("content-type", "text/plain")),
        ));
        let reply = c.send_message(&ChatPayload::default());
        assert_eq!(reply.text, "Stay safe.");
    }

    #[test]
    fn blank_success_moves_on() {
        let c = client(
            Scripted::default()
                .route("/chat", Ok(HttpResponse::json(200, "")))
                .route("/api/chat", Ok(HttpResponse::json(200, r#"{"reply":"second"}"#))),
        );
        let reply = c.send_message(&ChatPayload::default());
        assert_eq!(reply.text, "second");
        assert_eq!(c.transport().paths(), vec!["/chat", "/api/chat"]);
    }

    #[test]
    fn analysis_requires_base_url() {
        let c = BeraniClient::with_transport(ClientConfig::default(), Scripted::default());
        let err = c.resources().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(c.transport().seen.borrow().is_empty());

        let blank = ClientConfig {
            base_url: "  ".to_string(),
            ..ClientConfig::default()
        };
        let c = BeraniClient::with_transport(blank, Scripted::default());
        assert!(matches!(c.analysis_client(), Err(ApiError::Config(_))));
    }

    #[test]
    fn resources_go_through_transport() {
        let c = client(Scripted::default().route(
            "/resources",
            Ok(HttpResponse::json(
                200,
                r#"{"result":[{"name":"NSRC","type":"phone","value":"997"}]}"#,
            )),
        ));
        let resources = c.resources().unwrap();
        assert_eq!(resources[0].value, "997");
        assert_eq!(c.transport().seen.borrow()[0].method, HttpMethod::Get);
    }
}
