//! Client core for the Berani / Waspada incident and scam-check backend.
//!
//! # Overview
//! Report drafting and the support chat must always show the user something,
//! even fully offline. `BeraniClient` posts to an ordered list of candidate
//! endpoints, takes the first usable answer, and otherwise synthesizes a
//! local reply that carries Malaysian emergency contacts.
//!
//! # Design
//! - Request building, candidate probing, and response interpretation are
//!   pure; only `Transport::execute` touches the network.
//! - `probe::try_in_order` is the single short-circuiting combinator over
//!   candidates; 404 means "not here" and never counts as a failure.
//! - Screenshot analysis keeps a `build_*` / `parse_*` split so a mobile host
//!   can run the I/O itself through the FFI crate.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod http;
pub mod plans;
pub mod probe;
pub mod redact;
pub mod scenario;
pub mod transport;
pub mod types;
pub mod verdict;

pub use analysis::{AnalysisClient, AnalyzeRequest, Lang, OfficialResource, ResourceKind, ScreenshotAnalysis};
pub use client::{BeraniClient, Reply, ReplyOrigin};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use plans::{action_plan, ActionPlan};
pub use probe::{Attempt, AttemptOutcome, Candidate, FallbackReason};
pub use redact::redact_identifiers;
pub use scenario::Scenario;
pub use transport::{Transport, UreqTransport};
pub use types::{ChatMessage, ChatPayload, Operation, ReportPayload, Role};
