//! Profile discovery and validation for company social accounts.
//!
//! [`candidates::CandidateSource`] proposes profile URLs for a company,
//! [`validate::ProfileValidator`] accepts or rejects each one against the
//! rendered page, and [`platforms`] carries the per-platform knowledge both
//! of them share. Content retrieval and web search sit behind the
//! [`fetch::PageFetcher`] and [`search::SearchBackend`] traits.

pub mod candidates;
pub mod document;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod parse;
pub mod platforms;
pub mod search;
pub mod validate;

mod pacing;

pub use candidates::{Candidate, CandidateOrigin, CandidateSource, Candidates};
pub use document::Document;
pub use error::ScraperError;
pub use fetch::{
    ContentFetcher, FetchFailure, FetchResult, HttpFetcher, PageFetcher, RenderedFetcher,
};
pub use normalize::{contains_name, normalize_company_name, normalize_text};
pub use parse::parse_count;
pub use platforms::{canonicalize, strategy_for, ProfileStrategy};
pub use search::{BingSearch, SearchBackend, SearchHit};
pub use validate::{decide, MatchSignals, ProfileValidator, RejectReason, ValidationOutcome};
