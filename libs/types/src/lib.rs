//! # Screener Types
//!
//! Data model shared by the extraction engine and the streaming service.
//!
//! ## Design Philosophy
//!
//! - **Pure Data**: no I/O and no decoding rules; those live in `codec`
//! - **Partial By Default**: every market field on [`TokenProfile`] is optional
//! - **Derived Counts**: [`ExtractedTokenBatch`] computes its statistics once, at
//!   construction, from the list it owns
//!
//! ## Lifecycle
//!
//! ```text
//! NumericCandidate ─▶ ClassifiedField ─┐
//!                                      ├─▶ CandidateRecord ─▶ TokenProfile ─▶ ExtractedTokenBatch
//! MetadataItem / SymbolCandidate ──────┘
//! ```
//!
//! Candidates and records are ephemeral and live for one scan pass. Profiles are
//! immutable once built and are owned by the batch that contains them.

pub mod batch;
pub mod candidates;
pub mod metadata;
pub mod profile;
pub mod record;

pub use batch::{rank_descending, ExtractedTokenBatch};
pub use candidates::{ClassifiedField, Encoding, FieldKind, NumericCandidate};
pub use metadata::{
    AddressKind, MetadataItem, MetadataKind, SymbolCandidate, SymbolSource, UrlKind,
};
pub use profile::{
    OhlcCandle, TokenProfile, COMPLETE_MIN_CONFIDENCE, COMPLETE_MIN_FIELDS,
    HIGH_CONFIDENCE_THRESHOLD,
};
pub use record::{CandidateRecord, FieldMap};
