//! # Screener Frame Codec - Binary Extraction Engine
//!
//! ## Purpose
//!
//! Reconstructs token records from the undocumented binary frames of the
//! screener stream. The format has no published layout, so field boundaries and
//! types are recovered heuristically:
//! - **Frame location**: version header check and marker-relative data section
//! - **Numeric scanning**: f64/f32 at every byte offset, u32 at aligned offsets
//! - **Classification**: ordered, empirically calibrated value ranges
//! - **Metadata correlation**: addresses, URLs, protocol names, ages, symbols
//! - **Clustering**: overlapping windows reduced to the richest disjoint set
//! - **Profiles and batches**: confidence-scored, ranked and capped
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → services/adapters
//!     ↑           ↓              ↓
//! Pure Data   Decoding       Transport
//! Profiles    Heuristics     WebSocket
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! frame ─▶ locate_data_section ─▶ ClusterAssembler ─▶ ProfileBuilder ─▶ BatchAssembler
//!                                   │ NumericScanner
//!                                   │ ValueClassifier
//!                                   │ MetadataExtractor / SymbolExtractor
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Socket management or reconnection (belongs in `adapter-service`)
//! - Output rendering
//!
//! ## Failure Model
//!
//! Malformed input is never fatal. [`ExtractionEngine::extract_frame`] turns
//! every frame-format problem into an empty batch; only configuration errors
//! are returned to the caller.

pub mod batch;
pub mod classifier;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod profile;
pub mod range_table;
pub mod scanner;
pub mod symbols;

pub use batch::BatchAssembler;
pub use classifier::ValueClassifier;
pub use cluster::{completeness_score, resolve_overlaps, ClusterAssembler, WindowCluster};
pub use config::ExtractionConfig;
pub use engine::ExtractionEngine;
pub use error::{ExtractionError, ExtractionResult};
pub use frame::{frame_version, locate_data_section, DataSection};
pub use metadata::{printable_projection, MetadataExtractor, SOL_MINT};
pub use profile::ProfileBuilder;
pub use range_table::{RangeRule, RangeTable, Tolerance};
pub use scanner::NumericScanner;
pub use symbols::{best_symbol, SymbolExtractor, KNOWN_TICKERS};
