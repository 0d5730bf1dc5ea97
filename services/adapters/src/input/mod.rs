//! Stream input: connection management and the handshake material it needs

pub mod challenge;
pub mod connection;
pub mod headers;

pub use challenge::{ChallengePreparation, ChallengeSession};
pub use connection::{
    expected_backoff, jittered, ConnectionManager, ConnectionPhase, ConnectionState, WsStream,
};
pub use headers::{apply_challenge, HeaderRotation, HeaderSet, USER_AGENTS};
