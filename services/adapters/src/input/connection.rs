//! WebSocket connection management with retry and backoff
//!
//! Phases: `Idle → Connecting → Connected → (Closing | Failed) → Idle`.
//!
//! Every `connect()` call gets a fresh attempt budget. Within a call, the n-th
//! consecutive failure waits `base * 2^min(n, cap)` seconds scaled by a uniform
//! jitter factor before the next attempt. Success resets the failure count so
//! backoff never carries over between unrelated sessions.

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::challenge::ChallengeSession;
use super::headers::{apply_challenge, HeaderRotation, HeaderSet};
use crate::config::ConnectionSettings;
use crate::rate_limit::RateLimiter;
use crate::{AdapterError, Result};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Not connected
    Idle,
    /// Handshake in progress, including backoff between attempts
    Connecting,
    /// Socket open
    Connected,
    /// Closing the socket
    Closing,
    /// The last connect call exhausted its attempts
    Failed,
}

/// Snapshot of the manager's bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub phase: ConnectionPhase,
    /// Consecutive failures within the current connect call
    pub retry_count: u32,
    /// User agent index the next handshake will use
    pub header_rotation_index: usize,
    pub last_request_time: Option<Instant>,
    pub min_interval: Duration,
}

/// Jitter-free backoff for the n-th consecutive failure
///
/// Saturates at `Duration::MAX` instead of overflowing.
pub fn expected_backoff(base_secs: f64, failures: u32, exponent_cap: u32) -> Duration {
    let exponent = failures.min(exponent_cap).min(64) as i32;
    Duration::try_from_secs_f64(base_secs * 2f64.powi(exponent)).unwrap_or(Duration::MAX)
}

/// Scales `expected` by a uniform factor in `[1 - jitter, 1 + jitter]`
pub fn jittered<R: Rng>(expected: Duration, jitter: f64, rng: &mut R) -> Duration {
    let factor = rng.gen_range((1.0 - jitter)..=(1.0 + jitter));
    Duration::try_from_secs_f64(expected.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

/// WebSocket connection manager with rate limiting and retry
pub struct ConnectionManager {
    url: String,
    settings: ConnectionSettings,
    phase: ConnectionPhase,
    retry_count: u32,
    rate_limiter: RateLimiter,
    headers: HeaderRotation,
    challenge: Option<ChallengeSession>,
    websocket: Option<WsStream>,
}

impl ConnectionManager {
    /// Create a manager for `url`; a challenge session is created when bypass is enabled
    pub fn new(url: impl Into<String>, settings: ConnectionSettings) -> Result<Self> {
        settings.validate().map_err(AdapterError::Configuration)?;

        let challenge = if settings.challenge_bypass {
            Some(ChallengeSession::new(&settings)?)
        } else {
            None
        };

        Ok(Self {
            url: url.into(),
            rate_limiter: RateLimiter::new(settings.rate_limit_per_sec)?,
            settings,
            phase: ConnectionPhase::Idle,
            retry_count: 0,
            headers: HeaderRotation::new(),
            challenge,
            websocket: None,
        })
    }

    /// Replace the challenge session, enabling bypass
    pub fn with_challenge_session(mut self, session: ChallengeSession) -> Self {
        self.challenge = Some(session);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState {
            phase: self.phase,
            retry_count: self.retry_count,
            header_rotation_index: self.headers.index(),
            last_request_time: self.rate_limiter.last_request(),
            min_interval: self.rate_limiter.min_interval(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected && self.websocket.is_some()
    }

    /// Expected delay after `failures` consecutive failures
    pub fn expected_backoff(&self, failures: u32) -> Duration {
        expected_backoff(
            self.settings.backoff_base_secs,
            failures,
            self.settings.backoff_exponent_cap,
        )
    }

    /// Jittered delay after `failures` consecutive failures
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        jittered(
            self.expected_backoff(failures),
            self.settings.backoff_jitter,
            &mut rand::thread_rng(),
        )
    }

    /// Connect, retrying with backoff up to `max_retries` attempts
    ///
    /// Returns immediately when already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        self.retry_count = 0;

        loop {
            self.phase = ConnectionPhase::Connecting;

            match self.attempt().await {
                Ok(websocket) => {
                    self.websocket = Some(websocket);
                    self.phase = ConnectionPhase::Connected;
                    self.retry_count = 0;
                    info!("Connected to {}", self.url);
                    return Ok(());
                }
                Err(e) if e.is_permanent() => {
                    error!("Connection to {} cannot succeed: {}", self.url, e);
                    self.phase = ConnectionPhase::Failed;
                    return Err(e);
                }
                Err(e) => {
                    self.retry_count += 1;
                    warn!(
                        retry_count = self.retry_count,
                        max_retries = self.settings.max_retries,
                        "Connection attempt to {} failed: {}",
                        self.url,
                        e
                    );

                    if self.retry_count >= self.settings.max_retries {
                        error!(
                            "Max connection attempts ({}) exceeded for {}",
                            self.settings.max_retries, self.url
                        );
                        self.phase = ConnectionPhase::Failed;
                        return Err(AdapterError::MaxReconnectAttemptsExceeded {
                            endpoint: self.url.clone(),
                            max_attempts: self.settings.max_retries,
                        });
                    }

                    let delay = self.backoff_delay(self.retry_count);
                    info!(
                        "Will reconnect to {} in {}ms (attempt {})",
                        self.url,
                        delay.as_millis(),
                        self.retry_count + 1
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One handshake: rate limit, headers, optional cookies, connect
    async fn attempt(&mut self) -> Result<WsStream> {
        self.rate_limiter.wait().await;

        let mut headers = self.headers.next_headers();
        if let Some(session) = self.challenge.as_mut() {
            let prepared = session.prepare().await;
            apply_challenge(&mut headers, &prepared.cookie_header, &prepared.user_agent);
        }

        let request = build_request(&self.url, headers)?;

        match timeout(self.settings.connect_timeout(), connect_async(request)).await {
            Ok(Ok((websocket, response))) => {
                debug!(status = %response.status(), "WebSocket handshake complete");
                Ok(websocket)
            }
            Ok(Err(e)) => Err(AdapterError::ConnectionFailed {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(AdapterError::ConnectionTimeout {
                endpoint: self.url.clone(),
                timeout_ms: self.settings.connect_timeout_ms,
            }),
        }
    }

    /// Send a message through the WebSocket
    pub async fn send(&mut self, message: Message) -> Result<()> {
        let websocket = self.websocket.as_mut().ok_or(AdapterError::NotConnected)?;
        websocket.send(message).await?;
        Ok(())
    }

    /// Next message, waiting at most the receive timeout
    ///
    /// A close frame or the end of the stream drops the socket and is reported
    /// as `ConnectionClosed`.
    pub async fn receive(&mut self) -> Result<Message> {
        let receive_timeout = self.settings.receive_timeout();
        let websocket = self.websocket.as_mut().ok_or(AdapterError::NotConnected)?;
        let next = timeout(receive_timeout, websocket.next()).await;

        match next {
            Err(_) => Err(AdapterError::ReceiveTimeout {
                timeout_ms: self.settings.receive_timeout_ms,
            }),
            Ok(None) => {
                self.discard();
                Err(AdapterError::ConnectionClosed { reason: None })
            }
            Ok(Some(Err(e))) => {
                self.discard();
                Err(AdapterError::WebSocket(e))
            }
            Ok(Some(Ok(Message::Close(frame)))) => {
                self.discard();
                Err(AdapterError::ConnectionClosed {
                    reason: frame.map(|f| f.reason.to_string()),
                })
            }
            Ok(Some(Ok(message))) => Ok(message),
        }
    }

    /// Close the connection gracefully
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut websocket) = self.websocket.take() {
            self.phase = ConnectionPhase::Closing;
            websocket.close(None).await.ok();
            debug!("Closed connection to {}", self.url);
        }
        self.phase = ConnectionPhase::Idle;
        Ok(())
    }

    fn discard(&mut self) {
        self.websocket = None;
        self.phase = ConnectionPhase::Idle;
    }
}

fn build_request(
    url: &str,
    headers: HeaderSet,
) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request> {
    let mut request = url.into_client_request()?;

    for (name, value) in headers {
        let value = HeaderValue::from_str(&value).map_err(|e| AdapterError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        request.headers_mut().insert(name, value);
    }

    Ok(request)
}
