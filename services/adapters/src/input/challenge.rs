//! Challenge-bypass session
//!
//! The stream endpoint sits behind an anti-bot challenge. A priming request to
//! the public site yields clearance cookies that are then presented on the
//! WebSocket handshake. Cookies are cached for a TTL.
//!
//! A rejected priming request poisons more than the cookie jar: the client's
//! connection pool and fingerprint are rejected too. On rejection the whole
//! client is discarded and rebuilt before the single retry.

use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::headers::USER_AGENTS;
use crate::config::ConnectionSettings;
use crate::{AdapterError, Result};

/// Cookie material for one handshake
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengePreparation {
    pub cookies: BTreeMap<String, String>,
    /// `k1=v1; k2=v2`, empty when there are no cookies
    pub cookie_header: String,
    /// User agent the cookies were issued to
    pub user_agent: String,
}

pub struct ChallengeSession {
    client: Client,
    priming_url: String,
    user_agent: String,
    request_timeout: Duration,
    ttl: Duration,
    cookies: BTreeMap<String, String>,
    last_refresh: Option<Instant>,
    recreations: u32,
}

impl ChallengeSession {
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        Self::with_priming_url(
            settings.priming_url.clone(),
            settings.challenge_ttl(),
            settings.priming_timeout(),
        )
    }

    pub fn with_priming_url(
        priming_url: impl Into<String>,
        ttl: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let user_agent = USER_AGENTS[1].to_string();
        Ok(Self {
            client: build_client(&user_agent, request_timeout)?,
            priming_url: priming_url.into(),
            user_agent,
            request_timeout,
            ttl,
            cookies: BTreeMap::new(),
            last_refresh: None,
            recreations: 0,
        })
    }

    /// Number of times the client has been discarded and rebuilt
    pub fn recreations(&self) -> u32 {
        self.recreations
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn is_fresh(&self) -> bool {
        !self.cookies.is_empty()
            && self
                .last_refresh
                .map_or(false, |refreshed| refreshed.elapsed() < self.ttl)
    }

    /// Drops cached cookies so the next call primes again
    pub fn invalidate(&mut self) {
        self.cookies.clear();
        self.last_refresh = None;
    }

    /// Clearance cookies, cached for the TTL
    ///
    /// Never fails: when priming is rejected even after a fresh session, the
    /// result is empty and the handshake proceeds without cookies.
    pub async fn get_session_cookies(&mut self) -> BTreeMap<String, String> {
        if self.is_fresh() {
            return self.cookies.clone();
        }

        match self.prime().await {
            Ok(cookies) => return self.store(cookies),
            Err(AdapterError::ChallengeRejected { status }) => {
                warn!(status, "Priming request rejected, recreating session");
                if let Err(e) = self.recreate() {
                    warn!("Failed to rebuild priming client: {}", e);
                    return BTreeMap::new();
                }
            }
            Err(e) => {
                warn!("Priming request failed: {}", e);
                return BTreeMap::new();
            }
        }

        match self.prime().await {
            Ok(cookies) => self.store(cookies),
            Err(e) => {
                warn!("Priming failed after session recreation: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// Cookies plus the header and user agent that go with them
    pub async fn prepare(&mut self) -> ChallengePreparation {
        let cookies = self.get_session_cookies().await;
        let cookie_header = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");

        ChallengePreparation {
            cookies,
            cookie_header,
            user_agent: self.user_agent.clone(),
        }
    }

    async fn prime(&self) -> Result<BTreeMap<String, String>> {
        debug!(url = %self.priming_url, "Requesting challenge cookies");

        let response = self.client.get(&self.priming_url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AdapterError::ChallengeRejected {
                status: status.as_u16(),
            });
        }

        Ok(response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect())
    }

    fn recreate(&mut self) -> Result<()> {
        self.invalidate();
        self.client = build_client(&self.user_agent, self.request_timeout)?;
        self.recreations += 1;
        Ok(())
    }

    fn store(&mut self, cookies: BTreeMap<String, String>) -> BTreeMap<String, String> {
        info!(count = cookies.len(), "Obtained challenge cookies");
        self.cookies = cookies;
        self.last_refresh = Some(Instant::now());
        self.cookies.clone()
    }
}

impl std::fmt::Debug for ChallengeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeSession")
            .field("priming_url", &self.priming_url)
            .field("cookies", &self.cookies.len())
            .field("recreations", &self.recreations)
            .finish()
    }
}

fn build_client(user_agent: &str, request_timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .cookie_store(true)
        .user_agent(user_agent)
        .timeout(request_timeout)
        .build()?)
}
