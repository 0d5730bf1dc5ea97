//! Browser-like handshake headers
//!
//! User agents rotate deterministically so a run can be reproduced. Handshake
//! headers (`Connection`, `Upgrade`, `Sec-WebSocket-*`) are left to the
//! WebSocket client, which must own them to complete the upgrade.

use config::service::dexscreener::ORIGIN;

/// Desktop Firefox user agents, cycled in order
pub const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:142.0) Gecko/20100101 Firefox/142.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:142.0) Gecko/20100101 Firefox/142.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:142.0) Gecko/20100101 Firefox/142.0",
];

/// Ordered header list for one handshake
pub type HeaderSet = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Default)]
pub struct HeaderRotation {
    index: usize,
}

impl HeaderRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the user agent the next call will use
    pub fn index(&self) -> usize {
        self.index
    }

    /// Headers for the next handshake; advances the rotation
    pub fn next_headers(&mut self) -> HeaderSet {
        let user_agent = USER_AGENTS[self.index % USER_AGENTS.len()];
        self.index = (self.index + 1) % USER_AGENTS.len();

        vec![
            ("User-Agent", user_agent.to_string()),
            ("Accept", "*/*".to_string()),
            ("Accept-Language", "en-GB,en;q=0.5".to_string()),
            ("Accept-Encoding", "gzip, deflate, br, zstd".to_string()),
            ("Origin", ORIGIN.to_string()),
            ("Sec-Fetch-Dest", "empty".to_string()),
            ("Sec-Fetch-Mode", "websocket".to_string()),
            ("Sec-Fetch-Site", "same-site".to_string()),
            ("Pragma", "no-cache".to_string()),
            ("Cache-Control", "no-cache".to_string()),
        ]
    }
}

/// Adds challenge cookies and swaps in the session's user agent
pub fn apply_challenge(headers: &mut HeaderSet, cookie_header: &str, user_agent: &str) {
    if !cookie_header.is_empty() {
        headers.push(("Cookie", cookie_header.to_string()));
    }
    if !user_agent.is_empty() {
        if let Some((_, value)) = headers.iter_mut().find(|(name, _)| *name == "User-Agent") {
            *value = user_agent.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(headers: &'a HeaderSet, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_rotation_cycles_in_order() {
        let mut rotation = HeaderRotation::new();
        let agents: Vec<String> = (0..4)
            .map(|_| value(&rotation.next_headers(), "User-Agent").unwrap().to_string())
            .collect();

        assert_eq!(agents[0], USER_AGENTS[0]);
        assert_eq!(agents[1], USER_AGENTS[1]);
        assert_eq!(agents[2], USER_AGENTS[2]);
        assert_eq!(agents[3], USER_AGENTS[0]);
        assert_eq!(rotation.index(), 1);
    }

    #[test]
    fn test_no_handshake_headers() {
        let headers = HeaderRotation::new().next_headers();
        for (name, _) in &headers {
            assert!(!name.eq_ignore_ascii_case("connection"));
            assert!(!name.eq_ignore_ascii_case("upgrade"));
            assert!(!name.to_ascii_lowercase().starts_with("sec-websocket"));
        }
        assert_eq!(value(&headers, "Origin"), Some("https://dexscreener.com"));
    }

    #[test]
    fn test_challenge_overrides() {
        let mut headers = HeaderRotation::new().next_headers();
        apply_challenge(&mut headers, "cf_clearance=abc; __cf_bm=def", "SessionAgent/1.0");

        assert_eq!(value(&headers, "Cookie"), Some("cf_clearance=abc; __cf_bm=def"));
        assert_eq!(value(&headers, "User-Agent"), Some("SessionAgent/1.0"));

        let mut plain = HeaderRotation::new().next_headers();
        apply_challenge(&mut plain, "", "");
        assert_eq!(value(&plain, "Cookie"), None);
        assert_eq!(value(&plain, "User-Agent"), Some(USER_AGENTS[0]));
    }
}
