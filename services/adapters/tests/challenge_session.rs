//! Challenge-bypass session against a mock priming server

use adapter_service::ChallengeSession;
use std::collections::BTreeMap;
use std::time::Duration;

fn session(url: String, ttl: Duration) -> ChallengeSession {
    ChallengeSession::with_priming_url(url, ttl, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_rejection_recreates_session_and_retries_once() {
    let mut server = mockito::Server::new_async().await;

    let rejected = server
        .mock("GET", "/")
        .with_status(403)
        .with_header("set-cookie", "stale=1; Path=/")
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "cf_clearance=abc123; Path=/")
        .expect(1)
        .create_async()
        .await;

    let mut session = session(server.url(), Duration::from_secs(300));
    let cookies = session.get_session_cookies().await;

    let expected: BTreeMap<String, String> =
        [("cf_clearance".to_string(), "abc123".to_string())].into();
    assert_eq!(cookies, expected);
    assert_eq!(session.recreations(), 1);

    rejected.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_double_rejection_yields_no_cookies() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("GET", "/")
        .with_status(403)
        .expect(2)
        .create_async()
        .await;

    let mut session = session(server.url(), Duration::from_secs(300));
    let prepared = session.prepare().await;

    assert!(prepared.cookies.is_empty());
    assert!(prepared.cookie_header.is_empty());
    assert_eq!(session.recreations(), 1);
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_cookies_are_cached_for_ttl() {
    let mut server = mockito::Server::new_async().await;
    let primed = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "__cf_bm=token; Path=/")
        .expect(1)
        .create_async()
        .await;

    let mut session = session(server.url(), Duration::from_secs(300));
    let first = session.get_session_cookies().await;
    let second = session.get_session_cookies().await;

    assert_eq!(first, second);
    assert_eq!(first.get("__cf_bm").map(String::as_str), Some("token"));
    primed.assert_async().await;
}

#[tokio::test]
async fn test_expired_cookies_are_refreshed() {
    let mut server = mockito::Server::new_async().await;
    let primed = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "__cf_bm=token; Path=/")
        .expect(2)
        .create_async()
        .await;

    let mut session = session(server.url(), Duration::ZERO);
    session.get_session_cookies().await;
    session.get_session_cookies().await;

    primed.assert_async().await;
}

#[tokio::test]
async fn test_prepare_builds_cookie_header() {
    let mut server = mockito::Server::new_async().await;
    let _primed = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "b=2; Path=/")
        .with_header("set-cookie", "a=1; Path=/")
        .create_async()
        .await;

    let mut session = session(server.url(), Duration::from_secs(300));
    let prepared = session.prepare().await;

    assert_eq!(prepared.cookie_header, "a=1; b=2");
    assert_eq!(prepared.user_agent, session.user_agent());
}
