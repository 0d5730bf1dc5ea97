//! Stream loop against a local WebSocket server

use adapter_service::{AdapterError, ChannelSink, ConnectionManager, ConnectionSettings};
use byteorder::{LittleEndian, WriteBytesExt};
use codec::{ExtractionConfig, ExtractionEngine};
use dexscreener_adapter::{StreamLoop, StreamSettings};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::time::timeout;
use tokio_test::assert_ok;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use types::ExtractedTokenBatch;

/// Header, marker and one record with five numeric fields plus a protocol and a link
fn pairs_frame() -> Vec<u8> {
    let mut frame = vec![0x00, b'\n'];
    frame.extend_from_slice(b"1.3.0\n");
    frame.extend_from_slice(b"pairs");
    frame.extend_from_slice(&[0u8; 15]);

    let mut record = Vec::new();
    record.write_f32::<LittleEndian>(0.00045).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.write_f64::<LittleEndian>(22_000.0).unwrap();
    record.write_u32::<LittleEndian>(357).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.write_f64::<LittleEndian>(18.0).unwrap();
    record.write_f32::<LittleEndian>(87_000.0).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.extend_from_slice(&[0u8; 16]);
    for text in ["pumpswap", "https://t.me/bonkcoin"] {
        record.push(text.len() as u8);
        record.extend_from_slice(text.as_bytes());
    }

    let mut section = vec![0u8; 1200];
    section[64..64 + record.len()].copy_from_slice(&record);
    frame.extend_from_slice(&section);
    frame
}

fn test_settings() -> ConnectionSettings {
    ConnectionSettings {
        rate_limit_per_sec: 100.0,
        max_retries: 2,
        backoff_base_secs: 0.01,
        connect_timeout_ms: 2_000,
        receive_timeout_ms: 2_000,
        ..Default::default()
    }
}

fn fast_stream() -> StreamSettings {
    StreamSettings {
        cycle_delay_ms: 10,
        error_delay_ms: 10,
        top_tokens: 10,
    }
}

fn stream_loop(
    url: &str,
    shutdown: watch::Receiver<bool>,
) -> (StreamLoop, tokio::sync::mpsc::Receiver<ExtractedTokenBatch>) {
    let (sink, batches) = ChannelSink::channel(16);
    let connection = ConnectionManager::new(url, test_settings()).unwrap();
    let engine = ExtractionEngine::new(ExtractionConfig::default()).unwrap();
    let stream = StreamLoop::new(connection, engine, Arc::new(sink), fast_stream(), shutdown);
    (stream, batches)
}

#[tokio::test]
async fn test_run_once_answers_keepalives_and_extracts() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/pairs", listener.local_addr().unwrap());
    let (seen_tx, seen_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        ws.send(Message::Ping(vec![1, 2, 3])).await.unwrap();
        ws.send(Message::Text("ping".to_string())).await.unwrap();
        ws.send(Message::Binary(pairs_frame())).await.unwrap();

        let mut seen = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
            seen.push(message);
        }
        seen_tx.send(seen).ok();
    });

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let (mut stream, mut batches) = stream_loop(&url, shutdown_rx);

    let batch = stream.run_once().await.unwrap();
    assert_eq!(batch.total_extracted(), 1);
    let token = &batch.tokens()[0];
    assert_eq!(token.txns_24h, Some(357));
    assert_eq!(token.protocol.as_deref(), Some("pumpswap"));
    assert_eq!(token.telegram.as_deref(), Some("https://t.me/bonkcoin"));

    let emitted = batches.recv().await.unwrap();
    assert_eq!(emitted.tokens(), batch.tokens());

    let stats = stream.stats();
    assert_eq!(stats.frames, 1);
    assert_eq!(stats.keepalives, 2);
    assert!(!stream.connection().is_connected());

    let seen = timeout(Duration::from_secs(5), seen_rx).await.unwrap().unwrap();
    assert!(seen.contains(&Message::Pong(vec![1, 2, 3])));
    assert!(seen.contains(&Message::Text("pong".to_string())));
    assert!(!seen.iter().any(|m| m.is_binary()));
}

#[tokio::test]
async fn test_run_reconnects_after_server_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/pairs", listener.local_addr().unwrap());
    let connections = Arc::new(AtomicUsize::new(0));

    let accepted = connections.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            accepted.fetch_add(1, Ordering::SeqCst);
            let mut ws = accept_async(stream).await.unwrap();
            ws.send(Message::Binary(pairs_frame())).await.unwrap();
            ws.close(None).await.ok();
        }
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (mut stream, mut batches) = stream_loop(&url, shutdown_rx);
    let handle = tokio::spawn(async move {
        stream.run().await.unwrap();
        stream
    });

    for _ in 0..2 {
        let batch = timeout(Duration::from_secs(10), batches.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(batch.total_extracted(), 1);
    }

    shutdown_tx.send(true).unwrap();
    let stream = timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

    assert!(connections.load(Ordering::SeqCst) >= 2);
    assert!(stream.stats().frames >= 2);
    assert!(!stream.connection().is_connected());
}

#[tokio::test]
async fn test_shutdown_interrupts_receive_and_closes_socket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/pairs", listener.local_addr().unwrap());
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let mut saw_close = false;
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                saw_close = true;
                break;
            }
        }
        closed_tx.send(saw_close).ok();
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (mut stream, _batches) = stream_loop(&url, shutdown_rx);
    let handle = tokio::spawn(async move { stream.run().await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown_tx.send(true).unwrap();

    let result = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert_ok!(result);

    let saw_close = timeout(Duration::from_secs(5), closed_rx).await.unwrap().unwrap();
    assert!(saw_close);
}

#[tokio::test]
async fn test_run_once_reports_exhausted_retries() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/pairs", listener.local_addr().unwrap());
    drop(listener);

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let (mut stream, _batches) = stream_loop(&url, shutdown_rx);

    let result = stream.run_once().await;
    assert!(matches!(
        result,
        Err(AdapterError::MaxReconnectAttemptsExceeded { max_attempts: 2, .. })
    ));
}
