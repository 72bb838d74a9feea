//! Round trips through a live TCP listener.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use castle_core::prelude::*;
use castle_server::{bind, serve, Request, Response, SolveRequest, SolverService};
use castle_test_utils::fixtures::{small_targets, standard_catalog};

fn search() -> SearchConfig {
    SearchConfig {
        max_wood_lead: 2,
        patience: None,
    }
}

/// Start a server on an ephemeral port and return a connected client.
async fn connect() -> (BufReader<tokio::net::tcp::OwnedReadHalf>, tokio::net::tcp::OwnedWriteHalf) {
    let listener = bind("127.0.0.1", 0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(SolverService::new(standard_catalog()).with_search(search()));
    tokio::spawn(serve(listener, service));

    let stream = TcpStream::connect(addr).await.unwrap();
    let (reader, writer) = stream.into_split();
    (BufReader::new(reader), writer)
}

async fn exchange(
    reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    line: &str,
) -> Response {
    writer.write_all(line.as_bytes()).await.unwrap();
    writer.write_all(b"\n").await.unwrap();
    let mut reply = String::new();
    reader.read_line(&mut reply).await.unwrap();
    serde_json::from_str(reply.trim_end()).unwrap()
}

fn small_request() -> SolveRequest {
    let target_levels: BTreeMap<String, u32> = small_targets()
        .buildings
        .iter()
        .filter_map(|(kind, level)| level.map(|level| (kind.name().to_string(), level)))
        .collect();
    SolveRequest {
        target_levels,
        ..SolveRequest::default()
    }
}

// =============================================================================
// Protocol
// =============================================================================

#[tokio::test]
async fn test_ping_pong() {
    let (mut reader, mut writer) = connect().await;
    let response = exchange(&mut reader, &mut writer, r#"{"cmd":"ping"}"#).await;
    assert_eq!(response, Response::pong());
}

#[tokio::test]
async fn test_garbage_keeps_connection_open() {
    let (mut reader, mut writer) = connect().await;

    let response = exchange(&mut reader, &mut writer, "{ nope").await;
    assert!(matches!(response, Response::Error { .. }));

    let response = exchange(&mut reader, &mut writer, r#"{"cmd":"ping"}"#).await;
    assert_eq!(response, Response::pong());
}

#[tokio::test]
async fn test_next_action_over_the_wire() {
    let (mut reader, mut writer) = connect().await;
    let line = r#"{"cmd":"next_action","target_levels":{"lumberjack":3}}"#;
    let response = exchange(&mut reader, &mut writer, line).await;

    let Response::NextAction { token, .. } = response else {
        panic!("expected next_action");
    };
    assert_eq!(token, "building:lumberjack:2");
}

// =============================================================================
// Service boundary matches a direct call
// =============================================================================

#[tokio::test]
async fn test_service_matches_direct_solve() {
    let (mut reader, mut writer) = connect().await;
    let line = serde_json::to_string(&Request::Solve(small_request())).unwrap();
    let response = exchange(&mut reader, &mut writer, &line).await;
    let Response::Solution(solution) = response else {
        panic!("expected solution");
    };

    let catalog = standard_catalog();
    let targets = small_targets();
    let options = SolverOptions::default();
    let direct = Solver::new(&catalog, &targets, &options).search(&InitialState::default(), &search());

    assert_eq!(solution.total_time_seconds, direct.best.total_time_seconds);
    assert_eq!(solution.timeline.len(), direct.best.action_count());
    assert_eq!(solution.strategy, direct.best_strategy().to_string());
    assert_eq!(solution.completed, direct.best.completed);
    assert_eq!(solution.next_action, direct.best.next_action());
}

#[tokio::test]
async fn test_concurrent_clients_get_identical_answers() {
    let listener = bind("127.0.0.1", 0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(SolverService::new(standard_catalog()).with_search(search()));
    tokio::spawn(serve(listener, service));

    let line = serde_json::to_string(&Request::Solve(small_request())).unwrap();
    let mut handles = Vec::new();
    for _ in 0..3 {
        let line = line.clone();
        handles.push(tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            exchange(&mut reader, &mut writer, &line).await
        }));
    }

    let mut responses = Vec::new();
    for handle in handles {
        responses.push(handle.await.unwrap());
    }
    assert!(responses.windows(2).all(|pair| pair[0] == pair[1]));
}
