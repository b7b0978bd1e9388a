//! End-to-end tests against a real bound server

use chrono::NaiveDateTime;
use hostpage_core::page::TIMESTAMP_FORMAT;
use hostpage_core::{Server, ServerConfig, SystemInfo};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Bind on an ephemeral loopback port and run the server until the returned
/// sender fires.
fn start_server() -> (SocketAddr, JoinHandle<()>, oneshot::Sender<()>) {
    let config = ServerConfig {
        port: 0,
        hostname: "127.0.0.1".to_string(),
    };
    let server = Server::bind(&config).expect("bind on ephemeral port");
    let addr = server.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .run(async {
                let _ = rx.await;
            })
            .await
            .expect("server run");
    });

    (addr, handle, tx)
}

fn extract_timestamp(body: &str) -> NaiveDateTime {
    let marker = "Server Time: ";
    let start = body.find(marker).expect("timestamp present") + marker.len();
    NaiveDateTime::parse_from_str(&body[start..start + 19], TIMESTAMP_FORMAT)
        .expect("timestamp is well-formed")
}

#[tokio::test]
async fn any_method_and_path_get_the_same_page() {
    let (addr, handle, tx) = start_server();
    let client = reqwest::Client::new();

    let requests = [
        (reqwest::Method::GET, "/"),
        (reqwest::Method::POST, "/anything"),
        (reqwest::Method::DELETE, "/deeply/nested/path?q=1"),
        (reqwest::Method::PUT, "/no-such-route"),
    ];

    for (method, path) in requests {
        let res = client
            .request(method.clone(), format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 200, "{method} {path}");
        let content_type = res.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{content_type}");
        assert_eq!(res.headers()["connection"], "close");

        let body = res.text().await.unwrap();
        assert!(body.contains("<title>Docker Multi-Stage Build Demo</title>"));
    }

    let _ = tx.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn page_reports_host_facts() {
    let (addr, handle, tx) = start_server();

    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let expected = SystemInfo::collect();
    if !expected.hostname.is_empty() {
        assert!(body.contains(&format!("<p>{}</p>", expected.hostname)));
    }
    assert!(body.contains(&format!(
        "<p>{} ({})</p>",
        expected.platform, expected.architecture
    )));
    assert!(body.contains(" GB</p>"));
    assert!(body.contains(" minutes</p>"));

    // Every rendered IPv4 entry must parse
    let joined = expected.ip_addresses_joined();
    for entry in joined.split(", ").filter(|s| !s.is_empty()) {
        entry.parse::<std::net::Ipv4Addr>().unwrap();
    }

    let _ = tx.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn timestamps_are_monotonically_non_decreasing() {
    let (addr, handle, tx) = start_server();
    let client = reqwest::Client::new();

    let mut last = None;
    for _ in 0..3 {
        let body = client
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        let stamp = extract_timestamp(&body);
        if let Some(prev) = last {
            assert!(stamp >= prev);
        }
        last = Some(stamp);
    }

    let _ = tx.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn concurrent_requests_are_served_independently() {
    let (addr, handle, tx) = start_server();
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        let url = format!("http://{addr}/");
        tasks.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            assert_eq!(res.status(), 200);
            res.text().await.unwrap()
        }));
    }
    for task in tasks {
        let body = task.await.unwrap();
        assert!(body.contains("Server Time: "));
    }

    let _ = tx.send(());
    handle.await.unwrap();
}

#[tokio::test]
async fn in_flight_request_completes_before_shutdown() {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let config = ServerConfig {
        port: 0,
        hostname: "127.0.0.1".to_string(),
    };
    let server = Server::bind(&config).expect("bind on ephemeral port");
    let addr = server.local_addr().unwrap();
    let tracker = server.tracker();

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .run(async {
                let _ = rx.await;
            })
            .await
            .expect("server run");
    });

    // Open a connection and send only part of the request so it stays
    // in flight
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n")
        .await
        .unwrap();
    while tracker.count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Fire shutdown while the connection is tracked; run() must keep
    // draining instead of returning
    let _ = tx.send(());
    while !tracker.is_shutting_down() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!handle.is_finished());

    // Finish the request; it must still get the full page
    stream.write_all(b"\r\n").await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("<title>Docker Multi-Stage Build Demo</title>"));

    // Only now does the server exit
    handle.await.unwrap();
    assert_eq!(tracker.count(), 0);
}

#[tokio::test]
async fn shutdown_stops_accepting_and_drains() {
    let (addr, handle, tx) = start_server();

    // A request before shutdown completes normally
    let res = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(res.status(), 200);

    let _ = tx.send(());
    handle.await.unwrap();

    // After run() returns the listener is gone
    let err = reqwest::get(format!("http://{addr}/")).await;
    assert!(err.is_err());
}
