//! End-to-end tests over a localhost TCP connection.

use std::time::Duration;

use slirc_wire::{ClientConfig, Connection, Message, MessageKind, Operation, ProtocolError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

async fn setup(config: ClientConfig) -> (Connection, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = config.with_port(port);

    let (conn, accepted) = tokio::join!(Connection::connect(&config), listener.accept());
    (conn.unwrap(), accepted.unwrap().0)
}

fn config() -> ClientConfig {
    ClientConfig::new("127.0.0.1", "PRBot").with_channel("#prbottest")
}

#[tokio::test]
async fn test_registration_bytes() {
    let (conn, mut server) = setup(config()).await;

    conn.register("PRBot").await.unwrap();
    conn.join("#prbottest").await.unwrap();
    conn.disconnect().await.unwrap();

    let mut wire = String::new();
    server.read_to_string(&mut wire).await.unwrap();
    assert_eq!(
        wire,
        "NICK PRBot\r\nUSER PRBot 0 * :PRBot\r\nJOIN #prbottest\r\n"
    );
}

#[tokio::test]
async fn test_ping_pong() {
    let (mut conn, server) = setup(config()).await;
    let (server_rx, mut server_tx) = server.into_split();
    let mut server_rx = BufReader::new(server_rx);

    server_tx.write_all(b"PING :irc.example.org\r\n").await.unwrap();

    let sender = conn.sender();
    match conn.receive().await.unwrap() {
        Some(Message::Ping { text }) => sender.pong(text).await.unwrap(),
        other => panic!("Expected Ping, got {:?}", other),
    }

    let mut reply = String::new();
    server_rx.read_line(&mut reply).await.unwrap();
    assert_eq!(reply, "PONG :irc.example.org\r\n");
}

#[tokio::test]
async fn test_concurrent_senders_never_interleave() {
    let (conn, server) = setup(config()).await;
    let sender = conn.sender();

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(server).lines();
        let mut count = 0;
        while let Some(line) = lines.next_line().await.unwrap() {
            let text = line
                .strip_prefix("PRIVMSG #prbottest :")
                .unwrap_or_else(|| panic!("mangled line: {:?}", line));
            assert_eq!(text.len(), 300);
            let first = text.chars().next().unwrap();
            assert!(text.chars().all(|c| c == first), "interleaved: {:?}", text);
            count += 1;
        }
        count
    });

    let mut tasks = Vec::new();
    for task in 0..8 {
        let sender = sender.clone();
        tasks.push(tokio::spawn(async move {
            let text = task.to_string().repeat(300);
            for _ in 0..20 {
                sender.privmsg("#prbottest", &text).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    conn.disconnect().await.unwrap();

    assert_eq!(reader.await.unwrap(), 8 * 20);
}

#[tokio::test]
async fn test_end_of_stream() {
    let (mut conn, mut server) = setup(config()).await;
    server
        .write_all(b":a!b@c PRIVMSG #prbottest :last words\r\n")
        .await
        .unwrap();
    drop(server);

    let msg = conn.receive().await.unwrap().unwrap();
    assert_eq!(msg.kind(), MessageKind::Privmsg);
    assert!(conn.receive().await.unwrap().is_none());
}

#[tokio::test]
async fn test_oversized_line_then_recovery() {
    let (mut conn, mut server) = setup(config().with_buffer_capacity(64)).await;
    let mut wire = vec![b'z'; 200];
    wire.extend_from_slice(b"\r\nPING :again\r\n");
    server.write_all(&wire).await.unwrap();
    drop(server);

    let err = conn.receive().await.unwrap_err();
    assert!(matches!(err, ProtocolError::LineTooLong { limit: 64 }));
    assert!(err.is_recoverable());

    assert_eq!(
        conn.receive().await.unwrap(),
        Some(Message::Ping { text: "again" })
    );
}

#[tokio::test]
async fn test_read_timeout() {
    let config = config().with_read_timeout(Some(Duration::from_millis(50)));
    let (mut conn, _server) = setup(config).await;

    match conn.next_line().await {
        Err(ProtocolError::Timeout { op, after }) => {
            assert_eq!(op, Operation::Read);
            assert_eq!(after, Duration::from_millis(50));
        }
        other => panic!("Expected Timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_nick_sends_nothing() {
    let (conn, mut server) = setup(config()).await;

    let long = "x".repeat(31);
    assert!(matches!(
        conn.register(&long).await,
        Err(ProtocolError::InvalidArgument(_))
    ));
    assert!(conn.register(&"x".repeat(30)).await.is_ok());
    conn.disconnect().await.unwrap();

    let mut wire = String::new();
    server.read_to_string(&mut wire).await.unwrap();
    assert!(wire.starts_with(&format!("NICK {}\r\n", "x".repeat(30))));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_connecting() {
    let config = ClientConfig::new("", "PRBot");
    assert!(matches!(
        Connection::connect(&config).await,
        Err(ProtocolError::InvalidArgument(_))
    ));
}
