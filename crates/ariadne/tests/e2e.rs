//! End-to-end tests over a real socket and through the in-memory client.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use ariadne::prelude::*;
use ariadne_test::TestClient;
use http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn hello_router() -> Router {
    let mut router: Router = Router::new();
    router
        .static_get("/", |_req, res, _ctx| async move {
            res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
            Ok(Outcome::Done)
        })
        .static_get("/hello", |_req, res, _ctx| async move {
            res.send(StatusCode::OK, "text/plain", "Hello, World!!")?;
            Ok(Outcome::Done)
        })
        .dynamic_get("/hello/:name", |_req, res, ctx| async move {
            let name = ctx.param("name").unwrap_or_default().to_string();
            res.send(StatusCode::OK, "text/plain", format!("Hello, {name}!"))?;
            Ok(Outcome::Done)
        });
    router
}

async fn raw_get(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap();

    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    let status_line = head.lines().next().unwrap().to_string();
    (status_line, body.to_string())
}

#[tokio::test]
async fn test_hello_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();

    let server = Server::new(ServerConfig::default(), hello_router());
    let handle = tokio::spawn(server.serve(listener, shutdown.clone()));

    let cases = [
        ("/", "HTTP/1.1 200 OK", "Hello, World!"),
        ("/hello/", "HTTP/1.1 200 OK", "Hello, World!!"),
        ("/not-found/", "HTTP/1.1 404 Not Found", "Not Found"),
        ("/hello/John", "HTTP/1.1 200 OK", "Hello, John!"),
    ];
    for (path, status_line, body) in cases {
        let (actual_status, actual_body) = raw_get(addr, path).await;
        assert_eq!(actual_status, status_line, "GET {path}");
        assert_eq!(actual_body, body, "GET {path}");
    }

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_hello_in_memory() {
    let client = TestClient::new(hello_router());

    client
        .get("/")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "text/plain")
        .assert_text("Hello, World!");
    client.get("/hello/").send().await.assert_text("Hello, World!!");
    client.get("/hello/John").send().await.assert_text("Hello, John!");
    client
        .get("/not-found/")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_reason("Not Found")
        .assert_text("Not Found");
}

#[tokio::test]
async fn test_backward_pass_wraps_forward_pass() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut router: Router = Router::new();

    for name in ["A", "B"] {
        let log = Arc::clone(&log);
        router.static_get("/hello", move |_req, _res, _ctx| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(name.to_string());
                Ok(Outcome::defer(move |_req: Request, _res: Response| async move {
                    log.lock().unwrap().push(format!("b{name}"));
                    Ok(())
                }))
            }
        });
    }

    let client = TestClient::new(router);
    client
        .get("/hello")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(*log.lock().unwrap(), ["A", "B", "bB", "bA"]);
}

#[tokio::test]
async fn test_wildcard_observes_every_request() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut router = hello_router();

    let recorder = Arc::clone(&seen);
    router.static_all("*", move |_req, _res, _ctx| {
        let recorder = Arc::clone(&recorder);
        async move {
            Ok(Outcome::defer(move |req: Request, res: Response| async move {
                recorder
                    .lock()
                    .unwrap()
                    .push((req.target().to_string(), res.is_finalized()));
                Ok(())
            }))
        }
    });

    let client = TestClient::new(router);
    client.get("/hello/Ada").send().await.assert_text("Hello, Ada!");
    client.post("/hello").send().await.assert_status(StatusCode::NOT_FOUND);

    assert_eq!(
        *seen.lock().unwrap(),
        // The fallback is written after the backward pass.
        [("/hello/Ada".to_string(), true), ("/hello".to_string(), false)]
    );
}
