use std::net::TcpListener;

use axum::Router;

/// Serves `router` on an ephemeral local port and returns its base url.
pub fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(router.into_make_service());
    tokio::spawn(async move {
        _ = server.await;
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
pub fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/chat")
}
