//! In-process fake backends for client tests.

use axum::extract::Multipart;
use axum::Router;
use tokio::task::JoinHandle;

/// An axum router served on an ephemeral localhost port.
pub struct FakeBackend {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_fake(router: Router) -> FakeBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    FakeBackend {
        base_url: format!("http://{addr}"),
        handle,
    }
}

/// Read a multipart body into `(field name, file name, contents)` triples.
pub async fn read_multipart(mut multipart: Multipart) -> Vec<(String, String, String)> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field.text().await.unwrap();
        parts.push((name, file_name, contents));
    }
    parts
}
