//! Shared helpers for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use dav_blobstore::{BlobServer, BlobstoreConfig, Shutdown};
use tempfile::TempDir;

pub const USER: &str = "agent";
pub const PASSWORD: &str = "agent-password";

/// A blob server bound to an ephemeral port over a temporary root.
pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    shutdown: Shutdown,
}

impl TestServer {
    /// Start a server; `configure` may adjust the config before it starts.
    pub async fn start(configure: impl FnOnce(&mut BlobstoreConfig)) -> Self {
        let root = TempDir::new().unwrap();

        let mut config = BlobstoreConfig::default();
        config.blobs_path = root.path().to_path_buf();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.users = HashMap::from([(USER.to_string(), PASSWORD.to_string())]);
        configure(&mut config);

        let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let token = shutdown.token();
        let server = BlobServer::new(config);
        tokio::spawn(async move {
            let _ = server.run(listener, token).await;
        });

        Self {
            addr,
            root,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    #[allow(dead_code)]
    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// HTTP client that never follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
