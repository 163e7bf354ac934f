//! Embedding provider seam and the daemon-backed client.
//!
//! Embedding computation lives with an external collaborator; this client
//! only ships requests to its daemon as JSON lines over a Unix socket.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Maps free text to a fixed-dimension numeric vector. Injected into the
/// similarity stage so tests can supply a stub.
pub trait EmbeddingProvider {
  fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Serialize, Deserialize)]
struct EmbeddingRequest {
  texts: Vec<String>,
  id: String,
}

#[derive(Serialize, Deserialize)]
struct EmbeddingResponse {
  embeddings: Vec<Vec<f32>>,
  id: String,
  error: Option<String>,
}

const DEFAULT_SOCKET_PATH: &str = "/tmp/leafsense_embeddings.sock";
const RETRY_DELAY_MS: u64 = 500;

/// Client for the collaborator-run embedding daemon.
pub struct DaemonEmbedder {
  socket_path: PathBuf,
}

impl DaemonEmbedder {
  pub fn new() -> Self {
    let socket_path = std::env::var("LEAFSENSE_EMBED_SOCKET")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOCKET_PATH));
    Self { socket_path }
  }

  async fn request_once(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest {
      texts: vec![text.to_string()],
      id: uuid::Uuid::new_v4().to_string(),
    };

    let mut stream = UnixStream::connect(&self.socket_path)
      .await
      .map_err(|_| anyhow!("Embedding daemon not reachable at {}", self.socket_path.display()))?;

    let json = serde_json::to_string(&request)?;
    stream.write_all(json.as_bytes()).await?;
    stream.write_all(b"\n").await?;

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let response: EmbeddingResponse =
      serde_json::from_str(line.trim()).map_err(|e| anyhow!("Invalid daemon response: {}", e))?;

    if response.id != request.id {
      return Err(anyhow!("Daemon response id mismatch"));
    }
    if let Some(error) = response.error {
      return Err(anyhow!("Daemon error: {}", error));
    }

    response.embeddings.into_iter().next().ok_or_else(|| anyhow!("Daemon returned no embedding"))
  }
}

impl Default for DaemonEmbedder {
  fn default() -> Self {
    Self::new()
  }
}

impl EmbeddingProvider for DaemonEmbedder {
  fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    rt.block_on(async {
      match self.request_once(text).await {
        Ok(embedding) => Ok(embedding),
        // The daemon may still be binding its socket; give it one more chance.
        Err(_) => {
          sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
          let embedding = self.request_once(text).await?;
          debug!(dim = embedding.len(), "embedding computed after retry");
          Ok(embedding)
        }
      }
    })
  }
}
