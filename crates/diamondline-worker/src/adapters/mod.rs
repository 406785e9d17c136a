//! Collaborators backed by local JSON files and process memory.
//!
//! Each season has its own directory under the data directory:
//!
//! ```text
//! {data_dir}/{season}/cards.json           catalog snapshots
//! {data_dir}/{season}/roster_updates.json  roster update batches
//! ```

pub mod catalog;
pub mod feed;
pub mod repository;

use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Reads a JSON array, treating a missing file as empty.
async fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
    };
    serde_json::from_slice(&bytes).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}
