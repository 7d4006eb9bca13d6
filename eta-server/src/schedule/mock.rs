//! Mock schedule client for development without network access.
//!
//! Loads canned API responses from JSON files and serves them as if they
//! were live.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{LineCode, StationCode};

use super::error::ScheduleError;

type ScheduleKey = (LineCode, StationCode);

/// Mock client that serves schedule bodies from a directory.
///
/// Bodies are returned verbatim, so a directory can also hold deliberately
/// malformed responses.
#[derive(Clone)]
pub struct MockScheduleClient {
    bodies: Arc<RwLock<HashMap<ScheduleKey, String>>>,
}

impl MockScheduleClient {
    /// Load every `{LINE}-{STA}.json` file in `data_dir` (e.g. `TWL-TST.json`).
    ///
    /// Files whose names don't match that pattern are skipped.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let bodies = load_dir(data_dir.as_ref())?;
        Ok(Self {
            bodies: Arc::new(RwLock::new(bodies)),
        })
    }

    /// Mimics [`super::ScheduleClient::get_schedule`].
    pub async fn get_schedule(
        &self,
        line: &LineCode,
        station: &StationCode,
    ) -> Result<String, ScheduleError> {
        let bodies = self.bodies.read().await;

        bodies
            .get(&(*line, *station))
            .cloned()
            .ok_or_else(|| ScheduleError::Status {
                status: 404,
                message: format!("no mock schedule for {line}-{station}"),
            })
    }

    /// List the (line, station) pairs with mock data, sorted.
    pub async fn available(&self) -> Vec<ScheduleKey> {
        let bodies = self.bodies.read().await;
        let mut keys: Vec<_> = bodies.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Reload mock data from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<usize, ScheduleError> {
        let fresh = load_dir(data_dir.as_ref())?;
        let count = fresh.len();
        *self.bodies.write().await = fresh;
        Ok(count)
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<ScheduleKey, String>, ScheduleError> {
    let io_error = |message: String| ScheduleError::Status {
        status: 0,
        message,
    };

    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| io_error(format!("failed to read mock data directory: {e}")))?;

    let mut bodies = HashMap::new();

    for entry in entries {
        let path = entry
            .map_err(|e| io_error(format!("failed to read directory entry: {e}")))?
            .path();

        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let Some(key) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(parse_file_stem)
        else {
            tracing::debug!(path = %path.display(), "skipping mock file with unexpected name");
            continue;
        };

        let body = std::fs::read_to_string(&path)
            .map_err(|e| io_error(format!("failed to read {}: {e}", path.display())))?;

        bodies.insert(key, body);
    }

    if bodies.is_empty() {
        return Err(io_error(format!(
            "no mock schedule files found in {}",
            data_dir.display()
        )));
    }

    tracing::debug!(count = bodies.len(), dir = %data_dir.display(), "loaded mock schedules");
    Ok(bodies)
}

/// "TWL-TST" -> (TWL, TST)
fn parse_file_stem(stem: &str) -> Option<ScheduleKey> {
    let (line, station) = stem.split_once('-')?;
    Some((LineCode::parse(line).ok()?, StationCode::parse(station).ok()?))
}
