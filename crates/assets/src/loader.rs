use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::AssetError;
use crate::model::{ModelInfo, inspect_gltf};

/// The result of one model request, tagged with the caller's key.
#[derive(Debug)]
pub struct LoadOutcome<K> {
    pub key: K,
    pub path: PathBuf,
    pub result: Result<ModelInfo, AssetError>,
}

/// Reads model files off the frame thread.
///
/// Each request runs on its own worker thread and reports back over a
/// channel. The owner drains finished loads with [`poll`](Self::poll) once
/// per frame. There is no cancellation and no retry: a failed load is
/// reported once and never again.
pub struct ModelLoader<K> {
    tx: Sender<LoadOutcome<K>>,
    rx: Receiver<LoadOutcome<K>>,
    in_flight: usize,
}

impl<K: Send + std::fmt::Debug + 'static> Default for ModelLoader<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Send + std::fmt::Debug + 'static> ModelLoader<K> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Requests started but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start loading `path` in the background.
    pub fn request(&mut self, key: K, path: impl Into<PathBuf>) -> Result<(), AssetError> {
        let path = path.into();
        let tx = self.tx.clone();
        tracing::debug!(?key, path = %path.display(), "model requested");
        std::thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                let result = inspect_gltf(&path);
                // The receiver only goes away when the app is shutting down.
                let _ = tx.send(LoadOutcome { key, path, result });
            })?;
        self.in_flight += 1;
        Ok(())
    }

    /// Drain every load that has finished since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<LoadOutcome<K>> {
        let done: Vec<LoadOutcome<K>> = self.rx.try_iter().collect();
        self.finish(&done);
        done
    }

    /// Block until every in-flight request has reported or `limit` elapses.
    ///
    /// For headless tools that have no frame loop to poll from. Loads still
    /// running at the deadline keep running and show up in a later poll.
    pub fn wait(&mut self, limit: Duration) -> Vec<LoadOutcome<K>> {
        let deadline = Instant::now() + limit;
        let mut done = Vec::new();
        while done.len() < self.in_flight {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => done.push(outcome),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        self.finish(&done);
        done
    }

    fn finish(&mut self, done: &[LoadOutcome<K>]) {
        self.in_flight = self.in_flight.saturating_sub(done.len());
        for outcome in done {
            match &outcome.result {
                Ok(info) => tracing::info!(
                    key = ?outcome.key,
                    path = %outcome.path.display(),
                    meshes = info.mesh_count(),
                    "model loaded"
                ),
                Err(e) => tracing::error!(
                    key = ?outcome.key,
                    path = %outcome.path.display(),
                    "error loading model: {e}"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        Boat,
        Missing,
    }

    #[test]
    fn reports_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let boat = dir.path().join("boat.gltf");
        std::fs::write(&boat, crate::model::fixtures::gltf_text(&["hull"])).unwrap();

        let mut loader = ModelLoader::new();
        loader.request(Key::Boat, &boat).unwrap();
        loader
            .request(Key::Missing, dir.path().join("nope.gltf"))
            .unwrap();
        assert_eq!(loader.in_flight(), 2);

        let mut outcomes = loader.wait(Duration::from_secs(10));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(loader.in_flight(), 0);
        outcomes.sort_by_key(|o| o.key == Key::Missing);

        assert_eq!(outcomes[0].key, Key::Boat);
        assert_eq!(outcomes[0].result.as_ref().unwrap().mesh_count(), 1);
        assert_eq!(outcomes[1].key, Key::Missing);
        assert!(matches!(outcomes[1].result, Err(AssetError::Io(_))));
    }

    #[test]
    fn poll_without_requests_is_empty() {
        let mut loader: ModelLoader<Key> = ModelLoader::new();
        assert!(loader.poll().is_empty());
        assert!(loader.wait(Duration::from_millis(1)).is_empty());
    }

    #[test]
    fn poll_eventually_drains() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.gltf");
        std::fs::write(&path, crate::model::fixtures::gltf_text(&[])).unwrap();
        let mut loader = ModelLoader::new();
        loader.request(Key::Boat, &path).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut seen = Vec::new();
        while seen.is_empty() && Instant::now() < deadline {
            seen = loader.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(seen.len(), 1);
        assert_eq!(loader.in_flight(), 0);
    }
}
