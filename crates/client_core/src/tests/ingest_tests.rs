use super::*;
use std::{collections::HashMap, io::Write as _};

use anyhow::anyhow;
use tokio::sync::{oneshot, Mutex};

type Gate = oneshot::Receiver<std::result::Result<Vec<u8>, String>>;

/// Reader whose reads complete only when the test releases them.
struct GatedReader {
    gates: Mutex<HashMap<PathBuf, Gate>>,
}

impl GatedReader {
    fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }

    async fn gate(&self, path: &str) -> oneshot::Sender<std::result::Result<Vec<u8>, String>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.insert(PathBuf::from(path), rx);
        tx
    }
}

#[async_trait]
impl FileReader for GatedReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let gate = self
            .gates
            .lock()
            .await
            .remove(path)
            .ok_or_else(|| anyhow!("no gate for {}", path.display()))?;
        gate.await
            .map_err(|_| anyhow!("gate dropped"))?
            .map_err(|reason| anyhow!(reason))
    }
}

#[tokio::test]
async fn ingests_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "#[multiversx_sc::contract]\npub trait Adder {{}}").expect("write");

    let ingestor = FileIngestor::new();
    let selected = SelectedFile::from_path(file.path());
    let text = ingestor.ingest(&selected).await.expect("ingest");

    assert!(text.contains("pub trait Adder"));
    assert_eq!(ingestor.held_text(), Some(text));
}

#[tokio::test]
async fn missing_file_surfaces_read_error_and_keeps_held_text() {
    let dir = tempfile::tempdir().expect("temp dir");
    let present = dir.path().join("present.rs");
    std::fs::write(&present, "fn present() {}").expect("write");

    let ingestor = FileIngestor::new();
    ingestor
        .ingest(&SelectedFile::from_path(&present))
        .await
        .expect("first ingest");

    let missing = SelectedFile::from_path(dir.path().join("missing.rs"));
    let err = ingestor.ingest(&missing).await.expect_err("missing file");
    assert!(matches!(
        &err,
        StudioError::Read { file_name, .. } if file_name == "missing.rs"
    ));
    assert_eq!(ingestor.held_text().as_deref(), Some("fn present() {}"));
}

#[tokio::test]
async fn invalid_utf8_is_decoded_lossily() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&[b'o', b'k', 0xff]).expect("write");

    let ingestor = FileIngestor::new();
    let text = ingestor
        .ingest(&SelectedFile::from_path(file.path()))
        .await
        .expect("ingest");
    assert_eq!(text, "ok\u{fffd}");
}

#[tokio::test]
async fn later_ingest_wins_even_when_earlier_read_finishes_last() {
    let reader = Arc::new(GatedReader::new());
    let first_gate = reader.gate("first.rs").await;
    let second_gate = reader.gate("second.rs").await;
    let ingestor = FileIngestor::with_reader(reader.clone());

    let first = SelectedFile::from_path("first.rs");
    let second = SelectedFile::from_path("second.rs");

    let (first_result, second_result, ()) = tokio::join!(
        ingestor.ingest(&first),
        ingestor.ingest(&second),
        async {
            second_gate
                .send(Ok(b"second".to_vec()))
                .expect("second receiver");
            tokio::task::yield_now().await;
            first_gate.send(Ok(b"first".to_vec())).expect("first receiver");
        }
    );

    assert_eq!(first_result.expect("first read"), "first");
    assert_eq!(second_result.expect("second read"), "second");
    assert_eq!(ingestor.held_text().as_deref(), Some("second"));
}

#[tokio::test]
async fn clear_invalidates_inflight_read() {
    let reader = Arc::new(GatedReader::new());
    let gate = reader.gate("late.rs").await;
    let ingestor = FileIngestor::with_reader(reader.clone());
    let late = SelectedFile::from_path("late.rs");

    let (result, ()) = tokio::join!(ingestor.ingest(&late), async {
        ingestor.clear();
        gate.send(Ok(b"late".to_vec())).expect("receiver");
    });

    assert_eq!(result.expect("read still completes"), "late");
    assert_eq!(ingestor.held_text(), None);
}

#[test]
fn selected_file_uses_last_path_component() {
    let selected = SelectedFile::from_path("/tmp/contracts/adder.rs");
    assert_eq!(selected.file_name, "adder.rs");
}
