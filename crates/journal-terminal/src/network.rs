// crates/journal-terminal/src/network.rs

use std::path::PathBuf;
use std::sync::Arc;

use journal_client::query;
use journal_client::{JournalApi, QueryCache, QueryOutcome, RequestTag, UploadFile};
use journal_core::{ExportFormat, ImportFormat, ImportResult};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Work the UI hands to the background worker.
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    Fetch(RequestTag),
    /// Drop a cached outcome so the next fetch of the tag goes out again.
    Invalidate(RequestTag),
    /// Mode or identity changed; forget everything from older epochs.
    Epoch(u64),
    Import { format: ImportFormat, path: PathBuf },
    Export { format: ExportFormat, dest: PathBuf },
    Health { epoch: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Answers sent back to the UI loop.
#[derive(Debug)]
pub enum WorkerReply {
    Query { tag: RequestTag, outcome: QueryOutcome },
    Imported(Result<ImportResult, String>),
    Exported(Result<ExportSummary, String>),
    Health { epoch: u64, healthy: bool },
}

pub struct JournalWorker {
    api: JournalApi,
    cache: QueryCache,
    tx: UnboundedSender<WorkerReply>,
}

impl JournalWorker {
    pub fn new(api: JournalApi, tx: UnboundedSender<WorkerReply>) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            tx,
        }
    }

    pub async fn run(self, mut rx: UnboundedReceiver<WorkerRequest>) {
        info!("fetch worker started");
        while let Some(req) = rx.recv().await {
            self.dispatch(req);
        }
        info!("fetch worker stopped");
    }

    /// Each request runs on its own task; nothing here waits for a reply.
    fn dispatch(&self, req: WorkerRequest) {
        match req {
            WorkerRequest::Fetch(tag) => {
                let api = self.api.clone();
                let cache = self.cache.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    debug!("fetch {:?}", tag);
                    let outcome = cache
                        .fetch(&tag, || async {
                            query::load(&api, &tag.key).await.map_err(Arc::new)
                        })
                        .await;
                    if let Err(e) = &outcome {
                        warn!("query {:?} failed: {}", tag.key, e);
                    }
                    send(&tx, WorkerReply::Query { tag, outcome });
                });
            }
            WorkerRequest::Invalidate(tag) => {
                self.cache.invalidate(&tag);
            }
            WorkerRequest::Epoch(epoch) => {
                self.cache.retain_epoch(epoch);
            }
            WorkerRequest::Import { format, path } => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = import(&api, format, path).await;
                    send(&tx, WorkerReply::Imported(result));
                });
            }
            WorkerRequest::Export { format, dest } => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = export(&api, format, dest).await;
                    send(&tx, WorkerReply::Exported(result));
                });
            }
            WorkerRequest::Health { epoch } => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let healthy = match api.health().await {
                        Ok(h) => h.is_ok(),
                        Err(e) => {
                            debug!("health probe failed: {}", e);
                            false
                        }
                    };
                    send(&tx, WorkerReply::Health { epoch, healthy });
                });
            }
        }
    }
}

fn send(tx: &UnboundedSender<WorkerReply>, reply: WorkerReply) {
    if let Err(e) = tx.send(reply) {
        error!("Failed to send reply to app: {}", e);
    }
}

async fn import(api: &JournalApi, format: ImportFormat, path: PathBuf) -> Result<ImportResult, String> {
    let file = UploadFile::read(&path).await.map_err(|e| e.to_string())?;
    info!("importing {} as {}", path.display(), format);
    api.import_trades(format, file).await.map_err(|e| {
        warn!("import failed: {}", e);
        e.to_string()
    })
}

async fn export(api: &JournalApi, format: ExportFormat, dest: PathBuf) -> Result<ExportSummary, String> {
    let bytes = api.download_export(format).await.map_err(|e| {
        warn!("export download failed: {}", e);
        e.to_string()
    })?;
    tokio::fs::write(&dest, &bytes)
        .await
        .map_err(|e| format!("could not write {}: {}", dest.display(), e))?;
    info!("exported {} bytes to {}", bytes.len(), dest.display());
    Ok(ExportSummary {
        path: dest,
        bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_client::{FixtureSource, Fixtures, MemoryStore, QueryData, QueryKey};
    use journal_core::DateRange;
    use tokio::sync::mpsc;

    fn demo_api() -> JournalApi {
        let demo = Arc::new(FixtureSource::new(Fixtures::bundled(), "http://localhost:3000/demo"));
        // Both slots get the fixture source; these tests stay in demo mode.
        JournalApi::new(Arc::new(MemoryStore::new()), demo.clone(), demo)
    }

    fn spawn_worker() -> (UnboundedSender<WorkerRequest>, UnboundedReceiver<WorkerReply>) {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        tokio::spawn(JournalWorker::new(demo_api(), reply_tx).run(req_rx));
        (req_tx, reply_rx)
    }

    #[tokio::test]
    async fn fetch_replies_with_its_tag() {
        let (tx, mut rx) = spawn_worker();
        let tag = RequestTag::new(3, QueryKey::Metrics(DateRange::default()));
        tx.send(WorkerRequest::Fetch(tag.clone())).unwrap();

        match rx.recv().await.unwrap() {
            WorkerReply::Query { tag: got, outcome } => {
                assert_eq!(got, tag);
                assert!(matches!(outcome, Ok(QueryData::Metrics(_))));
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[tokio::test]
    async fn export_writes_the_download() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("trades.json");
        let (tx, mut rx) = spawn_worker();
        tx.send(WorkerRequest::Export {
            format: ExportFormat::Json,
            dest: dest.clone(),
        })
        .unwrap();

        match rx.recv().await.unwrap() {
            WorkerReply::Exported(Ok(summary)) => {
                assert_eq!(summary.path, dest);
                assert_eq!(std::fs::read(&dest).unwrap().len(), summary.bytes);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[tokio::test]
    async fn import_of_missing_file_reports_an_error() {
        let (tx, mut rx) = spawn_worker();
        tx.send(WorkerRequest::Import {
            format: ImportFormat::Csv,
            path: PathBuf::from("/definitely/not/here.csv"),
        })
        .unwrap();

        match rx.recv().await.unwrap() {
            WorkerReply::Imported(Err(msg)) => assert!(msg.contains("here.csv")),
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[tokio::test]
    async fn demo_health_is_ok() {
        let (tx, mut rx) = spawn_worker();
        tx.send(WorkerRequest::Health { epoch: 1 }).unwrap();
        match rx.recv().await.unwrap() {
            WorkerReply::Health { epoch, healthy } => {
                assert_eq!(epoch, 1);
                assert!(healthy);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }
}
