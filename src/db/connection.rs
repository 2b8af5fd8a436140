use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::{kv_entries, schema::ensure_schema};

/// Work for the SQLite thread. Each request carries its own reply channel.
enum Request {
    Get {
        key: String,
        reply: oneshot::Sender<Result<Option<String>>>,
    },
    Set {
        key: String,
        value: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Close,
}

struct Worker {
    requests: mpsc::Sender<Request>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Worker {
    fn drop(&mut self) {
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handle) = handle else { return };

        let _ = self.requests.send(Request::Close);
        if handle.join().is_err() {
            error!("sqlite worker panicked before shutdown");
        }
    }
}

/// Key/value table in a SQLite file, served by one dedicated thread so the
/// async side never blocks on disk. Requests run in submission order.
#[derive(Clone)]
pub struct Database {
    worker: Arc<Worker>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (requests, inbox) = mpsc::channel::<Request>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);
        let path = db_path.clone();

        let handle = thread::Builder::new()
            .name("sleepglow-db".into())
            .spawn(move || {
                let conn = match open_connection(&path) {
                    Ok(conn) => {
                        let _ = ready_tx.send(Ok(()));
                        conn
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                serve(&conn, inbox);
                info!("sqlite worker for {} stopped", path.display());
            })
            .context("failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before it was ready")??;
        info!("key/value store opened at {}", db_path.display());

        Ok(Self {
            worker: Arc::new(Worker {
                requests,
                handle: Mutex::new(Some(handle)),
            }),
        })
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let (reply, response) = oneshot::channel();
        self.submit(Request::Get {
            key: key.to_string(),
            reply,
        })?;
        response
            .await
            .map_err(|_| anyhow!("database worker dropped the read of '{key}'"))?
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.submit(Request::Set {
            key: key.to_string(),
            value: value.to_string(),
            reply,
        })?;
        response
            .await
            .map_err(|_| anyhow!("database worker dropped the write of '{key}'"))?
    }

    fn submit(&self, request: Request) -> Result<()> {
        self.worker
            .requests
            .send(request)
            .map_err(|_| anyhow!("database worker is no longer running"))
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
        error!("failed to enable WAL mode: {err}");
    }
    ensure_schema(&mut conn)?;
    Ok(conn)
}

fn serve(conn: &Connection, inbox: mpsc::Receiver<Request>) {
    while let Ok(request) = inbox.recv() {
        match request {
            Request::Get { key, reply } => {
                let _ = reply.send(kv_entries::read(conn, &key));
            }
            Request::Set { key, value, reply } => {
                let _ = reply.send(kv_entries::write(conn, &key, &value));
            }
            Request::Close => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(dir: &tempfile::TempDir) -> Database {
        Database::new(dir.path().join("store.sqlite3")).unwrap()
    }

    #[tokio::test]
    async fn set_then_get_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir);

        assert_eq!(db.get_value("k").await.unwrap(), None);
        db.set_value("k", "one").await.unwrap();
        db.set_value("k", "two").await.unwrap();
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = open(&dir);
            db.set_value("baseline", "123.5").await.unwrap();
        }

        let db = open(&dir);
        assert_eq!(db.get_value("baseline").await.unwrap().as_deref(), Some("123.5"));
    }

    #[tokio::test]
    async fn clones_share_one_worker() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir);
        let other = db.clone();

        other.set_value("k", "from clone").await.unwrap();
        drop(other);
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("from clone"));
    }

    #[test]
    fn refuses_file_from_newer_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite3");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 99).unwrap();
        }

        let err = Database::new(path).err().unwrap();
        assert!(format!("{err:#}").contains("newer build"));
    }
}
