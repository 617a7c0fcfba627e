//! Core Store implementation

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::path::normalize_collection;
use crate::{DB_FILE_NAME, DocPath, StoreError, now_ms};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    path TEXT PRIMARY KEY,
    collection TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
";

/// A stored document with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocPath,
    pub data: Value,
    /// Last write timestamp (Unix milliseconds)
    pub updated_at: i64,
}

/// The main document store
pub struct Store {
    conn: Connection,
    /// Database file, `None` for in-memory stores
    db_path: Option<PathBuf>,
}

impl Store {
    /// Open or create a store in the given directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let db_path = dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.execute_batch(SCHEMA)?;
        info!(db_path = %db_path.display(), "Opened document store");
        Ok(Self {
            conn,
            db_path: Some(db_path),
        })
    }

    /// Open a throwaway store that lives only in memory
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        debug!("Opened in-memory document store");
        Ok(Self { conn, db_path: None })
    }

    /// Path of the backing database file, if any
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Point lookup. `Ok(None)` means the document does not exist.
    pub fn get(&self, path: &DocPath) -> Result<Option<Value>, StoreError> {
        debug!(%path, "get: called");
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM documents WHERE path = ?1",
                params![path.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => {
                debug!(%path, "get: not found");
                Ok(None)
            }
        }
    }

    /// Replace the document entirely (creating it if needed)
    pub fn set(&mut self, path: &DocPath, data: Value) -> Result<(), StoreError> {
        debug!(%path, "set: called");
        if !data.is_object() {
            return Err(StoreError::NotAnObject(path.to_string()));
        }
        write_document(&self.conn, path, &data)
    }

    /// Shallow-merge top-level fields into the document
    ///
    /// Fields not named in `fields` are left untouched. A missing document is
    /// created from `fields` alone. Returns the merged document.
    pub fn merge(&mut self, path: &DocPath, fields: Map<String, Value>) -> Result<Value, StoreError> {
        debug!(%path, field_count = fields.len(), "merge: called");
        let tx = self.conn.transaction()?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT data FROM documents WHERE path = ?1",
                params![path.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let mut merged = match existing {
            Some(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                _ => return Err(StoreError::NotAnObject(path.to_string())),
            },
            None => {
                debug!(%path, "merge: document absent, creating");
                Map::new()
            }
        };

        for (key, value) in fields {
            merged.insert(key, value);
        }

        let merged = Value::Object(merged);
        write_document(&tx, path, &merged)?;
        tx.commit()?;
        Ok(merged)
    }

    /// Delete a document. Returns whether it existed.
    pub fn delete(&mut self, path: &DocPath) -> Result<bool, StoreError> {
        debug!(%path, "delete: called");
        let removed = self
            .conn
            .execute("DELETE FROM documents WHERE path = ?1", params![path.to_string()])?;
        Ok(removed > 0)
    }

    /// List the documents directly inside a collection, ordered by path
    pub fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collection = normalize_collection(collection)?;
        debug!(%collection, "list: called");

        let mut stmt = self
            .conn
            .prepare("SELECT path, data, updated_at FROM documents WHERE collection = ?1 ORDER BY path")?;
        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (path, data, updated_at) = row?;
            documents.push(Document {
                path: DocPath::parse(&path)?,
                data: serde_json::from_str(&data)?,
                updated_at,
            });
        }
        Ok(documents)
    }
}

fn write_document(conn: &Connection, path: &DocPath, data: &Value) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO documents (path, collection, data, updated_at) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(path) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        params![path.to_string(), path.collection(), serde_json::to_string(data)?, now_ms()],
    )?;
    Ok(())
}
