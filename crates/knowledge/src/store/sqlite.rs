//! SQLite-backed vector store.

use super::{check_dimension, missing_collection, rank, VectorStore};
use crate::types::{CollectionStats, DocumentChunk, EmbeddedChunk, RetrievedPassage};
use mentor_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Vector store persisted in a single SQLite file.
///
/// The connection is opened once and shared behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Knowledge(format!("Failed to create vector store directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Knowledge(format!("Failed to open SQLite store: {}", e)))?;

        Self::init(conn, &db_path.display().to_string())
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Knowledge(format!("Failed to open SQLite store: {}", e)))?;
        Self::init(conn, ":memory:")
    }

    fn init(conn: Connection, label: &str) -> AppResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chunks (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                source TEXT NOT NULL,
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                heading_path TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                embedding BLOB NOT NULL,
                UNIQUE (collection, id),
                FOREIGN KEY (collection) REFERENCES collections(name)
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_collection ON chunks(collection);
            "#,
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to create tables: {}", e)))?;

        tracing::debug!("Initialized SQLite vector store at {}", label);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Knowledge("SQLite connection lock poisoned".to_string()))
    }

    fn dimension(conn: &Connection, name: &str) -> AppResult<Option<usize>> {
        conn.query_row(
            "SELECT dimension FROM collections WHERE name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map(|d| d.map(|d| d as usize))
        .map_err(|e| AppError::Knowledge(format!("Failed to read collection '{}': {}", name, e)))
    }

    fn require_dimension(conn: &Connection, name: &str) -> AppResult<usize> {
        Self::dimension(conn, name)?.ok_or_else(|| missing_collection(name))
    }

    fn load_rows(conn: &Connection, name: &str) -> AppResult<Vec<(DocumentChunk, Vec<f32>)>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, source, position, text, heading_path, content_hash, embedding
                 FROM chunks WHERE collection = ?1 ORDER BY seq",
            )
            .map_err(|e| AppError::Knowledge(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![name], |row| {
                let heading_json: String = row.get(4)?;
                let heading_path: Vec<String> = serde_json::from_str(&heading_json)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                let embedding_bytes: Vec<u8> = row.get(6)?;

                Ok((
                    DocumentChunk {
                        id: row.get(0)?,
                        source: row.get(1)?,
                        position: row.get::<_, i64>(2)? as u32,
                        text: row.get(3)?,
                        heading_path,
                        content_hash: row.get(5)?,
                    },
                    embedding_bytes,
                ))
            })
            .map_err(|e| AppError::Knowledge(format!("Failed to query chunks: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (chunk, bytes) =
                row.map_err(|e| AppError::Knowledge(format!("Failed to read chunk: {}", e)))?;
            results.push((chunk, bytes_to_embedding(&bytes)?));
        }
        Ok(results)
    }
}

impl VectorStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn has_collection(&self, name: &str) -> AppResult<bool> {
        let conn = self.lock()?;
        Ok(Self::dimension(&conn, name)?.is_some())
    }

    fn create_collection(&self, name: &str, dimension: usize) -> AppResult<()> {
        let conn = self.lock()?;
        if Self::dimension(&conn, name)?.is_some() {
            return Err(AppError::Knowledge(format!(
                "Collection '{}' already exists",
                name
            )));
        }

        conn.execute(
            "INSERT INTO collections (name, dimension) VALUES (?1, ?2)",
            params![name, dimension as i64],
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to create collection: {}", e)))?;

        tracing::info!("Created collection '{}' ({} dimensions)", name, dimension);
        Ok(())
    }

    fn drop_collection(&self, name: &str) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM chunks WHERE collection = ?1", params![name])
            .map_err(|e| AppError::Knowledge(format!("Failed to delete chunks: {}", e)))?;
        conn.execute("DELETE FROM collections WHERE name = ?1", params![name])
            .map_err(|e| AppError::Knowledge(format!("Failed to delete collection: {}", e)))?;

        tracing::info!("Dropped collection '{}'", name);
        Ok(())
    }

    fn insert(&self, name: &str, chunks: &[EmbeddedChunk]) -> AppResult<()> {
        let mut conn = self.lock()?;
        let dimension = Self::require_dimension(&conn, name)?;
        for item in chunks {
            check_dimension(name, dimension, item.embedding.len())?;
        }

        let tx = conn
            .transaction()
            .map_err(|e| AppError::Knowledge(format!("Failed to begin transaction: {}", e)))?;
        for item in chunks {
            let chunk = &item.chunk;
            let heading_json = serde_json::to_string(&chunk.heading_path)?;
            tx.execute(
                "INSERT OR REPLACE INTO chunks
                 (collection, id, source, position, text, heading_path, content_hash, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    name,
                    chunk.id,
                    chunk.source,
                    chunk.position as i64,
                    chunk.text,
                    heading_json,
                    chunk.content_hash,
                    embedding_to_bytes(&item.embedding),
                ],
            )
            .map_err(|e| AppError::Knowledge(format!("Failed to insert chunk: {}", e)))?;
        }
        tx.commit()
            .map_err(|e| AppError::Knowledge(format!("Failed to commit chunks: {}", e)))?;

        tracing::debug!("Inserted {} chunks into '{}'", chunks.len(), name);
        Ok(())
    }

    fn search(&self, name: &str, query: &[f32], top_k: usize) -> AppResult<Vec<RetrievedPassage>> {
        let conn = self.lock()?;
        let dimension = Self::require_dimension(&conn, name)?;
        check_dimension(name, dimension, query.len())?;

        let results = rank(query, Self::load_rows(&conn, name)?, top_k);
        tracing::debug!(
            "Retrieved {} chunks from '{}' (requested top-{})",
            results.len(),
            name,
            top_k
        );
        Ok(results)
    }

    fn count(&self, name: &str) -> AppResult<u32> {
        let conn = self.lock()?;
        Self::require_dimension(&conn, name)?;
        conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![name],
            |row| row.get::<_, i64>(0).map(|v| v as u32),
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to count chunks: {}", e)))
    }

    fn chunks(&self, name: &str) -> AppResult<Vec<DocumentChunk>> {
        let conn = self.lock()?;
        Self::require_dimension(&conn, name)?;
        Ok(Self::load_rows(&conn, name)?
            .into_iter()
            .map(|(chunk, _)| chunk)
            .collect())
    }

    fn stats(&self, name: &str) -> AppResult<CollectionStats> {
        let dimension = {
            let conn = self.lock()?;
            Self::require_dimension(&conn, name)?
        };
        Ok(CollectionStats {
            name: name.to_string(),
            dimension,
            chunks_count: self.count(name)?,
        })
    }
}

/// Encode an embedding as little-endian f32 bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Knowledge(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn embedded(id: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk: DocumentChunk {
                id: id.to_string(),
                source: "notes.md".to_string(),
                position: 0,
                text: format!("text of {}", id),
                heading_path: vec!["Intro".to_string()],
                content_hash: "hash".to_string(),
            },
            embedding,
        }
    }

    #[test]
    fn test_open_creates_tables() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("db/store.sqlite")).unwrap();

        let conn = store.lock().unwrap();
        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('collections', 'chunks')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 2);
    }

    #[test]
    fn test_insert_and_search() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_collection("docs", 3).unwrap();
        store
            .insert(
                "docs",
                &[
                    embedded("a", vec![1.0, 0.0, 0.0]),
                    embedded("b", vec![0.0, 1.0, 0.0]),
                ],
            )
            .unwrap();

        let results = store.search("docs", &[1.0, 0.1, 0.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[0].chunk.heading_path, vec!["Intro".to_string()]);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_collections_are_isolated() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_collection("one", 2).unwrap();
        store.create_collection("two", 2).unwrap();
        store.insert("one", &[embedded("a", vec![1.0, 0.0])]).unwrap();

        assert_eq!(store.count("one").unwrap(), 1);
        assert_eq!(store.count("two").unwrap(), 0);

        store.drop_collection("one").unwrap();
        assert!(!store.has_collection("one").unwrap());
        assert!(store.has_collection("two").unwrap());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_collection("docs", 3).unwrap();

        assert!(store.insert("docs", &[embedded("a", vec![1.0])]).is_err());
        assert!(store.search("docs", &[1.0, 0.0], 3).is_err());
    }

    #[test]
    fn test_missing_collection() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.search("nope", &[1.0], 3).unwrap_err();
        assert!(err.is_fatal());
        assert!(store.create_collection("docs", 2).is_ok());
        assert!(store.create_collection("docs", 2).is_err());
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.sqlite");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.create_collection("docs", 2).unwrap();
            store
                .insert("docs", &[embedded("a", vec![0.5, 0.5])])
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let stats = store.stats("docs").unwrap();
        assert_eq!(stats.dimension, 2);
        assert_eq!(stats.chunks_count, 1);
        assert_eq!(store.chunks("docs").unwrap()[0].id, "a");
    }

    #[test]
    fn test_embedding_bytes() {
        let embedding = vec![0.25, -1.5, 3.0];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_embedding(&bytes).unwrap(), embedding);
        assert!(bytes_to_embedding(&bytes[..5]).is_err());
    }
}
