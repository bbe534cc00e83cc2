//! In-process vector store, used for the inline sample documents.

use super::{check_dimension, missing_collection, rank, VectorStore};
use crate::types::{CollectionStats, DocumentChunk, EmbeddedChunk, RetrievedPassage};
use mentor_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Collection {
    dimension: usize,
    entries: Vec<EmbeddedChunk>,
}

/// Vector store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, name: &str, f: impl FnOnce(&Collection) -> AppResult<T>) -> AppResult<T> {
        let collections = self
            .collections
            .read()
            .map_err(|_| AppError::Knowledge("Memory store lock poisoned".to_string()))?;
        let collection = collections.get(name).ok_or_else(|| missing_collection(name))?;
        f(collection)
    }
}

impl VectorStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn has_collection(&self, name: &str) -> AppResult<bool> {
        let collections = self
            .collections
            .read()
            .map_err(|_| AppError::Knowledge("Memory store lock poisoned".to_string()))?;
        Ok(collections.contains_key(name))
    }

    fn create_collection(&self, name: &str, dimension: usize) -> AppResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AppError::Knowledge("Memory store lock poisoned".to_string()))?;
        if collections.contains_key(name) {
            return Err(AppError::Knowledge(format!(
                "Collection '{}' already exists",
                name
            )));
        }
        collections.insert(
            name.to_string(),
            Collection {
                dimension,
                entries: Vec::new(),
            },
        );
        Ok(())
    }

    fn drop_collection(&self, name: &str) -> AppResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AppError::Knowledge("Memory store lock poisoned".to_string()))?;
        collections.remove(name);
        Ok(())
    }

    fn insert(&self, name: &str, chunks: &[EmbeddedChunk]) -> AppResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AppError::Knowledge("Memory store lock poisoned".to_string()))?;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| missing_collection(name))?;

        for item in chunks {
            check_dimension(name, collection.dimension, item.embedding.len())?;
        }
        for item in chunks {
            collection.entries.retain(|e| e.chunk.id != item.chunk.id);
            collection.entries.push(item.clone());
        }
        Ok(())
    }

    fn search(&self, name: &str, query: &[f32], top_k: usize) -> AppResult<Vec<RetrievedPassage>> {
        self.read(name, |collection| {
            check_dimension(name, collection.dimension, query.len())?;
            let candidates = collection
                .entries
                .iter()
                .map(|e| (e.chunk.clone(), e.embedding.clone()));
            Ok(rank(query, candidates, top_k))
        })
    }

    fn count(&self, name: &str) -> AppResult<u32> {
        self.read(name, |collection| Ok(collection.entries.len() as u32))
    }

    fn chunks(&self, name: &str) -> AppResult<Vec<DocumentChunk>> {
        self.read(name, |collection| {
            Ok(collection.entries.iter().map(|e| e.chunk.clone()).collect())
        })
    }

    fn stats(&self, name: &str) -> AppResult<CollectionStats> {
        self.read(name, |collection| {
            Ok(CollectionStats {
                name: name.to_string(),
                dimension: collection.dimension,
                chunks_count: collection.entries.len() as u32,
            })
        })
    }
}
