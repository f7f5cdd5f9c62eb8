//! Test domain: notes held by a fake remote list store.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use optimistic_list::{ListCache, ListFetcher, ListItem, ListQuery, RemoteError};

#[derive(Clone, Debug, PartialEq, ListItem)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

pub fn note(id: i64, title: &str, completed: bool) -> Note {
    Note {
        id,
        title: title.into(),
        completed,
    }
}

pub fn draft(title: &str) -> NoteDraft {
    NoteDraft {
        title: title.into(),
        completed: false,
    }
}

/// Authoritative store for notes. Clone-friendly via Arc.
#[derive(Clone)]
pub struct RemoteNotes {
    rows: Arc<Mutex<Vec<Note>>>,
    next_id: Arc<AtomicI64>,
    fetches: Arc<AtomicUsize>,
}

impl RemoteNotes {
    pub fn with(rows: Vec<Note>) -> Self {
        let next = rows.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        Self {
            rows: Arc::new(Mutex::new(rows)),
            next_id: Arc::new(AtomicI64::new(next)),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rows(&self) -> Vec<Note> {
        self.rows.lock().unwrap().clone()
    }

    pub fn create(&self, title: &str) -> Result<Note, RemoteError> {
        if title.is_empty() {
            return Err(RemoteError::Validation("Title is required".into()));
        }
        let created = note(self.next_id.fetch_add(1, Ordering::SeqCst), title, false);
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    pub fn toggle(&self, id: i64) -> Result<Note, RemoteError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| RemoteError::NotFound("Note not found".into()))?;
        row.completed = !row.completed;
        Ok(row.clone())
    }

    pub fn remove(&self, id: i64) {
        self.rows.lock().unwrap().retain(|n| n.id != id);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ListFetcher<Note> for RemoteNotes {
    async fn fetch_all(&self) -> Result<Vec<Note>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows())
    }
}

pub type NoteQuery = ListQuery<Note, RemoteNotes>;
pub type NoteCache = ListCache<Note, NoteQuery>;

/// A cache over `remote`, already holding the remote's rows.
pub async fn loaded_cache(remote: &RemoteNotes) -> NoteCache {
    let cache = ListCache::new(ListQuery::new("notes", remote.clone()));
    cache.query().fetch().await.unwrap();
    cache
}
