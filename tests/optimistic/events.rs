//! Cache change notifications.

use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use optimistic_list::{
    CacheEvent, CacheEvents, ListCache, ListQuery, Mutation, OptimisticOptions, RemoteError,
};

use crate::support::{draft, note, Note, RemoteNotes};

#[tokio::test]
async fn failed_mutation_publishes_rollback() {
    let remote = RemoteNotes::with(vec![note(1, "a", false)]);
    let events = CacheEvents::new("notes");
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    events.on(CacheEvent::RolledBack, move |name| {
        let _ = tx.lock().unwrap().send(name);
    });

    let cache = ListCache::new(ListQuery::new("notes", remote.clone())).with_events(events);
    cache.query().fetch().await.unwrap();

    let create = Mutation::new(
        "note.create",
        cache.with_optimistic(|cache| {
            let cache = cache.clone();
            OptimisticOptions::new(move |title: &String| {
                cache.add(draft(title));
            })
        }),
        |_title: String| async { Err::<(), _>(RemoteError::Network("offline".into())) },
    );
    assert!(create.mutate("b".into()).await.is_err());

    let name = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(name, "notes");
    assert_eq!(cache.get(), vec![note(1, "a", false)]);
}

#[tokio::test]
async fn invalidate_publishes_event() {
    let remote = RemoteNotes::with(Vec::new());
    let events = CacheEvents::new("notes");
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    events.on(CacheEvent::Invalidated, move |name| {
        let _ = tx.lock().unwrap().send(name);
    });

    let cache = ListCache::new(ListQuery::new("notes", remote)).with_events(events);
    cache.invalidate().await;

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "notes");
}

#[tokio::test]
async fn failed_refetch_still_publishes_invalidated() {
    let events = CacheEvents::new("notes");
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    events.on(CacheEvent::Invalidated, move |name| {
        let _ = tx.lock().unwrap().send(name);
    });

    let offline = || async { Err::<Vec<Note>, _>(RemoteError::Network("offline".into())) };
    let cache = ListCache::new(ListQuery::new("notes", offline)).with_events(events);
    cache.set(|_| Some(vec![note(1, "a", false)]));
    cache.invalidate().await;

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "notes");
    assert_eq!(cache.get(), vec![note(1, "a", false)]);
    assert!(matches!(cache.query().last_error(), Some(RemoteError::Network(_))));
}
