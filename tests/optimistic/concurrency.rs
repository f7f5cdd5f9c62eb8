//! Overlapping mutations and refreshes on one cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use optimistic_list::{ListCache, ListQuery, Mutation, OptimisticOptions, RemoteError};
use tokio::sync::Notify;

use crate::support::{draft, loaded_cache, note, Note, NotePatch, RemoteNotes};

#[tokio::test]
async fn concurrent_toggles_converge_after_first_fails() {
    let remote = RemoteNotes::with(vec![note(5, "five", false)]);
    let cache = loaded_cache(&remote).await;

    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let rolled_back_to: Arc<Mutex<Vec<Vec<Note>>>> = Arc::new(Mutex::new(Vec::new()));

    let toggle = Mutation::new(
        "note.toggle",
        cache.with_optimistic(|cache| {
            let cache = cache.clone();
            let observer = cache.clone();
            let rolled_back_to = Arc::clone(&rolled_back_to);
            OptimisticOptions::new(move |id: &i64| {
                if let Some(current) = cache.find(id) {
                    cache.update(
                        id,
                        NotePatch {
                            completed: Some(!current.completed),
                            ..Default::default()
                        },
                    );
                }
            })
            .on_error(move |_| rolled_back_to.lock().unwrap().push(observer.get()))
        }),
        {
            let remote = remote.clone();
            let gate = Arc::clone(&gate);
            let calls = Arc::clone(&calls);
            move |id: i64| {
                let remote = remote.clone();
                let gate = Arc::clone(&gate);
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        gate.notified().await;
                        return Err(RemoteError::Network("connection reset".into()));
                    }
                    remote.toggle(id)
                }
            }
        },
    );

    let first = toggle.mutate(5);
    let second = async {
        // Let the first toggle reach its remote call.
        tokio::task::yield_now().await;
        let result = toggle.mutate(5).await;
        gate.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_err());
    assert_eq!(second.unwrap(), note(5, "five", true));

    // The first rollback restored its own snapshot, discarding the second toggle.
    assert_eq!(*rolled_back_to.lock().unwrap(), vec![vec![note(5, "five", false)]]);

    assert_eq!(cache.get(), remote.rows());
    assert_eq!(cache.get(), vec![note(5, "five", true)]);
    assert_eq!(toggle.pending_count(), 0);
}

#[tokio::test]
async fn cancel_discards_refresh_started_before_mutation() {
    let remote = RemoteNotes::with(Vec::new());
    let gate = Arc::new(Notify::new());
    let fetches = Arc::new(AtomicUsize::new(0));

    let fetcher = {
        let remote = remote.clone();
        let gate = Arc::clone(&gate);
        let fetches = Arc::clone(&fetches);
        move || {
            let rows = remote.rows();
            let gate = Arc::clone(&gate);
            let n = fetches.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    gate.notified().await;
                }
                Ok::<_, RemoteError>(rows)
            }
        }
    };
    let query = ListQuery::new("notes", fetcher);
    let cache = ListCache::new(query.clone());

    let create = Mutation::new(
        "note.create",
        cache.with_optimistic(|cache| {
            let cache = cache.clone();
            OptimisticOptions::new(move |title: &String| {
                cache.add(draft(title));
            })
        }),
        {
            let remote = remote.clone();
            move |title: String| {
                let remote = remote.clone();
                async move { remote.create(&title) }
            }
        },
    );

    let stale_refresh = query.fetch();
    let mutation = async {
        tokio::task::yield_now().await;
        let result = create.mutate("fresh".to_string()).await;
        gate.notify_one();
        result
    };
    let (refresh, created) = tokio::join!(stale_refresh, mutation);

    refresh.unwrap();
    let created = created.unwrap();
    assert_eq!(cache.get(), vec![created]);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn pending_count_tracks_in_flight_mutations() {
    let remote = RemoteNotes::with(Vec::new());
    let cache = loaded_cache(&remote).await;
    let gate = Arc::new(Notify::new());

    let create = Mutation::new(
        "note.create",
        cache.with_optimistic(|cache| {
            let cache = cache.clone();
            OptimisticOptions::new(move |title: &String| {
                cache.add(draft(title));
            })
        }),
        {
            let remote = remote.clone();
            let gate = Arc::clone(&gate);
            move |title: String| {
                let remote = remote.clone();
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    remote.create(&title)
                }
            }
        },
    );

    let observe = async {
        tokio::task::yield_now().await;
        let pending = create.pending_count();
        let speculative = cache.get().len();
        gate.notify_waiters();
        (pending, speculative)
    };
    let (a, b, (pending, speculative)) =
        tokio::join!(create.mutate("a".into()), create.mutate("b".into()), observe);

    assert_eq!(pending, 2);
    assert_eq!(speculative, 2);
    assert!(a.is_ok() && b.is_ok());
    assert!(!create.is_pending());
    assert_eq!(cache.get(), remote.rows());
}
