//! Speculative apply, rollback and convergence for single mutations.

use std::sync::{Arc, Mutex};

use optimistic_list::{
    ListCache, ListQuery, Mutation, OptimisticOptions, QueryUtils, RemoteError, TemporaryId,
};

use crate::support::{draft, loaded_cache, note, Note, NotePatch, RemoteNotes};

#[tokio::test]
async fn add_appends_with_negative_id() {
    let remote = RemoteNotes::with(vec![note(1, "a", false)]);
    let cache = loaded_cache(&remote).await;

    let id = cache.add(draft("b"));

    let items = cache.get();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].id, id);
    assert!(id < 0);
    assert_eq!(items[1].title, "b");
}

#[tokio::test]
async fn failed_create_removes_speculative_entry() {
    let remote = RemoteNotes::with(vec![note(1, "a", false)]);
    let query = ListQuery::new("notes", remote.clone());
    query.fetch().await.unwrap();
    let cache = ListCache::with_temp_ids(query, Arc::new(|| -999_i64));

    let hooks = cache.with_optimistic(|cache| {
        let cache = cache.clone();
        OptimisticOptions::new(move |title: &String| {
            cache.add(draft(title));
        })
    });

    let context = hooks.on_mutate(&"b".to_string()).await;
    assert_eq!(cache.get(), vec![note(1, "a", false), note(-999, "b", false)]);

    let err = RemoteError::Network("offline".into());
    hooks.on_error(&err, &"b".to_string(), Some(context));
    assert_eq!(cache.get(), vec![note(1, "a", false)]);
}

#[tokio::test]
async fn update_and_remove_through_mutations_converge() {
    let remote = RemoteNotes::with(vec![note(5, "five", false)]);
    let cache = loaded_cache(&remote).await;

    let toggle = Mutation::new(
        "note.toggle",
        cache.with_optimistic(|cache| {
            let cache = cache.clone();
            OptimisticOptions::new(move |id: &i64| {
                cache.update(
                    id,
                    NotePatch {
                        completed: Some(true),
                        ..Default::default()
                    },
                );
            })
        }),
        {
            let remote = remote.clone();
            move |id: i64| {
                let remote = remote.clone();
                async move { remote.toggle(id) }
            }
        },
    );
    let toggled = toggle.mutate(5).await.unwrap();
    assert_eq!(toggled, note(5, "five", true));
    assert_eq!(cache.get(), vec![note(5, "five", true)]);

    let delete = Mutation::new(
        "note.delete",
        cache.with_optimistic(|cache| {
            let cache = cache.clone();
            OptimisticOptions::new(move |id: &i64| cache.remove(id))
        }),
        {
            let remote = remote.clone();
            move |id: i64| {
                let remote = remote.clone();
                async move {
                    remote.remove(id);
                    Ok::<_, RemoteError>(())
                }
            }
        },
    );
    delete.mutate(5).await.unwrap();
    assert!(cache.get().is_empty());
    assert_eq!(cache.get(), remote.rows());
}

#[tokio::test]
async fn missing_id_leaves_cache_unchanged() {
    let remote = RemoteNotes::with(vec![note(1, "a", false), note(2, "b", true)]);
    let cache = loaded_cache(&remote).await;
    let before = cache.get();

    cache.remove(&42);
    cache.update(
        &42,
        NotePatch {
            title: Some("z".into()),
            completed: Some(false),
        },
    );

    assert_eq!(cache.get(), before);
    assert!(cache.find(&42).is_none());
}

#[tokio::test]
async fn successful_create_replaces_temporary_id_with_real_one() {
    let remote = RemoteNotes::with(Vec::new());
    let cache = loaded_cache(&remote).await;

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

    let created = create.mutate("milk".to_string()).await.unwrap();

    assert!(!created.id.is_temporary());
    assert_eq!(cache.get(), remote.rows());
    assert!(cache.get().iter().all(|n| !n.id.is_temporary()));
    assert!(!create.is_pending());
}

#[tokio::test]
async fn failure_callback_runs_after_rollback() {
    let remote = RemoteNotes::with(vec![note(1, "a", false)]);
    let cache = loaded_cache(&remote).await;
    let seen: Arc<Mutex<Option<(String, Vec<Note>)>>> = Arc::new(Mutex::new(None));

    let create = Mutation::new(
        "note.create",
        cache.with_optimistic(|cache| {
            let adder = cache.clone();
            let observer = cache.clone();
            let seen = Arc::clone(&seen);
            OptimisticOptions::new(move |title: &String| {
                adder.add(draft(title));
            })
            .on_error(move |err| {
                *seen.lock().unwrap() = Some((err.message().to_string(), observer.get()));
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

    let err = create.mutate(String::new()).await.unwrap_err();
    assert_eq!(err, RemoteError::Validation("Title is required".into()));

    let (message, at_callback) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(message, "Title is required");
    assert_eq!(at_callback, vec![note(1, "a", false)]);
    assert_eq!(cache.get(), remote.rows());
}

#[tokio::test]
async fn rollback_restores_after_mixed_speculation() {
    let remote = RemoteNotes::with(vec![note(1, "a", false), note(2, "b", false)]);
    let cache = loaded_cache(&remote).await;
    let original = cache.get();

    let hooks = cache.with_optimistic(|cache| {
        let cache = cache.clone();
        OptimisticOptions::new(move |_: &()| {
            cache.add(draft("c"));
            cache.update_with(&1, |n| n.completed = true);
            cache.remove(&2);
        })
    });

    let context = hooks.on_mutate(&()).await;
    assert_ne!(cache.get(), original);
    assert_eq!(context.previous, original);

    hooks.on_error(&RemoteError::Server("boom".into()), &(), Some(context));
    assert_eq!(cache.get(), original);
}

#[tokio::test]
async fn invalidate_is_idempotent() {
    let remote = RemoteNotes::with(vec![note(1, "a", false)]);
    let cache = loaded_cache(&remote).await;
    cache.add(draft("speculative"));

    cache.invalidate().await;
    let once = cache.get();
    cache.invalidate().await;
    cache.invalidate().await;

    assert_eq!(cache.get(), once);
    assert_eq!(once, remote.rows());
    assert_eq!(remote.fetches(), 4);
}

#[tokio::test]
async fn mutations_before_first_fetch_start_from_empty() {
    let remote = RemoteNotes::with(vec![note(1, "a", false)]);
    let cache = ListCache::new(ListQuery::new("notes", remote.clone()));
    assert!(cache.query().get_data().is_none());

    let hooks = cache.with_optimistic(|cache| {
        let cache = cache.clone();
        OptimisticOptions::new(move |title: &String| {
            cache.add(draft(title));
        })
    });

    let context = hooks.on_mutate(&"x".to_string()).await;
    assert!(context.previous.is_empty());
    assert_eq!(cache.get().len(), 1);

    hooks.on_settled().await;
    assert_eq!(cache.get(), remote.rows());
}
