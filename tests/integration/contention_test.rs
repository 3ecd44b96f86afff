//! Integration tests for concurrent acquirers sharing one store.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

use helpers::{memory_locker, ms};
use sessionlock::LockRequest;

#[tokio::test(start_paused = true)]
async fn test_only_one_concurrent_acquirer_wins() {
    let (locker, _store) = memory_locker();

    let attempts = (0..32).map(|_| {
        let locker = locker.clone();
        async move {
            locker
                .acquire_with("contended", ms(5000), ms(0), ms(10))
                .await
                .unwrap()
        }
    });
    let results = join_all(attempts).await;

    let winners: Vec<_> = results.into_iter().flatten().collect();
    assert_eq!(winners.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_critical_sections_never_overlap() {
    let (locker, store) = memory_locker();
    let inside = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let locker = locker.clone();
        let inside = inside.clone();
        let completed = completed.clone();
        tasks.push(tokio::spawn(async move {
            let request = LockRequest::new("shared", ms(5000), ms(10_000), ms(5)).unwrap();
            let out = locker
                .with_lock(&request, || async {
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    tokio::time::sleep(ms(20)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                    completed.fetch_add(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            assert!(out.is_some());
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(completed.load(Ordering::SeqCst), 8);
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_different_sessions_are_independent() {
    let (locker, store) = memory_locker();

    let ids: Vec<String> = (0..10).map(|i| format!("session-{i}")).collect();
    let attempts = ids.iter().map(|id| {
        let locker = locker.clone();
        async move {
            locker
                .acquire_with(id, ms(5000), ms(0), ms(10))
                .await
                .unwrap()
        }
    });
    let locks: Vec<_> = join_all(attempts).await.into_iter().flatten().collect();

    assert_eq!(locks.len(), 10);
    assert_eq!(store.len(), 10);
    for lock in &locks {
        lock.release().await.unwrap();
    }
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_crashed_holder_unblocks_after_ttl() {
    let (locker, _store) = memory_locker();

    // Acquired and never released.
    let crashed = locker
        .acquire_with("orphan", ms(250), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    drop(crashed);

    let waiter = locker
        .acquire_with("orphan", ms(5000), ms(100), ms(50))
        .await
        .unwrap();
    assert!(waiter.is_none(), "lease still live within the first 100ms");

    let waiter = locker
        .acquire_with("orphan", ms(5000), ms(500), ms(50))
        .await
        .unwrap();
    assert!(waiter.is_some());
}
