//! Integration tests for session lock acquisition and release.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use helpers::{Call, Op, ScriptedStore, SetOutcome, memory_locker, ms};
use sessionlock::{LockRequest, LockToken, ReleaseMode, SessionLocker};
use sessionlock_core::error::ErrorKind;

#[tokio::test(start_paused = true)]
async fn test_first_attempt_succeeds_and_release_reads_then_deletes() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("session-id-1", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .expect("lock should be acquired");
    let token = lock.token().to_string();
    assert!(!token.is_empty());

    lock.release().await.unwrap();

    let key = "SESSION_LOCK:session-id-1".to_string();
    assert_eq!(
        store.calls(),
        vec![
            Call::SetNx {
                key: key.clone(),
                value: token,
                ttl: ms(5000),
            },
            Call::Get { key: key.clone() },
            Call::Delete { key },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_on_third_attempt() {
    let store = Arc::new(ScriptedStore::new(
        [SetOutcome::Fail, SetOutcome::Fail],
        SetOutcome::Succeed,
    ));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("session-id-2", ms(5000), ms(500), ms(100))
        .await
        .unwrap();

    assert!(lock.is_some());
    assert_eq!(store.set_nx_count(), 3);
    assert_eq!(store.set_nx_times(), vec![ms(0), ms(100), ms(200)]);
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_wait_budget() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Fail));
    let locker = SessionLocker::new(store.clone());
    let start = Instant::now();

    let lock = locker
        .acquire_with("session-id-3", ms(5000), ms(200), ms(100))
        .await
        .unwrap();

    assert!(lock.is_none());
    assert_eq!(store.set_nx_count(), 2);
    assert_eq!(Instant::now() - start, ms(200));
}

#[tokio::test(start_paused = true)]
async fn test_token_reused_across_retries() {
    let store = Arc::new(ScriptedStore::new(
        [SetOutcome::Fail, SetOutcome::Fail],
        SetOutcome::Succeed,
    ));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("s", ms(5000), ms(1000), ms(50))
        .await
        .unwrap()
        .unwrap();

    let values: Vec<String> = store
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SetNx { value, .. } => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(values.len(), 3);
    assert!(values.iter().all(|v| v == lock.token().as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_retry_bound_holds_for_various_budgets() {
    for (wait, retry) in [(0, 10), (50, 100), (200, 100), (250, 100), (1000, 30)] {
        let store = Arc::new(ScriptedStore::always(SetOutcome::Fail));
        let locker = SessionLocker::new(store.clone());
        let request = LockRequest::new("bounded", ms(5000), ms(wait), ms(retry)).unwrap();
        let start = Instant::now();

        assert!(locker.acquire(&request).await.unwrap().is_none());

        let attempts = store.set_nx_count() as u128;
        assert_eq!(attempts, request.max_attempts(), "wait={wait} retry={retry}");
        assert!(attempts <= u128::from(wait / retry) + 1);
        assert!(Instant::now() - start >= ms(wait));
    }
}

#[tokio::test(start_paused = true)]
async fn test_store_error_propagates_without_retry() {
    let store = Arc::new(ScriptedStore::new([SetOutcome::Fail], SetOutcome::Error));
    let locker = SessionLocker::new(store.clone());

    let err = locker
        .acquire_with("down", ms(5000), ms(1000), ms(100))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Store);
    assert!(err.is_store_unavailable());
    assert_eq!(store.set_nx_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_release_then_reacquire() {
    let (locker, _store) = memory_locker();

    let lock = locker
        .acquire_with("again", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    lock.release().await.unwrap();

    let next = locker
        .acquire_with("again", ms(5000), ms(0), ms(10))
        .await
        .unwrap();
    assert!(next.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_expired_holder_cannot_release_new_lease() {
    for mode in [ReleaseMode::GetThenDelete, ReleaseMode::CompareAndDelete] {
        let (locker, store) = memory_locker();
        let locker = locker.with_release_mode(mode);

        let stale = locker
            .acquire_with("handover", ms(100), ms(0), ms(10))
            .await
            .unwrap()
            .unwrap();

        tokio::time::advance(ms(150)).await;

        let fresh = locker
            .acquire_with("handover", ms(5000), ms(0), ms(10))
            .await
            .unwrap()
            .expect("expired lease should be re-acquirable");
        assert_ne!(stale.token(), fresh.token());

        stale.release().await.unwrap();
        assert_eq!(
            locker.holder("handover").await.unwrap().as_ref(),
            Some(fresh.token()),
            "mode {mode}"
        );

        fresh.release().await.unwrap();
        assert!(store.is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_double_release_is_noop() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("twice", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    lock.release().await.unwrap();

    // Someone else takes the session between our two releases.
    store.put("SESSION_LOCK:twice", "other-holder");
    lock.release().await.unwrap();

    assert_eq!(
        store.value("SESSION_LOCK:twice"),
        Some("other-holder".to_string())
    );
    let deletes = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Delete { .. }))
        .count();
    assert_eq!(deletes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_compare_and_delete_mode_uses_atomic_primitive() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone()).with_release_mode(ReleaseMode::CompareAndDelete);

    let lock = locker
        .acquire_with("atomic", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    lock.release().await.unwrap();

    let calls = store.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        Call::CompareAndDelete {
            key: "SESSION_LOCK:atomic".to_string(),
            expected: lock.token().to_string(),
        }
    );
    assert_eq!(store.value("SESSION_LOCK:atomic"), None);
}

#[tokio::test(start_paused = true)]
async fn test_release_token_after_expiry_is_noop() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("gone", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    store.expire("SESSION_LOCK:gone");

    assert!(!locker.release_token("gone", lock.token()).await.unwrap());
    assert!(
        !locker
            .release_token("gone", &LockToken::from_string("anything"))
            .await
            .unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn test_release_read_failure_propagates_without_delete() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("flaky", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    store.fail(Op::Get);

    let err = lock.release().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert!(
        !store
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Delete { .. }))
    );
    assert_eq!(
        store.value("SESSION_LOCK:flaky").as_deref(),
        Some(lock.token().as_str())
    );
}

#[tokio::test(start_paused = true)]
async fn test_release_delete_failure_propagates() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone());

    let lock = locker
        .acquire_with("flaky", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    store.fail(Op::Delete);

    let err = lock.release().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert!(matches!(store.calls().last(), Some(Call::Delete { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_atomic_release_failure_propagates() {
    let store = Arc::new(ScriptedStore::always(SetOutcome::Succeed));
    let locker = SessionLocker::new(store.clone()).with_release_mode(ReleaseMode::CompareAndDelete);

    let lock = locker
        .acquire_with("flaky", ms(5000), ms(0), ms(10))
        .await
        .unwrap()
        .unwrap();
    store.fail(Op::CompareAndDelete);

    let err = lock.release().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Store);
    assert!(err.is_store_unavailable());
    assert!(store.value("SESSION_LOCK:flaky").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_oversized_ttl_on_memory_store() {
    let (locker, _store) = memory_locker();

    let lock = locker
        .acquire_with("big", Duration::from_secs(u64::MAX), Duration::ZERO, ms(10))
        .await
        .unwrap()
        .expect("free session should be acquired");

    assert!(
        locker
            .acquire_with("big", ms(5000), ms(0), ms(10))
            .await
            .unwrap()
            .is_none()
    );
    lock.release().await.unwrap();
    assert!(locker.holder("big").await.unwrap().is_none());
}
