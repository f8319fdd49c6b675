//! Tests for the in-memory transactional store.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::PasswordHash;

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

fn user(email: &str) -> User {
    User {
        id: 0,
        name: "Luca".into(),
        surname: "Verdi".into(),
        email: email.into(),
        password: PasswordHash::new("hash"),
        phone: 39,
    }
}

async fn seed(store: &InMemoryStore, count: usize) {
    let mut tx = store.begin().await.expect("begin");
    for n in 0..count {
        tx.insert_user(&user(&format!("u{n}@example.com")))
            .await
            .expect("insert");
    }
    tx.commit().await.expect("commit");
}

#[rstest]
#[tokio::test]
async fn uncommitted_work_is_invisible(store: InMemoryStore) {
    let mut tx = store.begin().await.expect("begin");
    tx.insert_user(&user("a@example.com")).await.expect("insert");
    assert!(store.users().is_empty());
    tx.commit().await.expect("commit");
    assert_eq!(store.users().len(), 1);
}

#[rstest]
#[tokio::test]
async fn dropped_transaction_discards_work(store: InMemoryStore) {
    {
        let mut tx = store.begin().await.expect("begin");
        tx.insert_user(&user("a@example.com")).await.expect("insert");
    }
    assert!(store.users().is_empty());
}

#[rstest]
#[tokio::test]
async fn rollback_after_commit_is_a_no_op(store: InMemoryStore) {
    let mut tx = store.begin().await.expect("begin");
    tx.commit().await.expect("commit");
    tx.rollback().await.expect("rollback");
    assert_eq!(
        store.stats(),
        StoreStats {
            begins: 1,
            commits: 1,
            rollbacks: 0
        }
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_unique_violation(store: InMemoryStore) {
    let mut tx = store.begin().await.expect("begin");
    tx.insert_user(&user("a@example.com")).await.expect("insert");
    let err = tx
        .insert_user(&user("a@example.com"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
}

#[rstest]
#[tokio::test]
async fn listing_is_newest_first_with_window_total(store: InMemoryStore) {
    seed(&store, 12).await;
    let mut tx = store.begin().await.expect("begin");
    let page = tx
        .find_users(&UserFilter {
            page: 1,
            limit: 10,
            ..UserFilter::default()
        })
        .await
        .expect("find");
    assert_eq!(page.total, 12);
    let ids: Vec<i64> = page.items.iter().map(|u| u.id).collect();
    assert_eq!(ids, (3..=12).rev().collect::<Vec<_>>());

    let second = tx
        .find_users(&UserFilter {
            page: 2,
            limit: 10,
            ..UserFilter::default()
        })
        .await
        .expect("find");
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.total, 12);
}

#[rstest]
#[tokio::test]
async fn page_past_the_end_reports_zero_total(store: InMemoryStore) {
    seed(&store, 3).await;
    let mut tx = store.begin().await.expect("begin");
    let page = tx
        .find_users(&UserFilter {
            page: 5,
            limit: 10,
            ..UserFilter::default()
        })
        .await
        .expect("find");
    assert_eq!(page, Page::empty());
}

#[rstest]
#[tokio::test]
async fn injected_statement_failure_fires_once(store: InMemoryStore) {
    store.fail_next_statement("connection reset by peer");
    let mut tx = store.begin().await.expect("begin");
    let err = tx
        .find_users(&UserFilter::default())
        .await
        .expect_err("injected");
    assert_eq!(err, StoreError::query("connection reset by peer"));
    assert!(tx.find_users(&UserFilter::default()).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn admins_are_filtered_by_email(store: InMemoryStore) {
    let mut tx = store.begin().await.expect("begin");
    for email in ["x@example.com", "y@example.com"] {
        tx.insert_admin(&Admin {
            id: 0,
            name: "N".into(),
            surname: "S".into(),
            email: email.into(),
            password: PasswordHash::new("hash"),
            active: true,
        })
        .await
        .expect("insert");
    }
    let page = tx
        .find_admins(&AdminFilter::by_email("y@example.com"))
        .await
        .expect("find");
    assert_eq!(page.total, 1);
    assert_eq!(page.first().map(|a| a.id), Some(2));
}

#[tokio::test]
async fn transactions_take_their_timestamp_from_the_clock() {
    use chrono::{Duration, SubsecRound, TimeZone};
    use mockable::MockClock;

    use crate::domain::begin_transaction;

    let instant = Utc
        .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid instant")
        + Duration::milliseconds(250);
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(instant);
    let store = InMemoryStore::new(Arc::new(clock));

    let tx = begin_transaction(&store, None).await.expect("begin");
    assert_eq!(tx.now(), instant.trunc_subsecs(0));
}

#[rstest]
#[tokio::test]
async fn begin_waits_for_the_open_transaction(store: InMemoryStore) {
    use std::time::Duration;

    let mut first = store.begin().await.expect("begin");
    first
        .insert_user(&user("a@example.com"))
        .await
        .expect("insert");
    let waiting = tokio::time::timeout(Duration::from_millis(20), store.begin()).await;
    assert!(waiting.is_err(), "second begin should wait");

    first.commit().await.expect("commit");
    let mut second = store.begin().await.expect("begin after commit");
    let id = second
        .insert_user(&user("b@example.com"))
        .await
        .expect("insert");
    second.commit().await.expect("commit");
    assert_eq!(id, 2);
    assert_eq!(store.users().len(), 2);
}
