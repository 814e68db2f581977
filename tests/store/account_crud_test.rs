use chrono::{Duration, SubsecRound, Utc};
use silent_notes::config::DbPool;
use silent_notes::modules::auth::crud::AccountCrud;
use silent_notes::modules::auth::interface::{AccountStore, StoreError};
use silent_notes::modules::auth::model::{Account, Verification};
use uuid::Uuid;

use crate::common::{test_db, unique_suffix};

fn pending_account(code: u32) -> Account {
    // DATETIME(6) keeps microseconds.
    let now = Utc::now().trunc_subsecs(6);
    let suffix = unique_suffix();
    Account {
        id: Uuid::new_v4().to_string(),
        username: format!("u{}", suffix),
        email: format!("{}@example.com", suffix),
        password_hash: "$argon2id$v=19$m=8192,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        verification: Verification::Pending {
            code,
            expires_at: now + Duration::hours(2),
        },
        accepting_messages: true,
        created_at: now,
        updated_at: now,
    }
}

async fn cleanup(db: &DbPool, id: &str) {
    sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(id)
        .execute(db)
        .await
        .ok();
}

#[tokio::test]
async fn create_and_find_round_trip() {
    let Some(db) = test_db().await else { return };
    let store = AccountCrud::new(db.clone());

    // Top of the code range through INT UNSIGNED.
    let account = pending_account(999_999);
    store.create(&account).await.unwrap();

    let by_id = store.find_by_id(&account.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, account.username);
    assert_eq!(by_id.email, account.email);
    assert_eq!(by_id.password_hash, account.password_hash);
    assert_eq!(by_id.verification, account.verification);
    assert!(by_id.accepting_messages);
    assert_eq!(by_id.created_at, account.created_at);

    let by_name = store.find_by_username(&account.username).await.unwrap().unwrap();
    assert_eq!(by_name.id, account.id);

    let by_email = store.find_by_identifier(&account.email).await.unwrap().unwrap();
    assert_eq!(by_email.id, account.id);

    assert!(store.exists(&account.username, "nobody@example.com").await.unwrap());
    assert!(store.find_by_id(&Uuid::new_v4().to_string()).await.unwrap().is_none());

    cleanup(&db, &account.id).await;
}

#[tokio::test]
async fn keys_ignore_case_under_table_collation() {
    let Some(db) = test_db().await else { return };
    let store = AccountCrud::new(db.clone());

    let account = pending_account(123_456);
    store.create(&account).await.unwrap();

    let upper = account.username.to_uppercase();
    assert!(store.exists(&upper, "nobody@example.com").await.unwrap());
    assert!(store.find_by_username(&upper).await.unwrap().is_some());

    cleanup(&db, &account.id).await;
}

#[tokio::test]
async fn duplicate_insert_maps_to_duplicate() {
    let Some(db) = test_db().await else { return };
    let store = AccountCrud::new(db.clone());

    let account = pending_account(123_456);
    store.create(&account).await.unwrap();

    let mut same_name = pending_account(123_456);
    same_name.username = account.username.clone();
    assert!(matches!(
        store.create(&same_name).await,
        Err(StoreError::Duplicate)
    ));

    let mut same_email = pending_account(123_456);
    same_email.email = account.email.clone();
    assert!(matches!(
        store.create(&same_email).await,
        Err(StoreError::Duplicate)
    ));

    cleanup(&db, &account.id).await;
}

#[tokio::test]
async fn verified_row_refuses_new_code() {
    let Some(db) = test_db().await else { return };
    let store = AccountCrud::new(db.clone());

    let mut account = pending_account(123_456);
    account.verification = Verification::Verified;
    store.create(&account).await.unwrap();

    let accepted = store
        .set_pending_code(&account.id, 654_321, Utc::now())
        .await
        .unwrap();
    assert!(!accepted);

    let stored = store.find_by_id(&account.id).await.unwrap().unwrap();
    assert_eq!(stored.verification, Verification::Verified);

    cleanup(&db, &account.id).await;
}

#[tokio::test]
async fn mark_verified_requires_the_current_code() {
    let Some(db) = test_db().await else { return };
    let store = AccountCrud::new(db.clone());

    let account = pending_account(111_111);
    store.create(&account).await.unwrap();

    let expires_at = Utc::now().trunc_subsecs(6) + Duration::hours(2);
    assert!(store
        .set_pending_code(&account.id, 222_222, expires_at)
        .await
        .unwrap());

    // The replaced code no longer verifies.
    assert!(!store.mark_verified(&account.id, 111_111).await.unwrap());
    let stored = store.find_by_id(&account.id).await.unwrap().unwrap();
    assert_eq!(
        stored.verification,
        Verification::Pending {
            code: 222_222,
            expires_at
        }
    );

    assert!(store.mark_verified(&account.id, 222_222).await.unwrap());
    let stored = store.find_by_id(&account.id).await.unwrap().unwrap();
    assert_eq!(stored.verification, Verification::Verified);

    // Second use of the same code finds nothing to update.
    assert!(!store.mark_verified(&account.id, 222_222).await.unwrap());

    cleanup(&db, &account.id).await;
}

#[tokio::test]
async fn accepting_messages_toggle_reports_missing_rows() {
    let Some(db) = test_db().await else { return };
    let store = AccountCrud::new(db.clone());

    let account = pending_account(123_456);
    store.create(&account).await.unwrap();

    assert!(store.set_accepting_messages(&account.id, false).await.unwrap());
    let stored = store.find_by_id(&account.id).await.unwrap().unwrap();
    assert!(!stored.accepting_messages);

    let missing = Uuid::new_v4().to_string();
    assert!(!store.set_accepting_messages(&missing, true).await.unwrap());

    store.ping().await.unwrap();

    cleanup(&db, &account.id).await;
}
