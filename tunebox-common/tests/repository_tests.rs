//! Integration tests for the company / playlist / music / session queries
//!
//! Each test runs against a fresh SQLite file in a temporary directory.

use sqlx::SqlitePool;
use tempfile::TempDir;
use tunebox_common::db::{self, companies, musics, playlists, sessions, NewMusic};
use tunebox_common::password::{hash_password, verify_password};
use tunebox_common::Error;

async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = db::init_database(&dir.path().join("tunebox.db"))
        .await
        .expect("Should initialize test database");
    (dir, pool)
}

async fn company(pool: &SqlitePool, name: &str) -> i64 {
    let hash = hash_password("password").unwrap();
    companies::insert(pool, name, &hash).await.unwrap().id
}

fn new_music(playlist_id: i64, filename: &str) -> NewMusic {
    NewMusic {
        name: filename.to_string(),
        filename: filename.to_string(),
        playlist_id,
    }
}

// =============================================================================
// Companies
// =============================================================================

#[tokio::test]
async fn test_duplicate_company_name_rejected() {
    let (_dir, pool) = setup_db().await;
    company(&pool, "Acme").await;

    let hash = hash_password("other").unwrap();
    let result = companies::insert(&pool, "Acme", &hash).await;
    assert!(matches!(result, Err(Error::Conflict(_))), "got {:?}", result);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_company_lookup_by_name_and_id() {
    let (_dir, pool) = setup_db().await;
    let hash = hash_password("s3cret").unwrap();
    let created = companies::insert(&pool, "Globex", &hash).await.unwrap();

    let by_name = companies::find_by_name(&pool, "Globex").await.unwrap().unwrap();
    assert_eq!(by_name, created);
    assert!(verify_password("s3cret", &by_name.password_hash));

    let by_id = companies::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Globex");

    assert!(companies::find_by_name(&pool, "Initech").await.unwrap().is_none());
    assert!(companies::find_by_id(&pool, 9999).await.unwrap().is_none());
}

// =============================================================================
// Playlists
// =============================================================================

#[tokio::test]
async fn test_playlists_listed_per_company() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let globex = company(&pool, "Globex").await;

    playlists::insert(&pool, acme, "Morning").await.unwrap();
    playlists::insert(&pool, globex, "Evening").await.unwrap();
    playlists::insert(&pool, acme, "Lunch").await.unwrap();

    let names: Vec<String> = playlists::list_for_company(&pool, acme)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Morning", "Lunch"]);
}

#[tokio::test]
async fn test_duplicate_playlist_name_rejected() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    playlists::insert(&pool, acme, "Morning").await.unwrap();

    let result = playlists::insert(&pool, acme, "Morning").await;
    assert!(matches!(result, Err(Error::Conflict(_))));
}

// =============================================================================
// Musics
// =============================================================================

#[tokio::test]
async fn test_append_assigns_count_as_order() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let playlist = playlists::insert(&pool, acme, "Morning").await.unwrap();

    let first = musics::append(&pool, &new_music(playlist.id, "a.mp3")).await.unwrap();
    let second = musics::append(&pool, &new_music(playlist.id, "b.mp3")).await.unwrap();

    assert_eq!(first.order, 0);
    assert_eq!(second.order, 1);
    assert_eq!(musics::count_in_playlist(&pool, playlist.id).await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_inside_transactions_get_distinct_positions() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let playlist = playlists::insert(&pool, acme, "Morning").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        let music = new_music(playlist.id, &format!("track{}.mp3", i));
        handles.push(tokio::spawn(async move {
            let mut tx = pool.begin().await?;
            let created = musics::append(&mut *tx, &music).await?;
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tx.commit().await?;
            Ok::<_, Error>(created)
        }));
    }

    let mut orders = Vec::new();
    for handle in handles {
        orders.push(handle.await.unwrap().expect("append should not fail").order);
    }
    orders.sort_unstable();
    assert_eq!(orders, (0..8).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_insert_at_explicit_position() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let playlist = playlists::insert(&pool, acme, "Morning").await.unwrap();

    let music = musics::insert(&pool, &new_music(playlist.id, "a.mp3"), 5).await.unwrap();
    assert_eq!(music.order, 5);

    let result = musics::insert(&pool, &new_music(playlist.id, "a.mp3"), 6).await;
    assert!(matches!(result, Err(Error::Conflict(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_order_numbering_is_per_playlist() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let p1 = playlists::insert(&pool, acme, "Morning").await.unwrap();
    let p2 = playlists::insert(&pool, acme, "Evening").await.unwrap();

    musics::append(&pool, &new_music(p1.id, "a.mp3")).await.unwrap();
    let other = musics::append(&pool, &new_music(p2.id, "b.mp3")).await.unwrap();

    assert_eq!(other.order, 0);
}

#[tokio::test]
async fn test_reorder_sets_positions_and_keeps_ids() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let playlist = playlists::insert(&pool, acme, "Morning").await.unwrap();

    let m1 = musics::append(&pool, &new_music(playlist.id, "one.mp3")).await.unwrap();
    let m2 = musics::append(&pool, &new_music(playlist.id, "two.mp3")).await.unwrap();
    let m3 = musics::append(&pool, &new_music(playlist.id, "three.mp3")).await.unwrap();

    let updated = musics::reorder(&pool, &[m3.id, m1.id, m2.id]).await.unwrap();
    assert_eq!(updated, 3);

    let listed = musics::list_for_playlist(&pool, playlist.id).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|m| m.id).collect();
    let orders: Vec<i64> = listed.iter().map(|m| m.order).collect();
    assert_eq!(ids, [m3.id, m1.id, m2.id]);
    assert_eq!(orders, [0, 1, 2]);

    // identity untouched
    let still_one = musics::find_by_id(&pool, m1.id).await.unwrap().unwrap();
    assert_eq!(still_one.name, "one.mp3");
    assert_eq!(still_one.order, 1);
}

#[tokio::test]
async fn test_reorder_skips_unknown_ids() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let playlist = playlists::insert(&pool, acme, "Morning").await.unwrap();
    let m1 = musics::append(&pool, &new_music(playlist.id, "one.mp3")).await.unwrap();
    let m2 = musics::append(&pool, &new_music(playlist.id, "two.mp3")).await.unwrap();

    let updated = musics::reorder(&pool, &[4242, m2.id]).await.unwrap();
    assert_eq!(updated, 1);

    // m2 took index 1, m1 was not referenced and kept 0
    let m1_after = musics::find_by_id(&pool, m1.id).await.unwrap().unwrap();
    let m2_after = musics::find_by_id(&pool, m2.id).await.unwrap().unwrap();
    assert_eq!(m1_after.order, 0);
    assert_eq!(m2_after.order, 1);
}

#[tokio::test]
async fn test_owning_company() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;
    let playlist = playlists::insert(&pool, acme, "Morning").await.unwrap();
    let music = musics::append(&pool, &new_music(playlist.id, "a.mp3")).await.unwrap();

    assert_eq!(musics::owning_company(&pool, music.id).await.unwrap(), Some(acme));
    assert_eq!(musics::owning_company(&pool, 777).await.unwrap(), None);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_session_round_trip() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;

    let session = sessions::create(&pool, acme).await.unwrap();
    assert_eq!(session.company_id, acme);

    let resolved = sessions::find_company(&pool, &session.token).await.unwrap().unwrap();
    assert_eq!(resolved.id, acme);

    sessions::delete(&pool, &session.token).await.unwrap();
    assert!(sessions::find_company(&pool, &session.token).await.unwrap().is_none());

    // second delete is a no-op
    sessions::delete(&pool, &session.token).await.unwrap();
}

#[tokio::test]
async fn test_session_tokens_are_unique() {
    let (_dir, pool) = setup_db().await;
    let acme = company(&pool, "Acme").await;

    let s1 = sessions::create(&pool, acme).await.unwrap();
    let s2 = sessions::create(&pool, acme).await.unwrap();
    assert_ne!(s1.token, s2.token);
}
