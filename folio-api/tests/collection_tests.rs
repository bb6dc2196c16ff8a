//! Collection service against SQLite stores
//!
//! Covers the guarantees that depend on the database rather than on service
//! logic: composite uniqueness under concurrent adds, ordering, and cascades.

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

use folio_api::error::{CollectionError, Missing};
use folio_api::models::{ArticleId, UserId};
use folio_api::service::{AddFavorite, AddToProgram, CollectionService, RemoveFavorite};
use folio_api::store::{ProgramStore, SqliteProgramStore};

use helpers::TestDb;

const ADA: UserId = UserId(1);

fn service(db: &TestDb) -> CollectionService {
    db.state().service
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_resolve_to_one_entry() {
    let db = TestDb::new().await;
    let service = Arc::new(service(&db));

    let mut join_set = JoinSet::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        join_set.spawn(async move {
            service
                .add_to_program(AddToProgram {
                    user_id: ADA,
                    article_id: ArticleId(7),
                })
                .await
                .map(|item| item.entry_id)
        });
    }

    let mut entry_ids = Vec::new();
    while let Some(result) = join_set.join_next().await {
        entry_ids.push(result.unwrap().unwrap());
    }

    let distinct: HashSet<_> = entry_ids.iter().copied().collect();
    assert_eq!(entry_ids.len(), 16);
    assert_eq!(distinct.len(), 1, "every caller must get the same entry");

    let listed = service.list_program(ADA).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(distinct.contains(&listed[0].entry_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_favorite_adds_resolve_to_one_row() {
    let db = TestDb::new().await;
    let service = Arc::new(service(&db));

    let mut join_set = JoinSet::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        join_set.spawn(async move {
            service
                .add_favorite(AddFavorite {
                    user_id: ADA,
                    article_id: ArticleId(3),
                })
                .await
        });
    }

    while let Some(result) = join_set.join_next().await {
        assert!(result.unwrap().is_ok());
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = 1")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_list_order_non_decreasing_under_concurrent_adds() {
    let db = TestDb::new().await;
    let service = Arc::new(service(&db));

    let mut join_set = JoinSet::new();
    for article in [3, 7, 8, 9] {
        let service = Arc::clone(&service);
        join_set.spawn(async move {
            service
                .add_to_program(AddToProgram {
                    user_id: ADA,
                    article_id: ArticleId(article),
                })
                .await
        });
    }
    while let Some(result) = join_set.join_next().await {
        result.unwrap().unwrap();
    }

    let listed = service.list_program(ADA).await.unwrap();
    assert_eq!(listed.len(), 4);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at));
}

#[tokio::test]
async fn test_deleted_article_cascades_out_of_collections() {
    let db = TestDb::new().await;
    let service = service(&db);

    service
        .add_to_program(AddToProgram {
            user_id: ADA,
            article_id: ArticleId(8),
        })
        .await
        .unwrap();
    service
        .add_favorite(AddFavorite {
            user_id: ADA,
            article_id: ArticleId(8),
        })
        .await
        .unwrap();

    sqlx::query("DELETE FROM articles WHERE id = 8")
        .execute(&db.pool)
        .await
        .unwrap();

    assert!(service.list_program(ADA).await.unwrap().is_empty());
    assert!(service.list_favorites(ADA).await.unwrap().is_empty());

    let store = SqliteProgramStore::new(db.pool.clone());
    assert!(store.find_by_owner(ADA).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_favorite_twice() {
    let db = TestDb::new().await;
    let service = service(&db);
    let remove = RemoveFavorite {
        user_id: ADA,
        article_id: ArticleId(3),
    };

    service
        .add_favorite(AddFavorite {
            user_id: ADA,
            article_id: ArticleId(3),
        })
        .await
        .unwrap();

    service.remove_favorite(remove).await.unwrap();
    assert!(matches!(
        service.remove_favorite(remove).await,
        Err(CollectionError::NotFound(Missing::Favorite { .. }))
    ));
}

#[tokio::test]
async fn test_list_for_unknown_user_not_found() {
    let db = TestDb::new().await;

    assert!(matches!(
        service(&db).list_program(UserId(42)).await,
        Err(CollectionError::NotFound(Missing::User(UserId(42))))
    ));
}
