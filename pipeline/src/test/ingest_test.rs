use std::sync::Arc;

use storage::{ChatRecord, ChatType, DigestRepository, NewMessage, UserRecord};

use super::fakes::{temp_store, FakeSource, UnreachableSource};
use crate::error::PipelineError;
use crate::ingest::{IngestReport, IngestionDriver};

fn chats() -> Vec<ChatRecord> {
    vec![
        ChatRecord::new(1, "Rust", ChatType::Supergroup),
        ChatRecord::new(2, "Family", ChatType::Group),
    ]
}

#[tokio::test]
async fn test_first_run_fetches_from_zero_and_stores_everything() {
    let (_dir, store) = temp_store().await;
    let source = Arc::new(FakeSource::new(
        chats(),
        vec![UserRecord::new(7, Some("ferris".to_string()), None)],
    ));
    source.push(NewMessage::new(1, 1, "a", 10).with_author(7)).await;
    source.push(NewMessage::new(1, 2, "b", 20).with_author(7)).await;
    source.push(NewMessage::new(2, 1, "c", 15)).await;

    let driver = IngestionDriver::new(store.clone(), source.clone());
    let report = driver.run_once().await.expect("ingestion failed");

    assert_eq!(
        report,
        IngestReport {
            chats: 2,
            users: 2,
            inserted: 3,
            duplicates: 0,
        }
    );
    assert_eq!(*source.requested_since.lock().await, vec![(1, 0), (2, 0)]);
    assert_eq!(store.get_last_message_timestamp(1).await.unwrap(), 20);
    assert_eq!(store.get_last_message_timestamp(2).await.unwrap(), 15);
    assert!(store.get_user(7).await.unwrap().is_some());
    assert_eq!(store.list_chats().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_run_starts_at_high_water_mark() {
    let (_dir, store) = temp_store().await;
    let source = Arc::new(FakeSource::new(chats(), Vec::new()));
    source.push(NewMessage::new(1, 1, "a", 10)).await;
    source.push(NewMessage::new(1, 2, "b", 20)).await;

    let driver = IngestionDriver::new(store.clone(), source.clone());
    driver.run_once().await.unwrap();

    source.push(NewMessage::new(1, 3, "c", 20)).await;
    source.push(NewMessage::new(1, 4, "d", 30)).await;
    let report = driver.run_once().await.unwrap();

    // The boundary second is fetched again: message 2 is a duplicate,
    // message 3 shares its timestamp and must not be lost.
    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 1);
    let requested = source.requested_since.lock().await.clone();
    assert!(requested.contains(&(1, 20)));

    let stored = store.get_messages_after(1, 0).await.unwrap();
    let ids: Vec<i64> = stored.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_chat_title_change_is_applied() {
    let (_dir, store) = temp_store().await;
    let first = Arc::new(FakeSource::new(
        vec![ChatRecord::new(1, "Old", ChatType::Group)],
        Vec::new(),
    ));
    IngestionDriver::new(store.clone(), first)
        .run_once()
        .await
        .unwrap();

    let renamed = Arc::new(FakeSource::new(
        vec![ChatRecord::new(1, "New", ChatType::Supergroup)],
        Vec::new(),
    ));
    IngestionDriver::new(store.clone(), renamed)
        .run_once()
        .await
        .unwrap();

    let chat = store.get_chat(1).await.unwrap().unwrap();
    assert_eq!(chat.title, "New");
    assert_eq!(chat.chat_type, ChatType::Supergroup);
}

#[tokio::test]
async fn test_source_failure_is_reported() {
    let (_dir, store) = temp_store().await;
    let driver = IngestionDriver::new(store, Arc::new(UnreachableSource));

    let result = driver.run_once().await;
    assert!(matches!(result, Err(PipelineError::Source(_))));
}

#[tokio::test]
async fn test_storage_failure_aborts_cycle() {
    let (_dir, store) = temp_store().await;
    let source = Arc::new(FakeSource::new(chats(), Vec::new()));
    store.close().await;

    let driver = IngestionDriver::new(store, source.clone());
    let result = driver.run_once().await;

    assert!(matches!(result, Err(PipelineError::Storage(_))));
    assert!(source.requested_since.lock().await.is_empty());
}
