use storage::ChatType;
use tempfile::TempDir;

use crate::json_source::{ExportDump, JsonDumpSource};
use crate::source::MessageSource;

const DUMP: &str = r#"{
  "chats": [
    {
      "chat": { "id": 1, "title": "Rust", "type": "supergroup" },
      "users": [
        { "id": 7, "username": "ferris", "display_name": "Ferris" },
        { "id": 8, "display_name": "Lurker" }
      ],
      "messages": [
        { "message_id": 1, "author_id": 7, "text": "hi", "timestamp": 10 },
        { "message_id": 2, "author_id": 8, "text": "hello", "timestamp": 20, "reply_to_message_id": 1 },
        { "message_id": 3, "timestamp": 30 }
      ]
    },
    { "chat": { "id": 2, "title": "Me", "type": "private" } }
  ]
}"#;

#[tokio::test]
async fn test_fetch_since_is_inclusive_and_scoped_to_authors() {
    let source = JsonDumpSource::from_dump(ExportDump::from_json(DUMP).unwrap());

    let chats = source.list_chats().await.unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].chat_type, ChatType::Supergroup);
    assert_eq!(chats[1].chat_type, ChatType::Private);

    let batch = source.fetch_since(1, 20).await.unwrap();
    let ids: Vec<i64> = batch.messages.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(batch.messages.iter().all(|m| m.chat_id == 1));
    assert_eq!(batch.messages[0].reply_to_message_id, Some(1));
    assert_eq!(batch.messages[1].text, "");
    assert_eq!(batch.users.len(), 1);
    assert_eq!(batch.users[0].id, 8);

    let unknown = source.fetch_since(99, 0).await.unwrap();
    assert!(unknown.messages.is_empty());
}

#[tokio::test]
async fn test_from_path_rereads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(&path, r#"{"chats": []}"#).unwrap();

    let source = JsonDumpSource::from_path(&path);
    assert!(source.list_chats().await.unwrap().is_empty());

    std::fs::write(&path, DUMP).unwrap();
    assert_eq!(source.list_chats().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_chat_type_is_rejected() {
    let dump = r#"{"chats": [{"chat": {"id": 1, "title": "x", "type": "channel"}}]}"#;
    assert!(ExportDump::from_json(dump).is_err());
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let source = JsonDumpSource::from_path(dir.path().join("missing.json"));
    assert!(source.list_chats().await.is_err());
}
