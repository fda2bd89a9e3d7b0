//! User operations module
//!
//! List, Get, Create and Update over the collection store. Each call is one
//! load → compute → (save) sequence with no state kept between calls.

mod error;

pub use error::UserError;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::store::{position_of, Collection, CollectionStore, StoreError, UserRecord};

/// Shared handle to the backing store
pub type SharedStore = Box<dyn CollectionStore>;

/// Result of a mutating operation.
///
/// The record is what the caller asked for; `persisted` says whether the
/// rewrite of the backing file succeeded. Callers decide how to report a
/// failed save.
#[derive(Debug)]
pub struct Mutation {
    pub record: UserRecord,
    pub persisted: Result<(), StoreError>,
}

/// User operations bound to one backing store
pub struct UserService {
    store: SharedStore,
    /// Held across load→save of Create/Update when writes are serialized
    write_lock: Option<Mutex<()>>,
}

impl UserService {
    /// Create the service.
    ///
    /// With `serialize_writes` unset, overlapping Create/Update calls race on
    /// the whole-collection rewrite and the later save wins.
    pub fn new(store: SharedStore, serialize_writes: bool) -> Self {
        Self {
            store,
            write_lock: serialize_writes.then(|| Mutex::new(())),
        }
    }

    pub fn store(&self) -> &dyn CollectionStore {
        self.store.as_ref()
    }

    /// All records, in stored order, unfiltered
    pub async fn list(&self) -> Result<Collection, UserError> {
        Ok(self.store.load().await?)
    }

    /// First record whose `id` equals `id`
    pub async fn get(&self, id: i64) -> Result<UserRecord, UserError> {
        let users = self.store.load().await?;
        position_of(&users, id)
            .map(|index| users[index].clone())
            .ok_or(UserError::NotFound { id })
    }

    /// Append `payload` with a positionally assigned id and rewrite the store
    pub async fn create(&self, payload: Map<String, Value>) -> Result<Mutation, UserError> {
        let _guard = self.lock_writes().await;

        let mut users = self.store.load().await?;
        let record = append_user(&mut users, payload);
        let persisted = self.store.save(&users).await;

        Ok(Mutation { record, persisted })
    }

    /// Shallow-merge `payload` into the record with `id` and rewrite the store
    pub async fn update(
        &self,
        id: i64,
        payload: Map<String, Value>,
    ) -> Result<Mutation, UserError> {
        let _guard = self.lock_writes().await;

        let mut users = self.store.load().await?;
        let record = merge_user(&mut users, id, payload)?;
        let persisted = self.store.save(&users).await;

        Ok(Mutation { record, persisted })
    }

    async fn lock_writes(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

/// Assign `id = len + 1` to `payload` and append it.
///
/// The id is positional, not a counter: two appends to copies of the same
/// collection produce the same id.
pub fn append_user(users: &mut Collection, payload: Map<String, Value>) -> UserRecord {
    let mut record = UserRecord::from(payload);
    let next_id = i64::try_from(users.len()).unwrap_or(i64::MAX - 1) + 1;
    record.set_id(next_id);
    users.push(record.clone());
    record
}

/// Merge `payload` into the first record matching `id`, returning the result
pub fn merge_user(
    users: &mut Collection,
    id: i64,
    payload: Map<String, Value>,
) -> Result<UserRecord, UserError> {
    let index = position_of(users, id).ok_or(UserError::NotFound { id })?;
    let record = &mut users[index];
    record.merge(payload);
    Ok(record.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::store::testing::FailingWrites;
    use crate::store::JsonFileStore;
    use tempfile::TempDir;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn as_value(record: &UserRecord) -> Value {
        serde_json::to_value(record).unwrap()
    }

    fn seeded(dir: &TempDir, content: &str) -> JsonFileStore {
        let path = dir.path().join("users.json");
        std::fs::write(&path, content).unwrap();
        JsonFileStore::new(path)
    }

    fn service(dir: &TempDir, content: &str, serialize_writes: bool) -> UserService {
        UserService::new(Box::new(seeded(dir, content)), serialize_writes)
    }

    fn alice(dir: &TempDir) -> UserService {
        service(dir, r#"[{"id":1,"name":"Alice"}]"#, false)
    }

    #[tokio::test]
    async fn test_get_existing_user() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);

        let user = users.get(1).await.unwrap();
        assert_eq!(as_value(&user), json!({"id": 1, "name": "Alice"}));
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);

        let err = users.get(99).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound { id: 99 }));
    }

    #[tokio::test]
    async fn test_get_duplicate_ids_first_wins() {
        let dir = TempDir::new().unwrap();
        let users = service(&dir, r#"[{"id":1,"v":"a"},{"id":1,"v":"b"}]"#, false);

        let user = users.get(1).await.unwrap();
        assert_eq!(user.get("v"), Some(&json!("a")));
    }

    #[tokio::test]
    async fn test_create_assigns_length_plus_one() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);

        let created = users.create(object(json!({"name": "Bob"}))).await.unwrap();
        assert!(created.persisted.is_ok());
        assert_eq!(as_value(&created.record), json!({"name": "Bob", "id": 2}));
        assert_eq!(users.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_ignores_client_id() {
        let dir = TempDir::new().unwrap();
        let users = service(&dir, "[]", false);

        let created = users.create(object(json!({"id": 50, "name": "Eve"}))).await.unwrap();
        assert_eq!(created.record.id(), Some(1));
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);
        let payload = object(json!({"name": "Carol", "tags": ["a", "b"], "nested": {"x": 1}}));

        let created = users.create(payload.clone()).await.unwrap();
        let id = created.record.id().unwrap();
        let fetched = users.get(id).await.unwrap();

        let mut expected = payload;
        expected.insert("id".to_string(), json!(id));
        assert_eq!(fetched, UserRecord::from(expected));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let dir = TempDir::new().unwrap();
        let users = service(&dir, r#"[{"id":1,"name":"Alice","age":20,"city":"Oslo"}]"#, false);

        let updated = users
            .update(1, object(json!({"age": 30, "email": "a@example.com"})))
            .await
            .unwrap();
        assert!(updated.persisted.is_ok());
        assert_eq!(
            as_value(&updated.record),
            json!({"id": 1, "name": "Alice", "age": 30, "city": "Oslo", "email": "a@example.com"})
        );
        assert_eq!(users.get(1).await.unwrap(), updated.record);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);

        let err = users.update(7, object(json!({"age": 1}))).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound { id: 7 }));
        // Nothing rewritten
        let raw = std::fs::read_to_string(users.store().location()).unwrap();
        assert_eq!(raw, r#"[{"id":1,"name":"Alice"}]"#);
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let users = service(&dir, "not json", false);

        assert!(matches!(users.list().await, Err(UserError::Storage(StoreError::Format { .. }))));
        assert!(matches!(users.get(1).await, Err(UserError::Storage(_))));
        assert!(matches!(
            users.create(Map::new()).await,
            Err(UserError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_scenario_sequence() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);

        assert_eq!(as_value(&users.get(1).await.unwrap()), json!({"id": 1, "name": "Alice"}));
        assert!(matches!(users.get(99).await, Err(UserError::NotFound { .. })));

        let bob = users.create(object(json!({"name": "Bob"}))).await.unwrap();
        assert_eq!(as_value(&bob.record), json!({"name": "Bob", "id": 2}));

        let updated = users.update(1, object(json!({"age": 30}))).await.unwrap();
        assert_eq!(as_value(&updated.record), json!({"id": 1, "name": "Alice", "age": 30}));

        let all: Vec<Value> = users.list().await.unwrap().iter().map(as_value).collect();
        assert_eq!(
            all,
            vec![
                json!({"id": 1, "name": "Alice", "age": 30}),
                json!({"name": "Bob", "id": 2}),
            ]
        );
    }

    #[tokio::test]
    async fn test_racing_creates_on_one_snapshot_collide() {
        let dir = TempDir::new().unwrap();
        let users = alice(&dir);
        let store = users.store();

        let mut first = store.load().await.unwrap();
        let mut second = store.load().await.unwrap();
        let a = append_user(&mut first, object(json!({"name": "A"})));
        let b = append_user(&mut second, object(json!({"name": "B"})));
        assert_eq!(a.id(), b.id());

        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        let stored = users.list().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1], b);
    }

    #[tokio::test]
    async fn test_serialized_writes_keep_both_creates() {
        let dir = TempDir::new().unwrap();
        let users = service(&dir, r#"[{"id":1,"name":"Alice"}]"#, true);

        let (a, b) = tokio::join!(
            users.create(object(json!({"name": "A"}))),
            users.create(object(json!({"name": "B"}))),
        );
        let mut ids = vec![a.unwrap().record.id(), b.unwrap().record.id()];
        ids.sort_unstable();
        assert_eq!(ids, vec![Some(2), Some(3)]);
        assert_eq!(users.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_save_still_returns_record() {
        let dir = TempDir::new().unwrap();
        let store = FailingWrites(seeded(&dir, r#"[{"id":1,"name":"Alice"}]"#));
        let users = UserService::new(Box::new(store), false);

        let created = users.create(object(json!({"name": "Bob"}))).await.unwrap();
        assert_eq!(as_value(&created.record), json!({"name": "Bob", "id": 2}));
        assert!(matches!(created.persisted, Err(StoreError::Write { .. })));

        let updated = users.update(1, object(json!({"age": 30}))).await.unwrap();
        assert_eq!(updated.record.get("age"), Some(&json!(30)));
        assert!(updated.persisted.is_err());

        // The store never changed
        assert_eq!(users.list().await.unwrap().len(), 1);
        assert_eq!(users.get(1).await.unwrap().get("age"), None);
    }
}
