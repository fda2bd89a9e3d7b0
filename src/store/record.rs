// User record type
// A freeform JSON object whose only system-managed field is `id`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field
const ID_FIELD: &str = "id";

/// A single user entry.
///
/// Records carry no schema beyond `id`; every other field is stored exactly as
/// the client sent it. Field order survives a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

/// Full ordered set of records, stored as one unit
pub type Collection = Vec<UserRecord>;

impl UserRecord {
    /// Integer identifier of this record, if it has one.
    ///
    /// Integral floats (`1.0`) count as integers. Strings, fractions and a
    /// missing field yield `None`.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn id(&self) -> Option<i64> {
        let value = self.get(ID_FIELD)?;
        if let Some(id) = value.as_i64() {
            return Some(id);
        }
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    }

    pub fn matches_id(&self, id: i64) -> bool {
        self.id() == Some(id)
    }

    /// Overwrite `id`, keeping its original position when already present.
    pub fn set_id(&mut self, id: i64) {
        self.0.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// Shallow merge: every key in `patch` replaces (or adds) the field of
    /// the same name. Keys absent from `patch` are untouched, and `id` is not
    /// protected.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.0.insert(key, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Map<String, Value>> for UserRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Index of the first record with the given id, in stored order
pub fn position_of(collection: &[UserRecord], id: i64) -> Option<usize> {
    collection.iter().position(|record| record.matches_id(id))
}
