use crate::error::{Result, ViewError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

/// A JSON-native value accepted by records and metadata.
///
/// Floats are kept apart from [`Value`] until insertion so that NaN and
/// infinities are rejected instead of silently becoming `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Json(Value),
    Float(f64),
    Array(Vec<ScalarValue>),
}

impl ScalarValue {
    pub(crate) fn into_json(self, key: &str) -> Result<Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Float(f) => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                ViewError::validation(key, format!("{f} is not representable in JSON"))
            }),
            Self::Array(items) => items
                .into_iter()
                .map(|item| item.into_json(key))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
        }
    }
}

impl From<Value> for ScalarValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for ScalarValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<()> for ScalarValue {
    fn from(_: ()) -> Self {
        Self::Json(Value::Null)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Json(Value::Null), Into::into)
    }
}

impl<T: Into<ScalarValue>> From<Vec<T>> for ScalarValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_from_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ScalarValue {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

scalar_from_json!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, String, &str, Map<String, Value>);

/// Rejects the empty string as an object key.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ViewError::validation("key", "JSON keys must be non-empty strings"));
    }
    Ok(())
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Insertion-ordered string-keyed entries.
///
/// Re-inserting an existing key replaces the value in place, so the key keeps
/// the position of its first insertion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entries<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Entries<V> {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(move |idx| &mut self.entries[idx].1)
    }

    pub fn insert(&mut self, key: String, value: V) -> &mut V {
        let idx = match self.position(&key) {
            Some(idx) => {
                self.entries[idx].1 = value;
                idx
            }
            None => {
                self.entries.push((key, value));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl<V: Serialize> Serialize for Entries<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_finite_float_is_rejected() {
        let err = ScalarValue::from(f64::NAN).into_json("ratio").unwrap_err();
        assert!(err.is_validation());

        let nested = ScalarValue::from(vec![1.0, f64::INFINITY]);
        assert!(nested.into_json("ratios").is_err());
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(ScalarValue::from("a").into_json("k").unwrap(), json!("a"));
        assert_eq!(ScalarValue::from(None::<i64>).into_json("k").unwrap(), Value::Null);
        assert_eq!(ScalarValue::from(vec![1, 2]).into_json("k").unwrap(), json!([1, 2]));
        assert_eq!(ScalarValue::from(0.5).into_json("k").unwrap(), json!(0.5));
    }

    #[test]
    fn test_entries_keep_first_insertion_position() {
        let mut entries = Entries::default();
        entries.insert("a".to_string(), 1);
        entries.insert("b".to_string(), 2);
        entries.insert("a".to_string(), 3);

        let collected: Vec<_> = entries.iter().collect();
        assert_eq!(collected, vec![("a", &3), ("b", &2)]);
        assert_eq!(
            serde_json::to_string(&entries).unwrap(),
            r#"{"a":3,"b":2}"#
        );
    }
}
