use crate::decoration::Metadata;
use crate::error::{Result, ViewError};
use crate::image::ImageCollection;
use crate::value::{json_type_name, validate_key, Entries, ScalarValue};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A borrowed record field: a JSON-native value or a nested image collection.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Field<'a> {
    Value(&'a Value),
    Images(&'a ImageCollection),
}

impl<'a> Field<'a> {
    pub fn as_value(self) -> Option<&'a Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Images(_) => None,
        }
    }

    pub fn as_images(self) -> Option<&'a ImageCollection> {
        match self {
            Self::Images(images) => Some(images),
            Self::Value(_) => None,
        }
    }
}

/// Anything a record field can be set to, for the bulk [`CollectionRecord::set_fields`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(ScalarValue),
    Images(ImageCollection),
}

impl From<ImageCollection> for FieldValue {
    fn from(images: ImageCollection) -> Self {
        Self::Images(images)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        Self::Scalar(value.into())
    }
}

impl<T: Into<ScalarValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        Self::Scalar(items.into())
    }
}

macro_rules! field_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

field_from_scalar!(
    ScalarValue, Value, f32, f64, (), bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
    String, &str, Map<String, Value>
);

// A validated bulk entry waiting to be committed.
enum Staged {
    Value(Value),
    Images(ImageCollection),
}

// Nested image collections live in `CollectionRecord::images`; the field map
// refers to them by position.
#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    Images(usize),
}

/// The field map of a record that lives inside a collection. Unlike a
/// [`Record`] it has no `meta` object of its own.
#[derive(Debug, Clone, Default)]
pub struct CollectionRecord {
    fields: Entries<Slot>,
    images: Vec<ImageCollection>,
}

impl CollectionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ViewError::validation("record", e.to_string()))?;
        let mut record = Self::new();
        record.set_json(value)?;
        Ok(record)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Result<&mut Self> {
        let (key, value) = Metadata::prepare(key, value)?;
        self.store_value(key, value);
        Ok(self)
    }

    /// Nests an image collection under `key` and hands it back so images can
    /// be added to it in place.
    pub fn set_images(&mut self, key: impl Into<String>, images: ImageCollection) -> Result<&mut ImageCollection> {
        let key = key.into();
        validate_key(&key)?;
        Ok(self.store_images(key, images))
    }

    /// Sets every field, or none of them if any key or value is invalid.
    pub fn set_many<K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        for (key, value) in Metadata::prepare_many(entries)? {
            self.store_value(key, value);
        }
        Ok(self)
    }

    /// Like [`set_many`](Self::set_many), but entries may also nest image
    /// collections.
    pub fn set_fields<K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let staged = entries
            .into_iter()
            .map(|(key, value)| match value.into() {
                FieldValue::Scalar(value) => {
                    let (key, value) = Metadata::prepare(key, value)?;
                    Ok((key, Staged::Value(value)))
                }
                FieldValue::Images(images) => {
                    let key = key.into();
                    validate_key(&key)?;
                    Ok((key, Staged::Images(images)))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        for (key, entry) in staged {
            match entry {
                Staged::Value(value) => self.store_value(key, value),
                Staged::Images(images) => {
                    self.store_images(key, images);
                }
            }
        }
        Ok(self)
    }

    /// Bulk form taking a JSON object.
    pub fn set_json(&mut self, value: Value) -> Result<&mut Self> {
        match value {
            Value::Object(map) => self.set_many(map),
            other => Err(ViewError::validation(
                "record",
                format!("expected an object, got {}", json_type_name(&other)),
            )),
        }
    }

    fn store_value(&mut self, key: String, value: Value) {
        if let Some(idx) = self.images_slot(&key) {
            self.release_images(idx);
        }
        self.fields.insert(key, Slot::Value(value));
    }

    fn store_images(&mut self, key: String, images: ImageCollection) -> &mut ImageCollection {
        let idx = match self.images_slot(&key) {
            Some(idx) => {
                self.images[idx] = images;
                idx
            }
            None => {
                self.images.push(images);
                let idx = self.images.len() - 1;
                self.fields.insert(key, Slot::Images(idx));
                idx
            }
        };
        &mut self.images[idx]
    }

    fn images_slot(&self, key: &str) -> Option<usize> {
        match self.fields.get(key) {
            Some(&Slot::Images(idx)) => Some(idx),
            _ => None,
        }
    }

    fn release_images(&mut self, idx: usize) {
        self.images.remove(idx);
        for slot in self.fields.values_mut() {
            if let Slot::Images(other) = slot {
                if *other > idx {
                    *other -= 1;
                }
            }
        }
    }

    fn resolve<'a>(&'a self, slot: &'a Slot) -> Field<'a> {
        match slot {
            Slot::Value(value) => Field::Value(value),
            Slot::Images(idx) => Field::Images(&self.images[*idx]),
        }
    }

    pub fn get(&self, key: &str) -> Option<Field<'_>> {
        self.fields.get(key).map(|slot| self.resolve(slot))
    }

    pub fn images_mut(&mut self, key: &str) -> Option<&mut ImageCollection> {
        let idx = self.images_slot(key)?;
        self.images.get_mut(idx)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Field<'_>)> {
        self.fields.iter().map(move |(key, slot)| (key, self.resolve(slot)))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for CollectionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Serialize for CollectionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A standalone record resource, rendered as
/// `{ "data": { ...fields }, "meta": { ... } }` with `meta` only present once
/// metadata has been added.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Record {
    data: CollectionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Metadata>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self {
            data: CollectionRecord::from_serialize(value)?,
            meta: None,
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Result<&mut Self> {
        self.data.set(key, value)?;
        Ok(self)
    }

    pub fn set_images(&mut self, key: impl Into<String>, images: ImageCollection) -> Result<&mut ImageCollection> {
        self.data.set_images(key, images)
    }

    pub fn set_many<K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        self.data.set_many(entries)?;
        Ok(self)
    }

    pub fn set_fields<K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.data.set_fields(entries)?;
        Ok(self)
    }

    pub fn set_json(&mut self, value: Value) -> Result<&mut Self> {
        self.data.set_json(value)?;
        Ok(self)
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Result<&mut Self> {
        let entry = Metadata::prepare(key, value)?;
        self.meta.get_or_insert_with(Metadata::new).commit(vec![entry]);
        Ok(self)
    }

    pub fn add_metadata_many<K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        let entries = Metadata::prepare_many(entries)?;
        self.meta.get_or_insert_with(Metadata::new).commit(entries);
        Ok(self)
    }

    pub fn data(&self) -> &CollectionRecord {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut CollectionRecord {
        &mut self.data
    }

    pub fn meta(&self) -> Option<&Metadata> {
        self.meta.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<Field<'_>> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::MimeType;
    use serde_json::json;

    #[test]
    fn test_set_images_returns_nested_handle() {
        let mut record = CollectionRecord::new();
        record.set("name", "Ada").unwrap();
        record
            .set_images("avatars", ImageCollection::new())
            .unwrap()
            .add_image(MimeType::Png)
            .add_size(32, 32, "https://static.example.com/ada.png")
            .unwrap();

        let avatars = record.get("avatars").and_then(Field::as_images).unwrap();
        assert_eq!(avatars.len(), 1);
        assert_eq!(
            serde_json::to_value(&record).unwrap()["avatars"][0]["sizes"][0]["width"],
            json!(32)
        );
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let mut record = CollectionRecord::new();
        assert!(record.set("", 1).unwrap_err().is_validation());
        assert!(record.set_images("", ImageCollection::new()).is_err());
        assert!(record.is_empty());
    }

    #[test]
    fn test_record_meta_appears_only_once_set() {
        let mut record = Record::new();
        record.set("id", 1).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({ "data": { "id": 1 } }));

        record.add_metadata("version", 3).unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "data": { "id": 1 }, "meta": { "version": 3 } })
        );
    }

    #[test]
    fn test_failed_first_metadata_call_creates_nothing() {
        let mut record = Record::new();
        assert!(record.add_metadata("", 1).is_err());
        assert!(record.meta().is_none());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(CollectionRecord::from_serialize(&vec![1, 2]).is_err());
        assert!(Record::from_serialize("text").is_err());
    }

    #[test]
    fn test_set_fields_mixes_scalars_and_images() {
        let mut images = ImageCollection::new();
        images.add_image(MimeType::Svg);

        let mut record = CollectionRecord::new();
        record
            .set_fields([
                ("title", FieldValue::from("Holiday")),
                ("gallery", FieldValue::from(images)),
                ("rating", FieldValue::from(4.5)),
            ])
            .unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "title": "Holiday",
                "gallery": [{ "id": null, "description": "", "mime_type": "image/svg+xml", "sizes": [] }],
                "rating": 4.5
            })
        );
    }

    #[test]
    fn test_set_fields_with_bad_entry_changes_nothing() {
        let mut record = CollectionRecord::new();
        record.set("title", "Holiday").unwrap();
        let before = record.clone();

        let bad_key = record.set_fields([
            ("gallery", FieldValue::from(ImageCollection::new())),
            ("", FieldValue::from(1)),
        ]);
        assert!(bad_key.unwrap_err().is_validation());

        let bad_value = record.set_fields([
            ("title", FieldValue::from("Renamed")),
            ("ratio", FieldValue::from(f64::NAN)),
        ]);
        assert!(bad_value.unwrap_err().is_validation());

        assert_eq!(record, before);
        assert!(!record.contains_key("gallery"));
    }

    #[test]
    fn test_images_mut_only_finds_image_fields() {
        let mut record = CollectionRecord::new();
        record.set("name", "Ada").unwrap();
        record.set_images("avatars", ImageCollection::new()).unwrap();

        assert!(record.images_mut("name").is_none());
        assert!(record.images_mut("missing").is_none());
        record
            .images_mut("avatars")
            .unwrap()
            .add_image(MimeType::Png)
            .set_id(3)
            .unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap()["avatars"][0]["id"],
            json!(3)
        );
    }

    #[test]
    fn test_overwriting_image_field_keeps_position_and_other_images() {
        let mut record = CollectionRecord::new();
        record.set_images("first", ImageCollection::new()).unwrap();
        record
            .set_images("second", ImageCollection::new())
            .unwrap()
            .add_image(MimeType::Jpeg);

        record.set("first", "gone").unwrap();
        assert_eq!(record.get("first").and_then(Field::as_value), Some(&json!("gone")));
        assert_eq!(record.get("second").and_then(Field::as_images).map(ImageCollection::len), Some(1));

        record.set_images("first", ImageCollection::new()).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(record.get("first").and_then(Field::as_images).map(ImageCollection::len), Some(0));
        assert_eq!(record.get("second").and_then(Field::as_images).map(ImageCollection::len), Some(1));
    }

    #[test]
    fn test_data_mut_edits_fields_behind_record() {
        let mut record = Record::new();
        record.add_metadata("version", 1).unwrap();
        record.data_mut().set("id", 9).unwrap();
        record
            .data_mut()
            .set_images("covers", ImageCollection::new())
            .unwrap()
            .add_image(MimeType::Png);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["data"]["id"], json!(9));
        assert_eq!(value["data"]["covers"][0]["mime_type"], json!("image/png"));
        assert_eq!(value["meta"], json!({ "version": 1 }));
        assert_eq!(record.data().len(), 2);
    }
}
