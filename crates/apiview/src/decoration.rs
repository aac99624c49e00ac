use crate::error::{Result, ViewError};
use crate::value::{json_type_name, validate_key, Entries, ScalarValue};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The `meta` object of a collection or record, e.g.
/// `{ "total_results": 174, "sample_size": 50 }`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Metadata {
    data: Map<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn prepare(key: impl Into<String>, value: impl Into<ScalarValue>) -> Result<(String, Value)> {
        let key = key.into();
        validate_key(&key)?;
        let value = value.into().into_json(&key)?;
        Ok((key, value))
    }

    pub(crate) fn prepare_many<K, V, I>(entries: I) -> Result<Vec<(String, Value)>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        entries
            .into_iter()
            .map(|(key, value)| Self::prepare(key, value))
            .collect()
    }

    pub(crate) fn commit(&mut self, entries: Vec<(String, Value)>) {
        for (key, value) in entries {
            self.data.insert(key, value);
        }
    }

    /// Sets one entry. Re-setting a key overwrites its value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Result<&mut Self> {
        let entry = Self::prepare(key, value)?;
        self.commit(vec![entry]);
        Ok(self)
    }

    /// Sets every entry, or none of them if any entry is invalid.
    pub fn set_many<K, V, I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ScalarValue>,
    {
        let entries = Self::prepare_many(entries)?;
        self.commit(entries);
        Ok(self)
    }

    /// Bulk form taking a JSON object.
    pub fn set_json(&mut self, value: Value) -> Result<&mut Self> {
        match value {
            Value::Object(map) => self.set_many(map),
            other => Err(ViewError::validation(
                "metadata",
                format!("expected an object, got {}", json_type_name(&other)),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn positive(field: &str, value: u32) -> Result<u32> {
    if value < 1 {
        return Err(ViewError::validation(field, "expect integer of 1 or more"));
    }
    Ok(value)
}

/// The `pagination` object of a collection.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    pages: u32,
    per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            pages: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Validates all three counters before building.
    pub fn new(page: u32, pages: u32, per_page: u32) -> Result<Self> {
        Ok(Self {
            page: positive("pagination page", page)?,
            pages: positive("pagination pages", pages)?,
            per_page: positive("pagination per_page", per_page)?,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn set_current_page(&mut self, page: u32) -> Result<&mut Self> {
        self.page = positive("pagination page", page)?;
        Ok(self)
    }

    pub fn set_total_pages(&mut self, pages: u32) -> Result<&mut Self> {
        self.pages = positive("pagination pages", pages)?;
        Ok(self)
    }

    pub fn set_results_per_page(&mut self, per_page: u32) -> Result<&mut Self> {
        self.per_page = positive("pagination per_page", per_page)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ViewError::validation(
                "sort.order",
                format!("expected asc or desc, got {other:?}"),
            )),
        }
    }
}

/// The `sort` object of a collection, e.g. `{ "by": "name", "order": "asc" }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Sort {
    by: String,
    order: SortOrder,
}

fn sort_field(by: impl Into<String>) -> Result<String> {
    let by = by.into();
    if by.is_empty() {
        return Err(ViewError::validation("sort.by", "must not be empty"));
    }
    Ok(by)
}

impl Sort {
    pub fn new(by: impl Into<String>, order: SortOrder) -> Result<Self> {
        Ok(Self {
            by: sort_field(by)?,
            order,
        })
    }

    pub fn by(&self) -> &str {
        &self.by
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn set_sort_by(&mut self, by: impl Into<String>) -> Result<&mut Self> {
        self.by = sort_field(by)?;
        Ok(self)
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> &mut Self {
        self.order = order;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterId {
    Int(i64),
    Str(String),
}

impl From<i64> for FilterId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for FilterId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for FilterId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<String> for FilterId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl From<&str> for FilterId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

/// Either every id of a field (rendered as `true`) or an explicit id set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterIds {
    All,
    Ids(Vec<FilterId>),
}

impl FilterIds {
    /// Builds a non-empty id set, dropping repeats while keeping first-seen order.
    pub fn ids<I, T>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<FilterId>,
    {
        let mut unique: Vec<FilterId> = Vec::new();
        for id in ids.into_iter().map(Into::into) {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(ViewError::validation(
                "filter ids",
                "expect a non-empty set of ids or all",
            ));
        }
        Ok(Self::Ids(unique))
    }

    fn checked(self) -> Result<Self> {
        match self {
            Self::Ids(ids) => Self::ids(ids),
            Self::All => Ok(Self::All),
        }
    }
}

impl Serialize for FilterIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_bool(true),
            Self::Ids(ids) => ids.serialize(serializer),
        }
    }
}

/// The `filters` object of a collection:
///
/// ```json
/// { "selected": { "colour": [1, 4] }, "disabled": { "size": true } }
/// ```
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Filters {
    selected: Entries<FilterIds>,
    disabled: Entries<FilterIds>,
}

fn filter_entry(field_name: impl Into<String>, ids: FilterIds) -> Result<(String, FilterIds)> {
    let field_name = field_name.into();
    if field_name.is_empty() {
        return Err(ViewError::validation("filter field name", "must not be empty"));
    }
    Ok((field_name, ids.checked()?))
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn prepare(field_name: impl Into<String>, ids: FilterIds) -> Result<(String, FilterIds)> {
        filter_entry(field_name, ids)
    }

    pub(crate) fn commit_selected(&mut self, (field_name, ids): (String, FilterIds)) {
        self.selected.insert(field_name, ids);
    }

    pub(crate) fn commit_disabled(&mut self, (field_name, ids): (String, FilterIds)) {
        self.disabled.insert(field_name, ids);
    }

    pub fn set_selected_filter(&mut self, field_name: impl Into<String>, ids: FilterIds) -> Result<&mut Self> {
        let entry = filter_entry(field_name, ids)?;
        self.commit_selected(entry);
        Ok(self)
    }

    pub fn set_disabled_filter(&mut self, field_name: impl Into<String>, ids: FilterIds) -> Result<&mut Self> {
        let entry = filter_entry(field_name, ids)?;
        self.commit_disabled(entry);
        Ok(self)
    }

    pub fn selected(&self, field_name: &str) -> Option<&FilterIds> {
        self.selected.get(field_name)
    }

    pub fn disabled(&self, field_name: &str) -> Option<&FilterIds> {
        self.disabled.get(field_name)
    }
}
