use crate::collection::Collection;
use crate::config::{Format, RenderConfig};
use crate::error::{Result, ViewError};
use crate::image::ImageCollection;
use crate::notice::{Notice, NoticeType};
use crate::record::Record;
use crate::value::{json_type_name, Entries, ScalarValue};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, instrument};

/// A named entry of the top-level `resources` object.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Resource {
    Record(Record),
    Collection(Collection),
    /// A plain list of values standing in for a collection.
    List(Vec<Value>),
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Collection(_) => "collection",
            Self::List(_) => "list",
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Record> for Resource {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Collection> for Resource {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

/// The root of a response:
///
/// ```json
/// { "success": true, "resources": { "users": { "data": [] } }, "notices": [{ "type": "OK" }] }
/// ```
///
/// `resources` and `notices` are left out until something is added to them.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct View {
    success: bool,
    #[serde(skip_serializing_if = "Entries::is_empty")]
    resources: Entries<Resource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notices: Vec<Notice>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_successful(&mut self) -> &mut Self {
        self.success = true;
        self
    }

    pub fn is_successful(&self) -> bool {
        self.success
    }

    pub fn new_record(&self) -> Record {
        Record::new()
    }

    pub fn new_collection(&self) -> Collection {
        Collection::new()
    }

    pub fn new_image_collection(&self) -> ImageCollection {
        ImageCollection::new()
    }

    /// Attaches a resource under a name that must not be taken yet, returning
    /// the attached resource for further building.
    pub fn attach_resource(&mut self, name: impl Into<String>, resource: impl Into<Resource>) -> Result<&mut Resource> {
        let name = name.into();
        let resource = resource.into();
        if name.is_empty() {
            return Err(ViewError::validation("resource name", "must not be empty"));
        }
        if self.resources.contains_key(&name) {
            debug!(resource = %name, "rejecting duplicate resource");
            return Err(ViewError::DuplicateResource { name });
        }
        debug!(resource = %name, kind = resource.kind(), "attaching resource");
        Ok(self.resources.insert(name, resource))
    }

    pub fn attach_record(&mut self, name: impl Into<String>, record: Record) -> Result<&mut Record> {
        match self.attach_resource(name, record)? {
            Resource::Record(record) => Ok(record),
            other => Err(mismatch(other)),
        }
    }

    pub fn attach_collection(&mut self, name: impl Into<String>, collection: Collection) -> Result<&mut Collection> {
        match self.attach_resource(name, collection)? {
            Resource::Collection(collection) => Ok(collection),
            other => Err(mismatch(other)),
        }
    }

    pub fn attach_list<I, T>(&mut self, name: impl Into<String>, items: I) -> Result<&mut Vec<Value>>
    where
        I: IntoIterator<Item = T>,
        T: Into<ScalarValue>,
    {
        let name = name.into();
        let items = items
            .into_iter()
            .map(|item| item.into().into_json(&name))
            .collect::<Result<Vec<_>>>()?;
        match self.attach_resource(name, Resource::List(items))? {
            Resource::List(items) => Ok(items),
            other => Err(mismatch(other)),
        }
    }

    /// Attaches an untyped JSON value: arrays become lists, objects become
    /// records, anything else is rejected.
    pub fn attach_json(&mut self, name: impl Into<String>, value: Value) -> Result<&mut Resource> {
        let resource = match value {
            Value::Array(items) => Resource::List(items),
            object @ Value::Object(_) => {
                let mut record = Record::new();
                record.set_json(object)?;
                Resource::Record(record)
            }
            other => {
                return Err(ViewError::InvalidResource {
                    found: json_type_name(&other).to_string(),
                })
            }
        };
        self.attach_resource(name, resource)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn resource_mut(&mut self, name: &str) -> Option<&mut Resource> {
        self.resources.get_mut(name)
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|(name, _)| name)
    }

    /// Builds a notice and appends it; nothing is appended if any field is invalid.
    pub fn add_notice(
        &mut self,
        notice_type: NoticeType,
        subtype: Option<&str>,
        context: Option<&str>,
        message: Option<&str>,
    ) -> Result<&mut Notice> {
        let notice = Notice::with_fields(notice_type, subtype, context, message)?;
        Ok(self.push_notice(notice))
    }

    pub fn push_notice(&mut self, notice: Notice) -> &mut Notice {
        debug!(notice_type = %notice.notice_type(), "adding notice");
        self.notices.push(notice);
        let last = self.notices.len() - 1;
        &mut self.notices[last]
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Renders the view in the named format. Only `"json"` is supported.
    #[instrument(skip(self))]
    pub fn render(&self, format: &str) -> Result<String> {
        self.render_format(format.parse()?)
    }

    pub fn render_format(&self, format: Format) -> Result<String> {
        self.render_with(&RenderConfig {
            format,
            pretty: false,
        })
    }

    pub fn render_with(&self, config: &RenderConfig) -> Result<String> {
        let rendered = match config.format {
            Format::Json if config.pretty => serde_json::to_string_pretty(self)?,
            Format::Json => serde_json::to_string(self)?,
        };
        debug!(
            format = %config.format,
            pretty = config.pretty,
            bytes = rendered.len(),
            "rendered view"
        );
        Ok(rendered)
    }
}

fn mismatch(resource: &Resource) -> ViewError {
    ViewError::InvalidResource {
        found: resource.kind().to_string(),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.render_format(Format::Json).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
