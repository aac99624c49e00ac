use crate::decoration::{FilterId, FilterIds, Filters, Metadata, Pagination, Sort, SortOrder};
use crate::error::Result;
use crate::image::{Image, MimeType};
use crate::record::CollectionRecord;
use crate::value::ScalarValue;
use serde::{Serialize, Serializer};

/// A borrowed entry of a collection's `data` array.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CollectionItem<'a> {
    Record(&'a CollectionRecord),
    Image(&'a Image),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemSlot {
    Record(usize),
    Image(usize),
}

// Records and images are stored by kind; `order` interleaves them.
#[derive(Debug, Clone, Default, PartialEq)]
struct Items {
    order: Vec<ItemSlot>,
    records: Vec<CollectionRecord>,
    images: Vec<Image>,
}

impl Items {
    fn iter(&self) -> impl Iterator<Item = CollectionItem<'_>> {
        self.order.iter().map(move |slot| match *slot {
            ItemSlot::Record(idx) => CollectionItem::Record(&self.records[idx]),
            ItemSlot::Image(idx) => CollectionItem::Image(&self.images[idx]),
        })
    }
}

impl Serialize for Items {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// An ordered list of records or images plus the optional `meta`,
/// `pagination`, `sort` and `filters` decorations. Each decoration is created
/// by the first successful call that writes to it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Collection {
    data: Items,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<Filters>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self) -> &mut CollectionRecord {
        self.push_record(CollectionRecord::new())
    }

    pub fn push_record(&mut self, record: CollectionRecord) -> &mut CollectionRecord {
        let idx = self.data.records.len();
        self.data.records.push(record);
        self.data.order.push(ItemSlot::Record(idx));
        &mut self.data.records[idx]
    }

    pub fn add_image(&mut self, mime_type: MimeType) -> &mut Image {
        self.push_image(Image::new(mime_type))
    }

    pub fn push_image(&mut self, image: Image) -> &mut Image {
        let idx = self.data.images.len();
        self.data.images.push(image);
        self.data.order.push(ItemSlot::Image(idx));
        &mut self.data.images[idx]
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

    /// Marks ids of `field_name` as disabled; [`FilterIds::All`] disables every id.
    pub fn add_disabled_filter(&mut self, field_name: impl Into<String>, ids: FilterIds) -> Result<&mut Self> {
        let entry = Filters::prepare(field_name, ids)?;
        self.filters.get_or_insert_with(Filters::new).commit_disabled(entry);
        Ok(self)
    }

    pub fn add_selected_filter<I, T>(&mut self, field_name: impl Into<String>, ids: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<FilterId>,
    {
        let entry = Filters::prepare(field_name, FilterIds::ids(ids)?)?;
        self.filters.get_or_insert_with(Filters::new).commit_selected(entry);
        Ok(self)
    }

    /// Replaces all three pagination counters, or none if any is invalid.
    pub fn set_pagination(&mut self, page: u32, pages: u32, per_page: u32) -> Result<&mut Self> {
        self.pagination = Some(Pagination::new(page, pages, per_page)?);
        Ok(self)
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        self.pagination.get_or_insert_with(Pagination::default)
    }

    pub fn set_sorting(&mut self, by: impl Into<String>, order: SortOrder) -> Result<&mut Self> {
        self.sort = Some(Sort::new(by, order)?);
        Ok(self)
    }

    /// Records and images in insertion order.
    pub fn items(&self) -> impl Iterator<Item = CollectionItem<'_>> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.order.is_empty()
    }

    pub fn meta(&self) -> Option<&Metadata> {
        self.meta.as_ref()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> Option<&Filters> {
        self.filters.as_ref()
    }
}
