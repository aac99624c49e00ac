//! # apiview
//!
//! Builds API response envelopes in the apiview layout: a `success` flag,
//! named `resources` (records, collections or plain lists) and diagnostic
//! `notices`. Every setter validates its input when it is called, so a view
//! that was built without errors always renders to a schema-valid document.
//!
//! ## Basic Usage
//!
//! ```rust
//! use apiview::*;
//!
//! let mut view = View::new();
//! view.mark_successful();
//!
//! let users = view.attach_collection("users", view.new_collection())?;
//! users.add_record().set("id", 1)?.set("name", "Ada")?;
//! users.add_record().set("id", 2)?.set("name", "Grace")?;
//! users.set_pagination(1, 1, 20)?;
//!
//! view.add_notice(NoticeType::Info, None, None, Some("Served from cache"))?;
//!
//! let json = view.render("json")?;
//! assert!(json.starts_with(r#"{"success":true,"resources":{"users":{"data":[{"id":1"#));
//! # Ok::<(), apiview::ViewError>(())
//! ```
//!
//! ## Nested Images
//!
//! Setting an [`ImageCollection`] on a record hands the collection back so
//! images can be added in the same chain:
//!
//! ```rust
//! use apiview::*;
//!
//! let mut record = Record::new();
//! record
//!     .set_images("photos", ImageCollection::new())?
//!     .add_image(MimeType::Jpeg)
//!     .set_id(12)?
//!     .add_size(240, 200, "https://static.example.com/12-s.jpg")?
//!     .add_size(480, 400, "https://static.example.com/12-m.jpg")?;
//! # Ok::<(), apiview::ViewError>(())
//! ```
//!
//! ## Schema Validation
//!
//! Rendered views can be checked against the bundled envelope schema:
//!
//! ```rust
//! use apiview::*;
//!
//! let mut view = View::new();
//! view.add_notice(NoticeType::Error, Some("Not Found"), None, None)
//!     .expect("Valid notice");
//!
//! assert!(view.validate().is_ok());
//! ```

mod collection;
mod config;
mod decoration;
pub mod error;
mod image;
mod notice;
mod record;
mod validation;
mod value;
mod view;

pub use collection::*;
pub use config::*;
pub use decoration::*;
pub use error::ViewError;
pub use image::*;
pub use notice::*;
pub use record::*;
pub use validation::*;
pub use value::ScalarValue;
pub use view::*;

// Re-export the derive macro
pub use apiview_derive::IntoRecord;

#[doc(hidden)]
pub use serde as __serde;

/// Conversion of caller types into records, usually through
/// `#[derive(IntoRecord)]` on a `serde::Serialize` struct.
pub trait IntoRecord {
    fn into_record(self) -> Result<Record, ViewError>
    where
        Self: Sized;

    fn into_collection_record(self) -> Result<CollectionRecord, ViewError>
    where
        Self: Sized;
}
