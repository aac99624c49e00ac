use crate::error::{Result, ViewError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MimeType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/svg+xml")]
    Svg,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image/png" => Ok(Self::Png),
            "image/jpeg" => Ok(Self::Jpeg),
            "image/svg+xml" => Ok(Self::Svg),
            other => Err(ViewError::validation(
                "image MIME type",
                format!("expected image/png, image/jpeg or image/svg+xml, got {other:?}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub uri: String,
}

/// A single image object. Every property is always rendered:
///
/// ```json
/// {
///     "id": null,
///     "description": "",
///     "mime_type": "image/jpeg",
///     "sizes": [{ "width": 240, "height": 200, "uri": "https://static.example.com/a.jpg" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Image {
    id: Option<u64>,
    description: String,
    mime_type: MimeType,
    sizes: Vec<ImageSize>,
}

impl Image {
    pub fn new(mime_type: MimeType) -> Self {
        Self {
            id: None,
            description: String::new(),
            mime_type,
            sizes: Vec::new(),
        }
    }

    /// Parses the MIME type first, so an unsupported type never yields an image.
    pub fn from_mime_str(mime_type: &str) -> Result<Self> {
        Ok(Self::new(mime_type.parse()?))
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    pub fn sizes(&self) -> &[ImageSize] {
        &self.sizes
    }

    /// Sets the id used when the image is cross-referenced from elsewhere.
    pub fn set_id(&mut self, id: u64) -> Result<&mut Self> {
        if id < 1 {
            return Err(ViewError::validation("image id", "expect integer of 1 or more"));
        }
        self.id = Some(id);
        Ok(self)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_mime_type(&mut self, mime_type: MimeType) -> &mut Self {
        self.mime_type = mime_type;
        self
    }

    /// Appends a size variation of the image.
    pub fn add_size(&mut self, width: u32, height: u32, uri: impl Into<String>) -> Result<&mut Self> {
        if width < 1 {
            return Err(ViewError::validation("image width", "expect integer of 1 or more"));
        }
        if height < 1 {
            return Err(ViewError::validation("image height", "expect integer of 1 or more"));
        }
        let uri = uri.into();
        if uri.is_empty() {
            return Err(ViewError::validation("image uri", "expect non-empty string"));
        }
        self.sizes.push(ImageSize { width, height, uri });
        Ok(self)
    }
}

/// An ordered list of images, typically nested inside a record.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ImageCollection {
    images: Vec<Image>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_image(&mut self, mime_type: MimeType) -> &mut Image {
        self.push(Image::new(mime_type))
    }

    pub fn push(&mut self, image: Image) -> &mut Image {
        self.images.push(image);
        let last = self.images.len() - 1;
        &mut self.images[last]
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
