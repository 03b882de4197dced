use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persona record as stored in the `ojous` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ojou {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub quote: Option<String>,
    /// Object key of the uploaded image, set once the upload has finished
    pub image_filename: Option<String>,
    /// Object key of the uploaded story document, set once the upload has finished
    pub story_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOjou {
    pub name: String,
    pub description: String,
    pub quote: Option<String>,
}

/// Partial update of asset keys. `None` leaves the stored key untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOjouAssets {
    pub image_filename: Option<String>,
    pub story_filename: Option<String>,
}

impl UpdateOjouAssets {
    pub fn for_kind(kind: AssetKind, key: String) -> Self {
        match kind {
            AssetKind::Image => Self {
                image_filename: Some(key),
                story_filename: None,
            },
            AssetKind::Story => Self {
                image_filename: None,
                story_filename: Some(key),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image_filename.is_none() && self.story_filename.is_none()
    }
}

/// The two kinds of binary asset an Ojou can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Story,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Image, AssetKind::Story];

    /// Tag embedded in the object key
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Story => "story",
        }
    }

    /// Multipart field carrying this asset on the upload form
    pub fn form_field(&self) -> &'static str {
        match self {
            AssetKind::Image => "image_file",
            AssetKind::Story => "pdf_file",
        }
    }

    pub fn from_form_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.form_field() == field)
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
