use serde::{Deserialize, Serialize};

use crate::models::ojous::NewOjou;

/// Text fields of the upload form, as typed by the visitor.
///
/// Kept separate from `NewOjou` so a rejected form can be rendered back
/// with the values the visitor entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OjouForm {
    pub name: String,
    pub description: String,
    pub quote: String,
}

impl OjouForm {
    pub const TEXT_FIELDS: [&'static str; 3] = ["name", "description", "quote"];

    pub fn is_text_field(field: &str) -> bool {
        Self::TEXT_FIELDS.contains(&field)
    }

    /// Stores a text field by multipart name. Unknown names are ignored.
    pub fn set_field(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "description" => self.description = value,
            "quote" => self.quote = value,
            _ => {}
        }
    }

    /// Name is trimmed; description and quote are kept as typed. A blank
    /// quote is stored as NULL.
    pub fn to_new_ojou(&self) -> NewOjou {
        NewOjou {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            quote: if self.quote.trim().is_empty() { None } else { Some(self.quote.clone()) },
        }
    }
}

/// Body of `POST /chat/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub user_input: Option<String>,
}

/// Query of `GET /`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Id of the record created by the preceding upload redirect
    pub created: Option<i64>,
}
