use serde::{Deserialize, Serialize};

/// One statement row as read from the file, before any validation.
/// Cells are kept as text; the normalizer decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub amount: String,
    pub description: String,
    pub category: Option<String>,
    pub merchant_code: Option<String>,
    pub notes: Option<String>,
}

impl RawRow {
    pub fn new(date: impl Into<String>, amount: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_merchant_code(mut self, code: impl Into<String>) -> Self {
        self.merchant_code = Some(code.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
