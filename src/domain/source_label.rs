use unicode_segmentation::UnicodeSegmentation;

/// Free-form attribution label for where a signup came from
/// ("footer", "blog-post", a campaign tag).
#[derive(Debug, Clone)]
pub struct SourceLabel(String);

impl TryFrom<String> for SourceLabel {
    type Error = InvalidSourceLabel;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(InvalidSourceLabel::Empty);
        }
        if value.graphemes(true).count() > 50 {
            return Err(InvalidSourceLabel::TooLong);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for SourceLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidSourceLabel {
    #[error("Source label is empty.")]
    Empty,
    #[error("Source label is longer than 50 characters.")]
    TooLong,
}
