use unicode_segmentation::UnicodeSegmentation;

const MAX_NAME_LENGTH: usize = 200;
const FORBIDDEN_CHARS: [char; 9] = ['/', '{', '}', '"', '>', '<', '\\', '(', ')'];

#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub fn parse(name: String) -> Result<SubscriberName, String> {
        let name = name.trim().to_string();
        let is_empty = name.is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_NAME_LENGTH;
        let contains_forbidden_chars = name.chars().any(|c| FORBIDDEN_CHARS.contains(&c));

        if is_empty || is_too_long || contains_forbidden_chars {
            return Err(format!("{} is not a valid subscriber name.", name));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
