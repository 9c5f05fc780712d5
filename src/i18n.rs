use std::collections::HashMap;

/// Fixed UI strings for the public pages.
///
/// A flat key -> string catalog, embedded at build time. Lookup of a
/// missing key returns the key itself so a missing translation is visible
/// instead of fatal.
#[derive(Debug, Clone)]
pub struct Lang {
    strings: HashMap<String, String>,
}

impl Lang {
    pub fn load_default() -> Self {
        let strings = serde_json::from_str(include_str!("../i18n/en.json"))
            .expect("the embedded language catalog is valid JSON");
        Self { strings }
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }
}
