use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Source language handled by a frontend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Cow<'static, str>);

impl Language {
    pub const OBJC: Language = Language(Cow::Borrowed("objc"));
    pub const OBJCPP: Language = Language(Cow::Borrowed("objcpp"));
    pub const UNKNOWN: Language = Language(Cow::Borrowed("unknown"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "h" | "m" => Some(Self::OBJC),
            "mm" => Some(Self::OBJCPP),
            _ => None,
        }
    }

    /// Language of a file identifier, judged by its extension.
    pub fn from_file(file: &str) -> Option<Self> {
        let (_, ext) = file.rsplit_once('.')?;
        if ext.contains('/') || ext.contains('\\') {
            return None;
        }
        Self::from_extension(ext)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_file() {
        assert_eq!(Language::from_file("src/Foo.h"), Some(Language::OBJC));
        assert_eq!(Language::from_file("Foo.mm"), Some(Language::OBJCPP));
        assert_eq!(Language::from_file("dir.v2/README"), None);
        assert_eq!(Language::from_file("notes.txt"), None);
    }
}
