use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use thiserror::Error;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Name of the word list shipped inside the binary
pub const BUILTIN: &str = "english";

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("word list `{0}` is not bundled")]
    Missing(String),
    #[error("word list `{0}` is not valid utf-8")]
    NotUtf8(String),
    #[error("word list is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("word list must contain at least one word")]
    Empty,
}

#[derive(Deserialize)]
struct WordList {
    name: String,
    words: Vec<String>,
}

/// Fixed, ordered set of words a session draws from. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    name: String,
    words: Vec<String>,
}

impl Dictionary {
    pub fn new(
        name: impl Into<String>,
        words: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DictionaryError> {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(DictionaryError::Empty);
        }

        Ok(Self {
            name: name.into(),
            words,
        })
    }

    /// The bundled english word list.
    pub fn builtin() -> Result<Self, DictionaryError> {
        read_dictionary_from_file(&format!("{BUILTIN}.json"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn read_dictionary_from_file(file_name: &str) -> Result<Dictionary, DictionaryError> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| DictionaryError::Missing(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| DictionaryError::NotUtf8(file_name.to_string()))?;

    let list: WordList = from_str(file_as_str)?;

    Dictionary::new(list.name, list.words)
}
