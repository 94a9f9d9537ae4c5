use serde::{Deserialize, Serialize};

/// A keyword-phrase/answer pair from the knowledge base.
///
/// The knowledge base is an ordered list of entries. Matching itself does
/// not depend on the order, but ties are broken by it, so hosts should
/// keep it stable between runs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// A short phrase the user input is compared against.
    pub keyword: String,
    /// The answer presented when this entry is chosen.
    pub answer: String,
}

impl Entry {
    /// Creates a new entry.
    #[inline]
    pub fn new<K: Into<String>, A: Into<String>>(keyword: K, answer: A) -> Self {
        Self {
            keyword: keyword.into(),
            answer: answer.into(),
        }
    }
}
