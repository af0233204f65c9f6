use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use anyhow::Result;

/// Dictionary membership, the only thing the rules need from a word list.
///
/// Lookups are case-insensitive.
pub trait WordValidator: Send + Sync {
    fn contains(&self, spelling: &str) -> bool;
}

pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Load dictionary from a file, one word per line
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let dictionary = Self::from_words(content.lines());

        tracing::info!("Loaded {} words into dictionary", dictionary.len());

        Ok(dictionary)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_uppercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    /// Create an empty dictionary (for testing)
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordValidator for Dictionary {
    fn contains(&self, spelling: &str) -> bool {
        self.words.contains(&spelling.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dictionary() {
        let dict = Dictionary::empty();
        assert!(dict.is_empty());
        assert!(!dict.contains("TEST"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dict = Dictionary::from_words(["hello", " World ", "", "a"]);
        assert_eq!(dict.len(), 3);
        assert!(dict.contains("HELLO"));
        assert!(dict.contains("world"));
        assert!(dict.contains("A"));
        assert!(!dict.contains("hell"));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        assert!(Dictionary::load("/nonexistent/dictionary.txt").await.is_err());
    }
}
