//! Tokenized task text.

/// Lower-cased words of a task, split on anything that is not a letter,
/// digit, `+` or `#`.
///
/// ```rust
/// use relay_core::planner::TaskText;
///
/// let text = TaskText::new("Find C++ repos in New York!");
/// assert_eq!(text.words(), ["find", "c++", "repos", "in", "new", "york"]);
/// assert!(text.contains_phrase("new york"));
/// assert!(text.has_word_starting_with("repo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskText {
    words: Vec<String>,
}

impl TaskText {
    pub fn new(text: &str) -> Self {
        let words = text
            .to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// True if some word begins with `prefix`.
    pub fn has_word_starting_with(&self, prefix: &str) -> bool {
        self.words.iter().any(|w| w.starts_with(prefix))
    }

    /// True if `phrase` occurs as consecutive whole words.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        if needle.is_empty() || needle.len() > self.words.len() {
            return false;
        }
        self.words
            .windows(needle.len())
            .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
    }

    /// The first word after an occurrence of `marker` that is not in `skip`
    /// and starts with a letter. Occurrences are tried left to right.
    pub fn word_after(&self, marker: &str, skip: &[&str]) -> Option<&str> {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, w)| *w == marker)
            .find_map(|(i, _)| {
                self.words[i + 1..]
                    .iter()
                    .map(String::as_str)
                    .find(|w| !skip.contains(w))
                    .filter(|w| w.starts_with(char::is_alphabetic))
            })
    }
}
