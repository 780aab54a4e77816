use std::fmt;

use serde::Serialize;

/// Ordered sequence of values written with a single separator character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitList<T> {
    separator: char,
    items: Vec<T>,
}

impl<T> SplitList<T> {
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            items: Vec::new(),
        }
    }

    pub fn with_items(separator: char, items: Vec<T>) -> Self {
        Self { separator, items }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Decode every `separator`-delimited item with `parse`, failing on the first error.
    pub fn parse_with<E, F>(text: &str, separator: char, parse: F) -> Result<Self, E>
    where
        F: Fn(&str) -> Result<T, E>,
    {
        let items = split_top_level(text, separator)
            .into_iter()
            .map(|item| parse(item.trim()))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { separator, items })
    }
}

impl<T: fmt::Display> fmt::Display for SplitList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a SplitList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Split on `separator`, ignoring separators nested inside `[...]`.
///
/// Parameters embedded in modifications and parameter lists carry their own
/// commas and pipes, which must not split the outer list.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte index of the first `needle` outside brackets.
pub(crate) fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
