use serde::{Serialize, Serializer};

/// Ordered list of `repository:tag` choices produced by one resolution
///
/// Each choice keeps the repository and tag it was formatted from, so a
/// selection maps back to them without re-parsing the string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    options: Vec<String>,
    resolved: Vec<(String, String)>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the choice for `repository` at `tag`
    pub fn push(&mut self, repository: impl Into<String>, tag: impl Into<String>) {
        let (repository, tag) = (repository.into(), tag.into());
        self.options.push(format_option(&repository, &tag));
        self.resolved.push((repository, tag));
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.options.first().map(String::as_str)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Repository and tag a choice was resolved from
    pub fn lookup(&self, option: &str) -> Option<(&str, &str)> {
        self.options
            .iter()
            .zip(&self.resolved)
            .find(|(o, _)| *o == option)
            .map(|(_, (repository, tag))| (repository.as_str(), tag.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.options
    }
}

impl<R, T> FromIterator<(R, T)> for OptionList
where
    R: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (R, T)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (repository, tag) in iter {
            list.push(repository, tag);
        }
        list
    }
}

impl Serialize for OptionList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.options.serialize(serializer)
    }
}

impl From<OptionList> for Vec<String> {
    fn from(list: OptionList) -> Self {
        list.options
    }
}

impl IntoIterator for OptionList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

/// Format one selectable option
pub fn format_option(repository: &str, tag: &str) -> String {
    format!("{}:{}", repository, tag)
}
