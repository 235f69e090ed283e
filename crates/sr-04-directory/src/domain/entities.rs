//! # Domain Entities

use std::fmt;

/// Which list a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectoryList {
    /// Enrolled handles.
    Handles,
    /// State names.
    States,
    /// Neighborhood names.
    Neighborhoods,
}

impl fmt::Display for DirectoryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirectoryList::Handles => "handles",
            DirectoryList::States => "states",
            DirectoryList::Neighborhoods => "neighborhoods",
        })
    }
}

/// A list that could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryWarning {
    /// Affected list.
    pub list: DirectoryList,
    /// Store message.
    pub message: String,
}

impl fmt::Display for DirectoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not load {}: {}", self.list, self.message)
    }
}

/// Lists fetched once per session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectorySnapshot {
    /// Handles, ascending.
    pub handles: Vec<String>,
    /// States, ascending.
    pub states: Vec<String>,
    /// Neighborhoods, ascending.
    pub neighborhoods: Vec<String>,
    /// Lists that came back empty because loading failed.
    pub warnings: Vec<DirectoryWarning>,
}

impl DirectorySnapshot {
    /// Entries of one list.
    pub fn entries(&self, list: DirectoryList) -> &[String] {
        match list {
            DirectoryList::Handles => &self.handles,
            DirectoryList::States => &self.states,
            DirectoryList::Neighborhoods => &self.neighborhoods,
        }
    }

    /// True when every list loaded.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}
