use std::{fmt, str::FromStr};

use convert_case::{Case, Casing};

use crate::core::error::{Error, Result};

/// Return true if the character is valid in a node name.
pub fn valid_nodename_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Return true if the full name is valid.
pub fn valid_nodename(name: &str) -> bool {
    !name.is_empty() && name.chars().all(valid_nodename_char)
}

/// A node name: lowercase ASCII alphanumerics plus underscores.
///
/// Names are used in tree dumps and log output. They are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    /// Stored name.
    name: String,
}

impl NodeName {
    /// Create a name, rejecting invalid characters.
    fn new(name: &str) -> Result<Self> {
        if !valid_nodename(name) {
            return Err(Error::InvalidName(name.into()));
        }
        Ok(Self { name: name.into() })
    }

    /// Munge an arbitrary string into a valid name: snake case, invalid
    /// characters dropped, `node` if nothing survives.
    pub fn convert(name: &str) -> Self {
        let filtered: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| valid_nodename_char(*c))
            .collect();
        if filtered.is_empty() {
            Self {
                name: "node".into(),
            }
        } else {
            Self { name: filtered }
        }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl FromStr for NodeName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for NodeName {
    type Error = Error;
    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialEq<String> for NodeName {
    fn eq(&self, other: &String) -> bool {
        self.name == *other
    }
}
