//! Enumerations of named constants
//!
//! An [`Enumeration`] is a closed, ordered set of named members. Property
//! validation references enumerations for membership checks, and callers can
//! resolve names with a structured error when the name is unknown.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EnumError;

/// A closed set of named constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    /// Enumeration name, used in error reporting
    name: String,

    /// Members in declaration order
    members: Vec<String>,
}

impl Enumeration {
    /// Create an empty enumeration
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Create an enumeration from a list of members
    pub fn with_members<S, I, M>(name: S, members: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let mut enumeration = Self::new(name);
        for member in members {
            enumeration.add(member);
        }
        enumeration
    }

    /// Add a member if it is not already present
    pub fn add<M: Into<String>>(&mut self, member: M) {
        let member = member.into();
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }

    /// Builder-style variant of [`add`](Self::add)
    pub fn member<M: Into<String>>(mut self, member: M) -> Self {
        self.add(member);
        self
    }

    /// Get the enumeration name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether a name is a member of this enumeration
    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// Get the declaration-order position of a member
    pub fn position(&self, member: &str) -> Option<usize> {
        self.members.iter().position(|m| m == member)
    }

    /// Resolve a member name, failing if it is not part of the set
    pub fn require(&self, member: &str) -> Result<&str, EnumError> {
        self.members
            .iter()
            .find(|m| m.as_str() == member)
            .map(|m| m.as_str())
            .ok_or_else(|| EnumError::UnknownMember {
                enumeration: self.name.clone(),
                member: member.to_string(),
            })
    }

    /// Iterate members in declaration order
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.as_str())
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether the enumeration has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.members.join(", "))
    }
}
