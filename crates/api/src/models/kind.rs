use crate::error::ApiError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a documented entity.
///
/// The declaration order doubles as the sort order used when entity
/// identifiers are assigned, so containers come before their members.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Class,
    Category,
    Extension,
    Protocol,
    Method,
    Property,
    Argument,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Class,
        EntityKind::Category,
        EntityKind::Extension,
        EntityKind::Protocol,
        EntityKind::Method,
        EntityKind::Property,
        EntityKind::Argument,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Category => "category",
            EntityKind::Extension => "extension",
            EntityKind::Protocol => "protocol",
            EntityKind::Method => "method",
            EntityKind::Property => "property",
            EntityKind::Argument => "argument",
        }
    }

    /// Kinds that own methods and properties.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            EntityKind::Class | EntityKind::Category | EntityKind::Extension | EntityKind::Protocol
        )
    }

    /// Kinds that always belong to exactly one owner.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            EntityKind::Method | EntityKind::Property | EntityKind::Argument
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(EntityKind::Class),
            "category" => Ok(EntityKind::Category),
            "extension" => Ok(EntityKind::Extension),
            "protocol" => Ok(EntityKind::Protocol),
            "method" => Ok(EntityKind::Method),
            "property" => Ok(EntityKind::Property),
            "argument" => Ok(EntityKind::Argument),
            other => Err(ApiError::UnknownKind(other.to_string())),
        }
    }
}

/// Whether a method is sent to the class (`+`) or to instances (`-`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MethodScope {
    Class,
    Instance,
}

impl MethodScope {
    pub fn prefix(&self) -> char {
        match self {
            MethodScope::Class => '+',
            MethodScope::Instance => '-',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            '+' => Some(MethodScope::Class),
            '-' => Some(MethodScope::Instance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("module".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_containers_sort_before_members() {
        let mut kinds = vec![EntityKind::Argument, EntityKind::Method, EntityKind::Class];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![EntityKind::Class, EntityKind::Method, EntityKind::Argument]
        );
        assert!(EntityKind::Protocol.is_container());
        assert!(!EntityKind::Protocol.is_member());
    }
}
