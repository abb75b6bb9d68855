//! Language-standard revisions selecting which table overrides apply

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// C++ standard revisions, ordered oldest to newest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    Cpp98,
    Cpp03,
    Cpp11,
    #[default]
    Cpp14,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Cpp98,
        Dialect::Cpp03,
        Dialect::Cpp11,
        Dialect::Cpp14,
    ];

    /// Short revision name, e.g. `"11"`
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Cpp98 => "98",
            Dialect::Cpp03 => "03",
            Dialect::Cpp11 => "11",
            Dialect::Cpp14 => "14",
        }
    }

    /// The revision immediately before this one
    pub fn older(&self) -> Option<Dialect> {
        match self {
            Dialect::Cpp98 => None,
            Dialect::Cpp03 => Some(Dialect::Cpp98),
            Dialect::Cpp11 => Some(Dialect::Cpp03),
            Dialect::Cpp14 => Some(Dialect::Cpp11),
        }
    }

    /// This dialect followed by every older one, newest first
    pub fn fallback_chain(self) -> impl Iterator<Item = Dialect> {
        std::iter::successors(Some(self), |d| d.older())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C++{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();
        let revision = lowered
            .strip_prefix("c++")
            .or_else(|| lowered.strip_prefix("cpp"))
            .unwrap_or(&lowered);
        Dialect::ALL
            .into_iter()
            .find(|d| d.name() == revision)
            .ok_or_else(|| format!("unknown C++ dialect '{}'", value))
    }
}

impl TryFrom<String> for Dialect {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_oldest_to_newest() {
        assert!(Dialect::Cpp98 < Dialect::Cpp03);
        assert!(Dialect::Cpp11 < Dialect::Cpp14);
        assert_eq!(Dialect::default(), Dialect::Cpp14);
    }

    #[test]
    fn test_fallback_chain_walks_down_to_oldest() {
        let chain: Vec<_> = Dialect::Cpp11.fallback_chain().collect();
        assert_eq!(chain, vec![Dialect::Cpp11, Dialect::Cpp03, Dialect::Cpp98]);
        assert_eq!(Dialect::Cpp98.fallback_chain().count(), 1);
    }

    #[test]
    fn test_parsing_accepts_common_spellings() {
        assert_eq!("14".parse::<Dialect>(), Ok(Dialect::Cpp14));
        assert_eq!("c++11".parse::<Dialect>(), Ok(Dialect::Cpp11));
        assert_eq!("CPP03".parse::<Dialect>(), Ok(Dialect::Cpp03));
        assert!("17".parse::<Dialect>().is_err());
    }
}
