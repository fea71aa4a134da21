use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Purpose of a texture inside a material, as named by the `Name=<key>`
/// entries of a props dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TextureRole {
    BaseColorMap,
    NormalMap,
    /// Packed roughness / metallic / height
    RMHMap,
}

impl TextureRole {
    /// Every known role, in lookup order
    pub const ALL: [TextureRole; 3] = [
        TextureRole::BaseColorMap,
        TextureRole::NormalMap,
        TextureRole::RMHMap,
    ];

    /// Key string as it appears after `Name=` in a props file
    pub fn key(&self) -> &'static str {
        match self {
            TextureRole::BaseColorMap => "BaseColorMap",
            TextureRole::NormalMap => "NormalMap",
            TextureRole::RMHMap => "RMHMap",
        }
    }

    /// Label used for the image node in a shader graph
    pub fn label(&self) -> &'static str {
        match self {
            TextureRole::BaseColorMap => "BaseColor",
            TextureRole::NormalMap => "Normal",
            TextureRole::RMHMap => "RMH",
        }
    }
}

impl fmt::Display for TextureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown texture role `{0}` (expected one of BaseColorMap, NormalMap, RMHMap)")]
pub struct UnknownRole(pub String);

impl FromStr for TextureRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextureRole::ALL
            .into_iter()
            .find(|role| role.key() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for role in TextureRole::ALL {
            assert_eq!(role.key().parse::<TextureRole>(), Ok(role));
            assert_eq!(role.to_string(), role.key());
        }
    }

    #[test]
    fn test_unknown_role() {
        let err = "SpecularMap".parse::<TextureRole>().unwrap_err();
        assert_eq!(err, UnknownRole("SpecularMap".to_string()));
        // Keys are case-sensitive, like the props format itself
        assert!("normalmap".parse::<TextureRole>().is_err());
    }

    #[test]
    fn test_ordering_follows_lookup_order() {
        let mut roles = vec![TextureRole::RMHMap, TextureRole::BaseColorMap, TextureRole::NormalMap];
        roles.sort();
        assert_eq!(roles, TextureRole::ALL.to_vec());
    }
}
