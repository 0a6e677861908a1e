//! Closed enumerations for the filterable catalog attributes.
//!
//! Every product carries exactly one wood type, one finish and one
//! collection. Adding a value here is a compile-time checked change for every
//! `match` over the enum, including the filter predicates.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known attribute value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {attribute}: {value}")]
pub struct AttributeParseError {
    /// Attribute being parsed (e.g., "wood type").
    pub attribute: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Defines a catalog attribute enum.
///
/// Generates the enum plus:
/// - `ALL` listing the whole domain in declaration order
/// - `as_str()` returning the display name
/// - `Display` and case-insensitive `FromStr`
macro_rules! catalog_attribute {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value in the domain, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable name of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = AttributeParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| AttributeParseError {
                        attribute: $label,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

catalog_attribute! {
    /// Species of timber a piece is built from.
    WoodType, "wood type" {
        Oak => "Oak",
        Walnut => "Walnut",
        Maple => "Maple",
        Cherry => "Cherry",
        Mahogany => "Mahogany",
        Pine => "Pine",
        Birch => "Birch",
    }
}

catalog_attribute! {
    /// Surface treatment applied to a piece.
    Finish, "finish" {
        Natural => "Natural",
        Matte => "Matte",
        Glossy => "Glossy",
        Distressed => "Distressed",
        Painted => "Painted",
        Oiled => "Oiled",
    }
}

catalog_attribute! {
    /// Design line a piece belongs to.
    Collection, "collection" {
        Modern => "Modern",
        Rustic => "Rustic",
        Classic => "Classic",
        Minimalist => "Minimalist",
        Industrial => "Industrial",
        Farmhouse => "Farmhouse",
    }
}
