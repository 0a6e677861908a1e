//! Core types for Artisan Woodcraft.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod attributes;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use attributes::{AttributeParseError, Collection, Finish, WoodType};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, round_currency};
pub use product::{Dimensions, Product, Review};
pub use status::*;
