//! Entity IDs.
//!
//! Each entity gets its own `i32` newtype via `define_id!`, so an order ID
//! cannot stand in for a recipe ID.
//!
//! IDs usually reach the client as user-typed text (a path segment, a CLI
//! argument), so every ID parses from a string and rejects anything that is
//! not a positive integer.

use thiserror::Error;

/// Error returned when text cannot be parsed into an entity ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {entity} ID: {input:?} is not a positive integer")]
pub struct ParseIdError {
    /// Name of the entity the ID belongs to (e.g. "order").
    pub entity: &'static str,
    /// The rejected input.
    pub input: String,
}

/// Anything a caller may hand over as an entity ID.
///
/// Implemented for the ID type itself and for user-typed text, so API
/// operations can validate raw input before any request is made.
pub trait IdInput<T> {
    /// Convert into a validated, positive ID.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIdError`] if the value is not a positive integer.
    fn into_id(self) -> Result<T, ParseIdError>;
}

/// Define an entity ID newtype.
///
/// The second argument is the entity name used in parse errors. The type
/// serializes as a bare integer, converts to and from `i32`, parses from
/// text (positive integers only) and implements [`IdInput`] for itself,
/// `&str`, `String` and `i64`.
///
/// # Example
///
/// ```rust
/// # use lopcafe_core::define_id;
/// define_id!(RecipeId, "recipe");
/// define_id!(OrderId, "order");
///
/// let recipe_id: RecipeId = "7".parse().unwrap();
/// assert_eq!(recipe_id.as_i32(), 7);
/// assert!("abc".parse::<OrderId>().is_err());
///
/// // Distinct types:
/// // let _: RecipeId = OrderId::new(1);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Human-readable entity name used in error messages.
            pub const ENTITY: &'static str = $entity;

            /// Wrap a raw database ID.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Raw integer value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::ParseIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.trim().parse::<i32>() {
                    Ok(id) if id > 0 => Ok(Self(id)),
                    _ => Err($crate::types::id::ParseIdError {
                        entity: $entity,
                        input: s.to_owned(),
                    }),
                }
            }
        }

        impl $crate::types::id::IdInput<$name> for $name {
            fn into_id(self) -> ::core::result::Result<$name, $crate::types::id::ParseIdError> {
                if self.0 > 0 {
                    Ok(self)
                } else {
                    Err($crate::types::id::ParseIdError {
                        entity: $entity,
                        input: self.0.to_string(),
                    })
                }
            }
        }

        impl $crate::types::id::IdInput<$name> for &str {
            fn into_id(self) -> ::core::result::Result<$name, $crate::types::id::ParseIdError> {
                self.parse()
            }
        }

        impl $crate::types::id::IdInput<$name> for String {
            fn into_id(self) -> ::core::result::Result<$name, $crate::types::id::ParseIdError> {
                self.parse()
            }
        }

        impl $crate::types::id::IdInput<$name> for i64 {
            fn into_id(self) -> ::core::result::Result<$name, $crate::types::id::ParseIdError> {
                match i32::try_from(self) {
                    Ok(id) if id > 0 => Ok($name::new(id)),
                    _ => Err($crate::types::id::ParseIdError {
                        entity: $entity,
                        input: self.to_string(),
                    }),
                }
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId, "user");
define_id!(RecipeId, "recipe");
define_id!(OrderId, "order");
define_id!(BrewMethodId, "brew method");
define_id!(IngredientId, "ingredient");
