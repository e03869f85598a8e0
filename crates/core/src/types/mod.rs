//! Core types for LopCafe.
//!
//! This module provides type-safe wrappers for the coffee-ordering domain.

pub mod entity;
pub mod id;
pub mod price;
pub mod role;
pub mod status;

pub use entity::*;
pub use id::*;
pub use price::Price;
pub use role::{ParseRoleError, Role};
pub use status::{OrderStatus, ParseOrderStatusError};
