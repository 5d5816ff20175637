//! # Request Pipeline
//!
//! Turns one untrusted HTTP request into a typed value in three stages:
//!
//! 1. [`pick`] copies only the declared fields out of a [`RawRequest`], dropping malformed
//!    keys, filling defaults and running conversions;
//! 2. [`validate_values`] checks presence, nested shape and the named rules;
//! 3. [`decode`] coerces the validated map and deserializes it into the destination.
//!
//! [`InputHandler`] runs the three stages for one schema, and [`Validated`] does the same
//! from inside an axum handler signature.

mod decoder;
mod error;
mod extract;
mod handler;
mod picker;
mod raw;
mod validator;

pub use decoder::{coerce, coerce_object, decode};
pub use error::{DecodeError, PickError};
pub use extract::Validated;
pub use handler::{ApiInput, InputHandler};
pub use picker::{is_valid_key, pick};
pub use raw::RawRequest;
pub use validator::validate_values;
