//! JSON API handlers.
//!
//! Every error body is `{"message": ...}`.

pub mod products;
