//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! Translates requests (path ids, query strings, JSON bodies) into domain
//! commands, and domain results or `LibraryError`s into JSON responses with
//! the matching status codes. No business rules live here.

pub mod rest;
