//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! the user collection locally. The collection is stored as a single
//! whole-collection JSON snapshot under a fixed key; every write
//! replaces the previous snapshot.

pub mod manager;

pub use manager::CacheManager;
