//! TrackFinder Library
//!
//! This library provides the catalog logic of a rubber track storefront:
//! brand-alias-aware machine search, the track size compatibility chart,
//! product filtering, redirects, and loading the catalog collections.

// Module declarations
pub mod brands;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod products;
pub mod redirects;
pub mod search;
pub mod track_sizes;

#[cfg(feature = "web")]
pub mod web;
