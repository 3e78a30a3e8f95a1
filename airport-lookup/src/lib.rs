//! Airport lookup server.
//!
//! Looks up airports by ICAO or IATA code in a static dataset and serves
//! free-text searches through a bounded, persisted LRU cache.

pub mod airports;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod web;
