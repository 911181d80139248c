//! # Hidayah
//!
//! Qibla compass engine: the great-circle bearing from the user's position
//! to the Kaaba, turned into a needle angle against the live device heading.
//! Also carries the Hijri calendar browser and the prayer board that share
//! the same location plumbing.
//!
//! This crate is a facade that re-exports functionality from the `hidayah` ecosystem.
//!
//! ## Modules
//!
//! - `types`: shared value types and collaborator contracts
//! - `qibla`: bearing math, engine and heading sources
//! - `calendar`: Hijri month grid and browser
//! - `network`: HTTP collaborators (feature `async`)
//!
//! ## Usage
//!
//! ```rust
//! use hidayah::prelude::*;
//!
//! let engine = QiblaEngine::new(QiblaConfig::default());
//! engine.set_origin(GeoPoint::new(51.5074, -0.1278).unwrap());
//! let needle = engine.on_heading_sample(90.0);
//! assert!((needle.degrees() - 28.99).abs() < 0.05);
//! ```

pub use hidayah_core::*;
