//! Qibla bearing engine.
//!
//! Computes the great-circle bearing from the user's position to the Kaaba
//! and keeps a needle angle in step with the device compass.
//!
//! ## Modules
//!
//! - `bearing`: pure bearing math
//! - `engine`: [`QiblaEngine`], the single-writer needle state
//! - `heading`: heading sources and RAII subscriptions
//! - `config`: [`QiblaConfig`]

pub mod bearing;
pub mod config;
pub mod engine;
pub mod heading;

pub use bearing::{compute_bearing, qibla_bearing};
pub use config::{QiblaConfig, UnresolvedBearing};
pub use engine::{EnginePhase, NeedleReading, QiblaEngine};
pub use heading::{
    HeadingCallback, HeadingSource, HeadingSourceKind, HeadingSubscription, ListenerRegistry,
    MagnetometerSource, OrientationSource, Platform, RawHeading, SubscriptionId,
    select_heading_source,
};
