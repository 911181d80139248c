//! Simulated compass screen.
//!
//! A fake magnetometer sweeps a full turn while a fake GPS takes a moment to
//! resolve. Watch the needle jump once the bearing becomes known.
//!
//! ```text
//! RUST_LOG=debug cargo run -p hidayah --example qibla_compass -- -6.2088 106.8456
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hidayah::prelude::*;
use hidayah::{LocationError, qibla_bearing};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// GPS that answers after a delay.
struct SlowGps {
    fix: GeoPoint,
    delay: Duration,
}

impl LocationProvider for SlowGps {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.fix)
    }
}

fn parse_position() -> Result<GeoPoint> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (lat, lng) = match args.as_slice() {
        [] => (40.7128, -74.0060),
        [lat, lng] => (
            lat.parse().context("latitude is not a number")?,
            lng.parse().context("longitude is not a number")?,
        ),
        _ => anyhow::bail!("usage: qibla_compass [LAT LNG]"),
    };
    Ok(GeoPoint::new(lat, lng)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let position = parse_position()?;
    info!(%position, bearing = %qibla_bearing(position), "expected qibla");

    let config = QiblaConfig::default().sample_interval(Duration::from_millis(100));
    let compass = Arc::new(MagnetometerSource::new(config.interval()));
    let mut session = QiblaSession::start(
        config,
        compass.clone(),
        SlowGps { fix: position, delay: Duration::from_millis(900) },
    )?;

    let mut ticker = tokio::time::interval(Duration::from_millis(120));
    for step in 0..24 {
        ticker.tick().await;
        let heading = (step as f64 * 15.0).to_radians();
        compass.publish_reading(heading.cos(), heading.sin());

        let Some(needle) = session.needle() else {
            println!("needle hidden until the location resolves");
            continue;
        };
        let bearing = needle
            .bearing
            .map_or_else(|| "unknown".to_string(), |b| b.to_string());
        println!(
            "heading {:>6}  bearing {:>7}  needle {:>6}",
            needle.heading.to_string(),
            bearing,
            needle.angle.to_string()
        );
    }

    info!(location = ?session.location(), "sweep finished");
    session.stop();
    Ok(())
}
