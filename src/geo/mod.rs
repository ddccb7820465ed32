//! Startup geo report.
//!
//! Logs how far each backend is from the balancer. Purely informational:
//! routing never consults it, and any lookup failure is logged and skipped.

pub mod distance;
pub mod locate;

use url::Url;

pub use distance::{haversine_km, Coordinates, DistanceClass};
pub use locate::{GeoError, GeoLocator};

/// Locate this host and every backend, then log the distances.
pub async fn report(backends: Vec<Url>) {
    let locator = match GeoLocator::new() {
        Ok(l) => l,
        Err(e) => {
            tracing::warn!(error = %e, "Geo report disabled");
            return;
        }
    };
    report_with(&locator, &backends).await;
}

/// Same as [`report`] with an explicit locator.
pub async fn report_with(locator: &GeoLocator, backends: &[Url]) {
    let public_ip = match locator.public_ip().await {
        Ok(ip) => ip,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to get public IP");
            return;
        }
    };
    let origin = match locator.coordinates(&public_ip).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(public_ip = %public_ip, error = %e, "Failed to locate load balancer");
            return;
        }
    };
    tracing::info!(
        public_ip = %public_ip,
        latitude = origin.latitude,
        longitude = origin.longitude,
        "Load balancer location"
    );

    for backend in backends {
        let Some(host) = backend.host_str() else {
            continue;
        };
        match locator.coordinates(host).await {
            Ok(location) => {
                let km = haversine_km(origin, location);
                tracing::info!(
                    backend = %backend,
                    latitude = location.latitude,
                    longitude = location.longitude,
                    distance_km = %format!("{:.2}", km),
                    class = %DistanceClass::from_km(km),
                    "Backend location"
                );
            }
            Err(e) => {
                tracing::warn!(backend = %backend, error = %e, "Failed to locate backend");
            }
        }
    }
}
