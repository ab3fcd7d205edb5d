pub mod linear;
pub mod source;
pub mod types;

#[cfg(feature = "swiss-ephemeris")]
pub mod adapter;

#[cfg(feature = "swiss-ephemeris")]
pub use adapter::SwissEphemerisAdapter;
pub use linear::{BodyMotion, LinearMotionSource};
pub use source::{snapshot, EphemerisError, PositionSource};
pub use types::{
    normalize_degrees, Body, CelestialPosition, GeoLocation, NatalChart, RawPosition,
    SkySnapshot, UnknownBody,
};
