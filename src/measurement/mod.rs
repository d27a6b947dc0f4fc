//! Measured throughput values and their printable views.
mod bitrate;


pub use bitrate::{BitRate, RateUnitKind, bits_per_second};
