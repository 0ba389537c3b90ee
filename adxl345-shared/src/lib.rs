#![cfg_attr(not(test), no_std)]

pub mod activity;
pub mod registers;
pub mod scale;
pub mod settings;
pub mod vector;

pub use activity::ActivityFlags;
pub use registers::{Field, Register};
pub use settings::{DataRate, InterruptPin, Range};
pub use vector::{Reading, Vector};

/// Gravity factors for [`crate::Vector::scaled`] readings, in m/s^2.
pub mod gravity {
    pub const SUN: f32 = 273.95;
    pub const EARTH: f32 = 9.80665;
    pub const MOON: f32 = 1.622;
    pub const MARS: f32 = 3.69;
    pub const NONE: f32 = 1.0;
}
