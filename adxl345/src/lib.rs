//! Driver for the ADXL345 three-axis accelerometer over I2C.
//!
//! ```ignore
//! let mut accel = Adxl345::new(i2c, delay, Config::new());
//! if accel.begin()? {
//!     accel.set_range(Range::G4)?;
//!     let a = accel.read_normalized(gravity::EARTH)?;
//!     let smooth = accel.low_pass_filter(a, DEFAULT_ALPHA);
//! }
//! ```
#![cfg_attr(not(test), no_std)]

mod accel;
mod bus;
mod config;
mod error;

pub use accel::Adxl345;
pub use config::Config;
pub use error::{Error, Result};

pub use adxl345_shared::registers::{ADDR_ALTERNATE, ADDR_PRIMARY};
pub use adxl345_shared::{gravity, ActivityFlags, DataRate, InterruptPin, Range, Vector};
pub use util::DEFAULT_ALPHA;
