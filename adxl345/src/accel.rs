use adxl345_shared::registers::{
    fields, BwRate, DataFormat, InterruptSources, PowerCtl, Register, DEVICE_ID,
};
use adxl345_shared::scale::{self, Scale, FULL_RES_G_PER_LSB};
use adxl345_shared::{ActivityFlags, DataRate, InterruptPin, Range, Reading, Vector};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use util::LowPassFilter;

use crate::bus::Bus;
use crate::{Config, Error, Result};

/// Registers zeroed by [`Adxl345::clear_settings`].
const DETECTION_REGISTERS: [Register; 9] = [
    Register::ThreshTap,
    Register::Dur,
    Register::Latent,
    Register::Window,
    Register::ThreshAct,
    Register::ThreshInact,
    Register::TimeInact,
    Register::ThreshFf,
    Register::TimeFf,
];

/// ADXL345 on an I2C bus.
///
/// The driver assumes exclusive access to the device: every operation takes
/// `&mut self`, and callers sharing one bus between several drivers must
/// serialize access themselves. The last raw, normalized and filtered vectors
/// and the last activity snapshot are kept on the instance.
pub struct Adxl345<I2C, D> {
    bus: Bus<I2C, D>,
    raw: Vector,
    normalized: Vector,
    filter: LowPassFilter,
    activities: ActivityFlags,
}

impl<I2C: I2c, D: DelayNs> Adxl345<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Adxl345 {
            bus: Bus::new(i2c, delay, &config),
            raw: Vector::ZERO,
            normalized: Vector::ZERO,
            filter: LowPassFilter::new(),
            activities: ActivityFlags::default(),
        }
    }

    pub fn release(self) -> (I2C, D) {
        self.bus.release()
    }

    /// Identifies the device, switches it to measurement mode and restores the
    /// default settings.
    ///
    /// Returns `Ok(false)` without touching the device configuration if the
    /// identification register does not read 0xE5 or nothing answers at the
    /// configured address.
    pub fn begin(&mut self) -> Result<bool, I2C::Error> {
        self.raw = Vector::ZERO;
        self.normalized = Vector::ZERO;
        self.filter.reset();

        let id = match self.bus.read_register_fast(Register::DevId) {
            Ok(id) => id,
            Err(Error::NotResponding) => {
                log::warn!("no device acknowledged identification");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if id != DEVICE_ID {
            log::warn!("unexpected device id {}", id);
            return Ok(false);
        }

        let power = PowerCtl::new().with_measure(true);
        self.bus
            .write_register(Register::PowerCtl, power.into_bytes()[0])?;
        log::debug!("measurement enabled");

        self.clear_settings()?;
        Ok(true)
    }

    /// Back to +-2 g at 100 Hz with every detection threshold, duration and
    /// axis enable cleared.
    pub fn clear_settings(&mut self) -> Result<(), I2C::Error> {
        self.set_range(Range::G2)?;
        self.set_data_rate(DataRate::Hz100)?;

        for reg in DETECTION_REGISTERS {
            self.bus.write_register(reg, 0x00)?;
        }

        self.bus.modify_register(Register::ActInactCtl, |v| {
            let v = fields::ACT_AXES.fill(v, false);
            fields::INACT_XYZ.fill(v, false)
        })?;
        self.bus.fill_field(fields::TAP_XYZ, false)?;

        log::debug!("settings cleared");
        Ok(())
    }

    /// Also forces full resolution mode and right justification.
    pub fn set_range(&mut self, range: Range) -> Result<(), I2C::Error> {
        self.bus.modify_register(Register::DataFormat, |v| {
            DataFormat::from_bytes([v])
                .with_range(range)
                .with_justify(false)
                .with_full_res(true)
                .into_bytes()[0]
        })?;
        log::debug!("range {:?}", range);
        Ok(())
    }

    pub fn range(&mut self) -> Result<Range, I2C::Error> {
        let v = self.bus.read_register(Register::DataFormat)?;
        Ok(DataFormat::from_bytes([v]).range())
    }

    /// Writes the whole BW_RATE register, which also leaves low power mode.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), I2C::Error> {
        let bw = BwRate::new().with_rate(rate);
        self.bus.write_register(Register::BwRate, bw.into_bytes()[0])?;
        log::debug!("data rate {:?}", rate);
        Ok(())
    }

    pub fn data_rate(&mut self) -> Result<DataRate, I2C::Error> {
        let v = self.bus.read_register(Register::BwRate)?;
        Ok(BwRate::from_bytes([v]).rate())
    }

    fn write_scaled(&mut self, reg: Register, scale: Scale, value: f32) -> Result<(), I2C::Error> {
        self.bus.write_register(reg, scale.to_register(value))
    }

    fn read_scaled_register(&mut self, reg: Register, scale: Scale) -> Result<f32, I2C::Error> {
        Ok(scale.from_register(self.bus.read_register(reg)?))
    }

    /// In g.
    pub fn set_tap_threshold(&mut self, threshold: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::ThreshTap, scale::THRESHOLD, threshold)
    }

    pub fn tap_threshold(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::ThreshTap, scale::THRESHOLD)
    }

    /// In seconds.
    pub fn set_tap_duration(&mut self, duration: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::Dur, scale::TAP_DURATION, duration)
    }

    pub fn tap_duration(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::Dur, scale::TAP_DURATION)
    }

    /// In seconds.
    pub fn set_double_tap_latency(&mut self, latency: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::Latent, scale::TAP_LATENCY, latency)
    }

    pub fn double_tap_latency(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::Latent, scale::TAP_LATENCY)
    }

    /// In seconds.
    pub fn set_double_tap_window(&mut self, window: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::Window, scale::TAP_LATENCY, window)
    }

    pub fn double_tap_window(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::Window, scale::TAP_LATENCY)
    }

    pub fn set_activity_threshold(&mut self, threshold: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::ThreshAct, scale::THRESHOLD, threshold)
    }

    pub fn activity_threshold(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::ThreshAct, scale::THRESHOLD)
    }

    pub fn set_inactivity_threshold(&mut self, threshold: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::ThreshInact, scale::THRESHOLD, threshold)
    }

    pub fn inactivity_threshold(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::ThreshInact, scale::THRESHOLD)
    }

    /// Whole seconds, stored as is.
    pub fn set_time_inactivity(&mut self, seconds: u8) -> Result<(), I2C::Error> {
        self.bus.write_register(Register::TimeInact, seconds)
    }

    pub fn time_inactivity(&mut self) -> Result<u8, I2C::Error> {
        self.bus.read_register(Register::TimeInact)
    }

    pub fn set_free_fall_threshold(&mut self, threshold: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::ThreshFf, scale::THRESHOLD, threshold)
    }

    pub fn free_fall_threshold(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::ThreshFf, scale::THRESHOLD)
    }

    /// In seconds.
    pub fn set_free_fall_duration(&mut self, duration: f32) -> Result<(), I2C::Error> {
        self.write_scaled(Register::TimeFf, scale::FREE_FALL_DURATION, duration)
    }

    pub fn free_fall_duration(&mut self) -> Result<f32, I2C::Error> {
        self.read_scaled_register(Register::TimeFf, scale::FREE_FALL_DURATION)
    }

    /// Per-axis offset in g, added by the device to every sample.
    pub fn set_offset(&mut self, offset: Vector) -> Result<(), I2C::Error> {
        let regs = [
            (Register::OfsX, offset.x),
            (Register::OfsY, offset.y),
            (Register::OfsZ, offset.z),
        ];
        for (reg, g) in regs {
            let counts = scale::OFFSET.to_signed_register(g);
            self.bus.write_register(reg, counts as u8)?;
        }
        Ok(())
    }

    pub fn offset(&mut self) -> Result<Vector, I2C::Error> {
        let mut read = |reg| -> Result<f32, I2C::Error> {
            let counts = self.bus.read_register(reg)? as i8;
            Ok(scale::OFFSET.from_signed_register(counts))
        };
        Ok(Vector::new(
            read(Register::OfsX)?,
            read(Register::OfsY)?,
            read(Register::OfsZ)?,
        ))
    }

    pub fn set_activity_x(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::ACT_X, state)
    }

    pub fn activity_x(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::ACT_X)
    }

    pub fn set_activity_y(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::ACT_Y, state)
    }

    pub fn activity_y(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::ACT_Y)
    }

    pub fn set_activity_z(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::ACT_Z, state)
    }

    pub fn activity_z(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::ACT_Z)
    }

    /// Switches bits 3-5 of ACT_INACT_CTL together. This group is offset by one
    /// from the single axis enables.
    pub fn set_activity_xyz(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.fill_field(fields::ACT_XYZ, state)
    }

    pub fn set_inactivity_x(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::INACT_X, state)
    }

    pub fn inactivity_x(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::INACT_X)
    }

    pub fn set_inactivity_y(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::INACT_Y, state)
    }

    pub fn inactivity_y(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::INACT_Y)
    }

    pub fn set_inactivity_z(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::INACT_Z, state)
    }

    pub fn inactivity_z(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::INACT_Z)
    }

    pub fn set_inactivity_xyz(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.fill_field(fields::INACT_XYZ, state)
    }

    pub fn set_tap_detection_x(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::TAP_X, state)
    }

    pub fn tap_detection_x(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::TAP_X)
    }

    pub fn set_tap_detection_y(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::TAP_Y, state)
    }

    pub fn tap_detection_y(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::TAP_Y)
    }

    pub fn set_tap_detection_z(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.write_bit(fields::TAP_Z, state)
    }

    pub fn tap_detection_z(&mut self) -> Result<bool, I2C::Error> {
        self.bus.read_bit(fields::TAP_Z)
    }

    pub fn set_tap_detection_xyz(&mut self, state: bool) -> Result<(), I2C::Error> {
        self.bus.fill_field(fields::TAP_XYZ, state)
    }

    /// Routes every interrupt source to `pin` and enables all of them.
    /// Individual sources cannot be routed to different pins.
    pub fn use_interrupt(&mut self, pin: InterruptPin) -> Result<(), I2C::Error> {
        let map = match pin {
            InterruptPin::Int1 => InterruptSources::none(),
            InterruptPin::Int2 => InterruptSources::all(),
        };
        self.bus
            .write_register(Register::IntMap, map.into_bytes()[0])?;
        self.bus
            .write_register(Register::IntEnable, InterruptSources::all().into_bytes()[0])
    }

    /// Raw counts, one word read per axis.
    pub fn read_raw(&mut self) -> Result<Vector, I2C::Error> {
        let reading = Reading {
            x: self.bus.read_word(Register::DataX0)?,
            y: self.bus.read_word(Register::DataY0)?,
            z: self.bus.read_word(Register::DataZ0)?,
        };
        self.raw = reading.into();
        Ok(self.raw)
    }

    /// Acceleration in units of `gravity`; pass [`gravity::EARTH`] for m/s^2.
    ///
    /// Assumes full resolution mode, which [`set_range`](Self::set_range)
    /// always selects.
    ///
    /// [`gravity::EARTH`]: adxl345_shared::gravity::EARTH
    pub fn read_normalized(&mut self, gravity: f32) -> Result<Vector, I2C::Error> {
        let raw = self.read_raw()?;
        self.normalized = raw.scaled(FULL_RES_G_PER_LSB).scaled(gravity);
        Ok(self.normalized)
    }

    /// Acceleration in g.
    pub fn read_scaled(&mut self) -> Result<Vector, I2C::Error> {
        let raw = self.read_raw()?;
        self.normalized = raw.scaled(FULL_RES_G_PER_LSB);
        Ok(self.normalized)
    }

    pub fn low_pass_filter(&mut self, sample: Vector, alpha: f32) -> Vector {
        self.filter.apply(sample, alpha)
    }

    /// Reads INT_SOURCE and ACT_TAP_STATUS. Reading INT_SOURCE clears the
    /// latched event bits on the device.
    pub fn read_activities(&mut self) -> Result<ActivityFlags, I2C::Error> {
        let int_source = self.bus.read_register(Register::IntSource)?;
        let act_tap_status = self.bus.read_register(Register::ActTapStatus)?;
        self.activities = ActivityFlags::decode(int_source, act_tap_status);
        Ok(self.activities)
    }

    pub fn raw(&self) -> Vector {
        self.raw
    }

    pub fn normalized(&self) -> Vector {
        self.normalized
    }

    pub fn filtered(&self) -> Vector {
        self.filter.state()
    }

    pub fn activities(&self) -> ActivityFlags {
        self.activities
    }
}
