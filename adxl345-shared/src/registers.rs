//! ADXL345 register map and bit layouts.
//!
//! Reference: <https://www.analog.com/media/en/technical-documentation/data-sheets/ADXL345.pdf>

use modular_bitfield::prelude::*;

use crate::settings::{DataRate, Range};

/// Bus address with the ALT ADDRESS pin tied low.
pub const ADDR_PRIMARY: u8 = 0x53;
/// Bus address with the ALT ADDRESS pin tied high.
pub const ADDR_ALTERNATE: u8 = 0x1d;

pub const DEVICE_ID: u8 = 0xe5;

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    DevId = 0x00,
    // 0x01-0x1c reserved
    ThreshTap = 0x1d,
    OfsX = 0x1e,
    OfsY = 0x1f,
    OfsZ = 0x20,
    Dur = 0x21,
    Latent = 0x22,
    Window = 0x23,
    ThreshAct = 0x24,
    ThreshInact = 0x25,
    TimeInact = 0x26,
    ActInactCtl = 0x27,
    ThreshFf = 0x28,
    TimeFf = 0x29,
    TapAxes = 0x2a,
    ActTapStatus = 0x2b,
    BwRate = 0x2c,
    PowerCtl = 0x2d,
    IntEnable = 0x2e,
    IntMap = 0x2f,
    IntSource = 0x30,
    DataFormat = 0x31,
    DataX0 = 0x32,
    DataX1 = 0x33,
    DataY0 = 0x34,
    DataY1 = 0x35,
    DataZ0 = 0x36,
    DataZ1 = 0x37,
    FifoCtl = 0x38,
    FifoStatus = 0x39,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Register::DevId
                | Register::ActTapStatus
                | Register::IntSource
                | Register::DataX0
                | Register::DataX1
                | Register::DataY0
                | Register::DataY1
                | Register::DataZ0
                | Register::DataZ1
                | Register::FifoStatus
        )
    }
}

/// A contiguous run of `width` bits starting at bit `shift` of `reg`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub reg: Register,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(reg: Register, shift: u8, width: u8) -> Self {
        Field { reg, shift, width }
    }

    pub const fn bit(reg: Register, pos: u8) -> Self {
        Field::new(reg, pos, 1)
    }

    pub const fn mask(self) -> u8 {
        (((1u16 << self.width) - 1) << self.shift) as u8
    }

    pub const fn extract(self, byte: u8) -> u8 {
        (byte & self.mask()) >> self.shift
    }

    /// Replaces the field in `byte` with `value`; bits outside the field are kept.
    pub const fn insert(self, byte: u8, value: u8) -> u8 {
        (byte & !self.mask()) | ((value << self.shift) & self.mask())
    }

    /// Sets or clears every bit of the field.
    pub const fn fill(self, byte: u8, state: bool) -> u8 {
        if state {
            byte | self.mask()
        } else {
            byte & !self.mask()
        }
    }
}

pub mod fields {
    use super::{Field, Register};

    pub const ACT_X: Field = Field::bit(Register::ActInactCtl, 6);
    pub const ACT_Y: Field = Field::bit(Register::ActInactCtl, 5);
    pub const ACT_Z: Field = Field::bit(Register::ActInactCtl, 4);
    /// Group toggled by the all-axes activity switch. Note this is bits 3-5,
    /// overlapping INACT_AC/DC and missing ACT_X.
    pub const ACT_XYZ: Field = Field::new(Register::ActInactCtl, 3, 3);
    /// The three activity enables proper (bits 4-6).
    pub const ACT_AXES: Field = Field::new(Register::ActInactCtl, 4, 3);

    pub const INACT_X: Field = Field::bit(Register::ActInactCtl, 2);
    pub const INACT_Y: Field = Field::bit(Register::ActInactCtl, 1);
    pub const INACT_Z: Field = Field::bit(Register::ActInactCtl, 0);
    pub const INACT_XYZ: Field = Field::new(Register::ActInactCtl, 0, 3);

    pub const TAP_X: Field = Field::bit(Register::TapAxes, 2);
    pub const TAP_Y: Field = Field::bit(Register::TapAxes, 1);
    pub const TAP_Z: Field = Field::bit(Register::TapAxes, 0);
    pub const TAP_XYZ: Field = Field::new(Register::TapAxes, 0, 3);
}

#[bitfield]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataFormat {
    pub range: Range,
    pub justify: bool,
    pub full_res: bool,
    #[skip]
    __: B1,
    pub int_invert: bool,
    pub spi: bool,
    pub self_test: bool,
}

#[bitfield]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BwRate {
    pub rate: DataRate,
    pub low_power: bool,
    #[skip]
    __: B3,
}

#[bitfield]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PowerCtl {
    pub wakeup: B2,
    pub sleep: bool,
    pub measure: bool,
    pub auto_sleep: bool,
    pub link: bool,
    #[skip]
    __: B2,
}

/// Shared layout of INT_ENABLE, INT_MAP and INT_SOURCE.
#[bitfield]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterruptSources {
    pub overrun: bool,
    pub watermark: bool,
    pub free_fall: bool,
    pub inactivity: bool,
    pub activity: bool,
    pub double_tap: bool,
    pub single_tap: bool,
    pub data_ready: bool,
}

impl InterruptSources {
    pub fn all() -> Self {
        Self::from_bytes([0xff])
    }

    pub fn none() -> Self {
        Self::new()
    }

    /// Sources the device clears when INT_SOURCE is read.
    pub fn latched() -> Self {
        Self::new()
            .with_free_fall(true)
            .with_inactivity(true)
            .with_activity(true)
            .with_double_tap(true)
            .with_single_tap(true)
    }
}

#[bitfield]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActTapStatus {
    pub tap_z: bool,
    pub tap_y: bool,
    pub tap_x: bool,
    pub asleep: bool,
    pub act_z: bool,
    pub act_y: bool,
    pub act_x: bool,
    #[skip]
    __: B1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_masks() {
        assert_eq!(fields::ACT_X.mask(), 0b0100_0000);
        assert_eq!(fields::ACT_XYZ.mask(), 0b0011_1000);
        assert_eq!(fields::ACT_AXES.mask(), 0b0111_0000);
        assert_eq!(fields::INACT_XYZ.mask(), 0b0000_0111);
        assert_eq!(fields::TAP_XYZ.mask(), 0b0000_0111);
        assert_eq!(Field::new(Register::DataFormat, 0, 8).mask(), 0xff);
    }

    #[test]
    fn field_insert_keeps_neighbours() {
        let f = Field::new(Register::BwRate, 2, 3);
        assert_eq!(f.insert(0xff, 0b000), 0b1110_0011);
        assert_eq!(f.insert(0x00, 0b101), 0b0001_0100);
        // Values wider than the field are truncated
        assert_eq!(f.insert(0x00, 0xff), 0b0001_1100);
        assert_eq!(f.extract(0b0001_0100), 0b101);
    }

    #[test]
    fn field_fill() {
        assert_eq!(fields::TAP_XYZ.fill(0b1010_1010, true), 0b1010_1111);
        assert_eq!(fields::TAP_XYZ.fill(0b1010_1010, false), 0b1010_1000);
        assert_eq!(fields::ACT_X.fill(0, true), 0b0100_0000);
    }

    #[test]
    fn data_format_layout() {
        let f = DataFormat::new().with_range(Range::G16).with_full_res(true);
        assert_eq!(f.into_bytes(), [0b0000_1011]);

        let f = DataFormat::from_bytes([0b1111_0110]);
        assert_eq!(f.range(), Range::G8);
        assert!(f.justify());
        assert!(!f.full_res());
        assert!(f.self_test());
        // Reserved bit survives a rewrite of the other fields
        assert_eq!(f.with_range(Range::G2).into_bytes(), [0b1111_0100]);
    }

    #[test]
    fn bw_rate_and_power_ctl_layout() {
        assert_eq!(BwRate::new().with_rate(DataRate::Hz100).into_bytes(), [0x0a]);
        assert_eq!(BwRate::from_bytes([0x1f]).rate(), DataRate::Hz3200);
        assert_eq!(PowerCtl::new().with_measure(true).into_bytes(), [0x08]);
    }

    #[test]
    fn interrupt_sources_layout() {
        assert_eq!(InterruptSources::all().into_bytes(), [0xff]);
        assert_eq!(InterruptSources::none().into_bytes(), [0x00]);
        assert_eq!(InterruptSources::latched().into_bytes(), [0b0111_1100]);
        let s = InterruptSources::from_bytes([0b1000_0001]);
        assert!(s.data_ready() && s.overrun() && !s.single_tap());
    }

    #[test]
    fn register_addresses() {
        assert_eq!(Register::ThreshTap.addr(), 0x1d);
        assert_eq!(Register::DataFormat.addr(), 0x31);
        assert_eq!(Register::try_from(0x39u8).unwrap(), Register::FifoStatus);
        assert!(Register::try_from(0x10u8).is_err());
        assert!(Register::IntSource.is_read_only());
        assert!(!Register::PowerCtl.is_read_only());
    }
}
