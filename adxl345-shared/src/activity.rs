use crate::registers::{ActTapStatus, InterruptSources};

/// Snapshot of the INT_SOURCE and ACT_TAP_STATUS registers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityFlags {
    pub overrun: bool,
    pub watermark: bool,
    pub free_fall: bool,
    pub inactivity: bool,
    pub activity: bool,
    pub activity_on_x: bool,
    pub activity_on_y: bool,
    pub activity_on_z: bool,
    pub double_tap: bool,
    pub tap: bool,
    pub tap_on_x: bool,
    pub tap_on_y: bool,
    pub tap_on_z: bool,
    pub data_ready: bool,
}

impl ActivityFlags {
    pub fn decode(int_source: u8, act_tap_status: u8) -> Self {
        let src = InterruptSources::from_bytes([int_source]);
        let status = ActTapStatus::from_bytes([act_tap_status]);

        ActivityFlags {
            overrun: src.overrun(),
            watermark: src.watermark(),
            free_fall: src.free_fall(),
            inactivity: src.inactivity(),
            activity: src.activity(),
            activity_on_x: status.act_x(),
            activity_on_y: status.act_y(),
            activity_on_z: status.act_z(),
            double_tap: src.double_tap(),
            tap: src.single_tap(),
            tap_on_x: status.tap_x(),
            tap_on_y: status.tap_y(),
            tap_on_z: status.tap_z(),
            data_ready: src.data_ready(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_nothing() {
        assert_eq!(ActivityFlags::decode(0, 0), ActivityFlags::default());
    }

    #[test]
    fn decode_int_source_bits() {
        let a = ActivityFlags::decode(0b1010_1010, 0);
        assert!(a.data_ready);
        assert!(!a.tap);
        assert!(a.double_tap);
        assert!(!a.activity);
        assert!(a.inactivity);
        assert!(!a.free_fall);
        assert!(a.watermark);
        assert!(!a.overrun);
    }

    #[test]
    fn decode_act_tap_status_bits() {
        let a = ActivityFlags::decode(0, 0b0101_1010);
        assert!(a.activity_on_x);
        assert!(!a.activity_on_y);
        assert!(a.activity_on_z);
        assert!(!a.tap_on_x);
        assert!(a.tap_on_y);
        assert!(!a.tap_on_z);
        // Asleep (bit 3) has no flag of its own
        assert_eq!(ActivityFlags::decode(0, 0b0000_1000), ActivityFlags::default());
    }
}
