/// Linear conversion between a physical quantity and an 8-bit register count.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scale {
    lsb: f32,
}

/// THRESH_TAP, THRESH_ACT, THRESH_INACT, THRESH_FF: 62.5 mg/LSB
pub const THRESHOLD: Scale = Scale::new(0.0625);
/// DUR: 625 us/LSB
pub const TAP_DURATION: Scale = Scale::new(0.000_625);
/// LATENT, WINDOW: 1.25 ms/LSB
pub const TAP_LATENCY: Scale = Scale::new(0.001_25);
/// TIME_FF: 5 ms/LSB
pub const FREE_FALL_DURATION: Scale = Scale::new(0.005);
/// OFSX, OFSY, OFSZ: 15.6 mg/LSB, two's complement
pub const OFFSET: Scale = Scale::new(0.015_6);

/// Acceleration per data count in full resolution mode, independent of range.
pub const FULL_RES_G_PER_LSB: f32 = 0.004;

impl Scale {
    pub const fn new(lsb: f32) -> Self {
        Scale { lsb }
    }

    pub const fn lsb(self) -> f32 {
        self.lsb
    }

    pub fn to_register(self, value: f32) -> u8 {
        // NaN saturates to 0 in the cast
        libm::roundf(value / self.lsb).clamp(0.0, 255.0) as u8
    }

    pub fn from_register(self, raw: u8) -> f32 {
        raw as f32 * self.lsb
    }

    pub fn to_signed_register(self, value: f32) -> i8 {
        libm::roundf(value / self.lsb).clamp(-128.0, 127.0) as i8
    }

    pub fn from_signed_register(self, raw: i8) -> f32 {
        raw as f32 * self.lsb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn one_g_is_sixteen_counts() {
        assert_eq!(THRESHOLD.to_register(1.0), 16);
        assert_close(THRESHOLD.from_register(16), 1.0);
    }

    #[test]
    fn every_scale_maps_sixteen_counts() {
        for scale in [THRESHOLD, TAP_DURATION, TAP_LATENCY, FREE_FALL_DURATION] {
            let value = 16.0 * scale.lsb();
            assert_eq!(scale.to_register(value), 16);
            assert_close(scale.from_register(16), value);
        }
    }

    #[test]
    fn clamps_to_register_range() {
        assert_eq!(THRESHOLD.to_register(100.0), 255);
        assert_eq!(THRESHOLD.to_register(-1.0), 0);
        assert_eq!(THRESHOLD.to_register(f32::NAN), 0);
        assert_eq!(TAP_DURATION.to_register(f32::INFINITY), 255);
    }

    #[test]
    fn rounds_to_nearest_count() {
        assert_eq!(THRESHOLD.to_register(0.09), 1);
        assert_eq!(THRESHOLD.to_register(0.1), 2);
    }

    #[test]
    fn signed_offsets() {
        assert_eq!(OFFSET.to_signed_register(0.156), 10);
        assert_eq!(OFFSET.to_signed_register(-0.156), -10);
        assert_eq!(OFFSET.to_signed_register(10.0), 127);
        assert_eq!(OFFSET.to_signed_register(-10.0), -128);
        assert_close(OFFSET.from_signed_register(-10), -0.156);
    }
}
