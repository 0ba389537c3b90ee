use modular_bitfield::BitfieldSpecifier;

/// Measurement range, DATA_FORMAT bits 0-1.
#[derive(BitfieldSpecifier, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[bits = 2]
pub enum Range {
    G2 = 0b00,
    G4 = 0b01,
    G8 = 0b10,
    G16 = 0b11,
}

impl Range {
    pub const ALL: [Range; 4] = [Range::G2, Range::G4, Range::G8, Range::G16];

    pub fn full_scale_g(self) -> f32 {
        match self {
            Range::G2 => 2.0,
            Range::G4 => 4.0,
            Range::G8 => 8.0,
            Range::G16 => 16.0,
        }
    }
}

/// Output data rate, BW_RATE bits 0-3.
#[derive(BitfieldSpecifier, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[bits = 4]
pub enum DataRate {
    Hz0_10 = 0b0000,
    Hz0_20 = 0b0001,
    Hz0_39 = 0b0010,
    Hz0_78 = 0b0011,
    Hz1_56 = 0b0100,
    Hz3_13 = 0b0101,
    Hz6_25 = 0b0110,
    Hz12_5 = 0b0111,
    Hz25 = 0b1000,
    Hz50 = 0b1001,
    Hz100 = 0b1010,
    Hz200 = 0b1011,
    Hz400 = 0b1100,
    Hz800 = 0b1101,
    Hz1600 = 0b1110,
    Hz3200 = 0b1111,
}

impl DataRate {
    pub const ALL: [DataRate; 16] = [
        DataRate::Hz0_10,
        DataRate::Hz0_20,
        DataRate::Hz0_39,
        DataRate::Hz0_78,
        DataRate::Hz1_56,
        DataRate::Hz3_13,
        DataRate::Hz6_25,
        DataRate::Hz12_5,
        DataRate::Hz25,
        DataRate::Hz50,
        DataRate::Hz100,
        DataRate::Hz200,
        DataRate::Hz400,
        DataRate::Hz800,
        DataRate::Hz1600,
        DataRate::Hz3200,
    ];

    /// Nominal rate; the codes are a doubling series anchored at 3200 Hz.
    ///
    /// Returns the exact 3200 / 2^n value, so the low rates differ from the
    /// rounded datasheet labels (0.10 Hz is 0.0977 here).
    pub fn hz(self) -> f32 {
        let steps_below_max = 0b1111 - self as i32;
        3200.0 / (1u32 << steps_below_max) as f32
    }
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptPin {
    Int1 = 0,
    Int2 = 1,
}
