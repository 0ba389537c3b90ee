use adxl345_shared::registers::ADDR_PRIMARY;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit bus address, [`ADDR_PRIMARY`] or
    /// [`ADDR_ALTERNATE`](adxl345_shared::registers::ADDR_ALTERNATE).
    pub address: u8,
    /// How long a register read keeps waiting for the device to acknowledge
    /// before giving up with [`Error::NotResponding`](crate::Error::NotResponding).
    /// Zero means a single attempt.
    pub response_timeout_us: u32,
    pub poll_interval_us: u32,
}

impl Config {
    pub fn new() -> Self {
        Config {
            address: ADDR_PRIMARY,
            response_timeout_us: 10_000,
            poll_interval_us: 100,
        }
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_response_timeout_us(mut self, timeout: u32) -> Self {
        self.response_timeout_us = timeout;
        self
    }

    pub fn with_poll_interval_us(mut self, interval: u32) -> Self {
        self.poll_interval_us = interval;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
