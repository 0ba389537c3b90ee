use adxl345_shared::registers::{Field, Register};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::{Config, Error, Result};

/// Register level access to one device.
///
/// Every call is a blocking bus transaction. Reads wait for the device to
/// acknowledge for at most the configured response timeout.
pub(crate) struct Bus<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    response_timeout_us: u32,
    poll_interval_us: u32,
}

impl<I2C: I2c, D: DelayNs> Bus<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: &Config) -> Self {
        Bus {
            i2c,
            delay,
            address: config.address,
            response_timeout_us: config.response_timeout_us,
            poll_interval_us: config.poll_interval_us,
        }
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), I2C::Error> {
        let wbuf = [reg.addr(), value];
        self.i2c.write(self.address, &wbuf).map_err(Error::Bus)
    }

    fn read_registers(&mut self, reg: Register, r_buf: &mut [u8]) -> Result<(), I2C::Error> {
        let wbuf = [reg.addr()];
        let mut waited_us = 0u32;

        loop {
            match self.i2c.write_read(self.address, &wbuf, r_buf) {
                Ok(()) => return Ok(()),
                Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => {
                    if waited_us >= self.response_timeout_us {
                        log::warn!("{:?} not responding after {} us", reg, waited_us);
                        return Err(Error::NotResponding);
                    }
                    let step = self
                        .poll_interval_us
                        .clamp(1, self.response_timeout_us - waited_us);
                    self.delay.delay_us(step);
                    waited_us += step;
                }
                Err(e) => return Err(Error::Bus(e)),
            }
        }
    }

    pub fn read_register(&mut self, reg: Register) -> Result<u8, I2C::Error> {
        let mut r_buf = [0u8];
        self.read_registers(reg, &mut r_buf)?;
        Ok(r_buf[0])
    }

    /// Single attempt read; a missing acknowledge is reported straight away.
    pub fn read_register_fast(&mut self, reg: Register) -> Result<u8, I2C::Error> {
        let mut r_buf = [0u8];
        match self.i2c.write_read(self.address, &[reg.addr()], &mut r_buf) {
            Ok(()) => Ok(r_buf[0]),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => {
                Err(Error::NotResponding)
            }
            Err(e) => Err(Error::Bus(e)),
        }
    }

    /// Little endian word starting at `reg`.
    pub fn read_word(&mut self, reg: Register) -> Result<i16, I2C::Error> {
        let mut r_buf = [0u8; 2];
        self.read_registers(reg, &mut r_buf)?;
        Ok(i16::from_le_bytes(r_buf))
    }

    pub fn modify_register(
        &mut self,
        reg: Register,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), I2C::Error> {
        let value = self.read_register(reg)?;
        self.write_register(reg, f(value))
    }

    pub fn read_field(&mut self, field: Field) -> Result<u8, I2C::Error> {
        Ok(field.extract(self.read_register(field.reg)?))
    }

    pub fn write_field(&mut self, field: Field, value: u8) -> Result<(), I2C::Error> {
        self.modify_register(field.reg, |v| field.insert(v, value))
    }

    pub fn read_bit(&mut self, field: Field) -> Result<bool, I2C::Error> {
        Ok(self.read_field(field)? != 0)
    }

    pub fn write_bit(&mut self, field: Field, state: bool) -> Result<(), I2C::Error> {
        self.write_field(field, state as u8)
    }

    /// Sets or clears all bits of a multi-bit field at once.
    pub fn fill_field(&mut self, field: Field, state: bool) -> Result<(), I2C::Error> {
        self.modify_register(field.reg, |v| field.fill(v, state))
    }
}
