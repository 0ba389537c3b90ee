//! In-memory stand-in for an ADXL345 on the I2C bus.
//!
//! The device is a plain register file: a write selects a register and stores
//! any following bytes with auto-increment, a read returns bytes from the
//! selected register onwards. Read-only registers ignore writes, and the
//! event bits of INT_SOURCE clear when it is read, as on the real part.

use std::fmt;

use adxl345_shared::registers::{InterruptSources, Register, ADDR_PRIMARY, DEVICE_ID};
use adxl345_shared::Reading;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation, SevenBitAddress};

const NUM_REGISTERS: usize = 0x40;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    Nack(NoAcknowledgeSource),
    ArbitrationLoss,
}

impl i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        match *self {
            SimError::Nack(source) => ErrorKind::NoAcknowledge(source),
            SimError::ArbitrationLoss => ErrorKind::ArbitrationLoss,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Nack(source) => write!(f, "no acknowledge ({:?})", source),
            SimError::ArbitrationLoss => write!(f, "arbitration lost"),
        }
    }
}

impl std::error::Error for SimError {}

pub struct SimulatedAdxl345 {
    address: u8,
    registers: [u8; NUM_REGISTERS],
    pointer: u8,
    connected: bool,
    pending_nacks: u32,
    injected: Option<SimError>,
    transactions: usize,
    writes: Vec<(u8, u8)>,
}

impl Default for SimulatedAdxl345 {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedAdxl345 {
    /// A freshly powered device at the primary address, registers at their
    /// documented reset values.
    pub fn new() -> Self {
        let mut registers = [0u8; NUM_REGISTERS];
        registers[Register::DevId.addr() as usize] = DEVICE_ID;
        registers[Register::BwRate.addr() as usize] = 0x0a;
        registers[Register::IntSource.addr() as usize] = 0x02;

        Self {
            address: ADDR_PRIMARY,
            registers,
            pointer: 0,
            connected: true,
            pending_nacks: 0,
            injected: None,
            transactions: 0,
            writes: Vec::new(),
        }
    }

    pub fn at_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_device_id(mut self, id: u8) -> Self {
        self.set_register(Register::DevId, id);
        self
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.registers[reg.addr() as usize]
    }

    /// Sets a register directly, bypassing the bus and the read-only check.
    pub fn set_register(&mut self, reg: Register, value: u8) {
        self.registers[reg.addr() as usize] = value;
    }

    pub fn set_reading(&mut self, reading: Reading) {
        let words = [
            (Register::DataX0, reading.x),
            (Register::DataY0, reading.y),
            (Register::DataZ0, reading.z),
        ];
        for (reg, value) in words {
            let [lo, hi] = value.to_le_bytes();
            let addr = reg.addr() as usize;
            self.registers[addr] = lo;
            self.registers[addr + 1] = hi;
        }
    }

    pub fn registers(&self) -> [u8; NUM_REGISTERS] {
        self.registers
    }

    /// Refuse the next `n` transactions as if the device were busy.
    pub fn nack_next(&mut self, n: u32) {
        self.pending_nacks = n;
    }

    pub fn fail_next(&mut self, err: SimError) {
        self.injected = Some(err);
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    /// Register writes accepted over the bus, in order.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub fn writes_to(&self, reg: Register) -> usize {
        self.writes.iter().filter(|(r, _)| *r == reg.addr()).count()
    }

    /// Number of transactions attempted, including refused ones.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    fn store(&mut self, addr: u8, value: u8) {
        match Register::try_from(addr) {
            Ok(reg) if !reg.is_read_only() => {
                self.registers[addr as usize] = value;
                self.writes.push((addr, value));
            }
            _ => {}
        }
    }

    fn load(&mut self, addr: u8) -> u8 {
        let value = self.registers.get(addr as usize).copied().unwrap_or(0);
        if addr == Register::IntSource.addr() {
            let latched = InterruptSources::latched().into_bytes()[0];
            self.registers[addr as usize] = value & !latched;
        }
        value
    }
}

impl i2c::ErrorType for SimulatedAdxl345 {
    type Error = SimError;
}

impl i2c::I2c<SevenBitAddress> for SimulatedAdxl345 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;

        if address != self.address || !self.connected {
            return Err(SimError::Nack(NoAcknowledgeSource::Address));
        }
        if let Some(err) = self.injected.take() {
            return Err(err);
        }
        if self.pending_nacks > 0 {
            self.pending_nacks -= 1;
            return Err(SimError::Nack(NoAcknowledgeSource::Address));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, payload)) = bytes.split_first() {
                        self.pointer = reg;
                        for &b in payload {
                            self.store(self.pointer, b);
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.load(self.pointer);
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately and only keeps count of the time requested.
#[derive(Debug, Default)]
pub struct SimDelay {
    elapsed_ns: u64,
}

impl SimDelay {
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += ns as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::I2c;

    #[test]
    fn write_then_read_back() {
        let mut sim = SimulatedAdxl345::new();
        sim.write(ADDR_PRIMARY, &[Register::ThreshTap.addr(), 0x10])
            .unwrap();

        let mut buf = [0];
        sim.write_read(ADDR_PRIMARY, &[Register::ThreshTap.addr()], &mut buf)
            .unwrap();
        assert_eq!(buf, [0x10]);
        assert_eq!(sim.writes(), &[(0x1d, 0x10)]);
    }

    #[test]
    fn reads_auto_increment() {
        let mut sim = SimulatedAdxl345::new();
        sim.set_reading(Reading { x: 250, y: -2, z: 1 });

        let mut buf = [0; 6];
        sim.write_read(ADDR_PRIMARY, &[Register::DataX0.addr()], &mut buf)
            .unwrap();
        assert_eq!(buf, [0xfa, 0x00, 0xfe, 0xff, 0x01, 0x00]);
    }

    #[test]
    fn read_only_registers_ignore_writes() {
        let mut sim = SimulatedAdxl345::new();
        sim.write(ADDR_PRIMARY, &[Register::DevId.addr(), 0x00])
            .unwrap();
        assert_eq!(sim.register(Register::DevId), DEVICE_ID);
        assert!(sim.writes().is_empty());
    }

    #[test]
    fn int_source_events_clear_on_read() {
        let mut sim = SimulatedAdxl345::new();
        sim.set_register(Register::IntSource, 0b1100_0011);

        let mut buf = [0];
        sim.write_read(ADDR_PRIMARY, &[Register::IntSource.addr()], &mut buf)
            .unwrap();
        assert_eq!(buf, [0b1100_0011]);
        assert_eq!(sim.register(Register::IntSource), 0b1000_0011);
    }

    #[test]
    fn wrong_address_and_injected_errors() {
        let mut sim = SimulatedAdxl345::new();
        let mut buf = [0];
        assert_eq!(
            sim.write_read(0x1d, &[0], &mut buf),
            Err(SimError::Nack(NoAcknowledgeSource::Address))
        );

        sim.nack_next(1);
        assert!(sim.write_read(ADDR_PRIMARY, &[0], &mut buf).is_err());
        assert!(sim.write_read(ADDR_PRIMARY, &[0], &mut buf).is_ok());

        sim.fail_next(SimError::ArbitrationLoss);
        assert_eq!(
            sim.write(ADDR_PRIMARY, &[0x1d, 1]),
            Err(SimError::ArbitrationLoss)
        );
        assert_eq!(sim.transactions(), 4);
    }

    #[test]
    fn delay_accumulates() {
        let mut delay = SimDelay::default();
        delay.delay_us(100);
        delay.delay_ms(2);
        assert_eq!(delay.elapsed_us(), 2_100);
    }
}
