use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus reported a failure other than a missing acknowledge.
    Bus(E),
    /// The device did not acknowledge within the configured response timeout.
    NotResponding,
}

pub type Result<T, E> = core::result::Result<T, Error<E>>;

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::NotResponding => write!(f, "device not responding"),
        }
    }
}
