/// Why the attached device could not be identified
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The platform SPI controller refused to initialize
    BusInit,

    /// No catalog entry and no fallback for this manufacturer byte
    UnknownManufacturer(u8),

    /// The manufacturer is known but the family code is not
    UnknownFamily { manufacturer: u8, family: u8 },

    /// AT45 status register reported a density code outside the table
    UnknownDensity(u8),
}

/// All possible errors emitted by the driver
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiError> {
    /// Internal Spi error
    Spi(SpiError),

    /// Malformed request to the command channel
    Command,

    /// The device could not be identified
    Probe(ProbeFailure),

    /// Status polling never observed the device ready
    Timeout,

    /// Write protection could not be cleared
    Protect,

    /// Image or device tree header is invalid, or does not fit the destination
    Length,

    /// Address out of bound, or not reachable with the device address framing
    OutOfBounds,

    /// Address not aligned
    NotAligned,
}

impl<E> From<ProbeFailure> for Error<E> {
    fn from(failure: ProbeFailure) -> Self {
        Error::Probe(failure)
    }
}
