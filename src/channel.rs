//! Command framing over an [`SpiDevice`].
//!
//! Every exchange is one `SpiDevice` transaction, so chip select is asserted for
//! exactly the duration of the exchange and released on every exit path, bus
//! errors included.

use embedded_hal::spi::{Operation, SpiDevice};

use crate::{command::Command, error::Error};

/// The command channel to a single flash device
pub struct Channel<SPI> {
    spi: SPI,
}

impl<SPI, E> Channel<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give back the underlying device
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Shift out `command`, then capture `response_len` bytes into `response`
    /// while shifting out zeros.
    ///
    /// Inbound bytes clocked during the command phase are discarded. An empty
    /// command, or a non zero `response_len` without a buffer large enough to
    /// hold it, is rejected with [`Error::Command`] before the bus is touched.
    pub fn exchange(
        &mut self,
        command: &[u8],
        response: Option<&mut [u8]>,
        response_len: usize,
    ) -> Result<(), Error<E>> {
        if command.is_empty() {
            return Err(Error::Command);
        }

        match response {
            Some(buff) if response_len > 0 => {
                let buff = buff.get_mut(..response_len).ok_or(Error::Command)?;
                buff.fill(0);
                self.spi
                    .transaction(&mut [
                        Operation::Write(command),
                        Operation::TransferInPlace(buff),
                    ])
                    .map_err(Error::Spi)
            }
            None if response_len > 0 => Err(Error::Command),
            _ => self.command_write(command),
        }
    }

    /// Command with no response phase
    pub fn command_write(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        if bytes.is_empty() {
            return Err(Error::Command);
        }
        self.spi
            .transaction(&mut [Operation::Write(bytes)])
            .map_err(Error::Spi)
    }

    /// Command followed by a response filling the whole of `buff`
    pub fn command_read(&mut self, bytes: &[u8], buff: &mut [u8]) -> Result<(), Error<E>> {
        let len = buff.len();
        self.exchange(bytes, Some(buff), len)
    }

    /// Read a single register byte after a one byte opcode
    pub(crate) fn read_register(&mut self, cmd: Command) -> Result<u8, Error<E>> {
        let mut value = [0u8];
        self.command_read(&[cmd.into()], &mut value)?;
        Ok(value[0])
    }
}
