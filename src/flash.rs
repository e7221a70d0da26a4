use embedded_hal::spi::SpiDevice;

use crate::{
    address::Address,
    channel::Channel,
    command::Command,
    error::Error,
    identify::{self, FlashDescriptor},
    register::{DataflashStatus, NorStatus},
    Config,
};

/// An identified serial flash
pub struct SerialFlash<SPI> {
    channel: Channel<SPI>,
    descriptor: FlashDescriptor,
    max_transfer: usize,
}

impl<SPI, E> SerialFlash<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    /// Identify the device behind `channel`
    pub fn probe(mut channel: Channel<SPI>, config: &Config) -> Result<Self, Error<E>> {
        let descriptor = identify::identify(&mut channel, config.custom_parts)?;
        Ok(Self {
            channel,
            descriptor,
            max_transfer: config.max_transfer.max(1),
        })
    }

    pub fn descriptor(&self) -> &FlashDescriptor {
        &self.descriptor
    }

    /// Give back the command channel
    pub fn release(self) -> Channel<SPI> {
        self.channel
    }

    pub(crate) fn channel(&mut self) -> &mut Channel<SPI> {
        &mut self.channel
    }

    /// Read `buff.len()` bytes starting at the flat byte `offset`.
    ///
    /// Long reads are split in several fast read commands, each one addressed
    /// on its own. Bytes the device address framing cannot reach are rejected
    /// with [`Error::OutOfBounds`] before anything is sent for them.
    pub fn read(&mut self, offset: u32, buff: &mut [u8]) -> Result<(), Error<E>> {
        let geometry = self.descriptor.geometry();

        if let Some(last) = buff.len().checked_sub(1) {
            let last = u32::try_from(last)
                .ok()
                .and_then(|last| offset.checked_add(last))
                .ok_or(Error::OutOfBounds)?;
            if !Address::from_offset(&geometry, last).fits(&geometry) {
                error!("SF: {:#x} is not addressable", last);
                return Err(Error::OutOfBounds);
            }
        }

        let mut offset = offset;
        for chunk in buff.chunks_mut(self.max_transfer) {
            let addr = Address::from_offset(&geometry, offset);
            let cmd = addr.read_command(&geometry).ok_or(Error::OutOfBounds)?;
            let len = chunk.len();
            self.channel
                .exchange(&cmd, Some(chunk), len)
                .inspect_err(|_| error!("SF: read error at {:#x}", offset))?;
            trace!("SF: ReadF from {:#x} ({:#x}), {} bytes", offset, addr.0, len);
            // the whole range was checked above, only the final step can wrap
            offset = offset.wrapping_add(len as u32);
        }
        Ok(())
    }

    /// Read the AT45 status register
    pub fn read_status_dataflash(&mut self) -> Result<DataflashStatus, Error<E>> {
        Ok(self.channel.read_register(Command::ReadStatusDataflash)?.into())
    }

    /// Read the AT25/AT26 status register
    pub fn read_status_nor(&mut self) -> Result<NorStatus, Error<E>> {
        Ok(self.channel.read_register(Command::ReadStatus)?.into())
    }
}

/// Implementation of the `ReadNorFlash` trait of the `embedded_storage` crate.
mod es {
    use super::*;
    use core::fmt::Debug;
    use embedded_storage::nor_flash::{
        check_read, ErrorType, NorFlashError, NorFlashErrorKind, ReadNorFlash,
    };

    impl<E> From<NorFlashErrorKind> for Error<E> {
        fn from(e: NorFlashErrorKind) -> Self {
            match e {
                NorFlashErrorKind::NotAligned => Error::NotAligned,
                NorFlashErrorKind::OutOfBounds => Error::OutOfBounds,
                _ => Error::Command,
            }
        }
    }

    impl<SpiError> NorFlashError for Error<SpiError>
    where
        SpiError: Debug,
    {
        fn kind(&self) -> NorFlashErrorKind {
            match self {
                Error::OutOfBounds => NorFlashErrorKind::OutOfBounds,
                Error::NotAligned => NorFlashErrorKind::NotAligned,
                _ => NorFlashErrorKind::Other,
            }
        }
    }

    impl<SPI, E> ErrorType for SerialFlash<SPI>
    where
        SPI: SpiDevice<Error = E>,
        E: Debug,
    {
        type Error = Error<E>;
    }

    impl<SPI, E> ReadNorFlash for SerialFlash<SPI>
    where
        SPI: SpiDevice<Error = E>,
        E: Debug,
    {
        const READ_SIZE: usize = 1;

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            check_read(self, offset, bytes.len())?;
            SerialFlash::read(self, offset, bytes)
        }

        fn capacity(&self) -> usize {
            self.descriptor.capacity() as usize
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::address::AddressingMode;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation};
    use embedded_storage::nor_flash::{NorFlashError, NorFlashErrorKind, ReadNorFlash};
    use std::vec::Vec;

    /// AT45DB161D in legacy page mode, memory byte = low byte of the page
    /// multiplied address xor the page number
    struct Dataflash {
        reads: Vec<[u8; 5]>,
    }

    impl ErrorType for Dataflash {
        type Error = Infallible;
    }

    impl SpiDevice for Dataflash {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            let mut cmd = Vec::new();
            for op in operations {
                match op {
                    Operation::Write(bytes) => cmd.extend_from_slice(bytes),
                    Operation::TransferInPlace(buff) => match cmd[0] {
                        0x9F => buff.copy_from_slice(&[0x1F, 0x26, 0x00, 0x00, 0x00][..buff.len()]),
                        0xD7 => buff.fill(0xAC),
                        0x0B => {
                            self.reads.push([cmd[0], cmd[1], cmd[2], cmd[3], cmd[4]]);
                            let addr = u32::from_be_bytes([0, cmd[1], cmd[2], cmd[3]]);
                            let mut page = addr >> 10;
                            let mut byte = addr & 0x3FF;
                            for b in buff.iter_mut() {
                                *b = (byte as u8) ^ (page as u8);
                                byte += 1;
                                if byte == 528 {
                                    byte = 0;
                                    page += 1;
                                }
                            }
                        }
                        _ => unreachable!(),
                    },
                    _ => unreachable!(),
                }
            }
            Ok(())
        }
    }

    fn expected(offset: u32) -> u8 {
        ((offset % 528) as u8) ^ ((offset / 528) as u8)
    }

    fn flash(max_transfer: usize) -> SerialFlash<Dataflash> {
        let config = Config {
            max_transfer,
            ..Config::default()
        };
        SerialFlash::probe(Channel::new(Dataflash { reads: Vec::new() }), &config).unwrap()
    }

    #[cfg(not(feature = "atmel"))]
    #[test]
    fn chunks_are_addressed_independently() {
        let mut flash = flash(528);
        assert_eq!(flash.descriptor().addressing_mode, AddressingMode::PageMultiplied);

        let mut buff = [0u8; 1200];
        flash.read(1050, &mut buff).unwrap();
        for (i, b) in buff.iter().enumerate() {
            assert_eq!(*b, expected(1050 + i as u32), "byte {}", i);
        }

        let reads = flash.release().release().reads;
        // 1050, 1578, 2106
        assert_eq!(reads.len(), 3);
        assert_eq!(reads[0], [0x0B, 0x00, 0x06, 0x0A, 0x00]);
        let second: u32 = (1578 / 528) << 10 | (1578 % 528);
        assert_eq!(reads[1][1..4], second.to_be_bytes()[1..4]);
    }

    #[cfg(not(feature = "atmel"))]
    #[test]
    fn read_nor_flash_is_bounds_checked() {
        let mut flash = flash(0x1_0000);
        assert_eq!(ReadNorFlash::capacity(&flash), 4096 * 528);

        let mut buff = [0u8; 16];
        let end = (4096 * 528 - 8) as u32;
        let err = ReadNorFlash::read(&mut flash, end, &mut buff).unwrap_err();
        assert_eq!(err, Error::OutOfBounds);
        assert_eq!(err.kind(), NorFlashErrorKind::OutOfBounds);
        assert_eq!(flash.read(u32::MAX, &mut buff), Err(Error::OutOfBounds));
        ReadNorFlash::read(&mut flash, end - 8, &mut buff).unwrap();
        assert_eq!(buff[0], expected(end - 8));
    }
}
