//! Page 0 recovery erase.
//!
//! Erasing the start of the flash destroys the boot header, so the ROM code
//! falls back to its own recovery path on the next reset. The procedure
//! depends on the [`InterfaceKind`] of the identified device:
//!
//! * [`InterfaceKind::SpiNor`] (AT25/AT26 style): clear sector protection,
//!   erase the first 4kB block, poll the busy bit.
//! * [`InterfaceKind::LegacyDataflash`] (AT45 style): erase page 0, poll the
//!   ready bit.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};

use crate::{
    address::Address, command::Command, error::Error, flash::SerialFlash,
    identify::InterfaceKind, loader::RecoverySignal, Config,
};

/// Result of a recovery attempt that did not fail
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// Page 0 was erased, booting must stop here
    Succeeded,
    /// The recovery signal was not asserted
    NotRequested,
}

/// Outcome of a bounded status poll
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Ready,
    Exhausted,
}

/// Call `is_ready` until it reports true, at most `retries` times (at least
/// once).
pub fn poll_ready<E>(
    retries: u32,
    mut is_ready: impl FnMut() -> Result<bool, Error<E>>,
) -> Result<Poll, Error<E>> {
    for _ in 0..retries.max(1) {
        if is_ready()? {
            return Ok(Poll::Ready);
        }
    }
    Ok(Poll::Exhausted)
}

impl<SPI, E> SerialFlash<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    /// Set the write enable latch
    pub fn write_enable(&mut self) -> Result<(), Error<E>> {
        self.channel().command_write(&[Command::WriteEnable.into()])
    }

    /// Write the AT25/AT26 status register. Write must be enabled, see `write_enable`
    pub fn write_status(&mut self, value: u8) -> Result<(), Error<E>> {
        self.channel()
            .command_write(&[Command::WriteStatus.into(), value])
    }

    /// Clear the AT25/AT26 software sector protection.
    ///
    /// Locked protection registers are unlocked first, the global unprotect
    /// has no effect otherwise.
    pub fn unprotect(&mut self) -> Result<(), Error<E>> {
        let status = self.read_status_nor()?;
        if !status.is_protected() {
            return Ok(());
        }

        if status.protection_locked {
            self.write_enable()?;
            self.write_status(0)?;
        }

        self.write_enable()?;
        self.write_status(0)?;

        let status = self.read_status_nor()?;
        if status.protection_locked || status.is_protected() {
            warn!("SF: Unprotect AT25 failed");
            return Err(Error::Protect);
        }
        Ok(())
    }

    /// Erase page 0 with the procedure matching the device interface
    pub fn erase_page0<D: DelayNs>(&mut self, delay: &mut D, config: &Config) -> Result<(), Error<E>> {
        match self.descriptor().interface_kind {
            InterfaceKind::SpiNor => self.erase_page0_nor(delay, config),
            InterfaceKind::LegacyDataflash => self.erase_page0_dataflash(delay, config),
        }
    }

    fn erase_page0_nor<D: DelayNs>(&mut self, delay: &mut D, config: &Config) -> Result<(), Error<E>> {
        self.unprotect()?;
        self.write_enable()?;

        let cmd = Address(0).addr_command(Command::BlockErase4k);
        self.channel()
            .command_write(&cmd)
            .inspect_err(|_| error!("SF: AT25 page 0 erase failed"))?;

        delay.delay_us(config.settle_delay_us);

        match poll_ready(config.poll_retries, || Ok(!self.read_status_nor()?.busy))? {
            Poll::Ready => Ok(()),
            Poll::Exhausted => {
                error!("SF: AT25 page0 erase timed out");
                Err(Error::Timeout)
            }
        }
    }

    fn erase_page0_dataflash<D: DelayNs>(
        &mut self,
        delay: &mut D,
        config: &Config,
    ) -> Result<(), Error<E>> {
        let cmd = Address(0).addr_command(Command::PageEraseDataflash);
        self.channel()
            .command_write(&cmd)
            .inspect_err(|_| error!("SF: AT45 page 0 erase failed"))?;

        delay.delay_us(config.settle_delay_us);

        match poll_ready(config.poll_retries, || Ok(self.read_status_dataflash()?.ready))? {
            Poll::Ready => Ok(()),
            Poll::Exhausted => {
                error!("SF: AT45 page0 erase timed out");
                Err(Error::Timeout)
            }
        }
    }
}

/// Erase page 0 if `signal` is asserted
pub fn recover<SPI, E, R, D>(
    flash: &mut SerialFlash<SPI>,
    signal: &mut R,
    delay: &mut D,
    config: &Config,
) -> Result<RecoveryOutcome, Error<E>>
where
    SPI: SpiDevice<Error = E>,
    R: RecoverySignal,
    D: DelayNs,
{
    info!("SF: Press the recovery button to recover");
    if !signal.is_asserted() {
        return Ok(RecoveryOutcome::NotRequested);
    }

    info!("SF: The recovery button has been pressed, the page 0 is erasing...");
    flash
        .erase_page0(delay, config)
        .inspect_err(|_| error!("SF: The erasing failed"))?;
    info!("SF: The erasing is done");

    Ok(RecoveryOutcome::Succeeded)
}
