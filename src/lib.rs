#![cfg_attr(not(test), no_std)]
//! This is a platform agnostic serial flash bootstrap driver using [embedded-hal](https://github.com/rust-embedded/embedded-hal).
//!
//! It identifies the SPI NOR flash or Atmel DataFlash attached to the boot
//! SPI bus, optionally erases page 0 when a recovery signal is asserted, and
//! copies a kernel image and an optional device tree blob into memory.
//!
//! Supported devices:
//! * every part of the built-in [`catalog`], per vendor cargo feature
//! * Atmel AT45DB011D to AT45DB642D, geometry read from the status register
//! * Atmel AT25DF/AT26DF/AT26F, Micron M25P/N25Q and Winbond W25Q128JV
//!   families missing from the catalog
//!
//! ```ignore
//! let mut loader = Loader::new(spi, AlwaysOn, delay);
//! let mut image = ImageRequest::kernel(0x8400, &mut kernel_ram);
//! match loader.load(&StandardHeaders, &mut ActiveLow(button), &mut image, None)? {
//!     BootOutcome::Loaded { image_len, .. } => jump(image_len),
//!     BootOutcome::RecoveryPerformed => reset(),
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod address;
pub mod catalog;
pub mod channel;
mod command;
pub mod error;
pub mod flash;
pub mod header;
pub mod identify;
pub mod loader;
#[cfg(feature = "recovery")]
pub mod recovery;
pub mod register;

pub use crate::catalog::CatalogEntry;
pub use crate::error::{Error, ProbeFailure};
pub use crate::flash::SerialFlash;
pub use crate::header::{HeaderParser, ImageKind, StandardHeaders};
pub use crate::identify::{FlashDescriptor, InterfaceKind};
pub use crate::loader::{
    ActiveHigh, ActiveLow, AlwaysOn, BootOutcome, ImageRequest, Loader, NoRecovery,
    RecoverySignal, SpiController,
};

/// Wait after an erase command before polling, in microseconds
pub const SETTLE_DELAY_US: u32 = 33_000;
/// Status reads before an erase is reported as timed out
pub const POLL_RETRIES: u32 = 1000;
/// Largest single read transaction
pub const MAX_TRANSFER: usize = 0x1_0000;

/// Run time settings of the driver
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub settle_delay_us: u32,
    pub poll_retries: u32,
    /// Bytes per bulk read transaction, every chunk is addressed on its own
    pub max_transfer: usize,
    /// Board specific parts, tried after the built-in catalog
    pub custom_parts: &'static [CatalogEntry],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_us: SETTLE_DELAY_US,
            poll_retries: POLL_RETRIES,
            max_transfer: MAX_TRANSFER,
            custom_parts: &[],
        }
    }
}
