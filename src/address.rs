//! Flat byte offsets to device addresses.

use crate::command::Command;

/// Devices with more pages than this are addressed with 4 bytes
pub const FOUR_BYTE_PAGE_THRESHOLD: u32 = 16384;
/// Highest address reachable with 3 address bytes
pub const MAX_THREE_BYTE_ADDRESS: u32 = 0x00FF_FFFF;

/// How a flat offset maps onto the device address bus
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// The offset is the address
    Linear,
    /// Page index shifted above a fixed width in-page byte field
    PageMultiplied,
}

/// Geometry needed to address a device
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub mode: AddressingMode,
    pub pages: u32,
    pub page_size: u32,
    /// Width in bits of the in-page byte field, 0 for linear devices
    pub page_offset: u32,
}

/// An address on the memory chip
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(pub u32);

impl Address {
    /// Translate a flat byte offset for the given geometry
    pub fn from_offset(geometry: &Geometry, offset: u32) -> Self {
        match geometry.mode {
            AddressingMode::Linear => Address(offset),
            AddressingMode::PageMultiplied => {
                let page = offset / geometry.page_size;
                let byte = offset % geometry.page_size;
                Address((page << geometry.page_offset) | byte)
            }
        }
    }

    /// Whether the address framing used for `geometry` can carry this address
    pub fn fits(&self, geometry: &Geometry) -> bool {
        geometry.pages > FOUR_BYTE_PAGE_THRESHOLD || self.0 <= MAX_THREE_BYTE_ADDRESS
    }

    /// Fast read command for this address: opcode then either four address
    /// bytes, or three address bytes and a dummy byte.
    ///
    /// `None` when the address needs more bytes than the framing carries.
    pub fn read_command(&self, geometry: &Geometry) -> Option<[u8; 5]> {
        if !self.fits(geometry) {
            return None;
        }

        let addr = self.0;
        Some(if geometry.pages > FOUR_BYTE_PAGE_THRESHOLD {
            [
                Command::ReadF.into(),
                (addr >> 24) as u8,
                (addr >> 16) as u8,
                (addr >> 8) as u8,
                addr as u8,
            ]
        } else {
            [
                Command::ReadF.into(),
                (addr >> 16) as u8,
                (addr >> 8) as u8,
                addr as u8,
                Command::Dummy.into(),
            ]
        })
    }

    /// Three byte address command, used by the erase opcodes
    #[cfg(feature = "recovery")]
    pub(crate) fn addr_command(&self, cmd: Command) -> [u8; 4] {
        let addr = self.0;
        [cmd.into(), (addr >> 16) as u8, (addr >> 8) as u8, addr as u8]
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> u32 {
        addr.0
    }
}
