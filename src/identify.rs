//! Device identification.
//!
//! The Read-ID bytes are first matched against the [`catalog`](crate::catalog).
//! Parts missing from it are decoded from the manufacturer byte and the family
//! code (upper three bits of the next byte) through [`FAMILIES`], where each
//! pair names exactly one way of building the descriptor.

use embedded_hal::spi::SpiDevice;

use crate::{
    address::{AddressingMode, Geometry},
    catalog::{self, CatalogEntry},
    channel::Channel,
    command::Command,
    error::{Error, ProbeFailure},
    register::{DataflashStatus, JedecId},
};

pub const MANUFACTURER_ATMEL: u8 = 0x1F;
pub const MANUFACTURER_MICRON: u8 = 0x20;
pub const MANUFACTURER_WINBOND: u8 = 0xEF;

pub const FAMILY_AT26F: u8 = 0x00;
pub const FAMILY_AT45: u8 = 0x20;
/// AT25DF and AT26DF
pub const FAMILY_AT26DF: u8 = 0x40;
pub const FAMILY_M25P: u8 = 0x20;
pub const FAMILY_N25Q: u8 = 0xA0;
pub const FAMILY_W25Q128JV: u8 = 0x40;

/// Command and status register set the device speaks
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    /// AT45 style, status on 0xD7, page erase on 0x81
    LegacyDataflash,
    /// AT25/AT26 and JEDEC NOR style, status on 0x05
    SpiNor,
}

/// Everything the driver knows about the attached device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashDescriptor {
    pub manufacturer: u8,
    pub family: u8,
    pub pages: u32,
    pub page_size: u32,
    /// Width in bits of the in-page byte field, 0 for linear addressing
    pub page_offset: u32,
    pub addressing_mode: AddressingMode,
    pub interface_kind: InterfaceKind,
    /// Catalog entry the device was matched against, if any
    pub part: Option<&'static CatalogEntry>,
}

impl FlashDescriptor {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            mode: self.addressing_mode,
            pages: self.pages,
            page_size: self.page_size,
            page_offset: self.page_offset,
        }
    }

    /// Size of the array in bytes
    pub fn capacity(&self) -> u32 {
        match self.part {
            Some(part) => part.capacity(),
            None => self.pages * self.page_size,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        self.part.map(|part| part.name)
    }

    fn from_catalog(id: &JedecId, part: &'static CatalogEntry) -> Self {
        Self {
            manufacturer: id.manufacturer().0,
            family: id.family().0,
            pages: part.sector_count as u32,
            page_size: part.page_size as u32,
            page_offset: 0,
            addressing_mode: AddressingMode::Linear,
            interface_kind: InterfaceKind::SpiNor,
            part: Some(part),
        }
    }
}

/// Geometry of a part that is not probed any further
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGeometry {
    pub pages: u32,
    pub page_size: u32,
    pub interface_kind: InterfaceKind,
}

/// AT25DF321 and relatives
pub const AT25_GEOMETRY: FixedGeometry = FixedGeometry {
    pages: 16384,
    page_size: 256,
    interface_kind: InterfaceKind::SpiNor,
};

pub const N25Q_GEOMETRY: FixedGeometry = FixedGeometry {
    pages: 16384,
    page_size: 256,
    interface_kind: InterfaceKind::SpiNor,
};

pub const W25Q128_GEOMETRY: FixedGeometry = FixedGeometry {
    pages: 346,
    page_size: 256,
    interface_kind: InterfaceKind::SpiNor,
};

/// How a (manufacturer, family) pair gets its descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initializer {
    Fixed(FixedGeometry),
    /// Geometry read back from the AT45 status register
    At45StatusProbe,
}

/// Fallback decode for parts missing from the catalog
pub const FAMILIES: &[(u8, u8, Initializer)] = &[
    (MANUFACTURER_ATMEL, FAMILY_AT26F, Initializer::Fixed(AT25_GEOMETRY)),
    (MANUFACTURER_ATMEL, FAMILY_AT26DF, Initializer::Fixed(AT25_GEOMETRY)),
    (MANUFACTURER_ATMEL, FAMILY_AT45, Initializer::At45StatusProbe),
    (MANUFACTURER_MICRON, FAMILY_M25P, Initializer::Fixed(N25Q_GEOMETRY)),
    (MANUFACTURER_MICRON, FAMILY_N25Q, Initializer::Fixed(N25Q_GEOMETRY)),
    (MANUFACTURER_WINBOND, FAMILY_W25Q128JV, Initializer::Fixed(W25Q128_GEOMETRY)),
];

/// One AT45 density code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct At45Density {
    /// Status register bits 5..2, left in place
    pub code: u8,
    pub name: &'static str,
    pub pages: u32,
    /// Page size in the default (non power of two) configuration
    pub page_size: u32,
    pub page_offset: u32,
}

pub const AT45_DENSITIES: &[At45Density] = &[
    At45Density { code: 0x0C, name: "at45db011d", pages: 512, page_size: 264, page_offset: 9 },
    At45Density { code: 0x14, name: "at45db021d", pages: 1024, page_size: 264, page_offset: 9 },
    At45Density { code: 0x1C, name: "at45db041d", pages: 2048, page_size: 264, page_offset: 9 },
    At45Density { code: 0x24, name: "at45db081d", pages: 4096, page_size: 264, page_offset: 9 },
    At45Density { code: 0x2C, name: "at45db161d", pages: 4096, page_size: 528, page_offset: 10 },
    At45Density { code: 0x34, name: "at45db321d", pages: 8192, page_size: 528, page_offset: 10 },
    At45Density { code: 0x3C, name: "at45db642d", pages: 8192, page_size: 1056, page_offset: 11 },
];

/// Look up the initializer for a manufacturer and family code
pub fn initializer(manufacturer: u8, family: u8) -> Result<Initializer, ProbeFailure> {
    let mut known_manufacturer = false;
    for &(vendor, code, init) in FAMILIES {
        if vendor == manufacturer {
            if code == family {
                return Ok(init);
            }
            known_manufacturer = true;
        }
    }

    if known_manufacturer {
        Err(ProbeFailure::UnknownFamily {
            manufacturer,
            family,
        })
    } else {
        Err(ProbeFailure::UnknownManufacturer(manufacturer))
    }
}

/// Build the geometry an AT45 status register describes
pub fn at45_geometry(status: DataflashStatus) -> Result<Geometry, ProbeFailure> {
    let density = AT45_DENSITIES
        .iter()
        .find(|d| d.code == status.density)
        .ok_or(ProbeFailure::UnknownDensity(status.density))?;

    Ok(if status.power_of_two {
        Geometry {
            mode: AddressingMode::Linear,
            pages: density.pages,
            page_size: 1 << (density.page_offset - 1),
            page_offset: 0,
        }
    } else {
        Geometry {
            mode: AddressingMode::PageMultiplied,
            pages: density.pages,
            page_size: density.page_size,
            page_offset: density.page_offset,
        }
    })
}

/// Read the 5 manufacturer and device ID bytes
pub fn read_id<SPI, E>(channel: &mut Channel<SPI>) -> Result<JedecId, Error<E>>
where
    SPI: SpiDevice<Error = E>,
{
    let mut id = [0u8; 5];
    channel.command_read(&[Command::ReadIdentification.into()], &mut id)?;
    Ok(JedecId(id))
}

/// Identify the attached device, `extra` parts are tried after the catalog
pub fn identify<SPI, E>(
    channel: &mut Channel<SPI>,
    extra: &'static [CatalogEntry],
) -> Result<FlashDescriptor, Error<E>>
where
    SPI: SpiDevice<Error = E>,
{
    let id = read_id(channel)?;
    info!("SF: Got Manufacturer and Device ID: {:?}", id.0);

    if let Some(part) = catalog::find(&id, extra) {
        info!(
            "SF: Detected {}, Sector size: {}, Sectors: {}, Page size: {}",
            part.name,
            part.sector_size,
            part.sector_count,
            part.page_size
        );
        return Ok(FlashDescriptor::from_catalog(&id, part));
    }

    let manufacturer = id.manufacturer().0;
    let family = id.family().0;
    let init = initializer(manufacturer, family).inspect_err(|failure| match failure {
        ProbeFailure::UnknownManufacturer(_) => {
            warn!("SF: Unsupported Manufacturer ID {:#x}", manufacturer)
        }
        _ => warn!("SF: Unsupported SerialFlash family {:#x}", family),
    })?;

    let (geometry, interface_kind) = match init {
        Initializer::Fixed(fixed) => (
            Geometry {
                mode: AddressingMode::Linear,
                pages: fixed.pages,
                page_size: fixed.page_size,
                page_offset: 0,
            },
            fixed.interface_kind,
        ),
        Initializer::At45StatusProbe => {
            let status = DataflashStatus::from(channel.read_register(Command::ReadStatusDataflash)?);
            let geometry = at45_geometry(status).inspect_err(|_| {
                warn!("SF: Unsupported AT45 density {:#x}", status.density)
            })?;
            (geometry, InterfaceKind::LegacyDataflash)
        }
    };

    debug!(
        "SF: family {:#x}: {} pages of {} bytes, page offset {}",
        family,
        geometry.pages,
        geometry.page_size,
        geometry.page_offset
    );

    Ok(FlashDescriptor {
        manufacturer,
        family,
        pages: geometry.pages,
        page_size: geometry.page_size,
        page_offset: geometry.page_offset,
        addressing_mode: geometry.mode,
        interface_kind,
        part: None,
    })
}
