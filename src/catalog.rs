//! Compiled in table of SPI NOR parts, matched against the Read-ID bytes.
//!
//! Vendor groups are selected with cargo features. Entries describe hardware;
//! only the ID, sector geometry and page size take part in identification.

use bitflags::bitflags;

use crate::register::JedecId;

bitflags! {
    /// Capabilities of a catalog part
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// 4KiB erase works uniformly
        const SECT_4K             = 1 << 0;
        /// No erase command needed
        const NO_ERASE            = 1 << 1;
        /// SST byte programming
        const SST_WRITE           = 1 << 2;
        /// Can't do fast read
        const NO_FAST_READ        = 1 << 3;
        /// PMC 4KiB erase works uniformly
        const SECT_4K_PMC         = 1 << 4;
        const DUAL_READ           = 1 << 5;
        const QUAD_READ           = 1 << 6;
        /// Uses the flag status register
        const USE_FSR             = 1 << 7;
        /// Lock/unlock via status register
        const HAS_LOCK            = 1 << 8;
        /// Status register has a top/bottom protect bit, needs `HAS_LOCK`
        const HAS_TB              = 1 << 9;
        /// Xilinx Spartan 3AN in-system flash, shares the Atmel manufacturer ID
        const S3AN                = 1 << 10;
        /// Dedicated 4 byte address opcodes, for parts above 128Mib
        const FOUR_BYTE_OPCODES   = 1 << 11;
        const NO_CHIP_ERASE       = 1 << 12;
        const SKIP_SFDP           = 1 << 13;
        /// Uses the CLSR command
        const USE_CLSR            = 1 << 14;
        /// Lock/unlock via block protection register
        const SST26_LOCK          = 1 << 15;
        const OCTAL_READ          = 1 << 16;
        /// Needs a global block unlock
        const UNLOCK_GLOBAL_BLOCK = 1 << 17;
        /// Only the 4KiB erase opcode may be used
        const SECT_4K_ONLY        = 1 << 18;
    }
}

use Capabilities as C;

/// Longest ID a catalog entry can hold
pub const MAX_ID_LEN: usize = 6;

/// One known part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    /// JEDEC ID followed by the extended ID
    pub id: [u8; MAX_ID_LEN],
    /// Significant bytes of `id`: 0 (never matched), 3, 5 or 6
    pub id_len: u8,
    pub sector_size: u32,
    pub sector_count: u16,
    pub page_size: u16,
    pub flags: Capabilities,
}

impl CatalogEntry {
    /// Entry with a 3 byte JEDEC ID and an optional 2 byte extended ID
    pub const fn info(
        name: &'static str,
        jedec_id: u32,
        ext_id: u16,
        sector_size: u32,
        sector_count: u16,
        flags: Capabilities,
    ) -> Self {
        let id_len = if jedec_id == 0 {
            0
        } else if ext_id != 0 {
            5
        } else {
            3
        };
        Self {
            name,
            id: [
                (jedec_id >> 16) as u8,
                (jedec_id >> 8) as u8,
                jedec_id as u8,
                (ext_id >> 8) as u8,
                ext_id as u8,
                0,
            ],
            id_len,
            sector_size,
            sector_count,
            page_size: 256,
            flags,
        }
    }

    /// Entry with a 3 byte JEDEC ID and a 3 byte extended ID
    pub const fn info6(
        name: &'static str,
        jedec_id: u32,
        ext_id: u32,
        sector_size: u32,
        sector_count: u16,
        flags: Capabilities,
    ) -> Self {
        Self {
            name,
            id: [
                (jedec_id >> 16) as u8,
                (jedec_id >> 8) as u8,
                jedec_id as u8,
                (ext_id >> 16) as u8,
                (ext_id >> 8) as u8,
                ext_id as u8,
            ],
            id_len: MAX_ID_LEN as u8,
            sector_size,
            sector_count,
            page_size: 256,
            flags,
        }
    }

    /// Whether the read ID starts with this entry's significant bytes.
    ///
    /// Entries longer than the read ID never match.
    pub fn matches(&self, id: &JedecId) -> bool {
        let len = self.id_len as usize;
        len > 0 && id.0.get(..len) == Some(&self.id[..len])
    }

    /// Size of the whole array in bytes
    pub fn capacity(&self) -> u32 {
        self.sector_size * self.sector_count as u32
    }
}

/// Vendor tables in scan order
const VENDORS: &[&[CatalogEntry]] = &[
    #[cfg(feature = "atmel")]
    ATMEL,
    #[cfg(feature = "eon")]
    EON,
    #[cfg(feature = "gigadevice")]
    GIGADEVICE,
    #[cfg(feature = "issi")]
    ISSI,
    #[cfg(feature = "macronix")]
    MACRONIX,
    #[cfg(feature = "stmicro")]
    MICRON,
    #[cfg(feature = "spansion")]
    SPANSION,
    #[cfg(feature = "sst")]
    SST,
    #[cfg(feature = "stmicro")]
    STMICRO,
    #[cfg(feature = "winbond")]
    WINBOND,
    #[cfg(feature = "xmc")]
    XMC,
];

/// Atmel, some marketed as DataFlash
#[cfg(feature = "atmel")]
const ATMEL: &[CatalogEntry] = &[
    CatalogEntry::info("at26df321", 0x1f4700, 0, 64 * 1024, 64, C::SECT_4K),
    CatalogEntry::info("at25df321a", 0x1f4701, 0, 64 * 1024, 64, C::SECT_4K),
    CatalogEntry::info("at45db011d", 0x1f2200, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info("at45db021d", 0x1f2300, 0, 64 * 1024, 8, C::SECT_4K),
    CatalogEntry::info("at45db041d", 0x1f2400, 0, 64 * 1024, 8, C::SECT_4K),
    CatalogEntry::info("at45db081d", 0x1f2500, 0, 64 * 1024, 16, C::SECT_4K),
    CatalogEntry::info("at45db161d", 0x1f2600, 0, 64 * 1024, 32, C::SECT_4K),
    CatalogEntry::info("at45db321d", 0x1f2700, 0, 64 * 1024, 64, C::SECT_4K),
    CatalogEntry::info("at45db641d", 0x1f2800, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info("at25sl321", 0x1f4216, 0, 64 * 1024, 64, C::SECT_4K),
    CatalogEntry::info("at26df081a", 0x1f4501, 0, 64 * 1024, 16, C::SECT_4K),
];

/// EON en25
#[cfg(feature = "eon")]
const EON: &[CatalogEntry] = &[
    CatalogEntry::info("en25q32b", 0x1c3016, 0, 64 * 1024, 64, C::empty()),
    CatalogEntry::info("en25q64", 0x1c3017, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info("en25qh128", 0x1c7018, 0, 64 * 1024, 256, C::empty()),
    CatalogEntry::info("en25s64", 0x1c3817, 0, 64 * 1024, 128, C::SECT_4K),
];

/// GigaDevice
#[cfg(feature = "gigadevice")]
const GIGADEVICE: &[CatalogEntry] = &[
    CatalogEntry::info(
        "gd25q16",
        0xc84015,
        0,
        64 * 1024,
        32,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "gd25q32",
        0xc84016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "gd25lq32",
        0xc86016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "gd25q64",
        0xc84017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "gd25lq64c",
        0xc86017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "gd25q128",
        0xc84018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "gd25lq128",
        0xc86018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
];

/// ISSI
#[cfg(feature = "issi")]
const ISSI: &[CatalogEntry] = &[
    CatalogEntry::info(
        "is25lq040b",
        0x9d4013,
        0,
        64 * 1024,
        8,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info("is25lp032", 0x9d6016, 0, 64 * 1024, 64, C::empty()),
    CatalogEntry::info("is25lp064", 0x9d6017, 0, 64 * 1024, 128, C::empty()),
    CatalogEntry::info("is25lp128", 0x9d6018, 0, 64 * 1024, 256, C::SECT_4K.union(C::DUAL_READ)),
    CatalogEntry::info("is25lp256", 0x9d6019, 0, 64 * 1024, 512, C::SECT_4K.union(C::DUAL_READ)),
    CatalogEntry::info(
        "is25wp032",
        0x9d7016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "is25wp064",
        0x9d7017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "is25wp128",
        0x9d7018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "is25wp256",
        0x9d7019,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
];

/// Macronix
#[cfg(feature = "macronix")]
const MACRONIX: &[CatalogEntry] = &[
    CatalogEntry::info("mx25l2005a", 0xc22012, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info("mx25l4005a", 0xc22013, 0, 64 * 1024, 8, C::SECT_4K),
    CatalogEntry::info("mx25l8005", 0xc22014, 0, 64 * 1024, 16, C::empty()),
    CatalogEntry::info("mx25l1606e", 0xc22015, 0, 64 * 1024, 32, C::SECT_4K),
    CatalogEntry::info("mx25l3205d", 0xc22016, 0, 64 * 1024, 64, C::SECT_4K),
    CatalogEntry::info("mx25l6405d", 0xc22017, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info("mx25u2033e", 0xc22532, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info("mx25u1635e", 0xc22535, 0, 64 * 1024, 32, C::SECT_4K),
    CatalogEntry::info("mx25u3235f", 0xc22536, 0, 4 * 1024, 1024, C::SECT_4K),
    CatalogEntry::info("mx25u6435f", 0xc22537, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info("mx25l12805d", 0xc22018, 0, 64 * 1024, 256, C::SECT_4K),
    CatalogEntry::info("mx25u12835f", 0xc22538, 0, 64 * 1024, 256, C::SECT_4K),
    CatalogEntry::info("mx25l12855e", 0xc22618, 0, 64 * 1024, 256, C::empty()),
    CatalogEntry::info(
        "mx25l25635e",
        0xc22019,
        0,
        64 * 1024,
        512,
        C::DUAL_READ.union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "mx25u25635f",
        0xc22539,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info("mx25l25655e", 0xc22619, 0, 64 * 1024, 512, C::empty()),
    CatalogEntry::info(
        "mx66l51235l",
        0xc2201a,
        0,
        64 * 1024,
        1024,
        C::DUAL_READ.union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info(
        "mx66u51235f",
        0xc2253a,
        0,
        64 * 1024,
        1024,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info(
        "mx66u2g45g",
        0xc2253c,
        0,
        64 * 1024,
        4096,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info(
        "mx66l1g45g",
        0xc2201b,
        0,
        64 * 1024,
        2048,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "mx25l1633e",
        0xc22415,
        0,
        64 * 1024,
        32,
        C::QUAD_READ.union(C::FOUR_BYTE_OPCODES).union(C::SECT_4K),
    ),
    CatalogEntry::info("mx25r6435f", 0xc22817, 0, 64 * 1024, 128, C::SECT_4K),
];

/// Micron
#[cfg(feature = "stmicro")]
const MICRON: &[CatalogEntry] = &[
    CatalogEntry::info("n25q016a", 0x20bb15, 0, 64 * 1024, 32, C::SECT_4K.union(C::QUAD_READ)),
    CatalogEntry::info("n25q032", 0x20ba16, 0, 64 * 1024, 64, C::QUAD_READ),
    CatalogEntry::info("n25q032a", 0x20bb16, 0, 64 * 1024, 64, C::QUAD_READ),
    CatalogEntry::info("n25q064", 0x20ba17, 0, 64 * 1024, 128, C::SECT_4K.union(C::QUAD_READ)),
    CatalogEntry::info("n25q064a", 0x20bb17, 0, 64 * 1024, 128, C::SECT_4K.union(C::QUAD_READ)),
    CatalogEntry::info("n25q128a11", 0x20bb18, 0, 64 * 1024, 256, C::SECT_4K.union(C::QUAD_READ)),
    CatalogEntry::info("n25q128a13", 0x20ba18, 0, 64 * 1024, 256, C::SECT_4K.union(C::QUAD_READ)),
    CatalogEntry::info6(
        "mt25ql256a",
        0x20ba19,
        0x104400,
        64 * 1024,
        512,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES).union(C::USE_FSR),
    ),
    CatalogEntry::info(
        "n25q256a",
        0x20ba19,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::USE_FSR),
    ),
    CatalogEntry::info6(
        "mt25qu256a",
        0x20bb19,
        0x104400,
        64 * 1024,
        512,
        C::SECT_4K.union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES).union(C::USE_FSR),
    ),
    CatalogEntry::info(
        "n25q256ax1",
        0x20bb19,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::QUAD_READ).union(C::USE_FSR),
    ),
    CatalogEntry::info6(
        "mt25qu512a",
        0x20bb20,
        0x104400,
        64 * 1024,
        1024,
        C::DUAL_READ.union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES).union(C::USE_FSR),
    ),
    CatalogEntry::info(
        "n25q512a",
        0x20bb20,
        0,
        64 * 1024,
        1024,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ),
    ),
    CatalogEntry::info6(
        "mt25ql512a",
        0x20ba20,
        0x104400,
        64 * 1024,
        1024,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info(
        "n25q512ax3",
        0x20ba20,
        0,
        64 * 1024,
        1024,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "n25q00",
        0x20ba21,
        0,
        64 * 1024,
        2048,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ).union(C::NO_CHIP_ERASE),
    ),
    CatalogEntry::info(
        "n25q00a",
        0x20bb21,
        0,
        64 * 1024,
        2048,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ).union(C::NO_CHIP_ERASE),
    ),
    CatalogEntry::info(
        "mt25ql01g",
        0x21ba20,
        0,
        64 * 1024,
        2048,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ).union(C::NO_CHIP_ERASE),
    ),
    CatalogEntry::info(
        "mt25qu02g",
        0x20bb22,
        0,
        64 * 1024,
        4096,
        C::SECT_4K.union(C::USE_FSR).union(C::QUAD_READ).union(C::NO_CHIP_ERASE),
    ),
    CatalogEntry::info(
        "mt35xu512aba",
        0x2c5b1a,
        0,
        128 * 1024,
        512,
        C::USE_FSR.union(C::OCTAL_READ).union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info(
        "mt35xu02g",
        0x2c5b1c,
        0,
        128 * 1024,
        2048,
        C::USE_FSR.union(C::OCTAL_READ).union(C::FOUR_BYTE_OPCODES),
    ),
];

/// Spansion/Cypress, single (large) sector size only
#[cfg(feature = "spansion")]
const SPANSION: &[CatalogEntry] = &[
    CatalogEntry::info(
        "s25sl032p",
        0x010215,
        0x4d00,
        64 * 1024,
        64,
        C::DUAL_READ.union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "s25sl064p",
        0x010216,
        0x4d00,
        64 * 1024,
        128,
        C::DUAL_READ.union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "s25fl256s0",
        0x010219,
        0x4d00,
        256 * 1024,
        128,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info(
        "s25fl256s1",
        0x010219,
        0x4d01,
        64 * 1024,
        512,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info6(
        "s25fl512s",
        0x010220,
        0x4d0080,
        256 * 1024,
        256,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info6(
        "s25fs512s",
        0x010220,
        0x4d0081,
        256 * 1024,
        256,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info(
        "s25fl512s_256k",
        0x010220,
        0x4d00,
        256 * 1024,
        256,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info(
        "s25fl512s_64k",
        0x010220,
        0x4d01,
        64 * 1024,
        1024,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info(
        "s25fl512s_512k",
        0x010220,
        0x4f00,
        256 * 1024,
        256,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info("s25sl12800", 0x012018, 0x0300, 256 * 1024, 64, C::empty()),
    CatalogEntry::info("s25sl12801", 0x012018, 0x0301, 64 * 1024, 256, C::empty()),
    CatalogEntry::info6(
        "s25fl128s",
        0x012018,
        0x4d0180,
        64 * 1024,
        256,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info(
        "s25fl129p0",
        0x012018,
        0x4d00,
        256 * 1024,
        64,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info(
        "s25fl129p1",
        0x012018,
        0x4d01,
        64 * 1024,
        256,
        C::DUAL_READ.union(C::QUAD_READ).union(C::USE_CLSR),
    ),
    CatalogEntry::info("s25sl008a", 0x010213, 0, 64 * 1024, 16, C::empty()),
    CatalogEntry::info("s25sl016a", 0x010214, 0, 64 * 1024, 32, C::empty()),
    CatalogEntry::info("s25sl032a", 0x010215, 0, 64 * 1024, 64, C::empty()),
    CatalogEntry::info("s25sl064a", 0x010216, 0, 64 * 1024, 128, C::empty()),
    CatalogEntry::info(
        "s25fl116k",
        0x014015,
        0,
        64 * 1024,
        32,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info("s25fl164k", 0x014017, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info("s25fl208k", 0x014014, 0, 64 * 1024, 16, C::SECT_4K.union(C::DUAL_READ)),
    CatalogEntry::info(
        "s25fl064l",
        0x016017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
    CatalogEntry::info(
        "s25fl128l",
        0x016018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::FOUR_BYTE_OPCODES),
    ),
];

/// SST, large erase sizes are overlays, sectors are 4K
#[cfg(feature = "sst")]
const SST: &[CatalogEntry] = &[
    CatalogEntry::info("sst25vf040b", 0xbf258d, 0, 64 * 1024, 8, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25vf080b", 0xbf258e, 0, 64 * 1024, 16, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25vf016b", 0xbf2541, 0, 64 * 1024, 32, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25vf032b", 0xbf254a, 0, 64 * 1024, 64, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25vf064c", 0xbf254b, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info("sst25wf512", 0xbf2501, 0, 64 * 1024, 1, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25wf010", 0xbf2502, 0, 64 * 1024, 2, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25wf020", 0xbf2503, 0, 64 * 1024, 4, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25wf020a", 0x621612, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info("sst25wf040b", 0x621613, 0, 64 * 1024, 8, C::SECT_4K),
    CatalogEntry::info("sst25wf040", 0xbf2504, 0, 64 * 1024, 8, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info("sst25wf080", 0xbf2505, 0, 64 * 1024, 16, C::SECT_4K.union(C::SST_WRITE)),
    CatalogEntry::info(
        "sst26vf064b",
        0xbf2643,
        0,
        64 * 1024,
        128,
        C::SECT_4K_ONLY.union(C::UNLOCK_GLOBAL_BLOCK).union(C::SST26_LOCK).union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info("sst26wf016", 0xbf2651, 0, 64 * 1024, 32, C::SECT_4K.union(C::SST26_LOCK)),
    CatalogEntry::info("sst26wf032", 0xbf2622, 0, 64 * 1024, 64, C::SECT_4K.union(C::SST26_LOCK)),
    CatalogEntry::info("sst26wf064", 0xbf2643, 0, 64 * 1024, 128, C::SECT_4K.union(C::SST26_LOCK)),
];

/// ST Microelectronics, newer production may have feature updates
#[cfg(feature = "stmicro")]
const STMICRO: &[CatalogEntry] = &[
    CatalogEntry::info("m25p10", 0x202011, 0, 32 * 1024, 4, C::empty()),
    CatalogEntry::info("m25p20", 0x202012, 0, 64 * 1024, 4, C::empty()),
    CatalogEntry::info("m25p40", 0x202013, 0, 64 * 1024, 8, C::empty()),
    CatalogEntry::info("m25p80", 0x202014, 0, 64 * 1024, 16, C::empty()),
    CatalogEntry::info("m25p16", 0x202015, 0, 64 * 1024, 32, C::empty()),
    CatalogEntry::info("m25p32", 0x202016, 0, 64 * 1024, 64, C::empty()),
    CatalogEntry::info("m25p64", 0x202017, 0, 64 * 1024, 128, C::empty()),
    CatalogEntry::info("m25p128", 0x202018, 0, 256 * 1024, 64, C::empty()),
    CatalogEntry::info("m25pe16", 0x208015, 0, 64 * 1024, 32, C::SECT_4K),
    CatalogEntry::info(
        "m25px16",
        0x207115,
        0,
        64 * 1024,
        32,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info("m25px64", 0x207117, 0, 64 * 1024, 128, C::empty()),
];

/// Winbond, w25x blocks are 64K, sectors are 4KiB
#[cfg(feature = "winbond")]
const WINBOND: &[CatalogEntry] = &[
    CatalogEntry::info("w25p80", 0xef2014, 0, 64 * 1024, 16, C::empty()),
    CatalogEntry::info("w25p16", 0xef2015, 0, 64 * 1024, 32, C::empty()),
    CatalogEntry::info("w25p32", 0xef2016, 0, 64 * 1024, 64, C::empty()),
    CatalogEntry::info("w25x05", 0xef3010, 0, 64 * 1024, 1, C::SECT_4K),
    CatalogEntry::info("w25x40", 0xef3013, 0, 64 * 1024, 8, C::SECT_4K),
    CatalogEntry::info("w25x16", 0xef3015, 0, 64 * 1024, 32, C::SECT_4K),
    CatalogEntry::info(
        "w25q16dw",
        0xef6015,
        0,
        64 * 1024,
        32,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info("w25x32", 0xef3016, 0, 64 * 1024, 64, C::SECT_4K),
    CatalogEntry::info("w25q20cl", 0xef4012, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info("w25q20bw", 0xef5012, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info("w25q20ew", 0xef6012, 0, 64 * 1024, 4, C::SECT_4K),
    CatalogEntry::info(
        "w25q32",
        0xef4016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "w25q32dw",
        0xef6016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q32jv",
        0xef7016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q32jwm",
        0xef8016,
        0,
        64 * 1024,
        64,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info("w25x64", 0xef3017, 0, 64 * 1024, 128, C::SECT_4K),
    CatalogEntry::info(
        "w25q64dw",
        0xef6017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q64jv",
        0xef7017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q128fw",
        0xef6018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q128jv",
        0xef7018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q256fw",
        0xef6019,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q256jw",
        0xef7019,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info("w25q80", 0xef5014, 0, 64 * 1024, 16, C::SECT_4K),
    CatalogEntry::info(
        "w25q80bl",
        0xef4014,
        0,
        64 * 1024,
        16,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "w25q16cl",
        0xef4015,
        0,
        64 * 1024,
        32,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "w25q64cv",
        0xef4017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "w25q128",
        0xef4018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ).union(C::HAS_LOCK).union(C::HAS_TB),
    ),
    CatalogEntry::info(
        "w25q256",
        0xef4019,
        0,
        64 * 1024,
        512,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "w25m512jw",
        0xef6119,
        0,
        64 * 1024,
        1024,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "w25m512jv",
        0xef7119,
        0,
        64 * 1024,
        1024,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
];

/// XMC (Wuhan Xinxin Semiconductor Manufacturing Corp.)
#[cfg(feature = "xmc")]
const XMC: &[CatalogEntry] = &[
    CatalogEntry::info(
        "XM25QH64A",
        0x207017,
        0,
        64 * 1024,
        128,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
    CatalogEntry::info(
        "XM25QH128A",
        0x207018,
        0,
        64 * 1024,
        256,
        C::SECT_4K.union(C::DUAL_READ).union(C::QUAD_READ),
    ),
];

/// Every built in entry, in declaration order
pub fn entries() -> impl Iterator<Item = &'static CatalogEntry> {
    VENDORS.iter().flat_map(|table| table.iter())
}

/// First entry matching `id`, built in parts first, then `extra`
pub fn find(id: &JedecId, extra: &'static [CatalogEntry]) -> Option<&'static CatalogEntry> {
    entries().chain(extra.iter()).find(|entry| entry.matches(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &[CatalogEntry] = &[CatalogEntry::info(
        "custom",
        0xAB_CDEF,
        0,
        64 * 1024,
        8,
        C::SECT_4K,
    )];

    #[test]
    fn id_length_follows_ids() {
        let plain = CatalogEntry::info("a", 0xef4018, 0, 64 * 1024, 256, C::empty());
        assert_eq!(plain.id_len, 3);
        assert_eq!(&plain.id[..3], &[0xef, 0x40, 0x18]);

        let ext = CatalogEntry::info("b", 0x010219, 0x4d01, 64 * 1024, 512, C::empty());
        assert_eq!(ext.id_len, 5);
        assert_eq!(&ext.id[..5], &[0x01, 0x02, 0x19, 0x4d, 0x01]);

        let six = CatalogEntry::info6("c", 0x20ba19, 0x104400, 64 * 1024, 512, C::empty());
        assert_eq!(six.id_len, 6);
        assert_eq!(six.id, [0x20, 0xba, 0x19, 0x10, 0x44, 0x00]);

        let none = CatalogEntry::info("d", 0, 0, 64 * 1024, 1, C::empty());
        assert_eq!(none.id_len, 0);
    }

    #[test]
    fn matching_is_prefix_exact() {
        let entry = CatalogEntry::info("a", 0xef4018, 0, 64 * 1024, 256, C::empty());
        assert!(entry.matches(&JedecId([0xef, 0x40, 0x18, 0x00, 0x00])));
        assert!(entry.matches(&JedecId([0xef, 0x40, 0x18, 0x12, 0x34])));
        assert!(!entry.matches(&JedecId([0xef, 0x40, 0x19, 0x00, 0x00])));
        assert!(!entry.matches(&JedecId([0xee, 0x40, 0x18, 0x00, 0x00])));

        let ext = CatalogEntry::info("b", 0x010219, 0x4d01, 64 * 1024, 512, C::empty());
        assert!(ext.matches(&JedecId([0x01, 0x02, 0x19, 0x4d, 0x01])));
        assert!(!ext.matches(&JedecId([0x01, 0x02, 0x19, 0x4d, 0x00])));
    }

    #[test]
    fn empty_and_overlong_ids_never_match() {
        let none = CatalogEntry::info("d", 0, 0, 64 * 1024, 1, C::empty());
        assert!(!none.matches(&JedecId([0; 5])));

        let six = CatalogEntry::info6("c", 0x20ba19, 0x104400, 64 * 1024, 512, C::empty());
        assert!(!six.matches(&JedecId([0x20, 0xba, 0x19, 0x10, 0x44])));
    }

    #[test]
    fn custom_parts_are_scanned_last() {
        let id = JedecId([0xAB, 0xCD, 0xEF, 0, 0]);
        assert_eq!(find(&id, &[]), None);
        assert_eq!(find(&id, CUSTOM).map(|e| e.name), Some("custom"));
    }

    #[cfg(feature = "winbond")]
    #[test]
    fn finds_winbond_w25q128() {
        let entry = find(&JedecId([0xEF, 0x40, 0x18, 0, 0]), &[]).unwrap();
        assert_eq!(entry.name, "w25q128");
        assert_eq!(entry.sector_count, 256);
        assert_eq!(entry.page_size, 256);
        assert_eq!(entry.capacity(), 16 * 1024 * 1024);
        assert!(entry.flags.contains(C::SECT_4K | C::HAS_LOCK));
    }

    #[cfg(feature = "spansion")]
    #[test]
    fn extended_id_selects_between_variants() {
        let s0 = find(&JedecId([0x01, 0x02, 0x19, 0x4d, 0x00]), &[]).unwrap();
        let s1 = find(&JedecId([0x01, 0x02, 0x19, 0x4d, 0x01]), &[]).unwrap();
        assert_eq!(s0.name, "s25fl256s0");
        assert_eq!(s1.name, "s25fl256s1");
    }

    #[cfg(feature = "stmicro")]
    #[test]
    fn six_byte_entry_falls_through_to_three_byte_one() {
        let entry = find(&JedecId([0x20, 0xba, 0x19, 0x10, 0x44]), &[]).unwrap();
        assert_eq!(entry.name, "n25q256a");
    }

    #[test]
    fn every_entry_has_geometry() {
        for entry in entries() {
            assert!(entry.sector_size > 0, "{}", entry.name);
            assert!(entry.sector_count > 0, "{}", entry.name);
            assert_eq!(entry.page_size, 256, "{}", entry.name);
            assert!(matches!(entry.id_len, 3 | 5 | 6), "{}", entry.name);
        }
    }
}
