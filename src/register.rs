use bit::BitIndex;

pub struct ManufacturerId(pub u8);
pub struct FamilyCode(pub u8);

/// Raw bytes returned by the Read-ID command
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JedecId(pub [u8; 5]);

impl JedecId {
    pub fn manufacturer(&self) -> ManufacturerId {
        ManufacturerId(self.0[0])
    }

    /// Upper three bits of the first device byte
    pub fn family(&self) -> FamilyCode {
        FamilyCode(self.0[1] & 0xE0)
    }
}

/// AT45 DataFlash status register
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataflashStatus {
    pub ready: bool,
    pub compare_mismatch: bool,
    /// Density code, bits 5..2 left in place
    pub density: u8,
    pub sector_protection: bool,
    /// Page size configured to a power of two
    pub power_of_two: bool,
}

impl From<u8> for DataflashStatus {
    fn from(val: u8) -> DataflashStatus {
        DataflashStatus {
            ready: val.bit(7),
            compare_mismatch: val.bit(6),
            density: val & 0x3C,
            sector_protection: val.bit(1),
            power_of_two: val.bit(0),
        }
    }
}

/// AT25/AT26 style status register
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NorStatus {
    /// Sector protection registers locked
    pub protection_locked: bool,
    pub erase_program_error: bool,
    pub write_protect_pin: bool,
    /// Software protection state, 0 when every sector is unprotected
    pub software_protection: u8,
    pub write_enable_latch: bool,
    /// Set while an erase or program is in progress
    pub busy: bool,
}

impl NorStatus {
    pub fn is_protected(&self) -> bool {
        self.software_protection != 0
    }
}

impl From<u8> for NorStatus {
    fn from(val: u8) -> NorStatus {
        NorStatus {
            protection_locked: val.bit(7),
            erase_program_error: val.bit(5),
            write_protect_pin: val.bit(4),
            software_protection: val.bit_range(2..4),
            write_enable_latch: val.bit(1),
            busy: val.bit(0),
        }
    }
}
