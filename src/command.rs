/// Opcodes understood by the supported SPI NOR and DataFlash parts
#[cfg_attr(not(feature = "recovery"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Command {
    /// Manufacturer and device ID read
    ReadIdentification = 0x9F,
    /// Continuous array read, one dummy byte after the address
    ReadF = 0x0B,
    /// Plain array read, reserved
    #[allow(dead_code)]
    Read = 0x03,

    /// AT45 status register read
    ReadStatusDataflash = 0xD7,
    /// AT45 page erase
    PageEraseDataflash = 0x81,

    /// AT25/AT26 status register read
    ReadStatus = 0x05,
    WriteEnable = 0x06,
    WriteStatus = 0x01,
    /// AT25/AT26 4kB block erase
    BlockErase4k = 0x20,

    Dummy = 0x00,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}
