//! Simulated serial flash on a bus shared with a chip select pin.
//!
//! The bus and the pin are wired into an `ExclusiveDevice`, the same way a
//! board wires a real SPI peripheral, so chip select handling is the one
//! from `embedded-hal-bus`.

#![allow(dead_code)]

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, InputPin, OutputPin},
    spi::{self, ErrorKind, SpiBus},
};
use embedded_hal_bus::spi::{DeviceError, ExclusiveDevice};
use sfboot::SpiController;

pub const W25Q128_ID: [u8; 5] = [0xEF, 0x40, 0x18, 0x00, 0x00];
pub const AT45DB161D_ID: [u8; 5] = [0x1F, 0x26, 0x00, 0x00, 0x00];
pub const AT26DF321_ID: [u8; 5] = [0x1F, 0x47, 0x00, 0x00, 0x00];
pub const W25Q256_ID: [u8; 5] = [0xEF, 0x40, 0x19, 0x00, 0x00];
/// Micron N25Q family code, not in the catalog
pub const N25Q_ID: [u8; 5] = [0x20, 0xA9, 0x77, 0x00, 0x00];

/// Injected bus failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl spi::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub type BusError = DeviceError<SimError, Infallible>;

/// Status register values handed out in order, the last one repeats
#[derive(Debug, Default)]
pub struct Script {
    values: Vec<u8>,
    reads: usize,
}

impl Script {
    pub fn new(values: &[u8]) -> Self {
        Self {
            values: values.to_vec(),
            reads: 0,
        }
    }

    fn next(&mut self) -> u8 {
        let value = self
            .values
            .get(self.reads)
            .or(self.values.last())
            .copied()
            .unwrap_or(0xFF);
        self.reads += 1;
        value
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

/// Device state, shared by the bus and the chip select pin
pub struct Sim {
    pub id: [u8; 5],
    pub dataflash_status: Script,
    pub nor_status: Script,
    /// Indexed by device address
    pub memory: Vec<u8>,
    /// Read commands carry 4 address bytes instead of 3 and a dummy
    pub four_byte: bool,
    /// Fail any transfer of a command starting with this opcode
    pub fail_opcode: Option<u8>,
    /// Command bytes of every completed chip select cycle
    pub frames: Vec<Vec<u8>>,
    pub selected: bool,
    pub selects: usize,
    /// Set if a non zero byte was shifted out while reading a response
    pub dirty_mosi: bool,
    current: Vec<u8>,
    responding: bool,
}

impl Sim {
    pub fn new(id: [u8; 5], size: usize) -> Self {
        Self {
            id,
            dataflash_status: Script::default(),
            nor_status: Script::default(),
            memory: vec![0xFF; size],
            four_byte: false,
            fail_opcode: None,
            frames: Vec::new(),
            selected: false,
            selects: 0,
            dirty_mosi: false,
            current: Vec::new(),
            responding: false,
        }
    }

    pub fn with_dataflash_status(mut self, values: &[u8]) -> Self {
        self.dataflash_status = Script::new(values);
        self
    }

    pub fn with_nor_status(mut self, values: &[u8]) -> Self {
        self.nor_status = Script::new(values);
        self
    }

    pub fn with_four_byte_addresses(mut self) -> Self {
        self.four_byte = true;
        self
    }

    pub fn with_fault(mut self, opcode: u8) -> Self {
        self.fail_opcode = Some(opcode);
        self
    }

    pub fn put(&mut self, addr: usize, bytes: &[u8]) {
        self.memory[addr..addr + bytes.len()].copy_from_slice(bytes);
    }

    /// Frames whose first byte is `opcode`
    pub fn frames_with(&self, opcode: u8) -> Vec<&[u8]> {
        self.frames
            .iter()
            .filter(|f| f.first() == Some(&opcode))
            .map(Vec::as_slice)
            .collect()
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.frames.iter().filter_map(|f| f.first().copied()).collect()
    }

    fn select(&mut self) {
        assert!(!self.selected, "chip select asserted twice");
        self.selected = true;
        self.selects += 1;
        self.current.clear();
        self.responding = false;
    }

    fn deselect(&mut self) {
        if self.selected {
            self.selected = false;
            self.frames.push(std::mem::take(&mut self.current));
        }
    }

    fn check_fault(&self) -> Result<(), SimError> {
        match (self.fail_opcode, self.current.first()) {
            (Some(op), Some(first)) if op == *first => Err(SimError),
            _ => Ok(()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        assert!(self.selected, "write without chip select");
        assert!(!self.responding, "command bytes after the response phase");
        self.current.extend_from_slice(bytes);
        self.check_fault()
    }

    fn respond(&mut self, buff: &mut [u8]) -> Result<(), SimError> {
        assert!(self.selected, "read without chip select");
        self.check_fault()?;
        self.dirty_mosi |= buff.iter().any(|b| *b != 0);
        self.responding = true;

        match self.current.first().copied() {
            Some(0x9F) => {
                for (b, id) in buff.iter_mut().zip(self.id.iter().chain(std::iter::repeat(&0))) {
                    *b = *id;
                }
            }
            Some(0xD7) => buff.iter_mut().for_each(|b| *b = self.dataflash_status.next()),
            Some(0x05) => buff.iter_mut().for_each(|b| *b = self.nor_status.next()),
            Some(0x0B) => {
                let c = &self.current;
                let addr = if self.four_byte {
                    u32::from_be_bytes([c[1], c[2], c[3], c[4]])
                } else {
                    u32::from_be_bytes([0, c[1], c[2], c[3]])
                } as usize;
                for (i, b) in buff.iter_mut().enumerate() {
                    *b = self.memory.get(addr + i).copied().unwrap_or(0xFF);
                }
            }
            other => panic!("unexpected read for command {:x?}", other),
        }
        Ok(())
    }
}

pub type Shared = Rc<RefCell<Sim>>;

pub struct SimBus(Shared);

impl spi::ErrorType for SimBus {
    type Error = SimError;
}

impl SpiBus for SimBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), SimError> {
        self.0.borrow_mut().respond(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SimError> {
        self.0.borrow_mut().write(words)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SimError> {
        self.0.borrow_mut().write(write)?;
        self.0.borrow_mut().respond(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SimError> {
        self.0.borrow_mut().respond(words)
    }

    fn flush(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// Active low chip select
pub struct SimCs(Shared);

impl digital::ErrorType for SimCs {
    type Error = Infallible;
}

impl OutputPin for SimCs {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().select();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().deselect();
        Ok(())
    }
}

/// Adds up every requested delay
#[derive(Debug, Default)]
pub struct SimDelay {
    pub total_ns: u64,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

pub type Device = ExclusiveDevice<SimBus, SimCs, SimDelay>;

/// Wire `sim` to a chip select and return the device with a handle on the state
pub fn attach(sim: Sim) -> (Shared, Device) {
    let shared = Rc::new(RefCell::new(sim));
    let device = ExclusiveDevice::new(
        SimBus(shared.clone()),
        SimCs(shared.clone()),
        SimDelay::default(),
    )
    .unwrap();
    (shared, device)
}

/// Recovery push button, pulls the line low when pressed
pub struct Button {
    pub pressed: bool,
}

impl digital::ErrorType for Button {
    type Error = Infallible;
}

impl InputPin for Button {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed)
    }
}

/// Counts the platform calls
#[derive(Debug, Default)]
pub struct Controller {
    pub fail_init: bool,
    pub enabled: bool,
    pub inits: usize,
    pub enables: usize,
    pub disables: usize,
}

impl SpiController for Controller {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.inits += 1;
        if self.fail_init {
            Err(())
        } else {
            Ok(())
        }
    }

    fn enable(&mut self) {
        self.enables += 1;
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.disables += 1;
        self.enabled = false;
    }
}

/// Legacy U-Boot header for `size` bytes of data
pub fn uimage_header(size: u32) -> [u8; 64] {
    let mut h = [0u8; 64];
    h[0..4].copy_from_slice(&0x2705_1956u32.to_be_bytes());
    h[12..16].copy_from_slice(&size.to_be_bytes());
    h
}

/// Flattened device tree header with the given total size
pub fn fdt_header(total: u32) -> [u8; 40] {
    let mut h = [0u8; 40];
    h[0..4].copy_from_slice(&0xD00D_FEEDu32.to_be_bytes());
    h[4..8].copy_from_slice(&total.to_be_bytes());
    h
}

/// Deterministic image content
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}
