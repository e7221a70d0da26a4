//! Boot image loading: probe, optional recovery, length discovery, bulk reads.

use core::convert::Infallible;

use embedded_hal::{delay::DelayNs, digital::InputPin, spi::SpiDevice};

use crate::{
    channel::Channel,
    error::{Error, ProbeFailure},
    flash::SerialFlash,
    header::{HeaderParser, ImageKind},
    Config,
};

/// Platform side of the SPI controller
pub trait SpiController {
    type Error;

    /// Pin muxing, clocks and controller mode
    fn init(&mut self) -> Result<(), Self::Error>;
    fn enable(&mut self);
    fn disable(&mut self);
}

/// A controller that needs no platform setup
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOn;

impl SpiController for AlwaysOn {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn enable(&mut self) {}

    fn disable(&mut self) {}
}

/// The input sampled at boot to request a recovery erase
pub trait RecoverySignal {
    fn is_asserted(&mut self) -> bool;
}

/// Asserted when the pin reads low, like a button to ground. Read errors
/// count as not asserted.
pub struct ActiveLow<P>(pub P);

/// Asserted when the pin reads high. Read errors count as not asserted.
pub struct ActiveHigh<P>(pub P);

/// Never asserted
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecovery;

impl<P: InputPin> RecoverySignal for ActiveLow<P> {
    fn is_asserted(&mut self) -> bool {
        self.0.is_low().unwrap_or(false)
    }
}

impl<P: InputPin> RecoverySignal for ActiveHigh<P> {
    fn is_asserted(&mut self) -> bool {
        self.0.is_high().unwrap_or(false)
    }
}

impl RecoverySignal for NoRecovery {
    fn is_asserted(&mut self) -> bool {
        false
    }
}

/// An image to copy from flash into memory
pub struct ImageRequest<'a> {
    pub kind: ImageKind,
    /// Byte offset of the image in flash
    pub offset: u32,
    /// Where the image goes, its length is the capacity
    pub dest: &'a mut [u8],
    /// Image length, discovered from the header when `None`
    pub length: Option<u32>,
}

impl<'a> ImageRequest<'a> {
    pub fn kernel(offset: u32, dest: &'a mut [u8]) -> Self {
        Self {
            kind: ImageKind::Kernel,
            offset,
            dest,
            length: None,
        }
    }

    pub fn device_tree(offset: u32, dest: &'a mut [u8]) -> Self {
        Self {
            kind: ImageKind::DeviceTree,
            offset,
            dest,
            length: None,
        }
    }

    /// Skip length discovery and copy exactly `length` bytes
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// How a boot attempt that did not fail ended
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// Images copied, continue to the next stage
    Loaded { image_len: u32, dtb_len: Option<u32> },
    /// Page 0 was erased on request, do not continue booting
    RecoveryPerformed,
}

/// Loads boot images out of a serial flash
pub struct Loader<SPI, CTRL, D> {
    spi: SPI,
    controller: CTRL,
    delay: D,
    config: Config,
}

impl<SPI, CTRL, D, E> Loader<SPI, CTRL, D>
where
    SPI: SpiDevice<Error = E>,
    CTRL: SpiController,
    D: DelayNs,
{
    pub fn new(spi: SPI, controller: CTRL, delay: D) -> Self {
        Self {
            spi,
            controller,
            delay,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the owned peripherals
    pub fn release(self) -> (SPI, CTRL, D) {
        (self.spi, self.controller, self.delay)
    }

    /// Run one boot attempt.
    ///
    /// The controller is disabled before returning, whatever the outcome.
    pub fn load<H, R>(
        &mut self,
        headers: &H,
        recovery: &mut R,
        image: &mut ImageRequest<'_>,
        dtb: Option<&mut ImageRequest<'_>>,
    ) -> Result<BootOutcome, Error<E>>
    where
        H: HeaderParser,
        R: RecoverySignal,
    {
        if self.controller.init().is_err() {
            error!("SF: Fail to initialize spi");
            return Err(ProbeFailure::BusInit.into());
        }

        self.controller.enable();
        let res = self.boot(headers, recovery, image, dtb);
        self.controller.disable();
        res
    }

    fn boot<H, R>(
        &mut self,
        headers: &H,
        recovery: &mut R,
        image: &mut ImageRequest<'_>,
        dtb: Option<&mut ImageRequest<'_>>,
    ) -> Result<BootOutcome, Error<E>>
    where
        H: HeaderParser,
        R: RecoverySignal,
    {
        let mut flash = SerialFlash::probe(Channel::new(&mut self.spi), &self.config)
            .inspect_err(|_| error!("SF: Fail to probe spi flash"))?;

        #[cfg(feature = "recovery")]
        {
            use crate::recovery::{recover, RecoveryOutcome};
            let outcome = recover(&mut flash, recovery, &mut self.delay, &self.config)?;
            if outcome == RecoveryOutcome::Succeeded {
                return Ok(BootOutcome::RecoveryPerformed);
            }
        }
        #[cfg(not(feature = "recovery"))]
        let _ = recovery;

        let image_len = load_image(&mut flash, headers, image)?;
        let dtb_len = match dtb {
            Some(dtb) => Some(load_image(&mut flash, headers, dtb)?),
            None => None,
        };

        Ok(BootOutcome::Loaded { image_len, dtb_len })
    }
}

/// Read one page at the image offset and ask `headers` for the image length
fn discover_length<SPI, E, H>(
    flash: &mut SerialFlash<SPI>,
    headers: &H,
    request: &mut ImageRequest<'_>,
) -> Result<u32, Error<E>>
where
    SPI: SpiDevice<Error = E>,
    H: HeaderParser,
{
    let page_size = flash.descriptor().page_size as usize;
    let header = request.dest.get_mut(..page_size).ok_or(Error::Length)?;
    flash.read(request.offset, header)?;

    headers.image_length(request.kind, header).ok_or_else(|| {
        error!("SF: invalid {:?} header at {:#x}", request.kind, request.offset);
        Error::Length
    })
}

/// Copy one image into its destination, returns its length
fn load_image<SPI, E, H>(
    flash: &mut SerialFlash<SPI>,
    headers: &H,
    request: &mut ImageRequest<'_>,
) -> Result<u32, Error<E>>
where
    SPI: SpiDevice<Error = E>,
    H: HeaderParser,
{
    let length = match request.length {
        Some(length) => length,
        None => discover_length(flash, headers, request)?,
    };

    let dest = request
        .dest
        .get_mut(..length as usize)
        .filter(|dest| !dest.is_empty())
        .ok_or(Error::Length)
        .inspect_err(|_| {
            error!("SF: image length {:#x} does not fit", length);
        })?;

    info!(
        "SF: Copy {:#x} bytes from {:#x} to {:#x}",
        length,
        request.offset,
        dest.as_ptr() as usize
    );
    flash
        .read(request.offset, dest)
        .inspect_err(|_| error!("** SF: Serial flash read error**"))?;

    request.length = Some(length);
    Ok(length)
}
