//! Image length discovery from the first page of an image.

/// What an image slot holds
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// OS kernel image
    Kernel,
    /// Flattened device tree blob
    DeviceTree,
}

/// Resolve the total length of an image from its leading bytes
pub trait HeaderParser {
    /// `None` when the header is not valid for `kind`
    fn image_length(&self, kind: ImageKind, header: &[u8]) -> Option<u32>;
}

/// Legacy U-Boot image magic, big endian
pub const UIMAGE_MAGIC: u32 = 0x2705_1956;
pub const UIMAGE_HEADER_SIZE: u32 = 64;
/// ARM zImage magic, little endian at [`ZIMAGE_MAGIC_OFFSET`]
pub const ZIMAGE_MAGIC: u32 = 0x016F_2818;
pub const ZIMAGE_MAGIC_OFFSET: usize = 0x24;
pub const FDT_MAGIC: u32 = 0xD00D_FEED;
pub const FDT_HEADER_SIZE: u32 = 40;

fn be32(bytes: &[u8], at: usize) -> Option<u32> {
    let word = bytes.get(at..at + 4)?;
    Some(u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
}

fn le32(bytes: &[u8], at: usize) -> Option<u32> {
    let word = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

/// uImage and zImage kernels, flattened device trees
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardHeaders;

impl StandardHeaders {
    /// Data size plus the 64 byte header of a legacy U-Boot image
    pub fn uimage_length(header: &[u8]) -> Option<u32> {
        if be32(header, 0)? != UIMAGE_MAGIC {
            return None;
        }
        be32(header, 12)?.checked_add(UIMAGE_HEADER_SIZE)
    }

    /// End minus start address of an ARM zImage
    pub fn zimage_length(header: &[u8]) -> Option<u32> {
        if le32(header, ZIMAGE_MAGIC_OFFSET)? != ZIMAGE_MAGIC {
            return None;
        }
        let start = le32(header, ZIMAGE_MAGIC_OFFSET + 4)?;
        let end = le32(header, ZIMAGE_MAGIC_OFFSET + 8)?;
        end.checked_sub(start)
    }

    /// `totalsize` of a flattened device tree
    pub fn fdt_length(header: &[u8]) -> Option<u32> {
        if be32(header, 0)? != FDT_MAGIC {
            return None;
        }
        let total = be32(header, 4)?;
        (total >= FDT_HEADER_SIZE).then_some(total)
    }
}

impl HeaderParser for StandardHeaders {
    fn image_length(&self, kind: ImageKind, header: &[u8]) -> Option<u32> {
        match kind {
            ImageKind::Kernel => {
                Self::uimage_length(header).or_else(|| Self::zimage_length(header))
            }
            ImageKind::DeviceTree => Self::fdt_length(header),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uimage(size: u32) -> [u8; 64] {
        let mut h = [0u8; 64];
        h[0..4].copy_from_slice(&UIMAGE_MAGIC.to_be_bytes());
        h[12..16].copy_from_slice(&size.to_be_bytes());
        h
    }

    #[test]
    fn uimage_adds_header() {
        let h = uimage(0x0030_0000);
        assert_eq!(
            StandardHeaders.image_length(ImageKind::Kernel, &h),
            Some(0x0030_0040)
        );
        assert_eq!(StandardHeaders.image_length(ImageKind::DeviceTree, &h), None);
    }

    #[test]
    fn zimage_uses_start_and_end() {
        let mut h = [0u8; 64];
        h[0x24..0x28].copy_from_slice(&ZIMAGE_MAGIC.to_le_bytes());
        h[0x28..0x2C].copy_from_slice(&0u32.to_le_bytes());
        h[0x2C..0x30].copy_from_slice(&0x0012_3456u32.to_le_bytes());
        assert_eq!(
            StandardHeaders.image_length(ImageKind::Kernel, &h),
            Some(0x0012_3456)
        );

        // end before start
        h[0x28..0x2C].copy_from_slice(&0x0100_0000u32.to_le_bytes());
        assert_eq!(StandardHeaders.image_length(ImageKind::Kernel, &h), None);
    }

    #[test]
    fn fdt_total_size() {
        let mut h = [0u8; 40];
        h[0..4].copy_from_slice(&FDT_MAGIC.to_be_bytes());
        h[4..8].copy_from_slice(&0x3000u32.to_be_bytes());
        assert_eq!(
            StandardHeaders.image_length(ImageKind::DeviceTree, &h),
            Some(0x3000)
        );

        h[4..8].copy_from_slice(&8u32.to_be_bytes());
        assert_eq!(StandardHeaders.image_length(ImageKind::DeviceTree, &h), None);
    }

    #[test]
    fn garbage_and_short_headers() {
        assert_eq!(StandardHeaders.image_length(ImageKind::Kernel, &[0xFF; 256]), None);
        assert_eq!(StandardHeaders.image_length(ImageKind::DeviceTree, &[0xFF; 256]), None);
        assert_eq!(StandardHeaders.image_length(ImageKind::Kernel, &uimage(1)[..8]), None);
        assert_eq!(StandardHeaders.image_length(ImageKind::DeviceTree, &[]), None);
    }
}
