//! Address width handling
//!
//! Chips up to 16 MiB use 3-byte addresses; larger parts switch to 4-byte
//! mode, which the driver detects through the security register.

/// Address width for addressed flash commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddressWidth {
    /// 3-byte (24-bit) address - up to 16MB
    #[default]
    ThreeByte,
    /// 4-byte (32-bit) address - up to 4GB
    FourByte,
}

impl AddressWidth {
    /// Get the number of address bytes on the wire
    pub const fn bytes(&self) -> usize {
        match self {
            Self::ThreeByte => 3,
            Self::FourByte => 4,
        }
    }

    /// Maximum addressable size for this width
    pub const fn max_size(&self) -> u32 {
        match self {
            Self::ThreeByte => 16 * 1024 * 1024,
            Self::FourByte => u32::MAX,
        }
    }

    /// Encode `address` big-endian (high byte first) into `buf`, returning
    /// the slice that goes on the wire.
    pub fn encode(self, address: u32, buf: &mut [u8; 4]) -> &[u8] {
        match self {
            Self::ThreeByte => {
                buf[0] = (address >> 16) as u8;
                buf[1] = (address >> 8) as u8;
                buf[2] = address as u8;
                &buf[..3]
            }
            Self::FourByte => {
                buf[0] = (address >> 24) as u8;
                buf[1] = (address >> 16) as u8;
                buf[2] = (address >> 8) as u8;
                buf[3] = address as u8;
                &buf[..4]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_byte_encoding() {
        let mut buf = [0u8; 4];
        assert_eq!(
            AddressWidth::ThreeByte.encode(0x123456, &mut buf),
            &[0x12, 0x34, 0x56]
        );
    }

    #[test]
    fn four_byte_encoding() {
        let mut buf = [0u8; 4];
        assert_eq!(
            AddressWidth::FourByte.encode(0x0123_4567, &mut buf),
            &[0x01, 0x23, 0x45, 0x67]
        );
    }

    #[test]
    fn widths() {
        assert_eq!(AddressWidth::ThreeByte.bytes(), 3);
        assert_eq!(AddressWidth::FourByte.bytes(), 4);
        assert!(AddressWidth::ThreeByte.max_size() < AddressWidth::FourByte.max_size());
    }
}
