//! Typed views of the status and security registers

use bitflags::bitflags;

use crate::spi::opcodes;

bitflags! {
    /// Status register bits (RDSR)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Write in progress - an erase or program is executing
        const WIP = opcodes::SR_WIP;
        /// Write enable latch - set by WREN, self-clears after one
        /// erase/program
        const WEL = opcodes::SR_WEL;
        /// Block protect bits BP0-BP3
        const BP = 0b0011_1100;
        /// Quad enable
        const QE = opcodes::SR_QE;
        /// Status register write disable
        const SRWD = 0b1000_0000;
    }
}

bitflags! {
    /// Security register bits (RDSCUR)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Security: u8 {
        /// Secured OTP area locked
        const LDSO = 0b0000_0010;
        /// Chip is operating in 4-byte address mode
        const FOUR_BYTE = opcodes::SCUR_4BYTE;
        /// Program failed
        const P_FAIL = 0b0010_0000;
        /// Erase failed
        const E_FAIL = 0b0100_0000;
        /// Write protect selection
        const WPSEL = opcodes::SCUR_WPSEL;
    }
}
