use crate::sim::error::{Result, SimError};
use std::fmt;

pub const PAGE_SHIFT: u32 = 12;
pub const OFFSET_MASK: u32 = (1 << PAGE_SHIFT) - 1;
/// Entries per level of the two-level page table (10 index bits each).
pub const TABLE_ENTRIES: usize = 1024;
const INDEX_MASK: u32 = (TABLE_ENTRIES as u32) - 1;
const DIR_SHIFT: u32 = 22;

/// A 32-bit virtual address, split as `pdi[31:22] | pti[21:12] | offset[11:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualAddress(pub u32);

impl VirtualAddress {
    /// Start of the page numbered `vpn`.
    pub fn from_vpn(vpn: u32) -> Self {
        VirtualAddress(vpn << PAGE_SHIFT)
    }

    pub fn pdi(self) -> usize {
        ((self.0 >> DIR_SHIFT) & INDEX_MASK) as usize
    }

    pub fn pti(self) -> usize {
        ((self.0 >> PAGE_SHIFT) & INDEX_MASK) as usize
    }

    pub fn offset(self) -> u32 {
        self.0 & OFFSET_MASK
    }

    pub fn vpn(self) -> u32 {
        self.0 >> PAGE_SHIFT
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// `(pfn << 12) | offset`.
pub fn physical_address(pfn: u32, offset: u32) -> u32 {
    (pfn << PAGE_SHIFT) | (offset & OFFSET_MASK)
}

/// Parse one trace token: optional `0x`/`0X` followed by 1-8 hex digits.
/// `line` is only used for the error.
pub fn parse_address(token: &str, line: usize) -> Result<VirtualAddress> {
    let trimmed = token.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let malformed = || SimError::MalformedAddress {
        line,
        token: trimmed.to_string(),
    };
    if digits.is_empty() || digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    u32::from_str_radix(digits, 16)
        .map(VirtualAddress)
        .map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose() {
        let va = VirtualAddress(0xFFC0_3ABC);
        assert_eq!(va.pdi(), 0x3FF);
        assert_eq!(va.pti(), 0x003);
        assert_eq!(va.offset(), 0xABC);
        assert_eq!(va.vpn(), 0xFFC03);
        assert_eq!(VirtualAddress::from_vpn(va.vpn()), VirtualAddress(0xFFC0_3000));
    }

    #[test]
    fn test_physical_address() {
        assert_eq!(physical_address(5, 0x123), 0x5123);
        assert_eq!(physical_address(0, 0xFFF), 0xFFF);
    }

    #[test]
    fn test_display_is_zero_padded_uppercase() {
        assert_eq!(VirtualAddress(0xab).to_string(), "0x000000AB");
    }

    #[test]
    fn test_parse_accepts_prefix_and_bare_hex() {
        assert_eq!(parse_address("0x00001000", 1).unwrap(), VirtualAddress(0x1000));
        assert_eq!(parse_address("  DEADbeef\r", 1).unwrap(), VirtualAddress(0xDEAD_BEEF));
        assert_eq!(parse_address("0X7", 1).unwrap(), VirtualAddress(7));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["0x", "xyz", "0x1_000", "123456789", "-1", "0x12 34"] {
            match parse_address(bad, 3) {
                Err(SimError::MalformedAddress { line, .. }) => assert_eq!(line, 3),
                other => panic!("{bad:?} parsed as {other:?}"),
            }
        }
    }
}
