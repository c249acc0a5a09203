use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

/// The size of the flat address space, in bytes.
pub const MEMORY_SIZE: usize = 0x10000;

/// The first address of the high I/O page used by the `ldh` instructions.
pub const HIGH_PAGE_START: u16 = 0xff00;

//===========================================================================//

/// A flat 64KB memory image.  Addresses wrap around at the top of the
/// address space.
#[derive(Clone, Eq, PartialEq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Returns a new memory image with every byte zeroed.
    pub fn new() -> Memory {
        Memory { bytes: vec![0u8; MEMORY_SIZE].into_boxed_slice() }
    }

    /// Reads the byte at the given address.
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[usize::from(addr)]
    }

    /// Writes a byte to the given address.
    pub fn write_byte(&mut self, addr: u16, data: u8) {
        self.bytes[usize::from(addr)] = data;
    }

    /// Reads the little-endian word stored at `addr` and `addr + 1`.
    pub fn read_word(&self, addr: u16) -> u16 {
        let buf = [self.read_byte(addr), self.read_byte(addr.wrapping_add(1))];
        LittleEndian::read_u16(&buf)
    }

    /// Writes a word in little-endian order to `addr` and `addr + 1`.
    pub fn write_word(&mut self, addr: u16, word: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, word);
        self.write_byte(addr, buf[0]);
        self.write_byte(addr.wrapping_add(1), buf[1]);
    }

    /// Copies bytes into memory starting at the given address.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let mut addr = addr;
        for &byte in data {
            self.write_byte(addr, byte);
            addr = addr.wrapping_add(1);
        }
    }

    /// Copies `len` bytes out of memory starting at the given address.
    pub fn read_range(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.read_byte(addr.wrapping_add(offset as u16)))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|&&byte| byte != 0).count();
        write!(f, "Memory {{ {used} nonzero bytes }}")
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::Memory;

    #[test]
    fn bytes() {
        let mut mem = Memory::new();
        assert_eq!(mem.read_byte(0xc000), 0);
        mem.write_byte(0xc000, 0x42);
        assert_eq!(mem.read_byte(0xc000), 0x42);
        mem.write_byte(0xffff, 0x99);
        assert_eq!(mem.read_byte(0xffff), 0x99);
    }

    #[test]
    fn words_are_little_endian() {
        let mut mem = Memory::new();
        mem.write_word(0xc000, 0x1234);
        assert_eq!(mem.read_byte(0xc000), 0x34);
        assert_eq!(mem.read_byte(0xc001), 0x12);
        assert_eq!(mem.read_word(0xc000), 0x1234);
    }

    #[test]
    fn words_wrap_around() {
        let mut mem = Memory::new();
        mem.write_word(0xffff, 0xabcd);
        assert_eq!(mem.read_byte(0xffff), 0xcd);
        assert_eq!(mem.read_byte(0x0000), 0xab);
        assert_eq!(mem.read_word(0xffff), 0xabcd);
    }

    #[test]
    fn load_and_read_range() {
        let mut mem = Memory::new();
        mem.load(0x0100, b"hello");
        assert_eq!(mem.read_range(0x0100, 5), b"hello".to_vec());
        mem.load(0xfffe, &[1, 2, 3]);
        assert_eq!(mem.read_range(0xfffe, 3), vec![1, 2, 3]);
        assert_eq!(mem.read_byte(0x0000), 3);
    }
}

//===========================================================================//
