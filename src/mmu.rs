//! MMU (Memory Management Unit) functions and structures.

use crate::{
    consts::{IE_ADDR, IF_ADDR, JOYP_ADDR},
    pad::Pad,
    ppu::Ppu,
    rom::Cartridge,
    timer::Timer,
    warnln,
};

pub const RAM_SIZE: usize = 8192;
pub const HRAM_SIZE: usize = 128;

/// The five interrupt sources in priority order, the bit
/// position doubles as the index of the handler vector.
pub const INT_VBLANK: u8 = 0;
pub const INT_STAT: u8 = 1;
pub const INT_TIMER: u8 = 2;
pub const INT_SERIAL: u8 = 3;
pub const INT_PAD: u8 = 4;

/// Central bus of the system, routing every CPU memory access
/// to the component that owns the addressed region and keeping
/// the memory sections that have no dedicated owner (work RAM
/// and high RAM).
pub struct Mmu {
    /// Register that controls the interrupts that are considered
    /// to be enabled and should be triggered.
    pub ie: u8,

    /// Reference to the PPU (Picture Processing Unit) that is
    /// going to be used both for VRAM and OAM reading/writing
    /// and for register access.
    ppu: Ppu,

    /// Reference to the joypad structure that controls the
    /// I/O access to the key state.
    pad: Pad,

    /// The timer controller to be used as part of the I/O
    /// access that is memory mapped.
    timer: Timer,

    /// The cartridge ROM that is currently loaded into the
    /// system, used to access ROM and external RAM banks.
    rom: Cartridge,

    /// Buffer with the work RAM of the system, mapped in the
    /// 0xC000-0xDFFF range and mirrored in the ECHO region.
    ram: Vec<u8>,

    /// High RAM buffer, the fast memory area that is typically
    /// used for the stack.
    hram: [u8; HRAM_SIZE],

    /// Request flag for the serial interrupt, the slot exists
    /// for vector completeness, no component raises it.
    int_serial: bool,

    /// One-shot flag so that writes into the forbidden
    /// 0xFEA0-0xFEFF region are only reported once.
    warned_forbidden: bool,
}

impl Mmu {
    pub fn new() -> Self {
        Self {
            ie: 0x0,
            ppu: Ppu::new(),
            pad: Pad::new(),
            timer: Timer::new(),
            rom: Cartridge::new(),
            ram: vec![0u8; RAM_SIZE],
            hram: [0u8; HRAM_SIZE],
            int_serial: false,
            warned_forbidden: false,
        }
    }

    pub fn reset(&mut self) {
        self.ie = 0x0;
        self.ppu.reset();
        self.pad.reset();
        self.timer.reset();
        self.rom.reset();
        self.ram = vec![0u8; RAM_SIZE];
        self.hram = [0u8; HRAM_SIZE];
        self.int_serial = false;
        self.warned_forbidden = false;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            // 0x0000-0x3FFF - ROM bank 0
            // 0x4000-0x7FFF - ROM bank N (switchable)
            0x0000..=0x7fff => self.rom.read(addr),

            // 0x8000-0x9FFF - Video RAM
            0x8000..=0x9fff => self.ppu.read(addr),

            // 0xA000-0xBFFF - External (cartridge) RAM
            0xa000..=0xbfff => self.rom.read(addr),

            // 0xC000-0xDFFF - Work RAM
            // 0xE000-0xFDFF - ECHO of 0xC000-0xDDFF
            0xc000..=0xfdff => self.ram[(addr & 0x1fff) as usize],

            // 0xFE00-0xFE9F - Object attribute memory (OAM)
            0xfe00..=0xfe9f => self.ppu.read(addr),

            // 0xFEA0-0xFEFF - Not usable
            0xfea0..=0xfeff => 0xff,

            // 0xFF00 - Joypad input
            JOYP_ADDR => self.pad.read(addr),

            // 0xFF01-0xFF02 - Serial transfer (not present)
            0xff01..=0xff02 => 0xff,

            // 0xFF04-0xFF07 - Timer and divider
            0xff04..=0xff07 => self.timer.read(addr),

            // 0xFF0F — IF: Interrupt flag
            IF_ADDR => {
                (if self.ppu.int_vblank() { 0x01 } else { 0x00 }
                    | if self.ppu.int_stat() { 0x02 } else { 0x00 }
                    | if self.timer.int_tima() { 0x04 } else { 0x00 }
                    | if self.int_serial { 0x08 } else { 0x00 }
                    | if self.pad.int_pad() { 0x10 } else { 0x00 }
                    | 0xe0)
            }

            // 0xFF40-0xFF45 - PPU registers
            // 0xFF47-0xFF4B - PPU registers
            0xff40..=0xff45 | 0xff47..=0xff4b => self.ppu.read(addr),

            // 0xFF80-0xFFFE - High RAM (HRAM)
            0xff80..=0xfffe => self.hram[(addr & 0x007f) as usize],

            // 0xFFFF — IE: Interrupt enable
            IE_ADDR => self.ie,

            addr => {
                warnln!("Reading from unknown location 0x{:04x}", addr);
                0xff
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // 0x0000-0x7FFF - ROM area, drives bank control only
            0x0000..=0x7fff => self.rom.write(addr, value),

            // 0x8000-0x9FFF - Video RAM
            0x8000..=0x9fff => self.ppu.write(addr, value),

            // 0xA000-0xBFFF - External (cartridge) RAM
            0xa000..=0xbfff => self.rom.write(addr, value),

            // 0xC000-0xDFFF - Work RAM
            // 0xE000-0xFDFF - ECHO of 0xC000-0xDDFF
            0xc000..=0xfdff => self.ram[(addr & 0x1fff) as usize] = value,

            // 0xFE00-0xFE9F - Object attribute memory (OAM)
            0xfe00..=0xfe9f => self.ppu.write(addr, value),

            // 0xFEA0-0xFEFF - Not usable
            0xfea0..=0xfeff => {
                if !self.warned_forbidden {
                    self.warned_forbidden = true;
                    warnln!("Ignoring write to forbidden location 0x{:04x}", addr);
                }
            }

            // 0xFF00 - Joypad input
            JOYP_ADDR => self.pad.write(addr, value),

            // 0xFF01-0xFF02 - Serial transfer (not present)
            0xff01..=0xff02 => (),

            // 0xFF04-0xFF07 - Timer and divider
            0xff04..=0xff07 => self.timer.write(addr, value),

            // 0xFF0F — IF: Interrupt flag
            IF_ADDR => {
                self.ppu.set_int_vblank(value & 0x01 == 0x01);
                self.ppu.set_int_stat(value & 0x02 == 0x02);
                self.timer.set_int_tima(value & 0x04 == 0x04);
                self.int_serial = value & 0x08 == 0x08;
                self.pad.set_int_pad(value & 0x10 == 0x10);
            }

            // 0xFF40-0xFF45 - PPU registers
            // 0xFF47-0xFF4B - PPU registers
            0xff40..=0xff45 | 0xff47..=0xff4b => self.ppu.write(addr, value),

            // 0xFF80-0xFFFE - High RAM (HRAM)
            0xff80..=0xfffe => self.hram[(addr & 0x007f) as usize] = value,

            // 0xFFFF — IE: Interrupt enable
            IE_ADDR => self.ie = value,

            addr => warnln!("Writing to unknown location 0x{:04x}", addr),
        }
    }

    /// The set of interrupts that are both requested and enabled,
    /// limited to the five architectural bits.
    pub fn pending_interrupts(&self) -> u8 {
        self.read(IF_ADDR) & self.ie & 0x1f
    }

    /// Raises the interrupt request associated with the provided
    /// bit, to be picked up at the next driver interrupt check.
    pub fn request_interrupt(&mut self, bit: u8) {
        match bit {
            INT_VBLANK => self.ppu.set_int_vblank(true),
            INT_STAT => self.ppu.set_int_stat(true),
            INT_TIMER => self.timer.set_int_tima(true),
            INT_SERIAL => self.int_serial = true,
            INT_PAD => self.pad.set_int_pad(true),
            _ => warnln!("Request for unknown interrupt bit {}", bit),
        }
    }

    /// Acknowledges the interrupt associated with the provided
    /// bit, clearing its request flag.
    pub fn ack_interrupt(&mut self, bit: u8) {
        match bit {
            INT_VBLANK => self.ppu.ack_vblank(),
            INT_STAT => self.ppu.ack_stat(),
            INT_TIMER => self.timer.ack_tima(),
            INT_SERIAL => self.int_serial = false,
            INT_PAD => self.pad.ack_pad(),
            _ => warnln!("Acknowledge of unknown interrupt bit {}", bit),
        }
    }

    pub fn ppu(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn ppu_i(&self) -> &Ppu {
        &self.ppu
    }

    pub fn pad(&mut self) -> &mut Pad {
        &mut self.pad
    }

    pub fn pad_i(&self) -> &Pad {
        &self.pad
    }

    pub fn timer(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub fn timer_i(&self) -> &Timer {
        &self.timer
    }

    pub fn rom(&mut self) -> &mut Cartridge {
        &mut self.rom
    }

    pub fn rom_i(&self) -> &Cartridge {
        &self.rom
    }

    pub fn set_rom(&mut self, rom: Cartridge) {
        self.rom = rom;
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::consts::{DIV_ADDR, IE_ADDR, IF_ADDR};

    use super::{Mmu, INT_TIMER, INT_VBLANK};

    #[test]
    fn test_echo_mirroring() {
        let mut mmu = Mmu::new();
        mmu.write(0xc123, 0x42);
        assert_eq!(mmu.read(0xe123), 0x42);

        mmu.write(0xe234, 0x24);
        assert_eq!(mmu.read(0xc234), 0x24);
    }

    #[test]
    fn test_forbidden_region() {
        let mut mmu = Mmu::new();
        mmu.write(0xfea0, 0x42);
        assert_eq!(mmu.read(0xfea0), 0xff);
    }

    #[test]
    fn test_div_reset_through_bus() {
        let mut mmu = Mmu::new();
        mmu.timer().clock(1024);
        assert_eq!(mmu.read(DIV_ADDR), 0x04);
        mmu.write(DIV_ADDR, 0x55);
        assert_eq!(mmu.read(DIV_ADDR), 0x00);
    }

    #[test]
    fn test_interrupt_collation() {
        let mut mmu = Mmu::new();
        assert_eq!(mmu.read(IF_ADDR), 0xe0);

        mmu.request_interrupt(INT_VBLANK);
        mmu.request_interrupt(INT_TIMER);
        assert_eq!(mmu.read(IF_ADDR), 0xe5);

        // only enabled interrupts are considered pending
        mmu.write(IE_ADDR, 0x04);
        assert_eq!(mmu.pending_interrupts(), 0x04);

        mmu.ack_interrupt(INT_TIMER);
        assert_eq!(mmu.pending_interrupts(), 0x00);
        assert_eq!(mmu.read(IF_ADDR), 0xe1);
    }

    #[test]
    fn test_if_write_distribution() {
        let mut mmu = Mmu::new();
        mmu.write(IF_ADDR, 0x1f);
        assert_eq!(mmu.read(IF_ADDR), 0xff);
        mmu.write(IF_ADDR, 0x00);
        assert_eq!(mmu.read(IF_ADDR), 0xe0);
    }

    #[test]
    fn test_hram() {
        let mut mmu = Mmu::new();
        mmu.write(0xff80, 0x42);
        mmu.write(0xfffe, 0x24);
        assert_eq!(mmu.read(0xff80), 0x42);
        assert_eq!(mmu.read(0xfffe), 0x24);
    }
}
