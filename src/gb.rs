//! Game Boy emulation entrypoint and associated functions and structures.
//!
//! Most of the meaningful publicly available functions and structures to
//! build a working emulator are present here.
//!
//! # Examples
//!
//! Creates a simple [`GameBoy`] instance from a cartridge image and runs
//! one frame of emulation, obtaining the rendered frame buffer.
//!
//! ```rust
//! use dotmatrix::gb::GameBoy;
//! let mut rom = vec![0u8; 0x8000];
//! rom[0x0147] = 0x00;
//! let mut game_boy = GameBoy::new(&rom).unwrap();
//! let frame_buffer = game_boy.frame();
//! println!("Frame has {} bytes", frame_buffer.len());
//! ```

use std::fmt::{self, Display, Formatter};

use crate::{
    consts::{
        BGP_ADDR, IE_ADDR, LCDC_ADDR, LYC_ADDR, OBP0_ADDR, OBP1_ADDR, SCX_ADDR, SCY_ADDR,
        TAC_ADDR, TIMA_ADDR, TMA_ADDR, WX_ADDR, WY_ADDR,
    },
    cpu::Cpu,
    error::Error,
    mmu::Mmu,
    pad::{JoypadState, Pad},
    ppu::{Ppu, PpuMode, FRAME_BUFFER_SIZE},
    rom::Cartridge,
    timer::Timer,
};

/// Top level structure that abstracts the usage of the
/// Game Boy system.
///
/// Should serve as the main entry-point API.
pub struct GameBoy {
    /// Reference to the Game Boy CPU component to be used
    /// as the main element of the system, when clocked, the
    /// amount of ticks from it will be used as reference for
    /// the rest of the components.
    cpu: Cpu,
}

impl GameBoy {
    /// The logic frequency of the Game Boy CPU in hz.
    pub const CPU_FREQ: u32 = 4194304;

    /// The visual frequency (refresh rate) of the Game Boy,
    /// close to 60 hz.
    pub const VISUAL_FREQ: f32 = 59.73;

    /// The number of cycles the driver executes per video
    /// frame, the CPU frequency divided by the refresh rate.
    pub const CYCLES_PER_FRAME: u32 = 70221;

    /// Builds a machine around the provided cartridge image,
    /// leaving it in the canonical post boot state, ready for
    /// the first [`GameBoy::frame`] call.
    ///
    /// Cartridge format problems (image too small or too
    /// large, unsupported MBC, oversized RAM declaration) are
    /// all surfaced here.
    pub fn new(cartridge: &[u8]) -> Result<Self, Error> {
        let rom = Cartridge::from_data(cartridge)?;
        let mut mmu = Mmu::new();
        mmu.set_rom(rom);
        let mut gb = Self { cpu: Cpu::new(mmu) };
        gb.reset();
        Ok(gb)
    }

    /// Checks if the provided data is loadable as a cartridge
    /// image for this machine.
    pub fn verify_rom(data: &[u8]) -> bool {
        Cartridge::from_data(data).is_ok()
    }

    /// Puts the machine back into the canonical post boot
    /// state: registers, I/O defaults and zeroed RAM. The
    /// loaded cartridge is kept, only its banking state is
    /// re-initialised.
    pub fn reset(&mut self) {
        self.cpu.mmu.reset();
        self.cpu.reset();

        // documented I/O register defaults found after the
        // boot ROM hands over control
        self.cpu.mmu.write(TIMA_ADDR, 0x00);
        self.cpu.mmu.write(TMA_ADDR, 0x00);
        self.cpu.mmu.write(TAC_ADDR, 0x00);
        self.cpu.mmu.write(LCDC_ADDR, 0x91);
        self.cpu.mmu.write(SCY_ADDR, 0x00);
        self.cpu.mmu.write(SCX_ADDR, 0x00);
        self.cpu.mmu.write(LYC_ADDR, 0x00);
        self.cpu.mmu.write(BGP_ADDR, 0xfc);
        self.cpu.mmu.write(OBP0_ADDR, 0xff);
        self.cpu.mmu.write(OBP1_ADDR, 0xff);
        self.cpu.mmu.write(WY_ADDR, 0x00);
        self.cpu.mmu.write(WX_ADDR, 0x00);
        self.cpu.mmu.write(IE_ADDR, 0x00);
    }

    /// Runs the system until the per frame cycle budget is
    /// exhausted and returns the rendered frame buffer.
    ///
    /// The host is expected to pace calls to this method at
    /// close to [`GameBoy::VISUAL_FREQ`] using its own clock.
    pub fn frame(&mut self) -> &[u8; FRAME_BUFFER_SIZE] {
        let mut cycles = 0u32;
        while cycles < Self::CYCLES_PER_FRAME {
            cycles += self.clock() as u32;
        }
        self.frame_buffer()
    }

    /// Advances the system by one CPU instruction, clocking
    /// the timer and the PPU with the consumed cycles and then
    /// servicing at most one pending interrupt.
    ///
    /// The amount of cycles executed by the CPU is returned.
    pub fn clock(&mut self) -> u16 {
        let cycles = self.cpu.clock() as u16;
        self.cpu.mmu.timer().clock(cycles);
        self.cpu.mmu.ppu().clock(cycles);
        self.service_interrupts();
        cycles
    }

    /// Equivalent to `clock()` but allows the execution of
    /// multiple clock operations in a single call.
    pub fn clocks(&mut self, count: usize) -> u64 {
        let mut cycles = 0_u64;
        for _ in 0..count {
            cycles += self.clock() as u64;
        }
        cycles
    }

    /// Clocks the emulator until the limit of cycles that has
    /// been provided and returns the amount of cycles that
    /// have been clocked.
    pub fn clocks_cycles(&mut self, limit: usize) -> u64 {
        let mut cycles = 0_u64;
        while cycles < limit as u64 {
            cycles += self.clock() as u64;
        }
        cycles
    }

    /// Clocks the emulator until the PC (Program Counter)
    /// reaches the provided address.
    pub fn step_to(&mut self, addr: u16) -> u32 {
        let mut cycles = 0u32;
        while self.cpu.pc != addr {
            cycles += self.clock() as u32;
        }
        cycles
    }

    /// Updates the joypad with the key state coming from the
    /// host, possibly raising the joypad interrupt.
    pub fn write_joypad(&mut self, state: JoypadState) {
        self.cpu.mmu.pad().set_state(state);
    }

    /// Services the lowest numbered interrupt that is both
    /// requested and enabled, if any, dispatching the matching
    /// handler through the CPU.
    fn service_interrupts(&mut self) {
        if !self.cpu.ime() {
            return;
        }

        let pending = self.cpu.mmu.pending_interrupts();
        if pending == 0 {
            return;
        }

        for bit in 0..5u8 {
            if pending & (1 << bit) != 0 {
                self.cpu.service_interrupt(bit);
                break;
            }
        }
    }

    pub fn cpu(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn cpu_i(&self) -> &Cpu {
        &self.cpu
    }

    pub fn mmu(&mut self) -> &mut Mmu {
        self.cpu.mmu()
    }

    pub fn mmu_i(&self) -> &Mmu {
        self.cpu.mmu_i()
    }

    pub fn ppu(&mut self) -> &mut Ppu {
        self.cpu.mmu.ppu()
    }

    pub fn ppu_i(&self) -> &Ppu {
        self.cpu.mmu.ppu_i()
    }

    pub fn timer(&mut self) -> &mut Timer {
        self.cpu.mmu.timer()
    }

    pub fn timer_i(&self) -> &Timer {
        self.cpu.mmu.timer_i()
    }

    pub fn pad(&mut self) -> &mut Pad {
        self.cpu.mmu.pad()
    }

    pub fn pad_i(&self) -> &Pad {
        self.cpu.mmu.pad_i()
    }

    pub fn rom(&mut self) -> &mut Cartridge {
        self.cpu.mmu.rom()
    }

    pub fn rom_i(&self) -> &Cartridge {
        self.cpu.mmu.rom_i()
    }

    pub fn frame_buffer(&self) -> &[u8; FRAME_BUFFER_SIZE] {
        self.cpu.mmu_i().ppu_i().frame_buffer()
    }

    pub fn ppu_ly(&self) -> u8 {
        self.cpu.mmu_i().ppu_i().ly()
    }

    pub fn ppu_mode(&self) -> PpuMode {
        self.cpu.mmu_i().ppu_i().mode()
    }
}

impl Display for GameBoy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GameBoy [{}]", self.rom_i())
    }
}
