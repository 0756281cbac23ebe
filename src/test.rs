//! Helpers for the assembly of test machines around small
//! in-memory cartridges.

use crate::gb::GameBoy;

/// The set of options that control the cartridge image built
/// for a test machine.
#[derive(Default)]
pub struct TestOptions {
    /// The MBC selection byte placed at 0x0147.
    pub rom_type: Option<u8>,

    /// Program bytes copied to the 0x0100 entry point.
    pub program: Option<Vec<u8>>,
}

/// Builds a minimal 32 KB cartridge image following the
/// provided options.
pub fn build_test_rom(options: &TestOptions) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0147] = options.rom_type.unwrap_or(0x00);
    if let Some(program) = &options.program {
        rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    }
    rom
}

pub fn build_test(options: TestOptions) -> GameBoy {
    GameBoy::new(&build_test_rom(&options)).unwrap()
}

/// Clocks the machine until the CPU halts, up to the provided
/// cycle budget, returning the cycles consumed.
pub fn run_until_halt(gb: &mut GameBoy, max_cycles: u64) -> u64 {
    let mut cycles = 0u64;
    while !gb.cpu_i().halted() && cycles < max_cycles {
        cycles += gb.clock() as u64;
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::{build_test, run_until_halt, TestOptions};

    #[test]
    fn test_add_program() {
        let mut gb = build_test(TestOptions {
            program: Some(vec![
                0x3e, 0x10, // LD A, 0x10
                0x06, 0x20, // LD B, 0x20
                0x80, // ADD A, B
                0x76, // HALT
            ]),
            ..Default::default()
        });

        run_until_halt(&mut gb, 1000);

        assert!(gb.cpu_i().halted());
        assert_eq!(gb.cpu_i().a, 0x30);
        assert!(!gb.cpu_i().zero());
        assert!(!gb.cpu_i().sub());
        assert!(!gb.cpu_i().half_carry());
        assert!(!gb.cpu_i().carry());
    }

    #[test]
    fn test_memory_program() {
        let mut gb = build_test(TestOptions {
            program: Some(vec![
                0x21, 0x00, 0xc0, // LD HL, 0xc000
                0x36, 0x42, // LD [HL], 0x42
                0x7e, // LD A, [HL]
                0x76, // HALT
            ]),
            ..Default::default()
        });

        run_until_halt(&mut gb, 1000);

        assert!(gb.cpu_i().halted());
        assert_eq!(gb.cpu_i().a, 0x42);
        assert_eq!(gb.mmu_i().read(0xc000), 0x42);
    }

    #[test]
    fn test_loop_program() {
        let mut gb = build_test(TestOptions {
            program: Some(vec![
                0x06, 0x05, // LD B, 0x05
                0x05, // DEC B
                0x20, 0xfd, // JR NZ, -3
                0x76, // HALT
            ]),
            ..Default::default()
        });

        let cycles = run_until_halt(&mut gb, 10000);

        assert!(gb.cpu_i().halted());
        assert_eq!(gb.cpu_i().b, 0x00);
        assert!(gb.cpu_i().zero());
        // four full loop rounds take the taken branch, the
        // last one falls through
        assert!(cycles > 4 * (4 + 12));
    }

    #[test]
    fn test_hram_stack_program() {
        let mut gb = build_test(TestOptions {
            program: Some(vec![
                0x01, 0x34, 0x12, // LD BC, 0x1234
                0xc5, // PUSH BC
                0xd1, // POP DE
                0x76, // HALT
            ]),
            ..Default::default()
        });

        run_until_halt(&mut gb, 1000);

        assert!(gb.cpu_i().halted());
        assert_eq!(gb.cpu_i().de(), 0x1234);
        assert_eq!(gb.cpu_i().sp(), 0xfffe);
    }
}
