//! Minimal CP/M environment for running 8080 `.COM` programs, such as the
//! classic CPU exercisers (TST8080, 8080PRE, CPUTEST, 8080EXM).
//!
//! Only what those programs need is provided: the program is loaded at the
//! TPA start (0x0100), a jump to 0x0000 (warm boot) ends the run, and BDOS
//! console calls through 0x0005 are intercepted at the instruction boundary.

use thiserror::Error;

use crate::{disasm, Bus8080, Cpu8080};

const MEMORY_SIZE: usize = 0x10000;
/// Start of the transient program area, where `.COM` files are loaded.
pub const TPA_START: u16 = 0x0100;
/// BDOS entry point.
pub const BDOS_ENTRY: u16 = 0x0005;

const BOOT_PORT: u8 = 0x00;
const BDOS_C_WRITE: u8 = 2;
const BDOS_C_WRITESTR: u8 = 9;

#[derive(Error, Debug)]
pub enum CpmError {
    #[error("program is empty")]
    EmptyProgram,
    #[error("program of {0} bytes does not fit in the TPA")]
    ProgramTooLarge(usize),
    #[error("program did not finish within {limit} cycles (PC={pc:04X}, at `{instruction}`)")]
    CycleLimit {
        limit: u64,
        pc: u16,
        instruction: String,
    },
    #[error("BDOS string at {addr:04X} has no `$` terminator")]
    UnterminatedString { addr: u16 },
}

/// Outcome of a finished CP/M run.
#[derive(Debug, Clone)]
pub struct CpmReport {
    pub output: String,
    pub cycles: u64,
    pub instructions: u64,
}

/// Flat 64 KiB memory with a boot trap port.
struct CpmBus {
    memory: Box<[u8; MEMORY_SIZE]>,
    finished: bool,
}

impl Bus8080 for CpmBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn io_read(&mut self, _port: u8) -> u8 {
        0xff
    }

    fn io_write(&mut self, port: u8, _value: u8) {
        if port == BOOT_PORT {
            self.finished = true;
        }
    }
}

/// A CPU plus CP/M memory image.
pub struct CpmMachine {
    pub cpu: Cpu8080,
    bus: CpmBus,
    output: String,
}

impl CpmMachine {
    /// Load `program` at 0x0100 and prepare the zero page.
    pub fn new(program: &[u8]) -> Result<Self, CpmError> {
        if program.is_empty() {
            return Err(CpmError::EmptyProgram);
        }
        let start = TPA_START as usize;
        if start + program.len() > MEMORY_SIZE {
            return Err(CpmError::ProgramTooLarge(program.len()));
        }

        let mut memory = Box::new([0u8; MEMORY_SIZE]);
        memory[start..start + program.len()].copy_from_slice(program);
        // Warm boot: "OUT 0" ends the run.
        memory[0x0000] = 0xd3;
        memory[0x0001] = BOOT_PORT;
        // BDOS: calls are serviced before this RET executes.
        memory[BDOS_ENTRY as usize] = 0xc9;

        let mut cpu = Cpu8080::new();
        cpu.regs.pc = TPA_START;
        // Programs take the stack from the BDOS address word at 0x0006.
        memory[0x0006] = 0x00;
        memory[0x0007] = 0xf0;
        cpu.regs.sp = 0xf000;

        Ok(Self {
            cpu,
            bus: CpmBus {
                memory,
                finished: false,
            },
            output: String::new(),
        })
    }

    /// Console output collected so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Run until the program warm boots or `max_cycles` elapse.
    pub fn run(&mut self, max_cycles: u64) -> Result<CpmReport, CpmError> {
        let mut instructions = 0u64;
        while !self.bus.finished {
            if self.cpu.total_cycles() >= max_cycles {
                let pc = self.cpu.regs.pc;
                let bytes = [
                    self.bus.mem_read(pc),
                    self.bus.mem_read(pc.wrapping_add(1)),
                    self.bus.mem_read(pc.wrapping_add(2)),
                ];
                return Err(CpmError::CycleLimit {
                    limit: max_cycles,
                    pc,
                    instruction: disasm::disassemble(&bytes).0,
                });
            }
            if self.cpu.regs.pc == BDOS_ENTRY {
                self.bdos_call()?;
            }
            self.cpu.step(&mut self.bus);
            instructions += 1;
        }

        log::info!(
            "CP/M program finished after {} instructions, {} cycles",
            instructions,
            self.cpu.total_cycles()
        );
        Ok(CpmReport {
            output: self.output.clone(),
            cycles: self.cpu.total_cycles(),
            instructions,
        })
    }

    fn bdos_call(&mut self) -> Result<(), CpmError> {
        match self.cpu.regs.c {
            BDOS_C_WRITE => self.output.push(self.cpu.regs.e as char),
            BDOS_C_WRITESTR => {
                let start = self.cpu.regs.de();
                let text: Vec<u8> = (0..MEMORY_SIZE)
                    .map(|offset| self.bus.mem_read(start.wrapping_add(offset as u16)))
                    .take_while(|&ch| ch != b'$')
                    .collect();
                // Every byte of memory was scanned without meeting a `$`.
                if text.len() == MEMORY_SIZE {
                    return Err(CpmError::UnterminatedString { addr: start });
                }
                self.output.extend(text.into_iter().map(char::from));
            }
            other => log::debug!("Ignoring BDOS function {other}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CpmError, CpmMachine};

    #[test]
    fn prints_string_and_char_then_boots() {
        let program = [
            0x11, 0x12, 0x01, // LXI D,$0112
            0x0e, 0x09, //       MVI C,9
            0xcd, 0x05, 0x00, // CALL 5
            0x1e, b'!', //       MVI E,'!'
            0x0e, 0x02, //       MVI C,2
            0xcd, 0x05, 0x00, // CALL 5
            0xc3, 0x00, 0x00, // JMP 0
            b'O', b'K', b'$',
        ];

        let mut machine = CpmMachine::new(&program).unwrap();
        let report = machine.run(10_000).unwrap();
        assert_eq!(report.output, "OK!");
        assert!(report.instructions > 0);
    }

    #[test]
    fn rejects_empty_program() {
        assert!(matches!(CpmMachine::new(&[]), Err(CpmError::EmptyProgram)));
    }

    #[test]
    fn reports_runaway_program() {
        // JMP 0x0100 forever.
        let mut machine = CpmMachine::new(&[0xc3, 0x00, 0x01]).unwrap();
        match machine.run(1_000) {
            Err(CpmError::CycleLimit {
                pc,
                instruction,
                ..
            }) => {
                assert_eq!(pc, 0x0100);
                assert_eq!(instruction, "JMP $0100");
            }
            other => panic!("expected cycle limit, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_is_an_error() {
        // MVI C,9; CALL 5; JMP 0 with DE=0000. The image holds no `$`.
        let program = [0x0e, 0x09, 0xcd, 0x05, 0x00, 0xc3, 0x00, 0x00];
        let mut machine = CpmMachine::new(&program).unwrap();
        match machine.run(1_000) {
            Err(CpmError::UnterminatedString { addr }) => assert_eq!(addr, 0x0000),
            other => panic!("expected unterminated string, got {other:?}"),
        }
        assert!(machine.output().is_empty());
    }
}
