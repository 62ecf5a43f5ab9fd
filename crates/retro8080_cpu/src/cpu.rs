mod alu;
mod execute;
mod helpers;

pub(crate) use execute::canonical_opcode;

use crate::disasm;
use crate::flags::Flags;
use crate::regs::Registers;
use crate::Bus8080;

/// T-states charged for accepting an interrupt (the RST it jams onto the bus).
const INTERRUPT_CYCLES: u32 = 11;
/// T-states a halted CPU accounts per `step` while it waits for an interrupt.
const HALT_IDLE_CYCLES: u32 = 4;

/// Intel 8080 CPU state and execution engine.
///
/// The machine that owns a `Cpu8080` drives it in cycle-budgeted slices with
/// [`Cpu8080::exec`]. The budget is signed: the last instruction of a slice
/// may overrun it, and the overrun is charged against the next slice so that
/// long-run timing stays exact.
#[derive(Clone, Debug)]
pub struct Cpu8080 {
    pub regs: Registers,
    pub flags: Flags,
    /// Interrupt enable (INTE), set by EI and cleared by DI or on acceptance.
    pub inte: bool,
    /// Interrupt raised while INTE was clear, as an RST number (0-7).
    pub pending_interrupt: Option<u8>,
    pub halted: bool,
    cycles: i32,
    total_cycles: u64,
}

impl Default for Cpu8080 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu8080 {
    /// Create a new CPU instance in reset state.
    pub fn new() -> Self {
        Self {
            regs: Registers {
                sp: 0xffff,
                ..Registers::default()
            },
            flags: Flags::default(),
            inte: false,
            pending_interrupt: None,
            halted: false,
            cycles: 0,
            total_cycles: 0,
        }
    }

    /// Reset all registers to their power-on values.
    ///
    /// PC is cleared, SP points at the top of memory, the flags hold only
    /// their fixed bits and the cycle budget is emptied.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Cycle budget left over from the last [`Cpu8080::exec`] call.
    ///
    /// Zero or negative after a normal slice; the negative part is the
    /// overrun of the last instruction.
    pub fn remaining_cycles(&self) -> i32 {
        self.cycles
    }

    /// Total T-states accounted since reset, including idle time while halted.
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Accumulator and flags as the 16-bit PSW pushed by `PUSH PSW`.
    pub fn psw(&self) -> u16 {
        u16::from_be_bytes([self.regs.a, self.flags.to_psw()])
    }

    /// Run instructions until the cycle budget is spent.
    ///
    /// `cycles` is added to whatever is left (or owed) from the previous
    /// call. Instructions run while the budget is positive; a halted CPU
    /// idles through the rest of the budget. Returns the number of cycles
    /// consumed by this call.
    pub fn exec<B: Bus8080>(&mut self, bus: &mut B, cycles: i32) -> i32 {
        self.cycles = self.cycles.saturating_add(cycles);
        let start = self.cycles;

        while self.cycles > 0 {
            if self.halted && !self.interrupt_ready() {
                self.total_cycles += self.cycles as u64;
                self.cycles = 0;
                break;
            }
            let taken = self.step(bus);
            self.cycles -= taken as i32;
        }

        if start > 0 {
            start - self.cycles
        } else {
            0
        }
    }

    /// Execute a single instruction and return the number of cycles consumed.
    ///
    /// A pending interrupt is accepted first if interrupts are enabled; in
    /// that case only the interrupt entry is performed. A halted CPU with
    /// nothing to accept idles for one machine cycle.
    pub fn step<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let taken = if self.interrupt_ready() {
            let vector = self.pending_interrupt.take().unwrap_or_default();
            self.accept_interrupt(bus, vector)
        } else if self.halted {
            HALT_IDLE_CYCLES
        } else {
            if log::log_enabled!(log::Level::Trace) {
                self.trace(bus);
            }
            let opcode = self.fetch_byte(bus);
            self.execute(bus, opcode)
        };
        self.total_cycles += taken as u64;
        taken
    }

    /// Raise a maskable interrupt that jams `RST vector` onto the bus.
    ///
    /// With interrupts enabled this wakes a halted CPU, disables further
    /// interrupts, pushes PC and jumps to `vector * 8`; the 11 T-states of
    /// the RST are charged against the current budget. With interrupts
    /// disabled the request is remembered and accepted at the first
    /// instruction boundary after EI. Returns whether it was accepted now.
    ///
    /// There is a single request slot: a newer request replaces an older
    /// one that has not been accepted yet.
    pub fn interrupt<B: Bus8080>(&mut self, bus: &mut B, vector: u8) -> bool {
        let vector = vector & 0x07;
        if let Some(older) = self.pending_interrupt.filter(|&older| older != vector) {
            log::debug!("RST {older} replaced by RST {vector} before it was taken");
        }
        if !self.inte {
            self.pending_interrupt = Some(vector);
            return false;
        }
        let taken = self.accept_interrupt(bus, vector);
        self.cycles -= taken as i32;
        self.total_cycles += taken as u64;
        true
    }

    fn interrupt_ready(&self) -> bool {
        self.inte && self.pending_interrupt.is_some()
    }

    fn accept_interrupt<B: Bus8080>(&mut self, bus: &mut B, vector: u8) -> u32 {
        self.halted = false;
        self.inte = false;
        self.pending_interrupt = None;
        self.push(bus, self.regs.pc);
        self.regs.pc = u16::from(vector & 0x07) << 3;
        INTERRUPT_CYCLES
    }

    fn trace<B: Bus8080>(&self, bus: &mut B) {
        let pc = self.regs.pc;
        let bytes = [
            bus.mem_read(pc),
            bus.mem_read(pc.wrapping_add(1)),
            bus.mem_read(pc.wrapping_add(2)),
        ];
        let (text, _) = disasm::disassemble(&bytes);
        log::trace!(
            "{:04X}  {:<14} A={:02X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} F={:02X}",
            pc,
            text,
            self.regs.a,
            self.regs.bc(),
            self.regs.de(),
            self.regs.hl(),
            self.regs.sp,
            self.flags.to_psw(),
        );
    }
}
