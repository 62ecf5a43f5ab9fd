use super::Cpu8080;
use crate::flags::{Condition, Flags};
use crate::regs::RegPair;
use crate::Bus8080;

/// Map the alternate encodings onto the documented instruction they execute
/// as on a real 8080, so that every opcode byte decodes.
#[inline]
pub(crate) fn canonical_opcode(raw: u8) -> u8 {
    match raw {
        0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => 0x00, // NOP
        0xcb => 0xc3,                                           // JMP
        0xd9 => 0xc9,                                           // RET
        0xdd | 0xed | 0xfd => 0xcd,                             // CALL
        _ => raw,
    }
}

impl Cpu8080 {
    /// Execute an already fetched opcode and return its T-states.
    ///
    /// PC points past the opcode byte on entry; operand fetches advance it
    /// further, and branches overwrite it.
    pub(super) fn execute<B: Bus8080>(&mut self, bus: &mut B, raw: u8) -> u32 {
        let opcode = canonical_opcode(raw);

        match opcode {
            // NOP
            0x00 => 4,

            // LXI rp,word
            0x01 | 0x11 | 0x21 | 0x31 => {
                let v = self.fetch_word(bus);
                self.regs.set_pair(RegPair::from_opcode(opcode), v);
                10
            }

            // STAX B / STAX D
            0x02 | 0x12 => {
                let addr = self.regs.pair(RegPair::from_opcode(opcode));
                bus.mem_write(addr, self.regs.a);
                7
            }

            // LDAX B / LDAX D
            0x0a | 0x1a => {
                let addr = self.regs.pair(RegPair::from_opcode(opcode));
                self.regs.a = bus.mem_read(addr);
                7
            }

            // INX rp (no flags)
            0x03 | 0x13 | 0x23 | 0x33 => {
                let pair = RegPair::from_opcode(opcode);
                let v = self.regs.pair(pair).wrapping_add(1);
                self.regs.set_pair(pair, v);
                5
            }

            // DCX rp (no flags)
            0x0b | 0x1b | 0x2b | 0x3b => {
                let pair = RegPair::from_opcode(opcode);
                let v = self.regs.pair(pair).wrapping_sub(1);
                self.regs.set_pair(pair, v);
                5
            }

            // DAD rp
            0x09 | 0x19 | 0x29 | 0x39 => {
                let v = self.regs.pair(RegPair::from_opcode(opcode));
                self.dad(v);
                10
            }

            // INR r / INR M
            op if op & 0xc7 == 0x04 => {
                let index = (op >> 3) & 0x07;
                let v = self.read_reg(bus, index);
                let r = self.inr(v);
                self.write_reg(bus, index, r);
                if index == 6 {
                    10
                } else {
                    5
                }
            }

            // DCR r / DCR M
            op if op & 0xc7 == 0x05 => {
                let index = (op >> 3) & 0x07;
                let v = self.read_reg(bus, index);
                let r = self.dcr(v);
                self.write_reg(bus, index, r);
                if index == 6 {
                    10
                } else {
                    5
                }
            }

            // MVI r,byte / MVI M,byte
            op if op & 0xc7 == 0x06 => {
                let index = (op >> 3) & 0x07;
                let v = self.fetch_byte(bus);
                self.write_reg(bus, index, v);
                if index == 6 {
                    10
                } else {
                    7
                }
            }

            // Rotates
            0x07 => {
                self.rlc();
                4
            }
            0x0f => {
                self.rrc();
                4
            }
            0x17 => {
                self.ral();
                4
            }
            0x1f => {
                self.rar();
                4
            }

            // SHLD addr
            0x22 => {
                let addr = self.fetch_word(bus);
                let hl = self.regs.hl();
                self.write_word(bus, addr, hl);
                16
            }

            // LHLD addr
            0x2a => {
                let addr = self.fetch_word(bus);
                let v = self.read_word(bus, addr);
                self.regs.set_hl(v);
                16
            }

            // DAA
            0x27 => {
                self.daa();
                4
            }

            // CMA (no flags)
            0x2f => {
                self.regs.a = !self.regs.a;
                4
            }

            // STA addr
            0x32 => {
                let addr = self.fetch_word(bus);
                bus.mem_write(addr, self.regs.a);
                13
            }

            // LDA addr
            0x3a => {
                let addr = self.fetch_word(bus);
                self.regs.a = bus.mem_read(addr);
                13
            }

            // STC
            0x37 => {
                self.flags.insert(Flags::CARRY);
                4
            }

            // CMC
            0x3f => {
                self.flags.toggle(Flags::CARRY);
                4
            }

            // HLT
            0x76 => {
                self.halted = true;
                7
            }

            // MOV r1,r2 (40-7F, excluding HLT 76)
            0x40..=0x7f => {
                let dst = (opcode >> 3) & 0x07;
                let src = opcode & 0x07;
                let v = self.read_reg(bus, src);
                self.write_reg(bus, dst, v);
                if dst == 6 || src == 6 {
                    7
                } else {
                    5
                }
            }

            // ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP r
            0x80..=0xbf => {
                let src = opcode & 0x07;
                let v = self.read_reg(bus, src);
                self.alu_op(opcode >> 3, v);
                if src == 6 {
                    7
                } else {
                    4
                }
            }

            // Rcc
            op if op & 0xc7 == 0xc0 => self.ret_if(bus, Condition::from_opcode(op)),

            // Jcc addr
            op if op & 0xc7 == 0xc2 => self.jump_if(bus, Some(Condition::from_opcode(op))),

            // Ccc addr
            op if op & 0xc7 == 0xc4 => self.call_if(bus, Some(Condition::from_opcode(op))),

            // ADI/ACI/SUI/SBI/ANI/XRI/ORI/CPI byte
            op if op & 0xc7 == 0xc6 => {
                let v = self.fetch_byte(bus);
                self.alu_op(op >> 3, v);
                7
            }

            // RST n
            op if op & 0xc7 == 0xc7 => {
                self.push(bus, self.regs.pc);
                self.regs.pc = u16::from(op & 0x38);
                11
            }

            // POP B/D/H
            0xc1 | 0xd1 | 0xe1 => {
                let v = self.pop(bus);
                self.regs.set_pair(RegPair::from_opcode(opcode), v);
                10
            }

            // POP PSW
            0xf1 => {
                let [a, f] = self.pop(bus).to_be_bytes();
                self.regs.a = a;
                self.flags = Flags::from_psw(f);
                10
            }

            // PUSH B/D/H
            0xc5 | 0xd5 | 0xe5 => {
                let v = self.regs.pair(RegPair::from_opcode(opcode));
                self.push(bus, v);
                11
            }

            // PUSH PSW
            0xf5 => {
                let psw = self.psw();
                self.push(bus, psw);
                11
            }

            // JMP addr
            0xc3 => self.jump_if(bus, None),

            // CALL addr
            0xcd => self.call_if(bus, None),

            // RET
            0xc9 => {
                self.regs.pc = self.pop(bus);
                10
            }

            // OUT port
            0xd3 => {
                let port = self.fetch_byte(bus);
                bus.io_write(port, self.regs.a);
                10
            }

            // IN port
            0xdb => {
                let port = self.fetch_byte(bus);
                self.regs.a = bus.io_read(port);
                10
            }

            // XTHL
            0xe3 => {
                let sp = self.regs.sp;
                let top = self.read_word(bus, sp);
                let hl = self.regs.hl();
                self.write_word(bus, sp, hl);
                self.regs.set_hl(top);
                18
            }

            // PCHL
            0xe9 => {
                self.regs.pc = self.regs.hl();
                5
            }

            // XCHG
            0xeb => {
                let de = self.regs.de();
                let hl = self.regs.hl();
                self.regs.set_de(hl);
                self.regs.set_hl(de);
                4
            }

            // DI
            0xf3 => {
                self.inte = false;
                4
            }

            // SPHL
            0xf9 => {
                self.regs.sp = self.regs.hl();
                5
            }

            // EI
            0xfb => {
                self.inte = true;
                4
            }

            // `canonical_opcode` folds every remaining byte onto one of the
            // arms above.
            op => unreachable!("opcode {op:02X} has no decoding"),
        }
    }
}
