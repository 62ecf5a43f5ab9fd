//! Intel-mnemonic disassembler used for trace logs and diagnostics.

use crate::cpu::canonical_opcode;
use crate::flags::Condition;

const REG_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "M", "A"];
const PAIR_NAMES: [&str; 4] = ["B", "D", "H", "SP"];
const STACK_PAIR_NAMES: [&str; 4] = ["B", "D", "H", "PSW"];
const ALU_NAMES: [&str; 8] = ["ADD", "ADC", "SUB", "SBB", "ANA", "XRA", "ORA", "CMP"];
const ALU_IMM_NAMES: [&str; 8] = ["ADI", "ACI", "SUI", "SBI", "ANI", "XRI", "ORI", "CPI"];

/// Length in bytes of the instruction starting with `opcode`.
pub fn opcode_length(opcode: u8) -> u8 {
    match canonical_opcode(opcode) {
        // LXI, SHLD, LHLD, STA, LDA
        0x01 | 0x11 | 0x21 | 0x31 | 0x22 | 0x2a | 0x32 | 0x3a => 3,
        // JMP, CALL
        0xc3 | 0xcd => 3,
        // Jcc, Ccc
        op if op & 0xc7 == 0xc2 || op & 0xc7 == 0xc4 => 3,
        // MVI, immediate ALU, IN, OUT
        op if op & 0xc7 == 0x06 || op & 0xc7 == 0xc6 => 2,
        0xd3 | 0xdb => 2,
        _ => 1,
    }
}

/// Disassemble the instruction at the start of `bytes`.
///
/// Missing operand bytes read as zero. Returns the text and the instruction
/// length.
pub fn disassemble(bytes: &[u8]) -> (String, u8) {
    let byte = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let raw = byte(0);
    let op = canonical_opcode(raw);
    let d8 = byte(1);
    let d16 = u16::from_le_bytes([byte(1), byte(2)]);
    let r_dst = REG_NAMES[((op >> 3) & 0x07) as usize];
    let r_src = REG_NAMES[(op & 0x07) as usize];
    let rp = PAIR_NAMES[((op >> 4) & 0x03) as usize];

    let text = match op {
        0x00 => "NOP".to_string(),
        0x01 | 0x11 | 0x21 | 0x31 => format!("LXI {rp},${d16:04X}"),
        0x02 | 0x12 => format!("STAX {rp}"),
        0x0a | 0x1a => format!("LDAX {rp}"),
        0x03 | 0x13 | 0x23 | 0x33 => format!("INX {rp}"),
        0x0b | 0x1b | 0x2b | 0x3b => format!("DCX {rp}"),
        0x09 | 0x19 | 0x29 | 0x39 => format!("DAD {rp}"),
        o if o & 0xc7 == 0x04 => format!("INR {r_dst}"),
        o if o & 0xc7 == 0x05 => format!("DCR {r_dst}"),
        o if o & 0xc7 == 0x06 => format!("MVI {r_dst},${d8:02X}"),
        0x07 => "RLC".to_string(),
        0x0f => "RRC".to_string(),
        0x17 => "RAL".to_string(),
        0x1f => "RAR".to_string(),
        0x22 => format!("SHLD ${d16:04X}"),
        0x2a => format!("LHLD ${d16:04X}"),
        0x27 => "DAA".to_string(),
        0x2f => "CMA".to_string(),
        0x32 => format!("STA ${d16:04X}"),
        0x3a => format!("LDA ${d16:04X}"),
        0x37 => "STC".to_string(),
        0x3f => "CMC".to_string(),
        0x76 => "HLT".to_string(),
        0x40..=0x7f => format!("MOV {r_dst},{r_src}"),
        0x80..=0xbf => format!("{} {r_src}", ALU_NAMES[((op >> 3) & 0x07) as usize]),
        o if o & 0xc7 == 0xc0 => format!("R{}", Condition::from_opcode(o).mnemonic()),
        o if o & 0xc7 == 0xc2 => format!("J{} ${d16:04X}", Condition::from_opcode(o).mnemonic()),
        o if o & 0xc7 == 0xc4 => format!("C{} ${d16:04X}", Condition::from_opcode(o).mnemonic()),
        o if o & 0xc7 == 0xc6 => {
            format!("{} ${d8:02X}", ALU_IMM_NAMES[((o >> 3) & 0x07) as usize])
        }
        o if o & 0xc7 == 0xc7 => format!("RST {}", (o >> 3) & 0x07),
        0xc1 | 0xd1 | 0xe1 | 0xf1 => {
            format!("POP {}", STACK_PAIR_NAMES[((op >> 4) & 0x03) as usize])
        }
        0xc5 | 0xd5 | 0xe5 | 0xf5 => {
            format!("PUSH {}", STACK_PAIR_NAMES[((op >> 4) & 0x03) as usize])
        }
        0xc3 => format!("JMP ${d16:04X}"),
        0xcd => format!("CALL ${d16:04X}"),
        0xc9 => "RET".to_string(),
        0xd3 => format!("OUT ${d8:02X}"),
        0xdb => format!("IN ${d8:02X}"),
        0xe3 => "XTHL".to_string(),
        0xe9 => "PCHL".to_string(),
        0xeb => "XCHG".to_string(),
        0xf3 => "DI".to_string(),
        0xf9 => "SPHL".to_string(),
        0xfb => "EI".to_string(),
        _ => format!("DB ${raw:02X}"),
    };

    let text = if op != raw {
        format!("{text} (*{raw:02X})")
    } else {
        text
    };
    (text, opcode_length(raw))
}
