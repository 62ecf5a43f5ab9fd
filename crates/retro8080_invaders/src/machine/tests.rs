use super::*;
use crate::timing::InterruptTrigger;
use once_cell::sync::OnceCell;

/// Assemble a small ROM from `(address, bytes)` pieces.
fn rom(pieces: &[(usize, &[u8])]) -> Vec<u8> {
    let len = pieces
        .iter()
        .map(|(addr, bytes)| addr + bytes.len())
        .max()
        .unwrap_or(1);
    let mut image = vec![0u8; len];
    for (addr, bytes) in pieces {
        image[*addr..*addr + bytes.len()].copy_from_slice(bytes);
    }
    image
}

fn machine_with(image: &[u8]) -> SpaceInvadersMachine {
    let mut machine = SpaceInvadersMachine::default();
    machine.load_rom(image).unwrap();
    machine
}

/// Main loop spinning with interrupts enabled; RST 1 and RST 2 count into
/// the first two bytes of video RAM.
fn counting_rom() -> Vec<u8> {
    rom(&[
        // LXI SP,2400; EI; JMP 0004
        (0x0000, &[0x31, 0x00, 0x24, 0xfb, 0xc3, 0x04, 0x00]),
        // LXI H,2400; INR M; EI; RET
        (0x0008, &[0x21, 0x00, 0x24, 0x34, 0xfb, 0xc9]),
        // LXI H,2401; INR M; EI; RET
        (0x0010, &[0x21, 0x01, 0x24, 0x34, 0xfb, 0xc9]),
    ])
}

#[test]
fn rejects_invalid_configuration() {
    let timing = TimingConfig::builder().frame_rate_hz(0).build();
    assert!(matches!(
        SpaceInvadersMachine::new(timing, DipConfig::default()),
        Err(ConfigError::ZeroFrameRate)
    ));

    let dip = DipConfig {
        ships_per_credit: 9,
        ..DipConfig::default()
    };
    assert!(matches!(
        SpaceInvadersMachine::new(TimingConfig::default(), dip),
        Err(ConfigError::ShipsPerCredit(9))
    ));
}

#[test]
fn rejects_bad_rom_images() {
    let mut machine = SpaceInvadersMachine::default();
    assert_eq!(machine.load_rom(&[]), Err(RomError::Empty));
    assert_eq!(
        machine.load_rom(&vec![0; 0x2001]),
        Err(RomError::TooLarge(0x2001))
    );
    assert!(machine.load_rom(&vec![0; 0x2000]).is_ok());
}

#[test]
fn boots_and_halts() {
    // MVI A,14; ADI 20; HLT
    let mut machine = machine_with(&[0x3e, 0x14, 0xc6, 0x20, 0x76]);
    machine.step_frame();

    let cpu = machine.cpu();
    assert!(cpu.halted);
    assert_eq!(cpu.regs.a, 0x34);
    assert_eq!(cpu.regs.pc, 0x0005);
    assert_eq!(machine.frame_count(), 1);
    assert_eq!(machine.scanline(), 0);
}

#[test]
fn video_interrupts_fire_on_their_scanlines() {
    let mut machine = machine_with(&counting_rom());

    for _ in 0..96 {
        machine.run_scanline();
    }
    assert_eq!(machine.video_ram()[0], 0);

    // The RST 1 is accepted right after scanline 96 ran.
    machine.run_scanline();
    assert_eq!(machine.cpu().regs.pc, 0x0008);
    assert!(!machine.cpu().inte);
    machine.run_scanline();
    assert_eq!(machine.video_ram()[0], 1);
    assert_eq!(machine.video_ram()[1], 0);

    machine.step_frame();
    assert_eq!(machine.video_ram()[0], 1);
    assert_eq!(machine.video_ram()[1], 1);

    for _ in 0..4 {
        machine.step_frame();
    }
    assert_eq!(machine.video_ram()[0], 5);
    assert_eq!(machine.video_ram()[1], 5);
    assert_eq!(machine.frame_count(), 5);
}

#[test]
fn custom_triggers() {
    let timing = TimingConfig::builder()
        .triggers(vec![InterruptTrigger::new(0, 2)])
        .build();
    let mut machine = SpaceInvadersMachine::new(timing, DipConfig::default()).unwrap();
    machine.load_rom(&counting_rom()).unwrap();
    for _ in 0..3 {
        machine.step_frame();
    }
    assert_eq!(machine.video_ram()[0], 0);
    assert_eq!(machine.video_ram()[1], 3);
}

#[test]
fn one_second_runs_exactly_the_clock() {
    let mut machine = machine_with(&counting_rom());
    for _ in 0..60 {
        machine.step_frame();
    }
    // Overruns and interrupt entries are repaid from later scanlines.
    let cpu = machine.cpu();
    let spent = cpu.total_cycles() as i64 + i64::from(cpu.remaining_cycles());
    assert_eq!(spent, 2_000_000);
    assert!(cpu.remaining_cycles() <= 0);
    assert!(cpu.remaining_cycles() > -18);
}

#[test]
fn halted_machine_keeps_time() {
    let mut machine = machine_with(&[0x76]);
    for _ in 0..60 {
        machine.step_frame();
    }
    assert_eq!(machine.cpu().total_cycles(), 2_000_000);
    assert_eq!(machine.cpu().remaining_cycles(), 0);
}

#[test]
fn step_frame_finishes_a_partial_frame() {
    let mut machine = machine_with(&[0x76]);
    for _ in 0..100 {
        machine.run_scanline();
    }
    machine.step_frame();
    assert_eq!(machine.scanline(), 0);
    assert_eq!(machine.frame_count(), 1);
}

#[test]
fn program_uses_the_shifter() {
    let image = [
        0x3e, 0x80, 0xd3, 0x04, // MVI A,80; OUT 4
        0x3e, 0x01, 0xd3, 0x04, // MVI A,01; OUT 4
        0x3e, 0x04, 0xd3, 0x02, // MVI A,04; OUT 2
        0xdb, 0x03, //             IN 3
        0x32, 0x00, 0x24, //       STA 2400
        0x76,
    ];
    let mut machine = machine_with(&image);
    machine.step_frame();
    assert_eq!(machine.video_ram()[0], 0x18);
}

#[test]
fn program_reads_controls_and_dip_switches() {
    let image = [
        0xdb, 0x00, 0x32, 0x00, 0x24, // IN 0; STA 2400
        0xdb, 0x01, 0x32, 0x01, 0x24, // IN 1; STA 2401
        0xdb, 0x02, 0x32, 0x02, 0x24, // IN 2; STA 2402
        0xdb, 0x09, 0x32, 0x03, 0x24, // IN 9; STA 2403
        0x76,
    ];
    let dip = DipConfig {
        ships_per_credit: 5,
        extra_life_at_1000: true,
        show_coin_info: true,
    };
    let mut machine = SpaceInvadersMachine::new(TimingConfig::default(), dip).unwrap();
    machine.load_rom(&image).unwrap();
    machine.handle_key(Key::C, true);
    machine.handle_key(Key::Space, true);
    machine.handle_input(InputEvent::new(InputDevice::Joystick, Control::P2Left, true));
    machine.handle_key(Key::T, true);
    machine.handle_key(Key::T, false);
    machine.handle_key(Key::P, true);
    machine.step_frame();

    let vram = machine.video_ram();
    assert_eq!(vram[0], 0x0e);
    assert_eq!(vram[1], 0x08 | 0x01 | 0x10);
    assert_eq!(vram[2], 0x02 | 0x08 | 0x04 | 0x20);
    assert_eq!(vram[3], 0xff);
}

#[test]
fn released_controls_clear_their_bits() {
    // IN 1; STA 2400; HLT
    let image = [0xdb, 0x01, 0x32, 0x00, 0x24, 0x76];
    let mut machine = machine_with(&image);
    machine.handle_key(Key::Num1, true);
    machine.handle_key(Key::Num1, false);
    machine.step_frame();
    assert_eq!(machine.video_ram()[0], 0x08);
}

#[test]
fn rom_writes_are_dropped() {
    // MVI A,55; STA 0000; LDA 0000; STA 2400; LDA 4000; STA 2401; HLT
    let image = [
        0x3e, 0x55, 0x32, 0x00, 0x00, 0x3a, 0x00, 0x00, 0x32, 0x00, 0x24, 0x3a, 0x00, 0x40, 0x32,
        0x01, 0x24, 0x76,
    ];
    let mut machine = machine_with(&image);
    machine.step_frame();
    assert_eq!(machine.video_ram()[0], 0x3e);
    assert_eq!(machine.video_ram()[1], 0x3e);
}

#[test]
fn reset_keeps_rom_and_clears_io() {
    // MVI A,02; OUT 3; OUT 5; HLT
    let image = [0x3e, 0x02, 0xd3, 0x03, 0xd3, 0x05, 0x76];
    let mut machine = machine_with(&image);
    machine.handle_key(Key::T, true);
    machine.step_frame();
    assert_eq!(machine.outputs(), (0x02, 0x02));

    machine.reset();
    assert_eq!(machine.outputs(), (0, 0));
    assert_eq!(machine.cpu().regs.pc, 0);
    assert!(!machine.cpu().halted);
    assert_eq!(machine.frame_count(), 0);

    machine.step_frame();
    assert_eq!(machine.outputs(), (0x02, 0x02));
    assert!(machine.cpu().halted);
}

static SPACE_INVADERS_ROM: OnceCell<Vec<u8>> = OnceCell::new();

fn load_space_invaders_rom() -> &'static [u8] {
    SPACE_INVADERS_ROM.get_or_init(|| {
        use std::path::PathBuf;

        let candidates = [
            PathBuf::from("assets/roms/space_invaders/space-invaders.rom"),
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../../assets/roms/space_invaders/space-invaders.rom"),
        ];

        for path in &candidates {
            if let Ok(data) = std::fs::read(path) {
                return data;
            }
        }

        panic!("space-invaders.rom not found. Tried: {:?}", candidates)
    })
}

// Needs the arcade ROM, which is not distributed with the source.
#[test]
#[ignore]
fn attract_mode_draws_and_kicks_watchdog() {
    let mut machine = machine_with(load_space_invaders_rom());
    for _ in 0..300 {
        machine.step_frame();
    }
    assert!(machine.video_ram().iter().any(|&b| b != 0));
    assert!(machine.bus().watchdog_count() > 0);
    assert!(!machine.cpu().halted);
}
