use anyhow::{Context, Result};
use retro8080_cpu::cpm::{CpmMachine, CpmReport};
use retro8080_invaders::{DipConfig, SpaceInvadersApp, SpaceInvadersMachine, TimingConfig};
use retro8080_sdl2::{SdlContext, SdlInitInfo};

/// Cycle limit for `cpm` runs; 8080EXM needs a few billion.
pub const DEFAULT_CPM_CYCLE_LIMIT: u64 = 50_000_000_000;

pub enum EmulatorType {
    SpaceInvaders,
    Cpm,
}

pub fn run(emulator: EmulatorType, rom_data: &[u8]) -> Result<()> {
    match emulator {
        EmulatorType::SpaceInvaders => run_space_invaders(rom_data),
        EmulatorType::Cpm => {
            let report = run_cpm(rom_data, DEFAULT_CPM_CYCLE_LIMIT)?;
            println!();
            log::info!(
                "{} instructions, {} cycles",
                report.instructions,
                report.cycles
            );
            Ok(())
        }
    }
}

pub fn run_space_invaders(rom_data: &[u8]) -> Result<()> {
    let mut machine = SpaceInvadersMachine::new(TimingConfig::default(), DipConfig::default())
        .context("invalid Space Invaders configuration")?;
    machine
        .load_rom(rom_data)
        .context("failed to load Space Invaders ROM")?;
    let app = SpaceInvadersApp::new(machine);
    let init_info = SdlInitInfo::for_app(&app);
    SdlContext::run(init_info, app)?;
    Ok(())
}

/// Run a CP/M `.COM` program, echoing its console output to stdout.
pub fn run_cpm(program: &[u8], max_cycles: u64) -> Result<CpmReport> {
    let mut machine = CpmMachine::new(program).context("failed to load CP/M program")?;
    let result = machine.run(max_cycles);
    print!("{}", machine.output());
    let report = result.context("CP/M program did not finish")?;
    Ok(report)
}
