use anyhow::{bail, Context, Result};
use retro8080::EmulatorType;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let system = args.next().unwrap_or_default();
    let rom_path = args.next().unwrap_or_default();

    let emulator = match system.as_str() {
        "space_invaders" | "space-invaders" | "invaders" => EmulatorType::SpaceInvaders,
        "cpm" | "CPM" => EmulatorType::Cpm,
        other => bail!(
            "Unknown system '{}'. Supported: invaders, cpm\n\
             Usage: retro8080 <system> <path>",
            other
        ),
    };

    if rom_path.is_empty() {
        match emulator {
            EmulatorType::SpaceInvaders => bail!(
                "No ROM path provided for Space Invaders.\n\
                 Please specify a path, for example:\n\
                 retro8080 invaders assets/roms/space_invaders/space-invaders.rom"
            ),
            EmulatorType::Cpm => bail!(
                "No program provided for CP/M.\n\
                 Please specify a path, for example:\n\
                 retro8080 cpm assets/roms/8080_tests/TST8080.COM"
            ),
        }
    }

    log::info!("Loading '{}'", rom_path);
    let rom = std::fs::read(&rom_path).with_context(|| format!("failed to read '{rom_path}'"))?;

    retro8080::run(emulator, &rom)
}
