use std::io::Write;

extern crate termcolor;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
#[macro_use]
extern crate clap;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;
use tracing_subscriber::EnvFilter;

extern crate idplaysim;
use idplaysim::errors::{Error, ErrorKind, Result};
use idplaysim::input_buffer::InputBuffer;
use idplaysim::mobj::{MobjFlags, MobjId};
use idplaysim::parse::vanilla_map_name;
use idplaysim::rules::Skill;
use idplaysim::tables::Angle;
use idplaysim::{BareWAD, GameConfig, LoadedMap, World};

/// Distance the autoaim sweep looks, same as a bullet
const AIM_RANGE: i32 = 16 * 64 * 65536;
const AIM_STEPS: u32 = 32;

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => {
            drop(write_err(err));
            std::process::exit(1);
        }
    }
}

fn write_err(err: Error) -> Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(&mut stderr, "error: ")?;
    stderr.set_color(&ColorSpec::new())?;
    writeln!(&mut stderr, "{}", err)?;
    for cause in err.iter().skip(1) {
        writeln!(&mut stderr, "  caused by: {}", cause)?;
    }
    Ok(())
}

fn init_logging(verbosity: u64) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = clap_app!(idplaysim =>
        (about: "Poke at the gameplay side of Doom maps")
        (@arg color: -c --color +takes_value "Choose whether to use colored output (auto, always, never)")
        (@arg verbose: -v --verbose +multiple "Log more; repeat for even more")
        (@arg config: --config +takes_value "RON file with game settings")
        (@arg skill: -s --skill +takes_value "Skill level, 1 through 5")
        (@arg file: +required "Input WAD file, or - for stdin")
        (@subcommand maps =>
            (about: "List the maps in a WAD")
        )
        (@subcommand sight =>
            (about: "Report which monsters can see player 1's start")
            (@arg map: +required "Map name, like E1M1 or MAP01")
        )
        (@subcommand reject =>
            (about: "Compare the REJECT table against real sight checks")
            (@arg map: +required "Map name")
        )
        (@subcommand aim =>
            (about: "Sweep autoaim around player 1's start")
            (@arg map: +required "Map name")
        )
    ).get_matches();

    init_logging(args.occurrences_of("verbose"));

    let color = match args.value_of("color").unwrap_or("auto") {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => ColorChoice::Auto,
    };
    let mut config = match args.value_of("config") {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(skill) = args.value_of("skill") {
        config.skill = match skill {
            "1" => Skill::Baby,
            "2" => Skill::Easy,
            "3" => Skill::Medium,
            "4" => Skill::Hard,
            "5" => Skill::Nightmare,
            other => { return Err(ErrorKind::InvalidConfig(format!("no such skill {}", other)).into()); }
        };
    }

    let filename = args.value_of("file").unwrap_or("-");
    let input = InputBuffer::open(filename)?;
    let wad = idplaysim::parse_wad(input.bytes())?;
    let mut out = StandardStream::stdout(color);

    match args.subcommand() {
        ("maps", Some(_)) => { do_maps(&mut out, &wad)? },
        ("sight", Some(subargs)) => { do_sight(&mut out, &wad, config, subargs.value_of("map").unwrap_or(""))? },
        ("reject", Some(subargs)) => { do_reject(&mut out, &wad, config, subargs.value_of("map").unwrap_or(""))? },
        ("aim", Some(subargs)) => { do_aim(&mut out, &wad, config, subargs.value_of("map").unwrap_or(""))? },
        _ => { do_maps(&mut out, &wad)? },
    }

    Ok(())
}

fn heading(out: &mut StandardStream, text: &str) -> Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "{}", text)?;
    out.set_color(&ColorSpec::new())?;
    Ok(())
}

fn verdict(out: &mut StandardStream, good: bool, text: &str) -> Result<()> {
    let color = if good { Color::Green } else { Color::Yellow };
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{}", text)?;
    out.set_color(&ColorSpec::new())?;
    Ok(())
}

fn do_maps(out: &mut StandardStream, wad: &BareWAD) -> Result<()> {
    heading(out, &format!("{:?} with {} lumps", wad.header.identification, wad.directory.len()))?;
    for block in wad.iter_maps() {
        match idplaysim::load_map(wad, &block) {
            Ok(map) => {
                writeln!(out, "{:6} {:?}  {} lines, {} sectors, {} things",
                    map.name.to_string(), map.format, map.level.num_lines(), map.level.num_sectors(), map.things.len())?;
            }
            Err(err) => {
                write!(out, "{:6} ", block.name.to_string())?;
                verdict(out, false, &format!("{}", err))?;
                writeln!(out, "")?;
            }
        }
    }
    Ok(())
}

/// Load a map and spawn its things, with player 1 in place.
fn start_map(wad: &BareWAD, config: GameConfig, name: &str) -> Result<(World, MobjId)> {
    let map_name = match vanilla_map_name(name.to_uppercase().as_bytes()) {
        Ok((_, map_name)) => map_name,
        Err(_) => { return Err(ErrorKind::MissingMapLump("map marker").into()); }
    };
    let block = wad.find_map(map_name).ok_or(ErrorKind::MissingMapLump("map marker"))?;
    let LoadedMap{ level, things, .. } = idplaysim::load_map(wad, &block)?;

    let mut world = World::new(level, config);
    let player = world.add_player();
    world.spawn_map_things(&things);
    let body = world.players[player].mo.ok_or(ErrorKind::MissingMapLump("player 1 start"))?;
    info!("{} has {} things in play", map_name, world.mobjs.len());
    Ok((world, body))
}

fn monsters(world: &World) -> Vec<MobjId> {
    world.mobjs.iter()
        .filter(|&(_, mo)| mo.flags.contains(MobjFlags::COUNTKILL))
        .map(|(id, _)| id)
        .collect()
}

fn do_sight(out: &mut StandardStream, wad: &BareWAD, config: GameConfig, name: &str) -> Result<()> {
    let (mut world, body) = start_map(wad, config, name)?;
    heading(out, &format!("monsters that can see the start of {}", name.to_uppercase()))?;
    let mut seen = 0;
    let all = monsters(&world);
    for &id in all.iter() {
        if world.check_sight(id, body) {
            seen += 1;
            if let Some(mo) = world.mobj(id) {
                writeln!(out, "  {:?} at ({}, {})", mo.kind, mo.x >> 16, mo.y >> 16)?;
            }
        }
    }
    writeln!(out, "{} of {} monsters", seen, all.len())?;
    Ok(())
}

fn do_reject(out: &mut StandardStream, wad: &BareWAD, config: GameConfig, name: &str) -> Result<()> {
    let (mut world, body) = start_map(wad, config, name)?;
    let numsectors = world.level.reject.numsectors();
    let mut rejected = 0;
    for s1 in 0 .. numsectors {
        for s2 in 0 .. numsectors {
            if world.level.reject.is_rejected(s1, s2) {
                rejected += 1;
            }
        }
    }
    heading(out, &format!("{}: {} of {} sector pairs rejected", name.to_uppercase(), rejected, numsectors * numsectors))?;

    // A rejected pair that a real trace can see through means the table is wrong, not just
    // conservative
    let all = monsters(&world);
    let mut suspicious = 0;
    for &id in all.iter() {
        if world.check_sight(id, body) {
            continue;
        }
        let (s1, s2) = match (world.mobj(id), world.mobj(body)) {
            (Some(a), Some(b)) => match (world.sector_of(a), world.sector_of(b)) {
                (Some(s1), Some(s2)) => (s1.index(), s2.index()),
                _ => { continue; }
            },
            _ => { continue; }
        };
        if !world.level.reject.is_rejected(s1, s2) {
            continue;
        }
        world.level.reject.set_rejected(s1, s2, false);
        let would_see = world.check_sight(id, body);
        world.level.reject.set_rejected(s1, s2, true);
        if would_see {
            suspicious += 1;
            if let Some(mo) = world.mobj(id) {
                writeln!(out, "  {:?} in sector {} is rejected but has a clear line to sector {}", mo.kind, s1, s2)?;
            }
        }
    }
    verdict(out, suspicious == 0, &format!("{} suspicious rejections\n", suspicious))?;
    Ok(())
}

fn do_aim(out: &mut StandardStream, wad: &BareWAD, config: GameConfig, name: &str) -> Result<()> {
    let (mut world, body) = start_map(wad, config, name)?;
    heading(out, &format!("autoaim sweep from the start of {}", name.to_uppercase()))?;
    let step = (1u64 << 32) / AIM_STEPS as u64;
    for i in 0 .. AIM_STEPS {
        let angle = Angle((i as u64 * step) as u32);
        let slope = world.aim_line_attack(body, angle, AIM_RANGE, false);
        write!(out, "  {:5.1}°  ", i as f64 * 360.0 / AIM_STEPS as f64)?;
        match world.linetarget.and_then(|id| world.mobj(id)) {
            Some(mo) => {
                verdict(out, true, &format!("{:?}", mo.kind))?;
                writeln!(out, " at slope {:.3}", slope as f64 / 65536.0)?;
            }
            None => { writeln!(out, "-")?; }
        }
    }
    Ok(())
}
