//! gemclash -- a gem-battle combat engine speaking the GCI protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`.

use std::io::{self, BufRead};

use gemclash::engine::Engine;
use gemclash::protocol::{parse_command, Command};

/// Runs the main GCI protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() -> io::Result<()> {
    gemclash::logging::init("gemclash=info");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Gci => engine.handle_gci(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => engine.set_option(name, value),
            Command::Config { path } => engine.handle_config(&path, &mut out)?,
            Command::NewCombat { seed } => engine.handle_newcombat(seed, &mut out)?,
            Command::Goals { remaining } => engine.set_goals(remaining),
            Command::Intent => engine.handle_intent(&mut out)?,
            Command::Attack(gems) => engine.handle_attack(gems, &mut out)?,
            Command::Enemy => engine.handle_enemy(&mut out)?,
            Command::State => engine.handle_state(&mut out)?,
            Command::Quit => break,
        }
    }

    Ok(())
}
