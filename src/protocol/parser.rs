//! GCI command parser.
//!
//! Parses incoming GCI (Gem Combat Interface) commands from raw text into
//! structured `Command` variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::combat::GemClear;

/// A parsed driver-to-engine GCI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the GCI protocol handshake.
    Gci,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Load a JSON combat configuration as the base for new battles.
    Config { path: String },

    /// Start a new battle, optionally with a fixed random seed.
    NewCombat { seed: Option<u64> },

    /// Report how many level goals remain.
    Goals { remaining: u32 },

    /// Roll and report the enemy's next attack.
    Intent,

    /// Resolve a player match.
    Attack(GemClear),

    /// Resolve the enemy's attack.
    Enemy,

    /// Print the current snapshot as JSON.
    State,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "gci" => Some(Command::Gci),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "intent" => Some(Command::Intent),
        "enemy" => Some(Command::Enemy),
        "state" => Some(Command::State),

        "setoption" => parse_setoption(&tokens),
        "config" => parse_config(&tokens, trimmed),
        "newcombat" => parse_newcombat(&tokens),
        "goals" => parse_goals(&tokens),
        "attack" => parse_attack(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `config <path>`. The path is everything after the keyword, so it
/// may contain spaces.
fn parse_config(tokens: &[&str], full_line: &str) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed config: expected 'config <path>'");
        return None;
    }
    let path = full_line
        .strip_prefix("config")
        .unwrap_or("")
        .trim()
        .to_string();
    Some(Command::Config { path })
}

/// Parses `newcombat [seed <n>]`.
fn parse_newcombat(tokens: &[&str]) -> Option<Command> {
    match tokens {
        [_] => Some(Command::NewCombat { seed: None }),
        [_, "seed", n] => match n.parse::<u64>() {
            Ok(seed) => Some(Command::NewCombat { seed: Some(seed) }),
            Err(_) => {
                warn!("invalid seed value: '{}'", n);
                None
            }
        },
        _ => {
            warn!("malformed newcombat: expected 'newcombat [seed <n>]'");
            None
        }
    }
}

/// Parses `goals <n>`.
fn parse_goals(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed goals: expected 'goals <n>'");
        return None;
    }
    match tokens[1].parse::<u32>() {
        Ok(remaining) => Some(Command::Goals { remaining }),
        Err(_) => {
            warn!("invalid goals value: '{}'", tokens[1]);
            None
        }
    }
}

/// Parses `attack <cleared> [white <n>] [green <n>]`.
///
/// Negative or non-numeric counts make the whole command malformed.
fn parse_attack(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed attack: expected 'attack <cleared> [white <n>] [green <n>]'");
        return None;
    }
    let cleared = match tokens[1].parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            warn!("invalid gem count: '{}'", tokens[1]);
            return None;
        }
    };
    let mut gems = GemClear::plain(cleared);

    let mut i = 2;
    while i < tokens.len() {
        let slot = match tokens[i] {
            "white" => &mut gems.white,
            "green" => &mut gems.green,
            other => {
                warn!("unknown attack parameter: '{}'", other);
                return None;
            }
        };
        i += 1;
        match tokens.get(i).map(|t| t.parse::<u32>()) {
            Some(Ok(v)) => *slot = v,
            _ => {
                warn!("missing or invalid count after '{}'", tokens[i - 1]);
                return None;
            }
        }
        i += 1;
    }

    Some(Command::Attack(gems))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("gci"), Some(Command::Gci));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("intent"), Some(Command::Intent));
        assert_eq!(parse_command("enemy"), Some(Command::Enemy));
        assert_eq!(parse_command("state"), Some(Command::State));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        let cmd = parse_command("setoption name EnemyMaxHealth value 250").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "EnemyMaxHealth".to_string(),
                value: Some("250".to_string()),
            }
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        let cmd = parse_command("setoption name ComboThreshold").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "ComboThreshold".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_config_path_with_spaces() {
        assert_eq!(
            parse_command("config /tmp/my levels/boss.json"),
            Some(Command::Config {
                path: "/tmp/my levels/boss.json".to_string()
            })
        );
        assert_eq!(parse_command("config"), None);
    }

    #[test]
    fn parse_newcombat() {
        assert_eq!(
            parse_command("newcombat"),
            Some(Command::NewCombat { seed: None })
        );
        assert_eq!(
            parse_command("newcombat seed 17"),
            Some(Command::NewCombat { seed: Some(17) })
        );
        assert_eq!(parse_command("newcombat seed x"), None);
        assert_eq!(parse_command("newcombat 17"), None);
    }

    #[test]
    fn parse_goals() {
        assert_eq!(
            parse_command("goals 3"),
            Some(Command::Goals { remaining: 3 })
        );
        assert_eq!(parse_command("goals"), None);
        assert_eq!(parse_command("goals -1"), None);
    }

    #[test]
    fn parse_attack_plain() {
        assert_eq!(
            parse_command("attack 5"),
            Some(Command::Attack(GemClear::plain(5)))
        );
    }

    #[test]
    fn parse_attack_with_specials_in_any_order() {
        assert_eq!(
            parse_command("attack 6 green 1 white 2"),
            Some(Command::Attack(GemClear::new(6, 2, 1)))
        );
    }

    #[test]
    fn parse_attack_malformed_returns_none() {
        assert_eq!(parse_command("attack"), None);
        assert_eq!(parse_command("attack -3"), None);
        assert_eq!(parse_command("attack 3 white"), None);
        assert_eq!(parse_command("attack 3 white -1"), None);
        assert_eq!(parse_command("attack 3 red 1"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  gci  "), Some(Command::Gci));
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
    }
}
