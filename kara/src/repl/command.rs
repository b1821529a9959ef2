//! Parsing of shell input into commands
//!
//! Numbers typed by the user are 1-based; they are converted to indices here.

use crate::domain::WorkshopField;

/// Fields targeted by `/gen`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenTarget {
    One(WorkshopField),
    All,
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    Topics,
    /// Start a conversation from a catalogue ordinal
    Topic(u32),
    /// Select a choice and follow it
    Follow(usize),
    /// Select a choice without following it
    Select(usize),
    Next,
    Show,
    Reset,
    Bookmark,
    Threads,
    Research(usize),
    Guidance(usize),
    Workshop { thread: usize, nuance: usize },
    Doc { thread: usize, nuance: Option<usize> },

    // Workshop mode
    Edit(WorkshopField),
    Gen(GenTarget),
    Fields,
    SaveWorkshop,
    Cancel,
}

/// Parse one input line
///
/// `in_workshop` switches `/save` and `/show` to their workshop meanings and
/// enables the workshop-only commands.
pub fn parse(input: &str, in_workshop: bool) -> Result<ReplCommand, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(cmd) = parts.first().copied() else {
        return Err("Empty input".to_string());
    };

    if !cmd.starts_with('/') {
        if in_workshop {
            return Err(format!("Unknown input '{}'. Type /help for workshop commands", cmd));
        }
        return Ok(ReplCommand::Follow(index(cmd, "choice")?));
    }

    let args = &parts[1..];
    let command = match (cmd, in_workshop) {
        ("/help" | "/h", _) => ReplCommand::Help,
        ("/quit" | "/q" | "/exit", _) => ReplCommand::Quit,
        ("/topics", false) => ReplCommand::Topics,
        ("/topic", false) => ReplCommand::Topic(ordinal(arg(args, 0, "topic number")?)?),
        ("/select", false) => ReplCommand::Select(index(arg(args, 0, "choice number")?, "choice")?),
        ("/next" | "/retry", false) => ReplCommand::Next,
        ("/show", false) => ReplCommand::Show,
        ("/reset", false) => ReplCommand::Reset,
        ("/save", false) => ReplCommand::Bookmark,
        ("/threads", false) => ReplCommand::Threads,
        ("/research", false) => ReplCommand::Research(index(arg(args, 0, "thread number")?, "thread")?),
        ("/guidance", false) => ReplCommand::Guidance(index(arg(args, 0, "thread number")?, "thread")?),
        ("/workshop", false) => ReplCommand::Workshop {
            thread: index(arg(args, 0, "thread number")?, "thread")?,
            nuance: index(arg(args, 1, "nuance number")?, "nuance")?,
        },
        ("/doc", false) => ReplCommand::Doc {
            thread: index(arg(args, 0, "thread number")?, "thread")?,
            nuance: args.get(1).map(|s| index(s, "nuance")).transpose()?,
        },
        ("/edit", true) => ReplCommand::Edit(field(arg(args, 0, "field")?)?),
        ("/gen", true) => {
            let target = arg(args, 0, "field or 'all'")?;
            if target.eq_ignore_ascii_case("all") {
                ReplCommand::Gen(GenTarget::All)
            } else {
                ReplCommand::Gen(GenTarget::One(field(target)?))
            }
        }
        ("/show", true) => ReplCommand::Fields,
        ("/save", true) => ReplCommand::SaveWorkshop,
        ("/cancel", true) => ReplCommand::Cancel,
        (other, true) => return Err(format!("Unknown workshop command: {}", other)),
        (other, false) => return Err(format!("Unknown command: {}", other)),
    };
    Ok(command)
}

fn arg<'a>(args: &[&'a str], pos: usize, what: &str) -> Result<&'a str, String> {
    args.get(pos).copied().ok_or_else(|| format!("Missing {}", what))
}

fn ordinal(s: &str) -> Result<u32, String> {
    s.parse::<u32>().map_err(|_| format!("Not a topic number: {}", s))
}

/// 1-based user number to 0-based index
fn index(s: &str, what: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Not a valid {} number: {}", what, s)),
    }
}

fn field(s: &str) -> Result<WorkshopField, String> {
    s.parse::<WorkshopField>()
}
