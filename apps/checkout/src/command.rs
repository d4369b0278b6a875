use shared::domain::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(ItemId),
    Remove(ItemId),
    /// Raw direction name, passed through unchecked.
    Adjust { direction: String, item_id: ItemId },
    Show,
    Retry,
    Help,
    Quit,
}

pub const HELP: &str = "commands: add <id> | remove <id> | adjust <direction> <id> | show | retry | help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Show);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" | "+" => Command::Add(parse_item_id(parts.next())?),
        "remove" | "-" => Command::Remove(parse_item_id(parts.next())?),
        "adjust" => {
            let direction = parts
                .next()
                .ok_or_else(|| "adjust needs a direction and an item id".to_string())?
                .to_string();
            Command::Adjust {
                direction,
                item_id: parse_item_id(parts.next())?,
            }
        }
        "show" | "ls" => Command::Show,
        "retry" | "reload" => Command::Retry,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}'; {HELP}")),
    };

    if let Some(extra) = parts.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(command)
}

fn parse_item_id(raw: Option<&str>) -> Result<ItemId, String> {
    let raw = raw.ok_or_else(|| "missing item id".to_string())?;
    raw.parse::<i64>()
        .map(ItemId)
        .map_err(|_| format!("'{raw}' is not an item id"))
}
