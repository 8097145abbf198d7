// Terminal styling. Callers pass `styled` explicitly; nothing here is global.

use crossterm::style::Stylize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Info,
    Success,
    Warning,
    Danger,
}

pub fn paint(text: &str, tone: Tone, styled: bool) -> String {
    if !styled {
        return text.to_string();
    }
    match tone {
        Tone::Heading => text.bold().to_string(),
        Tone::Info => text.cyan().to_string(),
        Tone::Success => text.green().bold().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Danger => text.red().bold().to_string(),
    }
}
