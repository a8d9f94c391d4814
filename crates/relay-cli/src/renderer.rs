//! Terminal output: styled markdown, plain text or JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use termimad::{crossterm::style::Color, MadSkin};

const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// How a single markdown line is printed in rich mode.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    Heading,
    Fence,
    Code,
    Text,
}

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Prints markdown. Headings keep their hash marks and fenced payloads
    /// are printed verbatim so JSON stays copyable.
    pub fn render(&self, markdown: &str) {
        if !self.rich_enabled {
            print!("{markdown}");
            return;
        }

        let mut in_code = false;
        for line in markdown.lines() {
            match classify(line, in_code) {
                LineKind::Fence => {
                    in_code = !in_code;
                    println!("{DIM}{line}{RESET}");
                }
                LineKind::Code => println!("{line}"),
                LineKind::Heading => println!("{BLUE}{line}{RESET}"),
                LineKind::Text => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
    }

    /// Prints a value as pretty JSON, whatever the color setting.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{text}");
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn classify(line: &str, in_code: bool) -> LineKind {
    if line.trim_start().starts_with("```") {
        LineKind::Fence
    } else if in_code {
        LineKind::Code
    } else if line.starts_with('#') {
        LineKind::Heading
    } else {
        LineKind::Text
    }
}
