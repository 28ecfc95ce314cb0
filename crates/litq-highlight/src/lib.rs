//! Syntax highlighting and terminal colors for litq.
//!
//! Highlights configuration TOML through syntect, colors
//! boolean queries by token kind, and provides styled helpers for headers and
//! status messages.

#![warn(missing_docs)]

use litq_query::{OperatorTable, tokenize};
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a new highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content for terminal output.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content with the specified syntax for terminal output.
    ///
    /// If the syntax is not found, the content is treated as plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for operators).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success).
    pub const GREEN: &str = "\x1b[32m";
    /// Magenta text (for field codes).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Colors a query by token: operators bold cyan, field codes magenta,
/// parentheses dim.
///
/// Whitespace is normalized to single spaces. Spellings in `table` are
/// colored as operators but not rewritten.
pub fn highlight_query(query: &str, table: &OperatorTable) -> String {
    let mut out = String::new();
    for (i, lexeme) in tokenize(query).iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let text = lexeme.text.as_str();
        if text == "(" || text == ")" {
            out.push_str(&dim(text));
        } else if table.is_operator(text) {
            out.push_str(&format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET));
        } else if let Some(open) = field_code_start(text) {
            let (phrase, code) = text.split_at(open);
            out.push_str(phrase);
            out.push_str(&format!("{}{}{}", colors::MAGENTA, code, colors::RESET));
        } else {
            out.push_str(text);
        }
    }
    out
}

/// Returns the byte offset of a trailing `[CODE]` that follows a closing quote.
fn field_code_start(text: &str) -> Option<usize> {
    if !text.ends_with(']') {
        return None;
    }
    let open = text.rfind('[')?;
    matches!(text[..open].chars().last(), Some('"' | '\'')).then_some(open)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", colors::RED, text, colors::RESET)
}

/// Indents every non-empty line of `content` by `width` spaces.
pub fn indent_content(content: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
