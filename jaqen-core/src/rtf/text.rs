//! Turn an RTF token stream back into plain text lines.

use super::lexer::Token;

/// Destinations whose content is never visible text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "headerl",
    "headerr",
    "footer",
    "footerl",
    "footerr",
    "generator",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "themedata",
    "latentstyles",
    "datastore",
    "xmlnstbl",
    "mmathPr",
];

/// Windows-1252 code points for bytes 0x80..=0x9F (0 = undefined).
const CP1252_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

fn decode_cp1252(byte: u8) -> char {
    match byte {
        0x80..=0x9F => {
            let cp = CP1252_HIGH[(byte - 0x80) as usize];
            char::from_u32(cp).filter(|_| cp != 0).unwrap_or('\u{FFFD}')
        }
        b => b as char,
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    skip: bool,
    /// `\ucN`: fallback characters that follow each `\uN`.
    uc: usize,
}

struct TextBuilder {
    lines: Vec<String>,
    current: String,
    stack: Vec<GroupState>,
    state: GroupState,
    /// True until the first token of a freshly opened group is seen.
    group_start: bool,
    /// Fallback characters still to drop after a `\uN`.
    pending_skip: usize,
    /// The current line is a table row that already has its leading `|`.
    in_row: bool,
}

impl TextBuilder {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            stack: Vec::new(),
            state: GroupState { skip: false, uc: 1 },
            group_start: false,
            pending_skip: 0,
            in_row: false,
        }
    }

    fn end_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
        self.in_row = false;
    }

    fn push_char(&mut self, c: char) {
        if self.pending_skip > 0 {
            self.pending_skip -= 1;
            return;
        }
        if !self.state.skip {
            self.current.push(c);
        }
    }

    fn token(&mut self, token: Token) {
        let first_in_group = std::mem::replace(&mut self.group_start, false);
        match token {
            Token::GroupStart => {
                self.stack.push(self.state);
                self.group_start = true;
                self.pending_skip = 0;
            }
            Token::GroupEnd => {
                if let Some(prev) = self.stack.pop() {
                    self.state = prev;
                }
                self.pending_skip = 0;
            }
            Token::ControlSymbol('*') if first_in_group => self.state.skip = true,
            Token::ControlSymbol('~') => self.push_char(' '),
            Token::ControlSymbol('_') => self.push_char('-'),
            Token::ControlSymbol(_) => {}
            Token::Hex(b) => self.push_char(decode_cp1252(b)),
            Token::Text(run) => {
                for c in run.chars() {
                    self.push_char(c);
                }
            }
            Token::ControlWord { name, param } => {
                if first_in_group && SKIPPED_DESTINATIONS.contains(&name.as_str()) {
                    self.state.skip = true;
                    return;
                }
                self.control_word(&name, param);
            }
        }
    }

    fn control_word(&mut self, name: &str, param: Option<i32>) {
        match name {
            "par" | "line" | "row" | "sect" | "page" => {
                if !self.state.skip {
                    self.end_line();
                }
            }
            // Cell rows are framed `|a|b|` like the plain-text tables, so an
            // empty first cell still counts as a field.
            "cell" | "nestcell" => {
                if !self.state.skip {
                    if !self.in_row {
                        self.current.insert(0, '|');
                        self.in_row = true;
                    }
                    self.current.push('|');
                }
            }
            "tab" => self.push_char(' '),
            "uc" => self.state.uc = param.unwrap_or(1).max(0) as usize,
            "u" => {
                if let Some(mut cp) = param {
                    if cp < 0 {
                        cp += 65536;
                    }
                    let c = char::from_u32(cp as u32).unwrap_or('\u{FFFD}');
                    self.pending_skip = 0;
                    self.push_char(c);
                    self.pending_skip = self.state.uc;
                }
            }
            "emdash" => self.push_char('\u{2014}'),
            "endash" => self.push_char('\u{2013}'),
            "lquote" => self.push_char('\u{2018}'),
            "rquote" => self.push_char('\u{2019}'),
            "ldblquote" => self.push_char('\u{201C}'),
            "rdblquote" => self.push_char('\u{201D}'),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() {
            self.end_line();
        }
        self.lines
    }
}

/// Rebuild the visible text lines from a token stream.
pub fn plain_lines<I: IntoIterator<Item = Token>>(tokens: I) -> Vec<String> {
    let mut builder = TextBuilder::new();
    for token in tokens {
        builder.token(token);
    }
    builder.finish()
}
