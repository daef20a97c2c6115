//! Tokeniser for the subset of RTF produced by the game's report export.
//!
//! The lexer knows nothing about destinations or rows; it only splits the
//! input into groups, control words, control symbols and text runs.

use std::iter::Peekable;
use std::str::Chars;

/// A single RTF token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    GroupStart,
    GroupEnd,
    /// `\word` or `\word-12`
    ControlWord { name: String, param: Option<i32> },
    /// `\` followed by one non-letter, e.g. `\*` or `\~`
    ControlSymbol(char),
    /// `\'hh`
    Hex(u8),
    Text(String),
}

impl Token {
    fn word(name: &str) -> Self {
        Token::ControlWord {
            name: name.to_string(),
            param: None,
        }
    }
}

/// Iterator over the tokens of an RTF document.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn control(&mut self) -> Option<Token> {
        let first = self.chars.next()?;
        match first {
            '\\' | '{' | '}' => Some(Token::Text(first.to_string())),
            // A backslash before a raw line break is an alias for \par
            '\n' | '\r' => Some(Token::word("par")),
            '\'' => Some(self.hex()),
            c if c.is_ascii_alphabetic() => Some(self.control_word(c)),
            c => Some(Token::ControlSymbol(c)),
        }
    }

    fn hex(&mut self) -> Token {
        let mut digits = String::with_capacity(2);
        for _ in 0..2 {
            match self.chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    digits.push(*c);
                    self.chars.next();
                }
                _ => break,
            }
        }
        match u8::from_str_radix(&digits, 16) {
            Ok(b) if digits.len() == 2 => Token::Hex(b),
            _ => Token::ControlSymbol('\''),
        }
    }

    fn control_word(&mut self, first: char) -> Token {
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.chars.peek() {
            if c.is_ascii_alphabetic() {
                name.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }

        let mut digits = String::new();
        if self.chars.peek() == Some(&'-') {
            digits.push('-');
            self.chars.next();
        }
        while let Some(c) = self.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }
        let param = digits.parse().ok();

        // One space delimits the control word and is not part of the text.
        if self.chars.peek() == Some(&' ') {
            self.chars.next();
        }

        Token::ControlWord { name, param }
    }

    fn text(&mut self) -> Token {
        let mut run = String::new();
        while let Some(c) = self.chars.peek() {
            match c {
                '\\' | '{' | '}' => break,
                // Raw line breaks carry no meaning in RTF.
                '\n' | '\r' => {
                    self.chars.next();
                }
                _ => {
                    run.push(*c);
                    self.chars.next();
                }
            }
        }
        Token::Text(run)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let c = *self.chars.peek()?;
            let token = match c {
                '{' => {
                    self.chars.next();
                    Token::GroupStart
                }
                '}' => {
                    self.chars.next();
                    Token::GroupEnd
                }
                '\\' => {
                    self.chars.next();
                    self.control()?
                }
                _ => self.text(),
            };
            // Runs made only of line breaks come back empty.
            if token == Token::Text(String::new()) {
                continue;
            }
            return Some(token);
        }
    }
}

/// Tokenise a whole document.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(name: &str, param: Option<i32>) -> Token {
        Token::ControlWord {
            name: name.to_string(),
            param,
        }
    }

    #[test]
    fn test_groups_words_and_text() {
        let tokens = tokenize(r"{\rtf1\ansi Hello}");
        assert_eq!(
            tokens,
            vec![
                Token::GroupStart,
                word("rtf", Some(1)),
                word("ansi", None),
                Token::Text("Hello".to_string()),
                Token::GroupEnd,
            ]
        );
    }

    #[test]
    fn test_negative_parameter() {
        assert_eq!(tokenize(r"\u-3913?"), vec![
            word("u", Some(-3913)),
            Token::Text("?".to_string()),
        ]);
    }

    #[test]
    fn test_escapes_and_symbols() {
        let tokens = tokenize(r"a\{b\}\\c\*\~");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a".to_string()),
                Token::Text("{".to_string()),
                Token::Text("b".to_string()),
                Token::Text("}".to_string()),
                Token::Text("\\".to_string()),
                Token::Text("c".to_string()),
                Token::ControlSymbol('*'),
                Token::ControlSymbol('~'),
            ]
        );
    }

    #[test]
    fn test_hex_escape() {
        assert_eq!(tokenize(r"\'e9"), vec![Token::Hex(0xe9)]);
        assert_eq!(tokenize(r"\'zz"), vec![
            Token::ControlSymbol('\''),
            Token::Text("zz".to_string()),
        ]);
    }

    #[test]
    fn test_raw_newlines_are_dropped() {
        let tokens = tokenize("ab\r\ncd\n");
        assert_eq!(tokens, vec![Token::Text("abcd".to_string())]);
    }

    #[test]
    fn test_backslash_newline_is_par() {
        assert_eq!(tokenize("x\\\ny"), vec![
            Token::Text("x".to_string()),
            word("par", None),
            Token::Text("y".to_string()),
        ]);
    }
}
