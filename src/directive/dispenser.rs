//! Token scanner and cursor for directive text.
//!
//! The scanner is line-aware: arguments must share a line with their
//! subdirective, and a block opens with a `{` on the same line as the
//! directive name. Quoted tokens never act as braces, so `"{"` is an ordinary
//! value while a bare `{` opens a block. `#` starts a comment that runs to
//! the end of the line.

use crate::directive::types::DirectiveError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    line: usize,
    line_end: usize,
    quoted: bool,
}

impl Token {
    fn is_open_brace(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    fn is_close_brace(&self) -> bool {
        !self.quoted && self.text == "}"
    }

    fn is_brace(&self) -> bool {
        self.is_open_brace() || self.is_close_brace()
    }
}

/// Split directive text into tokens, checking quote termination and brace
/// balance as it goes.
fn scan(input: &str) -> Result<Vec<Token>, DirectiveError> {
    let mut tokens = Vec::new();
    let mut open_lines: Vec<usize> = Vec::new();
    let mut line: usize = 1;
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.peek().is_some_and(|&c| c != '\n') {
                    chars.next();
                }
            }
            '"' => {
                chars.next();
                let start = line;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        None => return Err(DirectiveError::UnterminatedQuote { line: start }),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('"') => text.push('"'),
                            Some('\\') => text.push('\\'),
                            Some(other) => {
                                // Unknown escapes are kept verbatim.
                                text.push('\\');
                                text.push(other);
                                if other == '\n' {
                                    line += 1;
                                }
                            }
                            None => {
                                return Err(DirectiveError::UnterminatedQuote { line: start });
                            }
                        },
                        Some('\n') => {
                            text.push('\n');
                            line += 1;
                        }
                        Some(other) => text.push(other),
                    }
                }
                tokens.push(Token {
                    text,
                    line: start,
                    line_end: line,
                    quoted: true,
                });
            }
            _ => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                if text == "{" {
                    open_lines.push(line);
                } else if text == "}" && open_lines.pop().is_none() {
                    return Err(DirectiveError::UnexpectedClose { line });
                }
                tokens.push(Token {
                    text,
                    line,
                    line_end: line,
                    quoted: false,
                });
            }
        }
    }

    if let Some(&line) = open_lines.last() {
        return Err(DirectiveError::UnclosedBlock { line });
    }

    Ok(tokens)
}

/// Cursor over scanned directive tokens.
///
/// Starts before the first token; `next` (or one of its variants) must be
/// called before `val` returns anything useful.
#[derive(Debug)]
pub struct Dispenser {
    tokens: Vec<Token>,
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    pub fn new(input: &str) -> Result<Self, DirectiveError> {
        Ok(Self {
            tokens: scan(input)?,
            cursor: None,
            nesting: 0,
        })
    }

    /// Advance to the next token, crossing line boundaries.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Advance only if the next token sits on the current line and is an
    /// argument. Braces are never arguments.
    pub fn next_arg(&mut self) -> bool {
        let advance = matches!(self.peek_same_line(), Some(token) if !token.is_brace());
        if advance {
            self.cursor = self.cursor.map(|c| c + 1);
        }
        advance
    }

    /// Enter a block opening on the current line, or keep walking one already
    /// entered. Returns false once the block (if any) is exhausted, leaving
    /// the cursor on the closing brace.
    pub fn next_block(&mut self) -> bool {
        if self.nesting > 0 {
            if !self.next() {
                return false;
            }
            if self.current().is_some_and(Token::is_close_brace) {
                self.nesting -= 1;
            } else if self.current().is_some_and(Token::is_open_brace) {
                self.nesting += 1;
            }
            return self.nesting > 0;
        }

        if !matches!(self.peek_same_line(), Some(token) if token.is_open_brace()) {
            return false;
        }
        self.cursor = self.cursor.map(|c| c + 1);
        if !self.next() {
            return false;
        }
        if self.current().is_some_and(Token::is_close_brace) {
            // Opened and closed right away.
            return false;
        }
        self.nesting += 1;
        true
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.tokens.get(c))
    }

    fn peek_same_line(&self) -> Option<&Token> {
        let current = self.current()?;
        let next = self.tokens.get(self.cursor? + 1)?;
        (next.line == current.line_end).then_some(next)
    }

    /// Text of the current token, quotes already stripped.
    pub fn val(&self) -> &str {
        self.current().map_or("", |t| t.text.as_str())
    }

    /// Line the current token starts on.
    pub fn line(&self) -> usize {
        self.current().map_or(0, |t| t.line)
    }

    /// The error for a subdirective given the wrong number of arguments.
    pub fn arg_err(&self) -> DirectiveError {
        DirectiveError::ArgCount {
            line: self.line(),
            token: self.val().to_string(),
        }
    }
}
