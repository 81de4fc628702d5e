use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CharPosition {
    pub line_number: i32,
    pub char_column: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextLocation {
    pub start_pos: CharPosition,
    pub end_pos: CharPosition,
}

impl TextLocation {
    pub fn new(start: CharPosition, end: CharPosition) -> Self {
        Self {
            start_pos: start,
            end_pos: end,
        }
    }

    /// Location covering both locations, used for nodes built from several tokens
    pub fn span_to(&self, other: &TextLocation) -> TextLocation {
        TextLocation {
            start_pos: self.start_pos,
            end_pos: other.end_pos,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: TextLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: TextLocation) -> Self {
        Self { kind, location }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum TokenKind {
    Eof,

    // Keywords
    Def,
    Extern,
    If,
    Then,
    Else,
    For,
    In,
    Var,

    Identifier(String),
    Number(f64),

    // Any other single character: operators, parentheses, commas and statement ends
    Char(char),
}

impl TokenKind {
    pub fn is_char(&self, expected: char) -> bool {
        matches!(self, TokenKind::Char(ch) if *ch == expected)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Def => write!(f, "'def'"),
            TokenKind::Extern => write!(f, "'extern'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Then => write!(f, "'then'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenKind::Number(value) => write!(f, "number {value}"),
            TokenKind::Char(ch) => write!(f, "'{ch}'"),
        }
    }
}

pub struct TokenStream<'a> {
    pub chars: Peekable<Chars<'a>>,
    pub position: CharPosition,
    pub start_position: CharPosition,
}

impl<'a> TokenStream<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            chars: source_code.chars().peekable(),
            position: CharPosition::default(),
            start_position: CharPosition::default(),
        }
    }

    pub fn next(&mut self) -> Option<char> {
        match self.chars.peek() {
            Some(c) => {
                if *c == '\n' {
                    self.position.line_number += 1;
                    self.position.char_column = 0;
                } else {
                    self.position.char_column += 1;
                }

                self.chars.next()
            }

            None => None,
        }
    }

    pub fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    pub fn new_location(&mut self) -> TextLocation {
        let start_pos = self.start_position;
        self.update_start_position();
        TextLocation::new(start_pos, self.position)
    }

    pub fn update_start_position(&mut self) {
        self.start_position = self.position;
    }
}
