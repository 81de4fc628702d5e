use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{Token, TokenKind, TokenStream};
use crate::settings::{COMMENT_CHAR, SRC_TO_TOKEN_RATIO};
use crate::{return_syntax_error, token_log};

#[macro_export]
macro_rules! return_token {
    ($kind:expr, $stream:expr $(,)?) => {
        return Ok(Token::new($kind, $stream.new_location()))
    };
}

/// Splits source text into tokens, always ending with a single Eof token.
pub fn tokenize(source_code: &str) -> Result<Vec<Token>, CompilerError> {
    let initial_capacity = source_code.len() / SRC_TO_TOKEN_RATIO + 1;
    let mut tokens: Vec<Token> = Vec::with_capacity(initial_capacity);
    let mut stream = TokenStream::new(source_code);

    loop {
        let token = get_token(&mut stream)?;
        token_log!(#token);

        let finished = token.kind == TokenKind::Eof;
        tokens.push(token);

        if finished {
            break;
        }
    }

    Ok(tokens)
}

pub fn get_token(stream: &mut TokenStream) -> Result<Token, CompilerError> {
    skip_whitespace_and_comments(stream);

    // To ignore leading whitespace for the next token position
    stream.update_start_position();

    let current_char = match stream.next() {
        Some(ch) => ch,
        None => return_token!(TokenKind::Eof, stream),
    };

    if current_char.is_ascii_alphabetic() {
        let mut token_value = String::from(current_char);
        return Ok(keyword_or_identifier(&mut token_value, stream));
    }

    if current_char.is_ascii_digit() || current_char == '.' {
        let mut token_value = String::from(current_char);
        return tokenize_number(&mut token_value, stream);
    }

    return_token!(TokenKind::Char(current_char), stream)
}

fn skip_whitespace_and_comments(stream: &mut TokenStream) {
    while let Some(&ch) = stream.peek() {
        if ch.is_whitespace() {
            stream.next();
        } else if ch == COMMENT_CHAR {
            // Comments run until the end of the line
            while let Some(ch) = stream.next() {
                if ch == '\n' {
                    break;
                }
            }
        } else {
            break;
        }
    }
}

fn keyword_or_identifier(token_value: &mut String, stream: &mut TokenStream) -> Token {
    while let Some(&ch) = stream.peek() {
        if !ch.is_ascii_alphanumeric() {
            break;
        }

        token_value.push(ch);
        stream.next();
    }

    let kind = match token_value.as_str() {
        "def" => TokenKind::Def,
        "extern" => TokenKind::Extern,
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "var" => TokenKind::Var,
        _ => TokenKind::Identifier(std::mem::take(token_value)),
    };

    Token::new(kind, stream.new_location())
}

fn tokenize_number(token_value: &mut String, stream: &mut TokenStream) -> Result<Token, CompilerError> {
    while let Some(&ch) = stream.peek() {
        if !(ch.is_ascii_digit() || ch == '.') {
            break;
        }

        token_value.push(ch);
        stream.next();
    }

    let location = stream.new_location();
    match token_value.parse::<f64>() {
        Ok(value) => Ok(Token::new(TokenKind::Number(value), location)),
        Err(_) => return_syntax_error!(
            format!("Malformed number literal: '{token_value}'"),
            location,
            {
                CompilationStage => "Tokenization",
                PrimarySuggestion => "Numbers may contain at most one decimal point",
            }
        ),
    }
}

#[cfg(test)]
#[path = "tests/tokenizer_tests.rs"]
mod tests;
