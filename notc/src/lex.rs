use ast::{Constant, DebugToken, Pos, Token};
use util::SliceIter;

pub fn tokenize(source: &str) -> Result<Box<[DebugToken]>, Error> {
    // working on bytes lets us use the slice patterns below, anything outside
    // ascii is only legal inside string literals and comments
    let mut iter = SliceIter::new(source.as_bytes());

    let mut tokens = Vec::new();
    while let Some(token) = lex_slice(&mut iter)? {
        tokens.push(token);
    }
    Ok(tokens.into())
}

fn lex_slice(iter: &mut SliceIter) -> Result<Option<DebugToken>, Error> {
    skip_trivia(iter)?;
    let pos = iter.pos();
    let token = match iter.as_bytes() {
        [b'+', b'+', ..] => double(iter, Token::Increment),
        [b'-', b'-', ..] => double(iter, Token::Decrement),
        [b'&', b'&', ..] => double(iter, Token::LogicalAnd),
        [b'|', b'|', ..] => double(iter, Token::LogicalOr),
        [b'=', b'=', ..] => double(iter, Token::EqualTo),
        [b'!', b'=', ..] => double(iter, Token::NotEqual),
        [b'<', b'=', ..] => double(iter, Token::Leq),
        [b'>', b'=', ..] => double(iter, Token::Geq),
        [b'0'..=b'9', ..] => number(iter)?,
        [b'"', ..] => string(iter)?,
        [a, ..] if word_start(*a) => word(iter),
        [a, ..] => {
            let token = match a {
                b'(' => Token::OpenParen,
                b')' => Token::CloseParen,
                b'{' => Token::OpenBrace,
                b'}' => Token::CloseBrace,
                b';' => Token::Semicolon,
                b',' => Token::Comma,
                b'+' => Token::Plus,
                b'-' => Token::Minus,
                b'*' => Token::Asterisk,
                b'/' => Token::Slash,
                b'%' => Token::Percent,
                b'<' => Token::LessThan,
                b'>' => Token::GreaterThan,
                b'=' => Token::Equals,
                _ => return Err(invalid_character(iter)),
            };
            iter.next();
            token
        }
        [] => return Ok(None),
    };
    Ok(Some(DebugToken { token, pos }))
}

fn double(iter: &mut SliceIter, token: Token) -> Token {
    iter.advance(2);
    token
}

fn skip_trivia(iter: &mut SliceIter) -> Result<(), Error> {
    loop {
        match iter.as_bytes() {
            [a, ..] if a.is_ascii_whitespace() => {
                iter.next();
            }
            [b'/', b'/', ..] | [b'#', ..] => {
                iter.take_while(|b| b != b'\n');
            }
            [b'/', b'*', ..] => {
                let start = iter.pos();
                iter.advance(2);
                loop {
                    match iter.as_bytes() {
                        [b'*', b'/', ..] => {
                            iter.advance(2);
                            break;
                        }
                        [_, ..] => {
                            iter.next();
                        }
                        [] => return Err(Error::UnterminatedComment(start)),
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

fn number(iter: &mut SliceIter) -> Result<Token, Error> {
    let pos = iter.pos();
    let mut text = String::from_utf8_lossy(iter.take_while(|b| b.is_ascii_digit())).into_owned();
    let mut is_double = false;

    if let [b'.', b'0'..=b'9', ..] = iter.as_bytes() {
        iter.next();
        text.push('.');
        text.push_str(&String::from_utf8_lossy(
            iter.take_while(|b| b.is_ascii_digit()),
        ));
        is_double = true;
    }

    match iter.as_bytes() {
        [b'e' | b'E', b'0'..=b'9', ..] | [b'e' | b'E', b'+' | b'-', b'0'..=b'9', ..] => {
            text.push('e');
            iter.next();
            if let Some(sign) = iter.next_if(|b| b == b'+' || b == b'-') {
                text.push(char::from(sign));
            }
            text.push_str(&String::from_utf8_lossy(
                iter.take_while(|b| b.is_ascii_digit()),
            ));
            is_double = true;
        }
        _ => {}
    }

    if iter.peek().is_some_and(word_character) {
        return Err(Error::InvalidConstant(pos));
    }

    let constant = if is_double {
        match text.parse::<f64>() {
            Ok(d) if d.is_finite() => Constant::Double(d),
            _ => return Err(Error::InvalidConstant(pos)),
        }
    } else {
        text.parse::<i32>()
            .map(Constant::Int)
            .map_err(|_| Error::IntegerOutOfRange(pos))?
    };
    Ok(Token::Const(constant))
}

fn string(iter: &mut SliceIter) -> Result<Token, Error> {
    let start = iter.pos();
    iter.next();
    let mut bytes = Vec::new();
    loop {
        match iter.next() {
            Some(b'"') => break,
            Some(b'\\') => {
                let escaped = match iter.next() {
                    Some(b'n') => b'\n',
                    Some(b't') => b'\t',
                    Some(b'r') => b'\r',
                    Some(b'"') => b'"',
                    Some(b'\\') => b'\\',
                    Some(_) => return Err(Error::InvalidEscape(iter.pos())),
                    None => return Err(Error::UnterminatedString(start)),
                };
                bytes.push(escaped);
            }
            Some(b'\n') | None => return Err(Error::UnterminatedString(start)),
            Some(b) => bytes.push(b),
        }
    }
    let text = String::from_utf8(bytes).map_err(|_| Error::UnterminatedString(start))?;
    Ok(Token::Const(Constant::Str(text.into())))
}

fn word(iter: &mut SliceIter) -> Token {
    let bytes = iter.take_while(word_character);
    let text = String::from_utf8_lossy(bytes);
    match text.as_ref() {
        "bool" => Token::Bool,
        "int" => Token::Int,
        "double" => Token::Double,
        "string" => Token::String,
        "void" => Token::Void,
        "if" => Token::If,
        "else" => Token::Else,
        "while" => Token::While,
        "for" => Token::For,
        "return" => Token::Return,
        "true" => Token::Const(Constant::Bool(true)),
        "false" => Token::Const(Constant::Bool(false)),
        ident => Token::Ident(ident.into()),
    }
}

fn invalid_character(iter: &SliceIter) -> Error {
    let text = std::str::from_utf8(iter.as_bytes()).unwrap_or_default();
    let c = text.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
    Error::InvalidCharacter(c, iter.pos())
}

const fn word_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

const fn word_character(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("{1}: invalid character {0:?}")]
    InvalidCharacter(char, Pos),
    #[error("{0}: invalid numeric constant")]
    InvalidConstant(Pos),
    #[error("{0}: integer constant out of range")]
    IntegerOutOfRange(Pos),
    #[error("{0}: unterminated string literal")]
    UnterminatedString(Pos),
    #[error("{0}: invalid escape sequence")]
    InvalidEscape(Pos),
    #[error("{0}: unterminated comment")]
    UnterminatedComment(Pos),
}
