pub use ast::parse::{Binary, Block, Expr, FnDef, Param, Program, Stmnt, Unary};
use ast::{Bop, DebugToken, IncDec, Name, Pos, Token, UnOp};

use util::TokenIter;

pub fn parse(tokens: Box<[DebugToken]>) -> Result<Program, Error> {
    let mut tokens = TokenIter::new(tokens);
    let program = program(&mut tokens)?;
    if tokens.is_empty() {
        Ok(program)
    } else {
        Err(Error::ExtraStuff(tokens.peek_pos()))
    }
}

fn program(tokens: &mut TokenIter) -> Result<Program, Error> {
    let mut functions = Vec::new();
    while !tokens.is_empty() {
        functions.push(function(tokens)?);
    }
    Ok(Program(functions.into()))
}

fn function(tokens: &mut TokenIter) -> Result<FnDef, Error> {
    let ret = tokens.consume_type()?;
    let name = tokens.consume_identifier()?;
    tokens.consume(Token::OpenParen)?;
    let params = param_list(tokens)?;
    let body = block(tokens)?;
    Ok(FnDef {
        ret,
        name,
        params,
        body,
    })
}

fn param_list(tokens: &mut TokenIter) -> Result<Box<[Param]>, Error> {
    if tokens.next_if(|x| x == &Token::CloseParen).is_some() {
        return Ok(Box::new([]));
    }

    let mut params = Vec::new();
    loop {
        let ty = tokens.consume_type()?;
        let name = tokens.consume_identifier()?;
        params.push(Param { ty, name });
        let next = tokens.consume_any()?;
        match next.token {
            Token::Comma => {}
            Token::CloseParen => break,
            _ => return Err(Error::Catchall("expected ',' or ')'", next.pos)),
        }
    }
    Ok(params.into())
}

fn block(tokens: &mut TokenIter) -> Result<Block, Error> {
    tokens.consume(Token::OpenBrace)?;
    let mut body = Vec::new();
    while tokens.peek_any()? != &Token::CloseBrace {
        body.push(statement(tokens)?);
    }
    tokens.consume(Token::CloseBrace)?;
    Ok(body.into())
}

fn declaration(tokens: &mut TokenIter) -> Result<Stmnt, Error> {
    let ty = tokens.consume_type()?;
    let var = tokens.consume_identifier()?;

    if tokens.next_if(|x| x == &Token::Equals).is_some() {
        let init = expression(tokens, None)?;
        tokens.consume(Token::Semicolon)?;
        return Ok(Stmnt::Init { ty, var, init });
    }

    let mut names = vec![var];
    while tokens.next_if(|x| x == &Token::Comma).is_some() {
        names.push(tokens.consume_identifier()?);
    }
    tokens.consume(Token::Semicolon)?;
    Ok(Stmnt::Decl {
        ty,
        names: names.into(),
    })
}

fn statement(tokens: &mut TokenIter) -> Result<Stmnt, Error> {
    let token = tokens.peek_any()?;
    if token.type_name().is_some() {
        return declaration(tokens);
    }
    Ok(match token {
        Token::Return => {
            let pos = tokens.consume(Token::Return)?;
            let value = if tokens.next_if(|x| x == &Token::Semicolon).is_some() {
                None
            } else {
                let exp = expression(tokens, None)?;
                tokens.consume(Token::Semicolon)?;
                Some(exp)
            };
            Stmnt::Ret { value, pos }
        }
        Token::OpenBrace => Stmnt::Compound(block(tokens)?),
        Token::If => {
            tokens.next();
            let condition = bracket_expression(tokens)?;
            let then = Box::new(statement(tokens)?);
            let r#else = if tokens.next_if(|x| x == &Token::Else).is_some() {
                Some(Box::new(statement(tokens)?))
            } else {
                None
            };
            Stmnt::If {
                condition,
                then,
                r#else,
            }
        }
        Token::While => {
            tokens.next();
            let condition = bracket_expression(tokens)?;
            Stmnt::While {
                condition,
                body: Box::new(statement(tokens)?),
            }
        }
        Token::For => {
            tokens.next();
            tokens.consume(Token::OpenParen)?;
            let init = optional_expr(tokens, Token::Semicolon)?;
            let condition = optional_expr(tokens, Token::Semicolon)?;
            let step = optional_expr(tokens, Token::CloseParen)?;
            let body = Box::new(statement(tokens)?);
            Stmnt::For {
                init,
                condition,
                step,
                body,
            }
        }
        _ => {
            let e = expression(tokens, None)?;
            tokens.consume(Token::Semicolon)?;
            Stmnt::Exp(e)
        }
    })
}

fn optional_expr(tokens: &mut TokenIter, delim: Token) -> Result<Option<Expr>, Error> {
    if tokens.next_if(|x| x == &delim).is_some() {
        Ok(None)
    } else {
        let expression = expression(tokens, None)?;
        tokens.consume(delim)?;
        Ok(Some(expression))
    }
}

fn bracket_expression(tokens: &mut TokenIter) -> Result<Expr, Error> {
    tokens.consume(Token::OpenParen)?;
    let res = expression(tokens, None)?;
    tokens.consume(Token::CloseParen)?;
    Ok(res)
}

fn expression(tokens: &mut TokenIter, min_precedence: Option<u8>) -> Result<Expr, Error> {
    let precedence = min_precedence.unwrap_or(0);

    let mut left = factor(tokens)?;

    while let Some((operator, pos)) = binary_operator(tokens, precedence) {
        left = if operator == Bop::Equals {
            let Some(dst) = left.as_lvalue().cloned() else {
                return Err(Error::InvalidLvalue(left.pos()));
            };
            // right associative
            let src = Box::new(expression(tokens, Some(operator.precedence()))?);
            Expr::Assignment { dst, src }
        } else {
            let right = expression(tokens, Some(operator.precedence() + 1))?;
            Expr::Bin(Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                pos,
            })
        };
    }
    Ok(left)
}

const fn bop(token: &Token) -> Option<Bop> {
    Some(match token {
        Token::Plus => Bop::Add,
        Token::Minus => Bop::Subtract,
        Token::Asterisk => Bop::Multiply,
        Token::Slash => Bop::Divide,
        Token::Percent => Bop::Remainder,
        Token::LogicalAnd => Bop::LogAnd,
        Token::LogicalOr => Bop::LogOr,
        Token::EqualTo => Bop::EqualTo,
        Token::NotEqual => Bop::NotEqual,
        Token::LessThan => Bop::LessThan,
        Token::GreaterThan => Bop::GreaterThan,
        Token::Leq => Bop::Leq,
        Token::Geq => Bop::Geq,
        Token::Equals => Bop::Equals,
        _ => return None,
    })
}

fn binary_operator(tokens: &mut TokenIter, min_precedence: u8) -> Option<(Bop, Pos)> {
    let operator = bop(tokens.peek()?)?;
    if operator.precedence() >= min_precedence {
        let pos = tokens.next()?.pos;
        Some((operator, pos))
    } else {
        None
    }
}

fn factor(tokens: &mut TokenIter) -> Result<Expr, Error> {
    let DebugToken { token, pos } = tokens.consume_any()?;
    let atom = match token {
        Token::Increment => Expr::IncDec {
            op: IncDec::PreInc,
            var: lvalue(tokens)?,
        },
        Token::Decrement => Expr::IncDec {
            op: IncDec::PreDec,
            var: lvalue(tokens)?,
        },
        Token::Const(c) => Expr::Const { c, pos },
        Token::Minus => {
            let exp = Box::new(factor(tokens)?);
            Expr::Unary(Unary {
                op: UnOp::Negate,
                exp,
                pos,
            })
        }
        Token::OpenParen => {
            let exp = Box::new(expression(tokens, None)?);
            tokens.consume(Token::CloseParen)?;
            Expr::Nested(exp)
        }
        Token::Ident(ident) => {
            let name = Name { ident, pos };
            if tokens.next_if(|x| x == &Token::OpenParen).is_some() {
                let args = argument_list(tokens)?;
                Expr::FunctionCall { name, args }
            } else {
                Expr::Var(name)
            }
        }
        t => return Err(Error::ExpectedExpr(t, pos)),
    };

    let post = tokens.next_if(|x| x == &Token::Increment || x == &Token::Decrement);
    match post {
        Some(DebugToken { token, pos }) => {
            let Some(var) = atom.as_lvalue().cloned() else {
                return Err(Error::InvalidLvalue(pos));
            };
            let op = if token == Token::Increment {
                IncDec::PostInc
            } else {
                IncDec::PostDec
            };
            Ok(Expr::IncDec { op, var })
        }
        None => Ok(atom),
    }
}

fn lvalue(tokens: &mut TokenIter) -> Result<Name, Error> {
    let pos = tokens.peek_pos();
    match factor(tokens)? {
        Expr::Var(name) => Ok(name),
        _ => Err(Error::InvalidLvalue(pos)),
    }
}

fn argument_list(tokens: &mut TokenIter) -> Result<Box<[Expr]>, Error> {
    if tokens.next_if(|x| x == &Token::CloseParen).is_some() {
        return Ok(Box::new([]));
    }

    let mut list = Vec::new();
    loop {
        list.push(expression(tokens, None)?);
        let next = tokens.consume_any()?;
        match next.token {
            Token::Comma => {}
            Token::CloseParen => break,
            _ => return Err(Error::Catchall("expected ',' or ')'", next.pos)),
        }
    }

    Ok(list.into())
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Expected(#[from] util::Expected),
    #[error("{1}: expected expression, got {0}")]
    ExpectedExpr(Token, Pos),
    #[error("{0}: only variables can be assigned or incremented")]
    InvalidLvalue(Pos),
    #[error("{1}: {0}")]
    Catchall(&'static str, Pos),
    #[error("{0}: unexpected tokens after last function")]
    ExtraStuff(Pos),
}

impl Error {
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Self::Expected(util::Expected::Eof(pos))
            | Self::Expected(util::Expected::Identifier { pos, .. })
            | Self::Expected(util::Expected::Token { pos, .. })
            | Self::Expected(util::Expected::Type { pos, .. })
            | Self::ExpectedExpr(_, pos)
            | Self::InvalidLvalue(pos)
            | Self::Catchall(_, pos)
            | Self::ExtraStuff(pos) => Some(*pos),
        }
    }
}
