use chumsky::error::Simple;
use chumsky::primitive::{choice, end, just};
use chumsky::recursive::recursive;
use chumsky::text::TextParser as _;
use chumsky::{text, Parser};
use lts::Map;
use thiserror::Error;

/// Failure of the auxiliary expression evaluator. Expressions are
/// unrecoverable at the operation site, so parse and evaluation failures
/// share one error type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExprError {
    #[error("invalid expression: {0}")]
    Parse(String),
    #[error("unknown variable {0}")]
    UnknownVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

#[derive(Debug)]
enum Expr {
    Num(i32),
    Var(String),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// Evaluates a 32-bit signed integer expression over the caller's
/// variables. Comparisons and the logical operators produce 0/1, with zero
/// coerced to false and anything else to true; `&&` and `||` short-circuit.
pub fn eval(source: &str, vars: &Map<String, i32>) -> Result<i32, ExprError> {
    let expr = parser().parse(source).map_err(|errors| {
        let error = errors.into_iter().next().expect("parse failed without errors");
        ExprError::Parse(error.to_string())
    })?;
    eval_expr(&expr, vars)
}

// Atom    ::=  number | variable | '(' Expr ')'
// Expr    ::=  the usual ladder, tightest first:
//              * / %   + -   << >>   < <= > >=   == !=   &   ^   |   &&   ||
fn parser() -> impl Parser<char, Expr, Error = Simple<char>> {
    let expr = recursive(|expr| {
        let number = text::int(10).try_map(|digits: String, span| {
            digits
                .parse::<i32>()
                .map(Expr::Num)
                .map_err(|_| Simple::custom(span, "integer literal out of range"))
        });
        let variable = text::ident().map(Expr::Var);
        let group = expr.delimited_by(just('(').padded(), just(')').padded());
        let atom = choice((number, variable, group)).padded().boxed();

        let binary = |lhs, (op, rhs)| Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        macro_rules! level {
            ($below:expr, $token0:literal => $op0:ident $(, $token:literal => $op:ident)*) => {
                $below
                    .clone()
                    .then(
                        just($token0).padded().to(BinOp::$op0)
                            $(.or(just($token).padded().to(BinOp::$op)))*
                            .then($below)
                            .repeated(),
                    )
                    .foldl(binary)
                    .boxed()
            };
        }

        let product = level!(atom, "*" => Mul, "/" => Div, "%" => Rem);
        let sum = level!(product, "+" => Add, "-" => Sub);
        let shift = level!(sum, "<<" => Shl, ">>" => Shr);
        let compare = level!(shift, "<=" => Le, ">=" => Ge, "<" => Lt, ">" => Gt);
        let equality = level!(compare, "==" => Eq, "!=" => Ne);
        let bit_and = level!(equality, "&" => BitAnd);
        let bit_xor = level!(bit_and, "^" => BitXor);
        let bit_or = level!(bit_xor, "|" => BitOr);
        let logic_and = level!(bit_or, "&&" => And);
        level!(logic_and, "||" => Or)
    });

    expr.then_ignore(end())
}

fn eval_expr(expr: &Expr, vars: &Map<String, i32>) -> Result<i32, ExprError> {
    match expr {
        Expr::Num(n) => Ok(*n),
        Expr::Var(name) => {
            vars.get(name).copied().ok_or_else(|| ExprError::UnknownVariable(name.clone()))
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = eval_expr(lhs, vars)?;
            match op {
                BinOp::And if l == 0 => return Ok(0),
                BinOp::Or if l != 0 => return Ok(1),
                _ => {}
            }
            let r = eval_expr(rhs, vars)?;
            Ok(match op {
                BinOp::Mul => l.wrapping_mul(r),
                BinOp::Div if r == 0 => return Err(ExprError::DivisionByZero),
                BinOp::Div => l.wrapping_div(r),
                BinOp::Rem if r == 0 => return Err(ExprError::ModuloByZero),
                BinOp::Rem => l.wrapping_rem(r),
                BinOp::Add => l.wrapping_add(r),
                BinOp::Sub => l.wrapping_sub(r),
                BinOp::Shl => l.wrapping_shl(r as u32),
                BinOp::Shr => l.wrapping_shr(r as u32),
                BinOp::Lt => (l < r) as i32,
                BinOp::Le => (l <= r) as i32,
                BinOp::Gt => (l > r) as i32,
                BinOp::Ge => (l >= r) as i32,
                BinOp::Eq => (l == r) as i32,
                BinOp::Ne => (l != r) as i32,
                BinOp::BitAnd => l & r,
                BinOp::BitXor => l ^ r,
                BinOp::BitOr => l | r,
                BinOp::And | BinOp::Or => (r != 0) as i32,
            })
        }
    }
}
