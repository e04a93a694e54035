//! Infix and LaTeX rendering.

use std::fmt::{self, Write};

use crate::arena::ExprArena;
use crate::expr::{ExprNode, Func};
use crate::handle::ExprHandle;

/// Output notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notation {
    /// Calculator notation, e.g. `3*x**2 - 1`.
    Plain,
    /// LaTeX math, e.g. `3 \cdot x^{2} - 1`.
    Latex,
}

// Binding strength, loosest first.
const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const UNARY: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

/// Writes an expression in the chosen notation.
pub struct Printer<'a> {
    arena: &'a ExprArena,
    notation: Notation,
}

impl<'a> Printer<'a> {
    /// Creates a printer over `arena`.
    #[must_use]
    pub fn new(arena: &'a ExprArena, notation: Notation) -> Self {
        Self { arena, notation }
    }

    /// Renders `h` to a string.
    #[must_use]
    pub fn render(&self, h: ExprHandle) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write(&mut out, h);
        out
    }

    fn latex(&self) -> bool {
        self.notation == Notation::Latex
    }

    fn precedence(&self, h: ExprHandle) -> u8 {
        match self.arena.get(h) {
            ExprNode::Number(n) if n.value() < 0.0 => UNARY,
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Call { .. } => ATOM,
            ExprNode::Add(_) => SUM,
            ExprNode::Mul(_) if self.is_negative(h) => UNARY,
            ExprNode::Mul(_) | ExprNode::Div { .. } => PRODUCT,
            ExprNode::Neg(_) => UNARY,
            ExprNode::Pow { .. } => POWER,
        }
    }

    /// A term that prints with a leading minus sign.
    fn is_negative(&self, h: ExprHandle) -> bool {
        match self.arena.get(h) {
            ExprNode::Number(n) => n.value() < 0.0,
            ExprNode::Mul(args) => self.arena.get(args[0]).as_number().is_some_and(|c| c < 0.0),
            ExprNode::Neg(_) => true,
            _ => false,
        }
    }

    fn write(&self, out: &mut String, h: ExprHandle) -> fmt::Result {
        match self.arena.get(h) {
            ExprNode::Number(n) => write_number(out, n.value()),
            ExprNode::Symbol(id) => out.write_str(self.arena.symbol_name(*id).unwrap_or("?")),
            ExprNode::Add(args) => {
                for (i, &t) in args.iter().enumerate() {
                    if i == 0 {
                        self.write(out, t)?;
                    } else if self.is_negative(t) {
                        out.write_str(" - ")?;
                        self.write_magnitude(out, t)?;
                    } else {
                        out.write_str(" + ")?;
                        self.write(out, t)?;
                    }
                }
                Ok(())
            }
            ExprNode::Neg(a) => {
                out.write_char('-')?;
                self.write_operand(out, *a, PRODUCT)
            }
            ExprNode::Mul(_) if self.is_negative(h) => {
                out.write_char('-')?;
                self.write_magnitude(out, h)
            }
            ExprNode::Mul(args) => self.write_factors(out, args),
            ExprNode::Pow { base, exp } => {
                self.write_operand(out, *base, POWER + 1)?;
                if self.latex() {
                    out.write_str("^{")?;
                    self.write(out, *exp)?;
                    out.write_char('}')
                } else {
                    out.write_str("**")?;
                    self.write_operand(out, *exp, ATOM)
                }
            }
            ExprNode::Div { num, den } => {
                if self.latex() {
                    out.write_str("\\frac{")?;
                    self.write(out, *num)?;
                    out.write_str("}{")?;
                    self.write(out, *den)?;
                    out.write_char('}')
                } else {
                    self.write_operand(out, *num, PRODUCT)?;
                    out.write_char('/')?;
                    self.write_operand(out, *den, PRODUCT + 1)
                }
            }
            ExprNode::Call { func, arg } => self.write_call(out, *func, *arg),
        }
    }

    /// Writes a negative term without its sign.
    fn write_magnitude(&self, out: &mut String, h: ExprHandle) -> fmt::Result {
        match self.arena.get(h) {
            ExprNode::Number(n) => write_number(out, n.value().abs()),
            ExprNode::Neg(a) => self.write_operand(out, *a, PRODUCT),
            ExprNode::Mul(args) => {
                let c = self.arena.get(args[0]).as_number().unwrap_or(-1.0).abs();
                let rest = &args[1..];
                if c == 1.0 {
                    self.write_factors(out, rest)
                } else {
                    write_number(out, c)?;
                    out.write_str(self.times())?;
                    self.write_factors(out, rest)
                }
            }
            _ => self.write(out, h),
        }
    }

    fn write_factors(&self, out: &mut String, factors: &[ExprHandle]) -> fmt::Result {
        for (i, &f) in factors.iter().enumerate() {
            if i > 0 {
                out.write_str(self.times())?;
            }
            let min = if i == 0 { PRODUCT } else { PRODUCT + 1 };
            if i > 0 && self.is_negative(f) {
                self.write_parenthesized(out, f)?;
            } else {
                self.write_operand(out, f, min)?;
            }
        }
        Ok(())
    }

    fn write_operand(&self, out: &mut String, h: ExprHandle, min: u8) -> fmt::Result {
        if self.precedence(h) < min {
            self.write_parenthesized(out, h)
        } else {
            self.write(out, h)
        }
    }

    fn write_parenthesized(&self, out: &mut String, h: ExprHandle) -> fmt::Result {
        let (open, close) = if self.latex() {
            ("\\left(", "\\right)")
        } else {
            ("(", ")")
        };
        out.write_str(open)?;
        self.write(out, h)?;
        out.write_str(close)
    }

    fn write_call(&self, out: &mut String, func: Func, arg: ExprHandle) -> fmt::Result {
        if !self.latex() {
            write!(out, "{}(", func.name())?;
            self.write(out, arg)?;
            return out.write_char(')');
        }
        match func {
            Func::Sqrt => {
                out.write_str("\\sqrt{")?;
                self.write(out, arg)?;
                out.write_char('}')
            }
            Func::Exp => {
                out.write_str("e^{")?;
                self.write(out, arg)?;
                out.write_char('}')
            }
            Func::Abs => {
                out.write_str("\\left|")?;
                self.write(out, arg)?;
                out.write_str("\\right|")
            }
            Func::Log10 => {
                out.write_str("\\log_{10}")?;
                self.write_parenthesized(out, arg)
            }
            Func::Asin | Func::Acos | Func::Atan => {
                write!(out, "\\operatorname{{{}}}", func.name())?;
                self.write_parenthesized(out, arg)
            }
            _ => {
                write!(out, "\\{}", func.name())?;
                self.write_parenthesized(out, arg)
            }
        }
    }

    fn times(&self) -> &'static str {
        if self.latex() {
            " \\cdot "
        } else {
            "*"
        }
    }
}

fn write_number(out: &mut String, v: f64) -> fmt::Result {
    if v == 0.0 {
        out.write_char('0')
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        write!(out, "{v:.0}")
    } else {
        write!(out, "{v}")
    }
}

/// Formats a number the way expressions print it.
#[must_use]
pub fn format_number(v: f64) -> String {
    let mut out = String::new();
    let _ = write_number(&mut out, v);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::fold;
    use crate::parse::parse_into;

    fn render(text: &str, notation: Notation) -> String {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, text).unwrap();
        let h = fold(&mut arena, h);
        Printer::new(&arena, notation).render(h)
    }

    #[test]
    fn test_plain_rendering() {
        assert_eq!(render("3*x**2 - 2*x + 1", Notation::Plain), "3*x**2 - 2*x + 1");
        assert_eq!(render("-x", Notation::Plain), "-x");
        assert_eq!(render("(x + 1)**2", Notation::Plain), "(x + 1)**2");
        assert_eq!(render("sin(x)/x", Notation::Plain), "sin(x)/x");
    }

    #[test]
    fn test_latex_rendering() {
        assert_eq!(render("x**2/(1 + x)", Notation::Latex), "\\frac{x^{2}}{x + 1}");
        assert_eq!(render("sqrt(x)", Notation::Latex), "\\sqrt{x}");
        assert_eq!(render("2*sin(x)", Notation::Latex), "2 \\cdot \\sin\\left(x\\right)");
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.5), "-0.5");
    }
}
