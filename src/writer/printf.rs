//! C-style `printf`
//!
//! Supports the usual conversions (`%d %i %c %o %u %x %X %e %E %f %g %G %s
//! %p %%`) with flags `- + space 0 #`, a width, a precision and an ignored
//! `l` length modifier, plus three conversions for runtime values:
//!
//! - `%S` writes a value, `%A` displays it. `%W.PS` writes at most `W`
//!   characters, appending ` ...` when truncated and `P > 0`, or padding to
//!   `P` otherwise. `%#W.PS` does the same through a circular-safe write.
//! - `%C` writes a character.
//!
//! Running out of arguments, or leaving some unused, is an error.

use tracing::debug;

use super::context::{WriteContext, WriteMode};
use super::error::{WriteError, WriteResult};
use super::port::Port;
use crate::runtime::value::{Heap, Value};

/// Argument of [`printf`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrintfArg<'a> {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
    Ptr(usize),
    Char(char),
    Value(Value),
}

impl From<i64> for PrintfArg<'_> {
    fn from(n: i64) -> Self {
        PrintfArg::Int(n)
    }
}

impl From<i32> for PrintfArg<'_> {
    fn from(n: i32) -> Self {
        PrintfArg::Int(i64::from(n))
    }
}

impl From<u64> for PrintfArg<'_> {
    fn from(n: u64) -> Self {
        PrintfArg::UInt(n)
    }
}

impl From<u32> for PrintfArg<'_> {
    fn from(n: u32) -> Self {
        PrintfArg::UInt(u64::from(n))
    }
}

impl From<f64> for PrintfArg<'_> {
    fn from(f: f64) -> Self {
        PrintfArg::Float(f)
    }
}

impl<'a> From<&'a str> for PrintfArg<'a> {
    fn from(s: &'a str) -> Self {
        PrintfArg::Str(s)
    }
}

impl From<char> for PrintfArg<'_> {
    fn from(c: char) -> Self {
        PrintfArg::Char(c)
    }
}

impl From<Value> for PrintfArg<'_> {
    fn from(v: Value) -> Self {
        PrintfArg::Value(v)
    }
}

/// Write `args` to `port` as directed by `fmt`
pub fn printf(
    heap: &Heap,
    port: &Port,
    fmt: &str,
    args: &[PrintfArg<'_>],
) -> WriteResult<()> {
    run(heap, port, fmt, args, false)
}

/// Like [`printf`], but `%S` and `%A` without a width label shared
/// structure
pub fn printf_shared(
    heap: &Heap,
    port: &Port,
    fmt: &str,
    args: &[PrintfArg<'_>],
) -> WriteResult<()> {
    run(heap, port, fmt, args, true)
}

fn run(
    heap: &Heap,
    port: &Port,
    fmt: &str,
    args: &[PrintfArg<'_>],
    shared: bool,
) -> WriteResult<()> {
    port.ensure_open()?;
    let _lock = port.lock();
    debug!("printf {:?} with {} argument(s)", fmt, args.len());

    let mut args = args.iter().copied();
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            port.put_char(c)?;
            continue;
        }

        let mut field = Field::default();
        let conversion = loop {
            let c = chars.next().ok_or_else(|| WriteError::IncompleteDirective {
                fmt: fmt.to_string(),
            })?;
            match c {
                '-' => field.left = true,
                '+' => field.plus = true,
                ' ' => field.space = true,
                '#' => field.pound = true,
                '0' if !field.dot && field.width == 0 => field.zero = true,
                '0'..='9' => {
                    let digit = c.to_digit(10).map_or(0, |d| d as usize);
                    if field.dot {
                        field.prec = field.prec.saturating_mul(10).saturating_add(digit);
                    } else {
                        field.width = field.width.saturating_mul(10).saturating_add(digit);
                    }
                }
                '.' => field.dot = true,
                'l' => {}
                other => break other,
            }
        };

        if conversion == '%' {
            port.put_char('%')?;
            continue;
        }
        let arg = args.next().ok_or_else(|| WriteError::TooFewArguments {
            fmt: fmt.to_string(),
        })?;
        let directive = Directive {
            heap,
            port,
            fmt,
            field,
            conversion,
            shared,
        };
        directive.convert(arg)?;
    }
    if args.next().is_some() {
        return Err(WriteError::TooManyArguments {
            fmt: fmt.to_string(),
        });
    }
    Ok(())
}

/// Flags, width and precision of one directive
#[derive(Debug, Default, Clone, Copy)]
struct Field {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    pound: bool,
    dot: bool,
    width: usize,
    prec: usize,
}

impl Field {
    fn precision(&self) -> Option<usize> {
        if self.dot {
            Some(self.prec)
        } else {
            None
        }
    }

    fn sign(
        &self,
        negative: bool,
    ) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    /// Pad `sign + prefix + body` to the field width
    fn pad(
        &self,
        sign: &str,
        prefix: &str,
        body: &str,
        zero_ok: bool,
    ) -> String {
        let len = sign.len() + prefix.len() + body.chars().count();
        let fill = self.width.saturating_sub(len);
        if self.left {
            format!("{}{}{}{}", sign, prefix, body, " ".repeat(fill))
        } else if self.zero && zero_ok {
            format!("{}{}{}{}", sign, prefix, "0".repeat(fill), body)
        } else {
            format!("{}{}{}{}", " ".repeat(fill), sign, prefix, body)
        }
    }
}

struct Directive<'a> {
    heap: &'a Heap,
    port: &'a Port,
    fmt: &'a str,
    field: Field,
    conversion: char,
    shared: bool,
}

impl Directive<'_> {
    fn wrong_type(&self) -> WriteError {
        WriteError::ArgumentType {
            directive: self.conversion,
            fmt: self.fmt.to_string(),
        }
    }

    fn convert(
        &self,
        arg: PrintfArg<'_>,
    ) -> WriteResult<()> {
        match self.conversion {
            'd' | 'i' => {
                let n = self.signed(arg)?;
                self.port.put_str(&self.integer(n < 0, &n.unsigned_abs().to_string(), ""))
            }
            'u' | 'o' | 'x' | 'X' => {
                let n = self.unsigned(arg)?;
                let (digits, prefix) = match self.conversion {
                    'o' => (format!("{:o}", n), if self.field.pound && n != 0 { "0" } else { "" }),
                    'x' => (format!("{:x}", n), if self.field.pound && n != 0 { "0x" } else { "" }),
                    'X' => (format!("{:X}", n), if self.field.pound && n != 0 { "0X" } else { "" }),
                    _ => (n.to_string(), ""),
                };
                let unsigned = Field {
                    plus: false,
                    space: false,
                    ..self.field
                };
                let directive = Directive {
                    field: unsigned,
                    ..*self
                };
                self.port.put_str(&directive.integer(false, &digits, prefix))
            }
            'c' | 'C' => {
                let c = match arg {
                    PrintfArg::Char(c) => c,
                    PrintfArg::Int(n) => u32::try_from(n)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.wrong_type())?,
                    PrintfArg::UInt(n) => u32::try_from(n)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.wrong_type())?,
                    PrintfArg::Value(Value::Char(c)) => c,
                    _ => return Err(self.wrong_type()),
                };
                let mut buf = [0u8; 4];
                self.port.put_str(&self.field.pad("", "", c.encode_utf8(&mut buf), false))
            }
            'e' | 'E' | 'f' | 'g' | 'G' => {
                let f = match arg {
                    PrintfArg::Float(f) => f,
                    PrintfArg::Int(n) => n as f64,
                    PrintfArg::Value(v) => match self.heap.as_number(v) {
                        Some(crate::runtime::value::Number::Flonum(f)) => *f,
                        _ => return Err(self.wrong_type()),
                    },
                    _ => return Err(self.wrong_type()),
                };
                self.port.put_str(&self.float(f))
            }
            's' => {
                let s = match arg {
                    PrintfArg::Str(s) => s.to_string(),
                    PrintfArg::Value(v) => match self.heap.as_string(v) {
                        Some(string) => String::from_utf8_lossy(string.as_bytes()).into_owned(),
                        None => return Err(self.wrong_type()),
                    },
                    _ => return Err(self.wrong_type()),
                };
                // Padding always goes on the right
                self.port.put_str(&s)?;
                let len = s.chars().count();
                for _ in len..self.field.width {
                    self.port.put_char(' ')?;
                }
                Ok(())
            }
            'p' => {
                let address = match arg {
                    PrintfArg::Ptr(p) => p as u64,
                    PrintfArg::UInt(n) => n,
                    PrintfArg::Value(v) => v.as_handle().map_or(0, |h| h.raw() as u64),
                    _ => return Err(self.wrong_type()),
                };
                self.port
                    .put_str(&self.field.pad("", "0x", &format!("{:x}", address), false))
            }
            'S' | 'A' => {
                let value = match arg {
                    PrintfArg::Value(v) => v,
                    _ => return Err(self.wrong_type()),
                };
                let mode = if self.conversion == 'A' {
                    WriteMode::Display
                } else {
                    WriteMode::Write
                };
                self.write_value(value, mode)
            }
            _ => Err(WriteError::IncompleteDirective {
                fmt: self.fmt.to_string(),
            }),
        }
    }

    fn signed(
        &self,
        arg: PrintfArg<'_>,
    ) -> WriteResult<i128> {
        match arg {
            PrintfArg::Int(n) => Ok(i128::from(n)),
            PrintfArg::UInt(n) => Ok(i128::from(n)),
            PrintfArg::Char(c) => Ok(i128::from(u32::from(c))),
            PrintfArg::Value(Value::Int(n)) => Ok(i128::from(n)),
            _ => Err(self.wrong_type()),
        }
    }

    fn unsigned(
        &self,
        arg: PrintfArg<'_>,
    ) -> WriteResult<u64> {
        match arg {
            PrintfArg::UInt(n) => Ok(n),
            PrintfArg::Int(n) => Ok(n as u64),
            PrintfArg::Ptr(p) => Ok(p as u64),
            PrintfArg::Value(Value::Int(n)) => Ok(n as u64),
            _ => Err(self.wrong_type()),
        }
    }

    /// Integer conversion: precision is the minimum number of digits
    fn integer(
        &self,
        negative: bool,
        digits: &str,
        prefix: &str,
    ) -> String {
        let body = match self.field.precision() {
            Some(0) if digits == "0" => String::new(),
            Some(prec) if digits.len() < prec => {
                format!("{}{}", "0".repeat(prec - digits.len()), digits)
            }
            _ => digits.to_string(),
        };
        let zero_ok = self.field.precision().is_none();
        self.field.pad(self.field.sign(negative), prefix, &body, zero_ok)
    }

    fn float(
        &self,
        f: f64,
    ) -> String {
        let upper = self.conversion.is_ascii_uppercase();
        let negative = f.is_sign_negative() && !f.is_nan();
        let sign = self.field.sign(negative);
        if !f.is_finite() {
            let body = if f.is_nan() { "nan" } else { "inf" };
            let body = if upper { body.to_uppercase() } else { body.to_string() };
            return self.field.pad(sign, "", &body, false);
        }

        let abs = f.abs();
        let prec = self.field.precision().unwrap_or(6);
        let body = match self.conversion.to_ascii_lowercase() {
            'f' => format!("{:.*}", prec, abs),
            'e' => exponential(abs, prec),
            _ => general(abs, prec, self.field.pound),
        };
        let body = if upper { body.to_uppercase() } else { body };
        self.field.pad(sign, "", &body, true)
    }

    fn write_value(
        &self,
        value: Value,
        mode: WriteMode,
    ) -> WriteResult<()> {
        let Field {
            width, prec, dot, pound, ..
        } = self.field;

        let written = if pound {
            let limit = if width > 0 { Some(width) } else { None };
            super::write_circular(self.heap, value, self.port, mode, limit)?
        } else if width > 0 && dot {
            super::write_limited(self.heap, value, self.port, mode, width)?
        } else {
            let ctx = WriteContext::new(mode);
            return super::dispatch(self.heap, value, self.port, &ctx, self.shared);
        };

        if written < 0 && prec > 0 {
            self.port.put_str(" ...")?;
        }
        if written > 0 {
            for _ in (written as usize)..prec {
                self.port.put_char(' ')?;
            }
        }
        Ok(())
    }
}

/// `%e` body: `d.ddde+XX`
fn exponential(
    abs: f64,
    prec: usize,
) -> String {
    let formatted = format!("{:.*e}", prec, abs);
    match formatted.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => formatted,
    }
}

/// `%g` body: `%e` or `%f` style depending on the exponent, trailing zeros
/// removed unless `#` was given
fn general(
    abs: f64,
    prec: usize,
    keep_zeros: bool,
) -> String {
    let prec = prec.max(1);
    let exp = format!("{:.*e}", prec - 1, abs)
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i64>().ok())
        .unwrap_or(0);
    let body = if exp < -4 || exp >= prec as i64 {
        exponential(abs, prec - 1)
    } else {
        format!("{:.*}", (prec as i64 - 1 - exp) as usize, abs)
    };
    if keep_zeros {
        return body;
    }
    match body.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
        None => trim_fraction(&body).to_string(),
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
