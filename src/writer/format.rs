//! Lisp-style `format`
//!
//! Directives start with `~` and take up to five comma-separated prefix
//! parameters followed by the `@` and `:` flags:
//!
//! | directive            | parameters                                       |
//! |----------------------|--------------------------------------------------|
//! | `~s` `~a`            | mincol, colinc, minpad, padchar, maxcol          |
//! | `~d` `~b` `~o` `~x`  | mincol, padchar, commachar, commainterval        |
//! | `~*`                 | count                                            |
//! | `~%`                 | newline                                          |
//!
//! A parameter is a signed decimal number, `'c` for a character, `v` to take
//! it from the argument list, or nothing.

use std::iter::Peekable;
use std::str::Chars;

use smallvec::SmallVec;
use tracing::debug;

use super::context::{WriteContext, WriteMode};
use super::error::{WriteError, WriteResult};
use super::port::{char_count, char_prefix, Port};
use crate::runtime::value::{Heap, Value};

/// Maximum number of parameters of one directive
const MAX_PARAMS: usize = 5;

/// Directive parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    Int(i64),
    Char(char),
    Absent,
}

type Params = SmallVec<[Param; MAX_PARAMS]>;

fn param_int(
    params: &[Param],
    index: usize,
) -> Option<i64> {
    match params.get(index) {
        Some(Param::Int(n)) => Some(*n),
        _ => None,
    }
}

fn param_char(
    params: &[Param],
    index: usize,
) -> Option<char> {
    match params.get(index) {
        Some(Param::Char(c)) => Some(*c),
        _ => None,
    }
}

/// Write `args` to `port` as directed by `fmt`.
///
/// With `shared`, `~s` and `~a` without parameters label shared structure.
pub fn format(
    heap: &Heap,
    port: &Port,
    fmt: &str,
    args: &[Value],
    shared: bool,
) -> WriteResult<()> {
    port.ensure_open()?;
    let _lock = port.lock();
    debug!("format {:?} with {} argument(s)", fmt, args.len());
    Formatter {
        heap,
        port,
        fmt,
        chars: fmt.chars().peekable(),
        args,
        argcnt: 0,
        backtracked: false,
        shared,
    }
    .run()
}

struct Formatter<'a> {
    heap: &'a Heap,
    port: &'a Port,
    fmt: &'a str,
    chars: Peekable<Chars<'a>>,
    args: &'a [Value],
    argcnt: usize,
    /// Set by `~:*` and `~@*`; disables the leftover-argument check
    backtracked: bool,
    shared: bool,
}

impl Formatter<'_> {
    fn run(mut self) -> WriteResult<()> {
        while let Some(c) = self.chars.next() {
            if c == '~' {
                self.directive()?;
            } else {
                self.port.put_char(c)?;
            }
        }
        if !self.backtracked && self.argcnt < self.args.len() {
            return Err(WriteError::TooManyArguments {
                fmt: self.fmt.to_string(),
            });
        }
        Ok(())
    }

    fn illegal(&self) -> WriteError {
        WriteError::IllegalFormat {
            fmt: self.fmt.to_string(),
        }
    }

    fn next_arg(&mut self) -> WriteResult<Value> {
        let arg = self
            .args
            .get(self.argcnt)
            .copied()
            .ok_or_else(|| WriteError::TooFewArguments {
                fmt: self.fmt.to_string(),
            })?;
        self.argcnt += 1;
        Ok(arg)
    }

    /// Skip the comma that may follow a parameter
    fn skip_comma(&mut self) {
        if self.chars.peek() == Some(&',') {
            self.chars.next();
        }
    }

    fn directive(&mut self) -> WriteResult<()> {
        let mut params = Params::new();
        let mut atflag = false;
        let mut colonflag = false;

        loop {
            let c = self.chars.next().ok_or_else(|| self.illegal())?;
            match c {
                '@' => {
                    if atflag {
                        return Err(WriteError::DuplicateFlag {
                            flag: '@',
                            fmt: self.fmt.to_string(),
                        });
                    }
                    atflag = true;
                }
                ':' => {
                    if colonflag {
                        return Err(WriteError::DuplicateFlag {
                            flag: ':',
                            fmt: self.fmt.to_string(),
                        });
                    }
                    colonflag = true;
                }
                'v' | 'V' => {
                    if atflag || colonflag || params.len() >= MAX_PARAMS {
                        return Err(self.illegal());
                    }
                    let arg = self.next_arg()?;
                    let param = match arg {
                        Value::Boolean(false) => Param::Absent,
                        Value::Int(n) => Param::Int(n),
                        Value::Char(c) => Param::Char(c),
                        other => {
                            return Err(WriteError::BadParameter {
                                fmt: self.fmt.to_string(),
                                arg: super::write_to_string(self.heap, other, WriteMode::Write, false)
                                    .unwrap_or_else(|_| other.to_string()),
                            })
                        }
                    };
                    params.push(param);
                    self.skip_comma();
                }
                '\'' => {
                    if atflag || colonflag || params.len() >= MAX_PARAMS {
                        return Err(self.illegal());
                    }
                    let c = self.chars.next().ok_or_else(|| self.illegal())?;
                    params.push(Param::Char(c));
                    self.skip_comma();
                }
                '0'..='9' | '-' | '+' => {
                    if atflag || colonflag || params.len() >= MAX_PARAMS {
                        return Err(self.illegal());
                    }
                    let sign = if c == '-' { -1 } else { 1 };
                    let mut value = c.to_digit(10).map_or(0, i64::from);
                    while let Some(digit) = self.chars.peek().and_then(|d| d.to_digit(10)) {
                        self.chars.next();
                        value = value.saturating_mul(10).saturating_add(i64::from(digit));
                    }
                    params.push(Param::Int(sign * value));
                    self.skip_comma();
                }
                ',' => {
                    if atflag || colonflag || params.len() >= MAX_PARAMS {
                        return Err(self.illegal());
                    }
                    params.push(Param::Absent);
                }
                _ => return self.conversion(c, &params, atflag, colonflag),
            }
        }
    }

    fn conversion(
        &mut self,
        c: char,
        params: &[Param],
        atflag: bool,
        colonflag: bool,
    ) -> WriteResult<()> {
        let write_ctx = WriteContext::new(WriteMode::Write);
        let display_ctx = WriteContext::new(WriteMode::Display);

        match c {
            '%' => self.port.put_char('\n'),
            's' | 'S' | 'a' | 'A' => {
                let arg = self.next_arg()?;
                let ctx = if c.eq_ignore_ascii_case(&'s') {
                    write_ctx
                } else {
                    display_ctx
                };
                if params.is_empty() {
                    super::dispatch(self.heap, arg, self.port, &ctx, self.shared)
                } else {
                    self.format_sexp(arg, params, atflag, colonflag, ctx.mode)
                }
            }
            'd' | 'D' | 'b' | 'B' | 'o' | 'O' | 'x' | 'X' => {
                let arg = self.next_arg()?;
                let radix = match c.to_ascii_lowercase() {
                    'b' => 2,
                    'o' => 8,
                    'x' => 16,
                    _ => 10,
                };
                let upper = c == 'X';
                if params.is_empty() && !atflag && !colonflag {
                    match self.heap.exact_integer(arg) {
                        Some(n) if radix != 10 => {
                            let digits = n.to_str_radix(radix);
                            if upper {
                                self.port.put_str(&digits.to_uppercase())
                            } else {
                                self.port.put_str(&digits)
                            }
                        }
                        _ => super::dispatch(self.heap, arg, self.port, &display_ctx, false),
                    }
                } else {
                    self.format_integer(arg, params, radix, colonflag, atflag, upper)
                }
            }
            '*' => {
                let count = match params.first() {
                    None => 1,
                    Some(Param::Int(n)) => *n,
                    Some(_) => return Err(self.illegal()),
                };
                let current = self.argcnt as i64;
                let index = if colonflag {
                    if atflag {
                        return Err(self.illegal());
                    }
                    self.backtracked = true;
                    current.checked_sub(count)
                } else if atflag {
                    self.backtracked = true;
                    Some(count)
                } else {
                    current.checked_add(count)
                };
                match index {
                    Some(index) if (0..self.args.len() as i64).contains(&index) => {
                        self.argcnt = index as usize;
                        Ok(())
                    }
                    _ => Err(WriteError::ArgumentOutOfRange {
                        fmt: self.fmt.to_string(),
                    }),
                }
            }
            other => self.port.put_char(other),
        }
    }

    /// `~s` and `~a` with parameters
    fn format_sexp(
        &self,
        arg: Value,
        params: &[Param],
        rightalign: bool,
        dots: bool,
        mode: WriteMode,
    ) -> WriteResult<()> {
        let mincol = param_int(params, 0).unwrap_or(0);
        let colinc = param_int(params, 1).unwrap_or(1);
        let minpad = param_int(params, 2).unwrap_or(0);
        let padchar = param_char(params, 3).unwrap_or(' ');
        let maxcol = param_int(params, 4).unwrap_or(-1);

        let tmp = Port::string();
        if minpad > 0 && rightalign {
            for _ in 0..minpad {
                tmp.put_char(padchar)?;
            }
        }
        let written = if maxcol > 0 {
            super::write_limited(self.heap, arg, &tmp, mode, maxcol as usize)?
        } else {
            super::write(self.heap, arg, &tmp, mode)?;
            0
        };
        if minpad > 0 && !rightalign {
            for _ in 0..minpad {
                tmp.put_char(padchar)?;
            }
        }
        let text = tmp.take_bytes().unwrap_or_default();

        if maxcol > 0 && written < 0 {
            if dots && maxcol > 4 {
                self.port.put_bytes(char_prefix(&text, (maxcol - 4) as usize))?;
                self.port.put_str(" ...")
            } else {
                self.port.put_bytes(char_prefix(&text, maxcol as usize))
            }
        } else {
            format_pad(self.port, &text, mincol, colinc, padchar, rightalign)
        }
    }

    /// `~d`, `~b`, `~o` and `~x` with parameters or flags
    fn format_integer(
        &self,
        arg: Value,
        params: &[Param],
        radix: u32,
        delimited: bool,
        alwayssign: bool,
        upper: bool,
    ) -> WriteResult<()> {
        let n = match self.heap.exact_integer(arg) {
            Some(n) => n,
            None => {
                let ctx = WriteContext::new(WriteMode::Display);
                return super::dispatch(self.heap, arg, self.port, &ctx, false);
            }
        };
        let mincol = param_int(params, 0).unwrap_or(0);
        let padchar = param_char(params, 1).unwrap_or(' ');
        let commachar = param_char(params, 2).unwrap_or(',');
        let commainterval = param_int(params, 3).unwrap_or(3);

        let mut digits = n.to_str_radix(radix);
        if upper {
            digits = digits.to_uppercase();
        }
        if alwayssign && !digits.starts_with('-') {
            digits.insert(0, '+');
        }
        if delimited && commainterval > 0 {
            digits = group_digits(&digits, commachar, commainterval as usize);
        }
        format_pad(self.port, digits.as_bytes(), mincol, 1, padchar, true)
    }
}

/// Insert `commachar` between groups of `interval` digits, counting from
/// the right. A leading sign is kept in front.
fn group_digits(
    digits: &str,
    commachar: char,
    interval: usize,
) -> String {
    let (sign, body) = match digits.strip_prefix(['-', '+']) {
        Some(body) => (&digits[..1], body),
        None => ("", digits),
    };
    let body: Vec<char> = body.chars().collect();
    let mut out = String::from(sign);
    let head = body.len() % interval;
    out.extend(&body[..head]);
    for (i, chunk) in body[head..].chunks(interval).enumerate() {
        if head != 0 || i > 0 {
            out.push(commachar);
        }
        out.extend(chunk);
    }
    out
}

/// Write `text` padded with `padchar` to at least `mincol` characters. The
/// padding grows in steps of `colinc`.
fn format_pad(
    port: &Port,
    text: &[u8],
    mincol: i64,
    colinc: i64,
    padchar: char,
    rightalign: bool,
) -> WriteResult<()> {
    let mut padcount = mincol - char_count(text) as i64;
    if padcount <= 0 {
        return port.put_bytes(text);
    }
    if colinc > 1 {
        padcount = padcount.saturating_add(colinc - 1) / colinc * colinc;
    }
    let padding: String = std::iter::repeat(padchar).take(padcount as usize).collect();
    if rightalign {
        port.put_str(&padding)?;
        port.put_bytes(text)
    } else {
        port.put_bytes(text)?;
        port.put_str(&padding)
    }
}
