//! Per-column format directives for table cells
//!
//! A directive follows the familiar format-spec mini-language:
//!
//! ```text
//! [[fill]align][sign][#][0][width][grouping][.precision][type]
//! ```
//!
//! - `03d`   integer, width 3, zero padded
//! - `.4f`   fixed point with four decimals
//! - `>10`   right aligned in ten characters
//! - `,d`    integer with thousands separators
//! - `.2e`   scientific notation
//! - `.1%`   percentage
//!
//! ## Example
//!
//! ```rust
//! use texbuilder::features::format::FormatSpec;
//! use texbuilder::CellValue;
//!
//! let spec = FormatSpec::parse("08.3f").unwrap();
//! assert_eq!(spec.apply(&CellValue::Float(-3.14159)).unwrap(), "-003.142");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::table::{float_repr, CellValue};
use crate::utils::error::{DocumentError, DocumentResult};

lazy_static! {
    static ref SPEC_PATTERN: Regex = Regex::new(
        r"^(?:(?P<fill>.)?(?P<align>[<>^=]))?(?P<sign>[-+ ])?(?P<alt>#)?(?P<zero>0)?(?P<width>\d+)?(?P<grouping>[,_])?(?:\.(?P<precision>\d+))?(?P<kind>[bcdeEfFgGnosxX%])?$"
    ).unwrap();
}

/// Field alignment inside the padded width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits
    AfterSign,
}

/// Sign handling for numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    NegativeOnly,
    Always,
    Space,
}

/// A parsed format directive
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSpec {
    raw: String,
    pub fill: char,
    pub align: Option<Align>,
    pub sign: Sign,
    pub alternate: bool,
    pub zero_pad: bool,
    pub width: Option<usize>,
    pub grouping: Option<char>,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

impl FormatSpec {
    /// Parse a directive such as `03d` or `.4f`.
    pub fn parse(directive: &str) -> DocumentResult<FormatSpec> {
        let caps = SPEC_PATTERN
            .captures(directive)
            .ok_or_else(|| DocumentError::invalid_format(directive, "unrecognized directive"))?;

        let align = caps.name("align").map(|m| match m.as_str() {
            "<" => Align::Left,
            ">" => Align::Right,
            "^" => Align::Center,
            _ => Align::AfterSign,
        });
        let fill = caps
            .name("fill")
            .and_then(|m| m.as_str().chars().next())
            .unwrap_or(' ');
        let sign = match caps.name("sign").map(|m| m.as_str()) {
            Some("+") => Sign::Always,
            Some(" ") => Sign::Space,
            _ => Sign::NegativeOnly,
        };
        let width = caps
            .name("width")
            .map(|m| parse_count(directive, m.as_str()))
            .transpose()?;
        let precision = caps
            .name("precision")
            .map(|m| parse_count(directive, m.as_str()))
            .transpose()?;

        Ok(FormatSpec {
            raw: directive.to_string(),
            fill,
            align,
            sign,
            alternate: caps.name("alt").is_some(),
            zero_pad: caps.name("zero").is_some(),
            width,
            grouping: caps
                .name("grouping")
                .and_then(|m| m.as_str().chars().next()),
            precision,
            kind: caps.name("kind").and_then(|m| m.as_str().chars().next()),
        })
    }

    /// The directive text this spec was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Render a value. Nulls are never formatted and yield `null`.
    pub fn apply(&self, value: &CellValue) -> DocumentResult<String> {
        match value {
            CellValue::Null => Ok(crate::data::constants::NULL_CELL.to_string()),
            CellValue::Int(i) => self.format_int(*i),
            CellValue::Bool(b) => {
                if self.kind.is_none() && !self.zero_pad && self.sign == Sign::NegativeOnly {
                    Ok(self.pad_text(&value.to_string()))
                } else {
                    self.format_int(*b as i64)
                }
            }
            CellValue::Float(v) => self.format_float(*v),
            CellValue::Text(s) => self.format_text(s),
        }
    }

    fn error(&self, message: impl Into<String>) -> DocumentError {
        DocumentError::invalid_format(self.raw.clone(), message)
    }

    fn format_int(&self, value: i64) -> DocumentResult<String> {
        let magnitude = value.unsigned_abs();
        let body = match self.kind {
            None | Some('d') | Some('n') => {
                if self.precision.is_some() {
                    return Err(self.error("precision is not allowed for integers"));
                }
                group_digits(&magnitude.to_string(), self.grouping)
            }
            Some('b') => self.prefixed("0b", format!("{:b}", magnitude)),
            Some('o') => self.prefixed("0o", format!("{:o}", magnitude)),
            Some('x') => self.prefixed("0x", format!("{:x}", magnitude)),
            Some('X') => self.prefixed("0X", format!("{:X}", magnitude)),
            Some('c') => {
                let c = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error("value is not a valid character code"))?;
                return Ok(self.pad_text(&c.to_string()));
            }
            Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') => {
                return self.format_float(value as f64);
            }
            Some(other) => {
                return Err(self.error(format!("unknown format code '{}' for integer", other)))
            }
        };
        Ok(self.pad_number(value < 0, &body))
    }

    fn format_float(&self, value: f64) -> DocumentResult<String> {
        let magnitude = value.abs();
        let body = if value.is_nan() || value.is_infinite() {
            let word = if value.is_nan() { "nan" } else { "inf" };
            if matches!(self.kind, Some('F' | 'E' | 'G')) {
                word.to_uppercase()
            } else {
                word.to_string()
            }
        } else {
            match self.kind {
                Some('f' | 'F') => {
                    let fixed = format!("{:.*}", self.precision.unwrap_or(6), magnitude);
                    self.group_fixed(&fixed)
                }
                Some('e' | 'E') => {
                    let sci = scientific(magnitude, self.precision.unwrap_or(6));
                    if self.kind == Some('E') {
                        sci.to_uppercase()
                    } else {
                        sci
                    }
                }
                Some('%') => {
                    let fixed = format!("{:.*}", self.precision.unwrap_or(6), magnitude * 100.0);
                    format!("{}%", self.group_fixed(&fixed))
                }
                Some('g' | 'G' | 'n') => {
                    let general = self.general(magnitude, self.precision.unwrap_or(6));
                    if self.kind == Some('G') {
                        general.to_uppercase()
                    } else {
                        general
                    }
                }
                None => match self.precision {
                    Some(p) => self.general(magnitude, p),
                    None => {
                        let repr = float_repr(magnitude);
                        if repr.contains('e') {
                            repr
                        } else {
                            self.group_fixed(&repr)
                        }
                    }
                },
                Some(other) => {
                    return Err(self.error(format!("unknown format code '{}' for float", other)))
                }
            }
        };
        Ok(self.pad_number(value.is_sign_negative() && !value.is_nan(), &body))
    }

    fn format_text(&self, value: &str) -> DocumentResult<String> {
        if !matches!(self.kind, None | Some('s')) {
            return Err(self.error(format!(
                "format code '{}' needs a numeric value, got text",
                self.kind.unwrap_or('?')
            )));
        }
        if self.sign != Sign::NegativeOnly || self.grouping.is_some() {
            return Err(self.error("sign and grouping are not allowed for text"));
        }
        if self.align == Some(Align::AfterSign) {
            return Err(self.error("'=' alignment is not allowed for text"));
        }
        let text: String = match self.precision {
            Some(p) => value.chars().take(p).collect(),
            None => value.to_string(),
        };
        Ok(self.pad_text(&text))
    }

    fn prefixed(&self, prefix: &str, digits: String) -> String {
        if self.alternate {
            format!("{}{}", prefix, digits)
        } else {
            digits
        }
    }

    /// `%g` style: fixed or scientific depending on the exponent, with
    /// trailing zeros removed unless `#` is given.
    fn general(&self, magnitude: f64, precision: usize) -> String {
        let p = precision.max(1);
        if magnitude == 0.0 {
            return if self.alternate {
                format!("{:.*}", p - 1, 0.0)
            } else {
                "0".to_string()
            };
        }
        let exponent = decimal_exponent(magnitude, p);
        let out = if exponent >= -4 && exponent < p as i32 {
            let decimals = (p as i32 - 1 - exponent).max(0) as usize;
            self.group_fixed(&format!("{:.*}", decimals, magnitude))
        } else {
            scientific(magnitude, p - 1)
        };
        if self.alternate {
            out
        } else {
            strip_trailing_zeros(&out)
        }
    }

    fn group_fixed(&self, fixed: &str) -> String {
        match fixed.split_once('.') {
            Some((int, frac)) => format!("{}.{}", group_digits(int, self.grouping), frac),
            None => group_digits(fixed, self.grouping),
        }
    }

    fn sign_prefix(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else {
            match self.sign {
                Sign::NegativeOnly => "",
                Sign::Always => "+",
                Sign::Space => " ",
            }
        }
    }

    fn pad_number(&self, negative: bool, body: &str) -> String {
        let sign = self.sign_prefix(negative);
        let (fill, align) = match (self.align, self.zero_pad) {
            (None, true) => ('0', Align::AfterSign),
            (Some(a), _) => (self.fill, a),
            (None, false) => (' ', Align::Right),
        };
        let len = sign.chars().count() + body.chars().count();
        let width = self.width.unwrap_or(0);
        if len >= width {
            return format!("{}{}", sign, body);
        }
        let pad = width - len;
        match align {
            Align::AfterSign => format!("{}{}{}", sign, repeat(fill, pad), body),
            other => pad_around(&format!("{}{}", sign, body), fill, pad, other),
        }
    }

    fn pad_text(&self, text: &str) -> String {
        let (fill, align) = match (self.align, self.zero_pad) {
            (Some(a), _) => (self.fill, a),
            (None, true) => ('0', Align::Left),
            (None, false) => (' ', Align::Left),
        };
        let len = text.chars().count();
        let width = self.width.unwrap_or(0);
        if len >= width {
            return text.to_string();
        }
        pad_around(text, fill, width - len, align)
    }
}

fn parse_count(directive: &str, digits: &str) -> DocumentResult<usize> {
    digits
        .parse::<usize>()
        .map_err(|_| DocumentError::invalid_format(directive, "width or precision too large"))
}

fn repeat(fill: char, count: usize) -> String {
    std::iter::repeat(fill).take(count).collect()
}

fn pad_around(text: &str, fill: char, pad: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{}{}", text, repeat(fill, pad)),
        Align::Center => {
            let left = pad / 2;
            format!("{}{}{}", repeat(fill, left), text, repeat(fill, pad - left))
        }
        Align::Right | Align::AfterSign => format!("{}{}", repeat(fill, pad), text),
    }
}

/// Insert `sep` every three digits from the right
fn group_digits(digits: &str, sep: Option<char>) -> String {
    let sep = match sep {
        Some(s) => s,
        None => return digits.to_string(),
    };
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}

/// Scientific notation with a signed, two-digit minimum exponent
fn scientific(magnitude: f64, decimals: usize) -> String {
    let raw = format!("{:.*e}", decimals, magnitude);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

/// Base-10 exponent of `magnitude` after rounding to `significant` digits
fn decimal_exponent(magnitude: f64, significant: usize) -> i32 {
    let raw = format!("{:.*e}", significant - 1, magnitude);
    raw.split_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0)
}

fn strip_trailing_zeros(number: &str) -> String {
    match number.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{}", strip_trailing_zeros(mantissa), exp),
        None if number.contains('.') => number
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
        None => number.to_string(),
    }
}

/// Parse a comma-separated list of directives, one per column.
///
/// Empty entries mean default rendering for that column.
pub fn parse_column_formats(
    format_spec: &str,
    columns: usize,
) -> DocumentResult<Vec<Option<FormatSpec>>> {
    let entries: Vec<&str> = format_spec.split(',').collect();
    if entries.len() != columns {
        return Err(DocumentError::FormatSpecMismatch {
            expected: columns,
            found: entries.len(),
        });
    }
    entries
        .into_iter()
        .map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                Ok(None)
            } else {
                FormatSpec::parse(entry).map(Some)
            }
        })
        .collect()
}
