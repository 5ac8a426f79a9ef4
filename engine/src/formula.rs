//! FILENAME: engine/src/formula.rs
//! PURPOSE: Parses and evaluates `=NAME(args)` formulas.
//! CONTEXT: The formula language is a single function call over cell
//! references, with no operator precedence and no nesting. Dispatch goes through
//! the closed `Function` enum so the evaluator is exhaustive at the match.
//! Evaluation is a pure read of the grid: it returns a display string or a
//! `CellError` token and never mutates cells.
//!
//! SUPPORTED FUNCTIONS:
//! - Range aggregates: SUM, AVERAGE, MAX, MIN, COUNT
//! - Single-cell text: TRIM, UPPER, LOWER
//! - Range text: REMOVE_DUPLICATES, FIND_AND_REPLACE(range, find, replace)

use crate::address::{Address, CellCoord};
use crate::cell::CellError;
use crate::grid::Grid;
use crate::range;
use std::collections::HashSet;

/// Separator used when a range-valued text function collapses to one display
/// string (REMOVE_DUPLICATES, FIND_AND_REPLACE).
const LIST_SEPARATOR: &str = ", ";

/// The closed set of formula functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sum,
    Average,
    Max,
    Min,
    Count,
    Trim,
    Upper,
    Lower,
    RemoveDuplicates,
    FindAndReplace,
}

impl Function {
    /// Looks up a function by its canonical uppercase name.
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "SUM" => Some(Function::Sum),
            "AVERAGE" => Some(Function::Average),
            "MAX" => Some(Function::Max),
            "MIN" => Some(Function::Min),
            "COUNT" => Some(Function::Count),
            "TRIM" => Some(Function::Trim),
            "UPPER" => Some(Function::Upper),
            "LOWER" => Some(Function::Lower),
            "REMOVE_DUPLICATES" => Some(Function::RemoveDuplicates),
            "FIND_AND_REPLACE" => Some(Function::FindAndReplace),
            _ => None,
        }
    }

    /// Number of arguments the function expects.
    pub fn arity(&self) -> usize {
        match self {
            Function::FindAndReplace => 3,
            _ => 1,
        }
    }

    /// True when the first argument is a range (vs. a single address).
    pub fn takes_range(&self) -> bool {
        !matches!(self, Function::Trim | Function::Upper | Function::Lower)
    }
}

/// A formula reduced to its function and raw argument strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormula {
    pub function: Function,
    pub args: Vec<String>,
}

/// Parses formula text (beginning with `=`) into function + arguments.
///
/// An unrecognized name, a missing parenthesis, or a wrong argument count
/// all yield `CellError::Name`: the explicit token, never a literal echo
/// of the formula text.
pub fn parse(formula: &str) -> Result<ParsedFormula, CellError> {
    let body = formula.strip_prefix('=').ok_or(CellError::Name)?.trim();

    let open = body.find('(').ok_or(CellError::Name)?;
    if !body.ends_with(')') || open + 1 > body.len() - 1 {
        return Err(CellError::Name);
    }

    let name = body[..open].trim().to_uppercase();
    let function = Function::from_name(&name).ok_or(CellError::Name)?;

    let args = split_args(&body[open + 1..body.len() - 1]);
    if args.len() != function.arity() {
        return Err(CellError::Name);
    }

    Ok(ParsedFormula { function, args })
}

/// Splits an argument list on commas outside quotes, trimming each argument
/// and stripping one symmetric pair of quote characters.
fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => {
                    args.push(strip_quotes(current.trim()));
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }

    if !current.trim().is_empty() || !args.is_empty() {
        args.push(strip_quotes(current.trim()));
    }
    args
}

/// Removes one matching pair of leading/trailing quote characters.
fn strip_quotes(arg: &str) -> String {
    let bytes = arg.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return arg[1..arg.len() - 1].to_string();
        }
    }
    arg.to_string()
}

/// The coordinates a formula's arguments reference, clamped to the grid
/// bounds.
///
/// This is exactly the dependency set fed to the dependency graph: range
/// arguments expand to every in-bounds coord in the rectangle;
/// single-address arguments contribute one coord. Unparseable formulas,
/// malformed references, and out-of-bounds references contribute nothing.
pub fn referenced_coords(formula: &str, row_count: u32, col_count: u32) -> HashSet<CellCoord> {
    let mut coords = HashSet::new();
    let parsed = match parse(formula) {
        Ok(p) => p,
        Err(_) => return coords,
    };

    let reference = &parsed.args[0];
    if parsed.function.takes_range() {
        coords.extend(range::expand(reference, row_count, col_count));
    } else if let Ok(addr) = Address::parse(reference) {
        let coord = addr.coord();
        if coord.0 < row_count && coord.1 < col_count {
            coords.insert(coord);
        }
    }
    coords
}

/// A string is numeric-coercible iff it parses as a base-10 number.
/// Non-coercible values are excluded from aggregation, never zeroed.
fn coerce_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Formats a numeric result without unnecessary decimal places.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// The formula evaluator. Holds a reference to the grid for cell lookups.
pub struct Evaluator<'a> {
    grid: &'a Grid,
}

impl<'a> Evaluator<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Evaluator { grid }
    }

    /// Evaluates formula text to a display string or an error token.
    pub fn evaluate(&self, formula: &str) -> Result<String, CellError> {
        let parsed = parse(formula)?;
        match parsed.function {
            Function::Sum => {
                let nums = self.range_numbers(&parsed.args[0]);
                Ok(format_number(nums.iter().sum()))
            }
            Function::Average => {
                let nums = self.range_numbers(&parsed.args[0]);
                if nums.is_empty() {
                    return Err(CellError::Div0);
                }
                Ok(format_number(nums.iter().sum::<f64>() / nums.len() as f64))
            }
            Function::Max => {
                let nums = self.range_numbers(&parsed.args[0]);
                nums.into_iter()
                    .fold(None, |acc: Option<f64>, n| {
                        Some(acc.map_or(n, |a| a.max(n)))
                    })
                    .map(format_number)
                    .ok_or(CellError::Value)
            }
            Function::Min => {
                let nums = self.range_numbers(&parsed.args[0]);
                nums.into_iter()
                    .fold(None, |acc: Option<f64>, n| {
                        Some(acc.map_or(n, |a| a.min(n)))
                    })
                    .map(format_number)
                    .ok_or(CellError::Value)
            }
            Function::Count => {
                let nums = self.range_numbers(&parsed.args[0]);
                Ok(nums.len().to_string())
            }
            Function::Trim => Ok(self.single_value(&parsed.args[0]).trim().to_string()),
            Function::Upper => Ok(self.single_value(&parsed.args[0]).to_uppercase()),
            Function::Lower => Ok(self.single_value(&parsed.args[0]).to_lowercase()),
            Function::RemoveDuplicates => {
                let mut seen = HashSet::new();
                let mut kept = Vec::new();
                for value in self.range_values(&parsed.args[0]) {
                    if value.is_empty() {
                        continue;
                    }
                    if seen.insert(value.clone()) {
                        kept.push(value);
                    }
                }
                Ok(kept.join(LIST_SEPARATOR))
            }
            Function::FindAndReplace => {
                let find = &parsed.args[1];
                let replace = &parsed.args[2];
                let replaced: Vec<String> = self
                    .range_values(&parsed.args[0])
                    .into_iter()
                    .map(|v| {
                        if find.is_empty() {
                            v
                        } else {
                            v.replace(find.as_str(), replace)
                        }
                    })
                    .filter(|v| !v.is_empty())
                    .collect();
                Ok(replaced.join(LIST_SEPARATOR))
            }
        }
    }

    /// Display values of every in-bounds cell in a range, row-major.
    /// A malformed range degrades to an empty operand list.
    fn range_values(&self, range_text: &str) -> Vec<String> {
        range::expand(range_text, self.grid.row_count, self.grid.col_count)
            .into_iter()
            .map(|coord| self.grid.display_value(coord))
            .collect()
    }

    /// Numeric-coercible values of a range, in order.
    fn range_numbers(&self, range_text: &str) -> Vec<f64> {
        self.range_values(range_text)
            .iter()
            .filter_map(|v| coerce_number(v))
            .collect()
    }

    /// The display value of a single referenced cell; malformed references
    /// degrade to the empty string.
    fn single_value(&self, reference: &str) -> String {
        match Address::parse(reference) {
            Ok(addr) => self.grid.display_value(addr.coord()),
            Err(_) => String::new(),
        }
    }
}

/// Rewrites the cell references inside a formula by a paste offset.
///
/// Relative axes shift by the offset; `$`-absolute axes stay pinned. A
/// reference shifted before row 1 or column A becomes the literal `#REF`,
/// which later fails address resolution and degrades to an empty operand.
/// Quoted text arguments pass through untouched.
pub fn translate(formula: &str, d_row: i64, d_col: i64) -> String {
    let parsed = match parse(formula) {
        Ok(p) => p,
        Err(_) => return formula.to_string(),
    };

    let args: Vec<String> = parsed
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            // Only the reference argument is re-targeted; find/replace text
            // keeps its quoting so re-parsing stays faithful.
            if i == 0 {
                translate_reference(arg, d_row, d_col)
            } else {
                format!("\"{}\"", arg)
            }
        })
        .collect();

    let name = match parsed.function {
        Function::Sum => "SUM",
        Function::Average => "AVERAGE",
        Function::Max => "MAX",
        Function::Min => "MIN",
        Function::Count => "COUNT",
        Function::Trim => "TRIM",
        Function::Upper => "UPPER",
        Function::Lower => "LOWER",
        Function::RemoveDuplicates => "REMOVE_DUPLICATES",
        Function::FindAndReplace => "FIND_AND_REPLACE",
    };

    format!("={}({})", name, args.join(", "))
}

/// Shifts each corner of a single- or two-corner reference.
fn translate_reference(reference: &str, d_row: i64, d_col: i64) -> String {
    reference
        .split(':')
        .map(|part| translate_address(part, d_row, d_col))
        .collect::<Vec<_>>()
        .join(":")
}

fn translate_address(part: &str, d_row: i64, d_col: i64) -> String {
    let addr = match Address::parse(part) {
        Ok(a) => a,
        Err(_) => return part.to_string(),
    };

    let row = if addr.row_absolute {
        addr.row as i64
    } else {
        addr.row as i64 + d_row
    };
    let col = if addr.col_absolute {
        addr.col as i64
    } else {
        addr.col as i64 + d_col
    };

    if row < 0 || col < 0 {
        return "#REF".to_string();
    }

    Address {
        row: row as u32,
        col: col as u32,
        col_absolute: addr.col_absolute,
        row_absolute: addr.row_absolute,
    }
    .to_string()
}
