//! Code for expanding compact range strings (e.g. `4-8-2`) into explicit sequences.
use std::error::Error;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Indicates that a range string does not follow the `a`, `a-b` or `a-b-s` syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFormatError {
    message: String,
}

impl RangeFormatError {
    fn new(input: &str, reason: &str) -> RangeFormatError {
        RangeFormatError {
            message: format!("Invalid range \"{input}\": {reason}"),
        }
    }
}

impl fmt::Display for RangeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for RangeFormatError {}

/// Expand a range string into the ascending sequence of integers it denotes.
///
/// Accepted forms are:
///
/// * `a` - the single value `a`
/// * `a-b` - every integer from `a` to `b` inclusive
/// * `a-b-s` - `a`, `a+s`, `a+2s`, ... not exceeding `b` (with `s > 0`)
///
/// # Returns
///
/// The expanded values, or an error if the string is malformed, the step is zero or `a > b`.
pub fn parse_range(s: &str) -> Result<Vec<u32>, RangeFormatError> {
    let parse_part = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| RangeFormatError::new(s, &format!("\"{part}\" is not a valid integer")))
    };

    let parts: Vec<_> = s.split('-').map(parse_part).collect::<Result<_, _>>()?;
    let (start, end, step) = match parts[..] {
        [value] => return Ok(vec![value]),
        [start, end] => (start, end, 1),
        [start, end, step] => (start, end, step),
        _ => return Err(RangeFormatError::new(s, "expected a, a-b or a-b-step")),
    };

    if step == 0 {
        return Err(RangeFormatError::new(s, "step must be positive"));
    }
    if start > end {
        return Err(RangeFormatError::new(s, "start is greater than end"));
    }

    let step = usize::try_from(step).map_err(|_| RangeFormatError::new(s, "step is too large"))?;
    Ok((start..=end).step_by(step).collect())
}

/// The values of a range string, as parsed from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedRange(Vec<u32>);

impl FromStr for ExpandedRange {
    type Err = RangeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s).map(Self)
    }
}

impl Deref for ExpandedRange {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl From<ExpandedRange> for Vec<u32> {
    fn from(range: ExpandedRange) -> Self {
        range.0
    }
}
