//! Message formatting for argument-list log calls.
//!
//! Text fragments are joined tightly. A single space goes between two
//! neighbouring values only when neither of them is text.

use std::borrow::Cow;
use std::fmt::{self, Write};

/// One argument of a joined log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg<'a> {
    /// String-typed argument.
    Text(Cow<'a, str>),
    /// Any other value, already rendered with its `Display` form.
    Value(String),
    /// Absent value. Rendered as `<nil>`, spaced like a value.
    Nil,
}

impl<'a> Arg<'a> {
    /// Wrap an arbitrary displayable value.
    pub fn display(value: impl fmt::Display) -> Self {
        Arg::Value(value.to_string())
    }

    /// Wrap a value using its `Debug` form.
    pub fn debug(value: impl fmt::Debug) -> Self {
        Arg::Value(format!("{:?}", value))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Arg::Text(_))
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(s) => f.write_str(s),
            Arg::Value(s) => f.write_str(s),
            Arg::Nil => f.write_str("<nil>"),
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Text(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Arg::Text(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(s: String) -> Self {
        Arg::Text(Cow::Owned(s))
    }
}

impl<'a, T> From<Option<T>> for Arg<'a>
where
    T: Into<Arg<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Nil, Into::into)
    }
}

macro_rules! impl_value_arg {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg<'_> {
                fn from(v: $t) -> Self {
                    Arg::Value(v.to_string())
                }
            }
        )*
    };
}

impl_value_arg!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

/// Render `args` into a single line.
pub fn join(args: &[Arg<'_>]) -> String {
    let mut out = String::new();
    let mut prev_text = false;
    for (i, arg) in args.iter().enumerate() {
        let is_text = arg.is_text();
        if i > 0 && !is_text && !prev_text {
            out.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{}", arg);
        prev_text = is_text;
    }
    out
}
