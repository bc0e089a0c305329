//! Pattern rewrites applied to raw input before tokenizing
use crate::error::ConfigError;
use regex::Regex;
use std::borrow::Cow;

/// An ordered list of regex rewrite rules
///
/// Rules are compiled once and applied in order, each replacing every match of its pattern in the
/// output of the previous rule. Replacements may reference capture groups as `$1` or `${name}`.
///
/// # Example
/// ```
/// use asciimath_tex::Preprocessor;
///
/// let pre = Preprocessor::new([(r"\bdeg\b", "^@")]).unwrap();
/// assert_eq!(pre.apply("90 deg"), "90 ^@");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    rules: Vec<(Regex, String)>,
}

impl Preprocessor {
    /// Compile `(pattern, replacement)` rules
    pub fn new<I, P, R>(rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, (pattern, replacement))| {
                let regex = Regex::new(pattern.as_ref())
                    .map_err(|source| ConfigError::InvalidRule { index, source })?;
                Ok((regex, replacement.into()))
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(Preprocessor { rules })
    }

    /// Whether there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite input with every rule, borrowing it when nothing matches
    pub fn apply<'a>(&self, inp: &'a str) -> Cow<'a, str> {
        let mut res = Cow::Borrowed(inp);
        for (regex, replacement) in &self.rules {
            let replaced = match regex.replace_all(&res, replacement.as_str()) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(replaced) => replaced,
            };
            res = Cow::Owned(replaced);
        }
        res
    }
}
