//! Configuration of a folding pass.

use crate::evaluator::EvaluatorOptions;
use alloc::string::{String, ToString};
use thiserror::Error;

/// Option key for the marker prefix.
pub const PREFIX_OPTION: &str = "prefix";
/// Option key for the maximum number of loop iterations.
pub const STEP_LIMIT_OPTION: &str = "step-limit";
/// Option key for the maximum call depth.
pub const STACK_LIMIT_OPTION: &str = "stack-limit";

/// Parameters of one folding pass. Immutable while the pass runs.
///
/// # Example
///
/// ```
/// use evalconst_core::api::EvalOptions;
///
/// let options = EvalOptions::from_options([("prefix", "const"), ("step-limit", "500")]).unwrap();
/// assert_eq!(options.marker, "const");
/// assert_eq!(options.step_limit, 500);
/// assert_eq!(options.stack_limit, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOptions {
    /// Name prefix of functions whose calls may be folded.
    ///
    /// Default: "eval"
    pub marker: String,

    /// Maximum number of loop iterations per folded call.
    ///
    /// Default: 1_000_000
    pub step_limit: u64,

    /// Maximum number of nested marker calls per folded call.
    ///
    /// Default: 1000
    pub stack_limit: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        let limits = EvaluatorOptions::default();
        Self {
            marker: String::from("eval"),
            step_limit: limits.step_limit,
            stack_limit: limits.stack_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for option '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl EvalOptions {
    /// Set one option from its textual form.
    pub fn apply_option(&mut self, key: &str, value: &str) -> Result<(), OptionError> {
        let invalid = |expected| OptionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        };
        match key {
            PREFIX_OPTION => {
                if value.is_empty() {
                    return Err(invalid("a non-empty prefix"));
                }
                self.marker = value.to_string();
            }
            STEP_LIMIT_OPTION => {
                self.step_limit = value
                    .parse()
                    .map_err(|_| invalid("a non-negative integer"))?;
            }
            STACK_LIMIT_OPTION => {
                self.stack_limit = value
                    .parse()
                    .map_err(|_| invalid("a non-negative integer"))?;
            }
            _ => return Err(OptionError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Defaults overridden by each `(key, value)` pair in turn.
    pub fn from_options<K, V>(
        options: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, OptionError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut result = Self::default();
        for (key, value) in options {
            result.apply_option(key.as_ref(), value.as_ref())?;
        }
        Ok(result)
    }

    pub fn evaluator_options(&self) -> EvaluatorOptions {
        EvaluatorOptions {
            step_limit: self.step_limit,
            stack_limit: self.stack_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = EvalOptions::default();
        assert_eq!(options.marker, "eval");
        assert_eq!(options.step_limit, 1_000_000);
        assert_eq!(options.stack_limit, 1000);
    }

    #[test]
    fn test_apply_options() {
        let options = EvalOptions::from_options([
            ("prefix", "fold"),
            ("step-limit", "10"),
            ("stack-limit", "3"),
        ])
        .unwrap();
        assert_eq!(
            options,
            EvalOptions {
                marker: "fold".into(),
                step_limit: 10,
                stack_limit: 3,
            }
        );
        assert_eq!(
            options.evaluator_options(),
            EvaluatorOptions {
                step_limit: 10,
                stack_limit: 3,
            }
        );
    }

    #[test]
    fn test_later_options_win() {
        let options =
            EvalOptions::from_options([("step-limit", "10"), ("step-limit", "20")]).unwrap();
        assert_eq!(options.step_limit, 20);
    }

    #[test]
    fn test_no_options() {
        let options = EvalOptions::from_options(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(options, EvalOptions::default());
    }

    #[test]
    fn test_bad_options() {
        let mut options = EvalOptions::default();
        assert_eq!(
            options.apply_option("depth", "3"),
            Err(OptionError::UnknownKey("depth".into()))
        );
        assert_eq!(
            options.apply_option("step-limit", "-1"),
            Err(OptionError::InvalidValue {
                key: "step-limit".into(),
                value: "-1".into(),
                expected: "a non-negative integer",
            })
        );
        assert!(options.apply_option("prefix", "").is_err());
        assert_eq!(options, EvalOptions::default());
    }
}
