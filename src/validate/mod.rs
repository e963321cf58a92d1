//! Ordered validator chains.
//!
//! Every chain starts with the owning column's parse step. A parse failure is
//! reported straight away; otherwise each registered check runs, in order, on
//! the parsed value until one rejects it.

pub mod builtin;

use std::fmt;
use std::sync::Arc;

use crate::column::Value;
use crate::error::{ConversionError, ValidationError};

/// A shareable check on an already-parsed value.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>;

/// One stage of a chain.
#[derive(Clone)]
pub enum Stage {
    /// The column's own conversion.
    Parse,
    Check(Validator),
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => f.write_str("Parse"),
            Stage::Check(_) => f.write_str("Check(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatorChain {
    stages: Vec<Stage>,
}

impl Default for ValidatorChain {
    fn default() -> Self {
        Self {
            stages: vec![Stage::Parse],
        }
    }
}

impl ValidatorChain {
    pub fn push(&mut self, validator: Validator) {
        self.stages.push(Stage::Check(validator));
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Never true: the parse stage is always present.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage against `value`, using `parse` for the parse stage.
    pub fn run<P>(&self, value: &Value, parse: P) -> Result<(), ValidationError>
    where
        P: Fn(&Value) -> Result<Value, ConversionError>,
    {
        let mut parsed: Option<Value> = None;
        for stage in &self.stages {
            match stage {
                Stage::Parse => parsed = Some(parse(value)?),
                Stage::Check(check) => check(parsed.as_ref().unwrap_or(value))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reject_negative() -> Validator {
        Arc::new(|v: &Value| match v {
            Value::Int(i) if *i < 0 => Err(ValidationError::rejected("negative")),
            _ => Ok(()),
        })
    }

    #[test]
    fn chain_starts_with_parse() {
        let chain = ValidatorChain::default();
        assert_eq!(chain.len(), 1);
        assert!(matches!(chain.stages()[0], Stage::Parse));
        assert!(!chain.is_empty());
    }

    #[test]
    fn parse_failure_skips_checks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut chain = ValidatorChain::default();
        chain.push(Arc::new(move |_: &Value| -> Result<(), ValidationError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        let err = chain
            .run(&Value::Str("x".into()), |_| {
                Err(ConversionError::Custom("bad".into()))
            })
            .unwrap_err();
        assert!(matches!(err, ValidationError::Conversion(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn checks_see_parsed_value_and_stop_at_first_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut chain = ValidatorChain::default();
        chain.push(reject_negative());
        chain.push(Arc::new(move |_: &Value| -> Result<(), ValidationError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        // parse negates, so a positive input reaches the checks as negative
        let negate = |v: &Value| match v {
            Value::Int(i) => Ok(Value::Int(-i)),
            _ => Err(ConversionError::Custom("not an int".into())),
        };
        assert_eq!(
            chain.run(&Value::Int(5), negate),
            Err(ValidationError::rejected("negative"))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        chain.run(&Value::Int(-5), negate).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
