//! Value producers for the getter capability
//!
//! The getter crosses the C boundary as `double (*)(void)`, so it cannot
//! carry state. `Generator::install` parks a generator in a thread-local slot
//! for the duration of a closure and hands out a getter that pulls from it.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::runtime::abi::GetFn;

#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("unknown generator kind '{0}' (expected constant, ramp or uniform)")]
    UnknownKind(String),
    #[error("generator '{kind}' expects {expected} argument(s), got {found}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("uniform range is empty: low {low} must be below high {high}")]
    EmptyRange { low: f64, high: f64 },
}

/// A stateful source of `f64` values.
#[derive(Debug, Clone)]
pub enum Generator {
    /// Always yields the same value.
    Constant(f64),
    /// Yields `start`, `start + step`, `start + 2 * step`, ...
    Ramp { next: f64, step: f64 },
    /// Uniform samples in `[low, high)`, reproducible for a given seed.
    Uniform {
        low: f64,
        high: f64,
        rng: fastrand::Rng,
    },
}

thread_local! {
    static ACTIVE: RefCell<Option<Generator>> = const { RefCell::new(None) };
}

/// Puts the previous occupant back into `ACTIVE` if an install unwinds.
struct Restore(Option<Option<Generator>>);

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(previous) = self.0.take() {
            ACTIVE.with(|slot| slot.replace(previous));
        }
    }
}

/// C getter reading from the generator installed on this thread.
///
/// Yields NaN when nothing is installed.
extern "C" fn next_installed() -> f64 {
    ACTIVE.with(|slot| slot.borrow_mut().as_mut().map_or(f64::NAN, Generator::next_value))
}

impl Generator {
    pub fn constant(value: f64) -> Self {
        Generator::Constant(value)
    }

    pub fn ramp(start: f64, step: f64) -> Self {
        Generator::Ramp { next: start, step }
    }

    pub fn uniform(low: f64, high: f64, seed: u64) -> Result<Self, GeneratorError> {
        if low.is_nan() || high.is_nan() || low >= high {
            return Err(GeneratorError::EmptyRange { low, high });
        }
        Ok(Generator::Uniform {
            low,
            high,
            rng: fastrand::Rng::with_seed(seed),
        })
    }

    /// Parse `constant:V`, `ramp:START,STEP` or `uniform:LOW,HIGH`.
    pub fn parse_with_seed(spec: &str, seed: u64) -> Result<Self, GeneratorError> {
        let (kind, args) = spec.split_once(':').unwrap_or((spec, ""));
        let args = parse_args(args)?;
        match kind.trim() {
            "constant" => {
                let [value] = expect_args::<1>("constant", &args)?;
                Ok(Self::constant(value))
            }
            "ramp" => {
                let [start, step] = expect_args::<2>("ramp", &args)?;
                Ok(Self::ramp(start, step))
            }
            "uniform" => {
                let [low, high] = expect_args::<2>("uniform", &args)?;
                Self::uniform(low, high, seed)
            }
            other => Err(GeneratorError::UnknownKind(other.to_string())),
        }
    }

    /// Produce the next value.
    pub fn next_value(&mut self) -> f64 {
        match self {
            Generator::Constant(value) => *value,
            Generator::Ramp { next, step } => {
                let value = *next;
                *next += *step;
                value
            }
            Generator::Uniform { low, high, rng } => *low + (*high - *low) * rng.f64(),
        }
    }

    /// Install `self` as this thread's active generator while `f` runs.
    ///
    /// `f` receives a C getter bound to the installed generator. The previous
    /// occupant of the slot is restored afterwards, even if `f` panics, so
    /// installs nest. Returns the closure's result and the generator in its
    /// advanced state.
    pub fn install<R>(self, f: impl FnOnce(GetFn) -> R) -> (R, Generator) {
        let mut guard = Restore(Some(ACTIVE.with(|slot| slot.replace(Some(self)))));
        let result = f(next_installed);
        let previous = guard.0.take().flatten();
        let advanced = ACTIVE.with(|slot| slot.replace(previous));
        // Always Some: nested installs restore the slot before returning.
        let advanced = advanced.unwrap_or(Generator::Constant(f64::NAN));
        (result, advanced)
    }
}

impl FromStr for Generator {
    type Err = GeneratorError;

    /// Parses with seed 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_seed(s, 0)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Constant(value) => write!(f, "constant:{}", value),
            Generator::Ramp { next, step } => write!(f, "ramp:{},{}", next, step),
            Generator::Uniform { low, high, .. } => write!(f, "uniform:{},{}", low, high),
        }
    }
}

fn parse_args(args: &str) -> Result<Vec<f64>, GeneratorError> {
    if args.trim().is_empty() {
        return Ok(Vec::new());
    }
    args.split(',')
        .map(|a| {
            let a = a.trim();
            a.parse::<f64>().map_err(|_| GeneratorError::InvalidNumber(a.to_string()))
        })
        .collect()
}

fn expect_args<const N: usize>(
    kind: &'static str,
    args: &[f64],
) -> Result<[f64; N], GeneratorError> {
    args.try_into().map_err(|_| GeneratorError::Arity {
        kind,
        expected: N,
        found: args.len(),
    })
}
