//! The evaluation capability handed to every operator implementation.
//!
//! Operators that need to recurse (broadcasting, Complex arithmetic,
//! transcendental reductions) go back through [`Context`] instead of
//! calling each other directly.

use std::cell::{Cell, RefCell};

use num_bigint::{BigInt, RandBigInt};
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use glyph_core::{Config, EvalError, Limit, Result};

use crate::eval;
use crate::value::Value;

pub trait Context {
    fn config(&self) -> &Config;

    fn eval_unary(&self, op: &str, v: &Value) -> Result<Value>;

    fn eval_binary(&self, left: &Value, op: &str, right: &Value) -> Result<Value>;

    /// Uniform draw from `[0, n)`. `n` must be positive.
    fn random_below(&self, n: &BigInt) -> BigInt;
}

/// The concrete context: configuration, random source and depth accounting.
pub struct Session {
    config: Config,
    rng: RefCell<StdRng>,
    depth: Cell<usize>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Session {
            config,
            rng: RefCell::new(rng),
            depth: Cell::new(0),
        }
    }

    /// Current nesting depth of evaluation calls.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Restart the random source from the configured seed.
    pub fn reseed(&self) {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(self.config.seed);
    }

    /// Count one level of nesting. The level is released when the guard drops.
    pub fn enter(&self, op: &str) -> Result<DepthGuard<'_>> {
        let next = self.depth.get() + 1;
        if next > self.config.max_stack {
            debug!(op, depth = next, "evaluation depth limit reached");
            return Err(EvalError::limit(
                op,
                Limit::Stack,
                format!("nesting depth exceeds {}", self.config.max_stack),
            ));
        }
        self.depth.set(next);
        Ok(DepthGuard { depth: &self.depth })
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Config::default())
    }
}

impl Context for Session {
    fn config(&self) -> &Config {
        &self.config
    }

    fn eval_unary(&self, op: &str, v: &Value) -> Result<Value> {
        let _guard = self.enter(op)?;
        eval::eval_unary(self, op, v)
    }

    fn eval_binary(&self, left: &Value, op: &str, right: &Value) -> Result<Value> {
        let _guard = self.enter(op)?;
        eval::eval_binary(self, left, op, right)
    }

    fn random_below(&self, n: &BigInt) -> BigInt {
        if n <= &BigInt::zero() {
            return BigInt::zero();
        }
        self.rng.borrow_mut().gen_bigint_range(&BigInt::zero(), n)
    }
}

pub struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
