//! Arbitrary-precision binary floating point on top of `num-bigint`.
//!
//! A finite value is `(-1)^neg * mant * 2^exp`. The mantissa is kept odd
//! (trailing zero bits are folded into the exponent) so every finite value
//! has exactly one representation. Each value carries the precision it was
//! created with; results are rounded to nearest, ties to even.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

const LOG10_2: f64 = std::f64::consts::LOG10_2;

#[derive(Clone, Debug)]
pub struct BigFloat {
    neg: bool,
    mant: BigUint,
    exp: i64,
    prec: u32,
    inf: bool,
}

impl BigFloat {
    pub fn zero(prec: u32) -> Self {
        BigFloat {
            neg: false,
            mant: BigUint::zero(),
            exp: 0,
            prec,
            inf: false,
        }
    }

    pub fn one(prec: u32) -> Self {
        Self::from_i64(1, prec)
    }

    pub fn infinity(negative: bool, prec: u32) -> Self {
        BigFloat {
            neg: negative,
            mant: BigUint::zero(),
            exp: 0,
            prec,
            inf: true,
        }
    }

    pub fn from_i64(i: i64, prec: u32) -> Self {
        Self::from_bigint(&BigInt::from(i), prec)
    }

    pub fn from_bigint(i: &BigInt, prec: u32) -> Self {
        Self::round(i.is_negative(), i.magnitude().clone(), 0, prec, false)
    }

    pub fn from_ratio(r: &BigRational, prec: u32) -> Self {
        let neg = r.is_negative();
        Self::quotient(
            neg,
            r.numer().magnitude().clone(),
            r.denom().magnitude().clone(),
            0,
            prec,
        )
    }

    /// Build from a fixed-point integer: the value is `v * 2^-frac_bits`.
    pub fn from_fixed(v: &BigInt, frac_bits: u32, prec: u32) -> Self {
        Self::round(
            v.is_negative(),
            v.magnitude().clone(),
            -(frac_bits as i64),
            prec,
            false,
        )
    }

    /// Round `(-1)^neg * mant * 2^exp` to `prec` bits. `sticky` records that
    /// nonzero bits below `mant` were discarded by the caller.
    fn round(neg: bool, mut mant: BigUint, mut exp: i64, prec: u32, sticky: bool) -> Self {
        if mant.is_zero() {
            return Self::zero(prec);
        }
        let bits = mant.bits();
        let prec64 = prec.max(1) as u64;
        if bits > prec64 {
            let shift = bits - prec64;
            let q = &mant >> shift;
            let rem = &mant - (&q << shift);
            let half = BigUint::one() << (shift - 1);
            let up = match rem.cmp(&half) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => sticky || q.bit(0),
            };
            mant = if up { q + 1u32 } else { q };
            exp += shift as i64;
        }
        let tz = mant.trailing_zeros().unwrap_or(0);
        if tz > 0 {
            mant >>= tz;
            exp += tz as i64;
        }
        BigFloat {
            neg,
            mant,
            exp,
            prec,
            inf: false,
        }
    }

    /// `(-1)^neg * (a / b) * 2^exp`, rounded.
    fn quotient(neg: bool, a: BigUint, b: BigUint, exp: i64, prec: u32) -> Self {
        if a.is_zero() {
            return Self::zero(prec);
        }
        let shift = prec as i64 + 2 + b.bits() as i64 - a.bits() as i64;
        let (a, b) = if shift >= 0 {
            (a << shift as u64, b)
        } else {
            (a, b << (-shift) as u64)
        };
        let (q, r) = a.div_rem(&b);
        Self::round(neg, q, exp - shift, prec, !r.is_zero())
    }

    pub fn prec(&self) -> u32 {
        self.prec
    }

    pub fn is_zero(&self) -> bool {
        !self.inf && self.mant.is_zero()
    }

    pub fn is_inf(&self) -> bool {
        self.inf
    }

    pub fn is_finite(&self) -> bool {
        !self.inf
    }

    pub fn is_negative(&self) -> bool {
        self.neg && !self.is_zero()
    }

    pub fn sign(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.neg {
            -1
        } else {
            1
        }
    }

    /// Finite and without a fractional part.
    pub fn is_integer(&self) -> bool {
        !self.inf && (self.mant.is_zero() || self.exp >= 0)
    }

    /// Bit position just above the leading one: `|x| < 2^top`.
    /// Zero and infinities report `i64::MIN` and `i64::MAX`.
    pub fn top(&self) -> i64 {
        if self.inf {
            i64::MAX
        } else if self.mant.is_zero() {
            i64::MIN
        } else {
            self.exp + self.mant.bits() as i64
        }
    }

    /// Significant bits actually in use.
    pub fn mant_bits(&self) -> u64 {
        self.mant.bits()
    }

    pub fn with_prec(&self, prec: u32) -> Self {
        if self.inf {
            return Self::infinity(self.neg, prec);
        }
        Self::round(self.neg, self.mant.clone(), self.exp, prec, false)
    }

    pub fn neg(&self) -> Self {
        let mut r = self.clone();
        if !r.is_zero() {
            r.neg = !r.neg;
        }
        r
    }

    pub fn abs(&self) -> Self {
        let mut r = self.clone();
        r.neg = false;
        r
    }

    /// Multiply by `2^k` exactly.
    pub fn mul_pow2(&self, k: i64) -> Self {
        let mut r = self.clone();
        if !r.mant.is_zero() {
            r.exp += k;
        }
        r
    }

    pub fn add(&self, other: &BigFloat, prec: u32) -> Self {
        if self.inf || other.inf {
            // inf - inf is rejected by callers before it gets here.
            return if self.inf {
                Self::infinity(self.neg, prec)
            } else {
                Self::infinity(other.neg, prec)
            };
        }
        if self.is_zero() {
            return other.with_prec(prec);
        }
        if other.is_zero() {
            return self.with_prec(prec);
        }
        let (x, y) = if self.top() >= other.top() {
            (self, other)
        } else {
            (other, self)
        };
        // An operand lying wholly below both the rounding bit and the lowest
        // set bit of the other only acts as a sticky bit.
        let floor = x.exp.min(x.top() - prec as i64 - 2);
        let sticky;
        let y = if y.top() < floor {
            sticky = BigFloat {
                neg: y.neg,
                mant: BigUint::one(),
                exp: floor - 1,
                prec,
                inf: false,
            };
            &sticky
        } else {
            y
        };
        let e = x.exp.min(y.exp);
        let a = &x.mant << (x.exp - e) as u64;
        let b = &y.mant << (y.exp - e) as u64;
        if x.neg == y.neg {
            return Self::round(x.neg, a + b, e, prec, false);
        }
        match a.cmp(&b) {
            Ordering::Equal => Self::zero(prec),
            Ordering::Greater => Self::round(x.neg, a - b, e, prec, false),
            Ordering::Less => Self::round(y.neg, b - a, e, prec, false),
        }
    }

    pub fn sub(&self, other: &BigFloat, prec: u32) -> Self {
        self.add(&other.neg(), prec)
    }

    pub fn mul(&self, other: &BigFloat, prec: u32) -> Self {
        let neg = self.neg != other.neg;
        if self.inf || other.inf {
            return Self::infinity(neg, prec);
        }
        Self::round(neg, &self.mant * &other.mant, self.exp + other.exp, prec, false)
    }

    /// Division. A zero divisor yields a signed infinity; callers that must
    /// reject it check first.
    pub fn quo(&self, other: &BigFloat, prec: u32) -> Self {
        let neg = self.neg != other.neg;
        if self.inf {
            return Self::infinity(neg, prec);
        }
        if other.inf {
            return Self::zero(prec);
        }
        if other.is_zero() {
            return Self::infinity(self.neg, prec);
        }
        Self::quotient(
            neg,
            self.mant.clone(),
            other.mant.clone(),
            self.exp - other.exp,
            prec,
        )
    }

    /// Square root of a non-negative value; `None` for negative input.
    pub fn sqrt(&self, prec: u32) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero(prec));
        }
        if self.inf {
            return Some(Self::infinity(false, prec));
        }
        let want = 2 * (prec as i64 + 2);
        let mut shift = (want - self.mant.bits() as i64).max(0);
        if (self.exp - shift).rem_euclid(2) != 0 {
            shift += 1;
        }
        let m = &self.mant << shift as u64;
        let r = m.sqrt();
        let sticky = &r * &r != m;
        Some(Self::round(false, r, (self.exp - shift) / 2, prec, sticky))
    }

    /// Largest integer not greater than `self`. `None` for infinities.
    pub fn floor(&self) -> Option<BigInt> {
        if self.inf {
            return None;
        }
        if self.exp >= 0 {
            let mag = &self.mant << self.exp as u64;
            return Some(BigInt::from_biguint(sign_of(self.neg), mag));
        }
        let shift = (-self.exp) as u64;
        let q = &self.mant >> shift;
        let exact = &q << shift == self.mant;
        if self.neg {
            let q = if exact { q } else { q + 1u32 };
            Some(-BigInt::from(q))
        } else {
            Some(BigInt::from(q))
        }
    }

    /// Smallest integer not less than `self`. `None` for infinities.
    pub fn ceil(&self) -> Option<BigInt> {
        self.neg().floor().map(|f| -f)
    }

    /// Nearest integer, halves rounded away from zero.
    pub fn round_half_away(&self) -> Option<BigInt> {
        if self.inf {
            return None;
        }
        if self.mant.is_zero() {
            return Some(BigInt::zero());
        }
        let half = BigFloat::one(2).mul_pow2(-1);
        let exact = (self.top().max(1) - self.exp.min(-1)) as u32 + 2;
        let f = self.abs().add(&half, exact).floor()?;
        Some(if self.neg { -f } else { f })
    }

    /// `round(self * 2^frac_bits)` truncated toward zero, for fixed-point kernels.
    pub fn to_fixed(&self, frac_bits: u32) -> BigInt {
        if self.inf || self.mant.is_zero() {
            return BigInt::zero();
        }
        let e = self.exp + frac_bits as i64;
        let mag = if e >= 0 {
            &self.mant << e as u64
        } else {
            &self.mant >> (-e) as u64
        };
        BigInt::from_biguint(sign_of(self.neg), mag)
    }

    /// Exact rational value. `None` for infinities.
    pub fn to_ratio(&self) -> Option<BigRational> {
        if self.inf {
            return None;
        }
        let n = BigInt::from_biguint(sign_of(self.neg), self.mant.clone());
        Some(if self.exp >= 0 {
            BigRational::from_integer(n << self.exp as u64)
        } else {
            BigRational::new(n, BigInt::one() << (-self.exp) as u64)
        })
    }

    /// Approximate as an `f64`; intended for diagnostics and tests.
    pub fn to_f64(&self) -> f64 {
        if self.inf {
            return if self.neg { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        if self.mant.is_zero() {
            return 0.0;
        }
        let bits = self.mant.bits();
        let (m, e) = if bits > 64 {
            let shift = bits - 64;
            (&self.mant >> shift, self.exp + shift as i64)
        } else {
            (self.mant.clone(), self.exp)
        };
        let m = m.to_f64().unwrap_or(f64::INFINITY);
        let v = if e > 2000 {
            f64::INFINITY
        } else if e < -2200 {
            0.0
        } else {
            m * 2f64.powi(e as i32)
        };
        if self.neg {
            -v
        } else {
            v
        }
    }

    /// Decimal rendering with `digits` significant digits in the style of `%g`.
    pub fn to_decimal_string(&self, digits: usize) -> String {
        if self.inf {
            return if self.neg { "-Inf".into() } else { "+Inf".into() };
        }
        if self.mant.is_zero() {
            return "0".into();
        }
        let digits = digits.max(1);
        let wp = self.prec.max(self.mant_bits() as u32) + 4 * digits as u32 + 64;
        let x = self.abs();
        let mut k = ((self.top() - 1) as f64 * LOG10_2).floor() as i64;
        let lo = BigUint::from(10u32).pow(digits as u32 - 1);
        let hi = &lo * 10u32;
        let scaled = loop {
            let p = digits as i64 - 1 - k;
            let ten = pow10(p.unsigned_abs(), wp);
            let s = if p >= 0 { x.mul(&ten, wp) } else { x.quo(&ten, wp) };
            let q = s.round_half_away().unwrap_or_default().magnitude().clone();
            if q >= hi {
                k += 1;
            } else if q < lo {
                k -= 1;
            } else {
                break q;
            }
        };
        let text = scaled.to_str_radix(10);
        let trimmed = text.trim_end_matches('0');
        let sign = if self.neg { "-" } else { "" };
        if k < -4 || k >= digits as i64 {
            let (head, tail) = trimmed.split_at(1);
            let mantissa = if tail.is_empty() {
                head.to_string()
            } else {
                format!("{}.{}", head, tail)
            };
            let esign = if k < 0 { '-' } else { '+' };
            format!("{}{}e{}{:02}", sign, mantissa, esign, k.abs())
        } else if k < 0 {
            format!("{}0.{}{}", sign, "0".repeat((-k - 1) as usize), trimmed)
        } else {
            let int_len = k as usize + 1;
            if trimmed.len() <= int_len {
                format!("{}{}{}", sign, trimmed, "0".repeat(int_len - trimmed.len()))
            } else {
                format!("{}{}.{}", sign, &trimmed[..int_len], &trimmed[int_len..])
            }
        }
    }
}

fn sign_of(neg: bool) -> Sign {
    if neg {
        Sign::Minus
    } else {
        Sign::Plus
    }
}

/// `10^n` by repeated squaring; exact while `5^n` fits in `prec` bits.
fn pow10(mut n: u64, prec: u32) -> BigFloat {
    let mut result = BigFloat::one(prec);
    let mut base = BigFloat::from_i64(10, prec);
    while n > 0 {
        if n & 1 == 1 {
            result = result.mul(&base, prec);
        }
        n >>= 1;
        if n > 0 {
            base = base.mul(&base, prec);
        }
    }
    result
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigFloat {}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        let (sa, sb) = (self.sign(), other.sign());
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == 0 {
            return Ordering::Equal;
        }
        let mag = match (self.inf, other.inf) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self.top().cmp(&other.top()) {
                Ordering::Equal => {
                    let e = self.exp.min(other.exp);
                    let a = &self.mant << (self.exp - e) as u64;
                    let b = &other.mant << (other.exp - e) as u64;
                    a.cmp(&b)
                }
                ord => ord,
            },
        };
        if sa < 0 {
            mag.reverse()
        } else {
            mag
        }
    }
}

impl fmt::Display for BigFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string(12))
    }
}
