// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics for polynomials.


/// The binomial coefficient C(n, k), computed by the multiplicative formula in
/// exact integer arithmetic. Each partial product C(n, i) is an integer, so no
/// rounding happens at any step.
pub(crate) fn binomial(n: u32, k: u32) -> u64 {
    if k > n {
        return 0;
    }
    let k = u128::from(k.min(n - k));
    let n = u128::from(n);
    let c = (1..=k).fold(1u128, |c, i| c * (n + 1 - i) / i);
    c as u64
}

/// Rows 0..`num_rows` of Pascal's triangle. Row `n` has `n + 1` entries, such
/// that `triangle[n][k]` is C(n, k).
pub(crate) fn pascal_triangle(num_rows: usize) -> Vec<Vec<u64>> {
    (0..num_rows as u32)
        .map(|n| (0..=n).map(|k| binomial(n, k)).collect())
        .collect()
}

/// Evaluate the polynomial `coeffs[0] + coeffs[1] t + coeffs[2] t^2 + ...` with
/// Horner's method.
#[cfg(test)]
pub(crate) fn eval_poly(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Re-expresses polynomials p(t) as q(t) = p(t + dt), i.e. new coefficients
/// such that evaluating q at t gives what p gives at t + dt.
///
/// Shifting p(t) = a + b t + c t^2 + d t^3 gives
///
/// ```text
/// a' = a + b dt + c dt^2 + d dt^3
/// b' = b + 2 c dt + 3 d dt^2
/// c' = c + 3 d dt
/// d' = d
/// ```
///
/// and in general `new[n] = sum_{k=n}^{N-1} old[k] C(k, n) dt^(k-n)`, the
/// diagonals of Pascal's triangle. The binomials and powers of `dt` are
/// computed once and reused for every polynomial of the same length.
pub(crate) struct PolyShifter {
    binomials: Vec<Vec<u64>>,
    dt_powers: Vec<f64>,
}

impl PolyShifter {
    pub(crate) fn new(num_coeffs: usize, dt: f64) -> PolyShifter {
        PolyShifter {
            binomials: pascal_triangle(num_coeffs),
            dt_powers: (0..num_coeffs as i32).map(|n| dt.powi(n)).collect(),
        }
    }

    pub(crate) fn num_coeffs(&self) -> usize {
        self.dt_powers.len()
    }

    /// Shift a single polynomial. `old` must have `self.num_coeffs()`
    /// coefficients.
    pub(crate) fn shift(&self, old: &[f64]) -> Vec<f64> {
        debug_assert_eq!(old.len(), self.num_coeffs());
        (0..old.len())
            .map(|n| {
                (n..old.len())
                    .map(|k| old[k] * self.binomials[k][n] as f64 * self.dt_powers[k - n])
                    .sum()
            })
            .collect()
    }
}
