//! Chi-square objective.

use crate::instrument::CalibrationInstrument;

/// `χ²(p) = Σ ((market − model(p, observable)) / error)²` over a set of
/// instruments.
///
/// A non-finite model value makes the whole sum `+∞`, so a parameter set the
/// model cannot price is never preferred by a minimiser.
pub struct ChiSquareObjective<'a, I, M> {
    instruments: &'a [CalibrationInstrument<I>],
    model: M,
}

impl<'a, I, M> ChiSquareObjective<'a, I, M>
where
    M: Fn(&[f64], &I) -> f64,
{
    /// Creates the objective.
    pub fn new(instruments: &'a [CalibrationInstrument<I>], model: M) -> Self {
        Self { instruments, model }
    }

    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// True when there are no instruments.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Error-weighted residuals `(market − model) / error`, one per instrument.
    pub fn residuals(&self, parameters: &[f64]) -> Vec<f64> {
        self.instruments
            .iter()
            .map(|inst| {
                let value = (self.model)(parameters, inst.observable());
                (inst.market_value() - value) / inst.error()
            })
            .collect()
    }

    /// Chi-square at the model parameters `parameters`.
    pub fn chi_square(&self, parameters: &[f64]) -> f64 {
        let mut sum = 0.0;
        for inst in self.instruments {
            let value = (self.model)(parameters, inst.observable());
            if !value.is_finite() {
                return f64::INFINITY;
            }
            let residual = (inst.market_value() - value) / inst.error();
            sum += residual * residual;
        }
        sum
    }
}
