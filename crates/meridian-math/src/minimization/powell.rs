//! Powell's conjugate-direction method.

use log::{debug, warn};

use crate::error::{MathError, MathResult};
use crate::minimization::{eval_or_inf, LineSearch, MinimizationResult, PowellConfig};

/// Guards the relative decrease test when the minimum value is zero.
const TINY: f64 = 1.0e-25;

/// Steps below this keep the direction at its previous length.
const MIN_DIRECTION_SCALE: f64 = f64::EPSILON;

/// Minimises `f` over ℝⁿ without derivatives, starting from `x0`.
///
/// Each sweep line-minimises along every direction of the current set,
/// starting from the coordinate axes. The net displacement of the sweep then
/// replaces the direction of largest decrease, unless Powell's test says the
/// replacement would make the set degenerate. The search stops when one
/// sweep reduces the objective by a relative amount below
/// `config.tolerance`, or when the net displacement of a sweep is lost in
/// rounding against `|p|`.
///
/// Reaching `config.max_iterations` sweeps is not an error: the best point
/// so far is returned with `converged == false`.
///
/// # Errors
///
/// * [`MathError::InvalidInput`] for an empty start or a non-finite `f(x0)`
/// * errors from the line search, e.g. an objective unbounded below
pub fn powell<F>(f: F, x0: &[f64], config: &PowellConfig) -> MathResult<MinimizationResult>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 {
        return Err(MathError::invalid_input("powell needs at least one parameter"));
    }

    let objective = |x: &[f64]| eval_or_inf(f(x));
    let line_search = config.line_search();

    let mut p = x0.to_vec();
    let mut fret = objective(&p);
    if !fret.is_finite() {
        return Err(MathError::invalid_input(format!(
            "objective is not finite at the start point: {fret}"
        )));
    }

    let mut directions: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut axis = vec![0.0; n];
            axis[i] = 1.0;
            axis
        })
        .collect();
    let mut pt = p.clone();

    for sweep in 1..=config.max_iterations {
        let fp = fret;
        let mut ibig = 0;
        let mut del = 0.0;

        for (i, direction) in directions.iter_mut().enumerate() {
            let fptt = fret;
            fret = minimise_along(&objective, &line_search, &mut p, direction)?;
            if fptt - fret > del {
                del = fptt - fret;
                ibig = i;
            }
        }

        if 2.0 * (fp - fret) <= config.tolerance * (fp.abs() + fret.abs()) + TINY {
            debug!("powell converged after {sweep} sweeps, objective {fret}");
            return Ok(MinimizationResult {
                parameters: p,
                objective_value: fret,
                iterations: sweep,
                converged: true,
            });
        }

        // Extrapolated point and net displacement of the sweep
        let ptt: Vec<f64> = p.iter().zip(&pt).map(|(&a, &b)| 2.0 * a - b).collect();
        let mut xit: Vec<f64> = p.iter().zip(&pt).map(|(&a, &b)| a - b).collect();
        pt.copy_from_slice(&p);

        if is_negligible_displacement(&xit, &p) {
            warn!("powell sweep {sweep} made no net displacement, stopping");
            return Ok(MinimizationResult {
                parameters: p,
                objective_value: fret,
                iterations: sweep,
                converged: true,
            });
        }

        let fptt = objective(&ptt);
        if fptt < fp {
            let t = 2.0 * (fp - 2.0 * fret + fptt) * (fp - fret - del).powi(2)
                - del * (fp - fptt).powi(2);
            if t < 0.0 {
                fret = minimise_along(&objective, &line_search, &mut p, &mut xit)?;
                directions.swap(ibig, n - 1);
                directions[n - 1] = xit;
            }
        }
    }

    warn!(
        "powell stopped after {} sweeps without meeting tolerance {}, objective {}",
        config.max_iterations, config.tolerance, fret
    );
    Ok(MinimizationResult {
        parameters: p,
        objective_value: fret,
        iterations: config.max_iterations,
        converged: false,
    })
}

/// Line-minimises from `point` along `direction`, moving `point` to the
/// minimum and scaling `direction` by the step taken.
///
/// A step of (nearly) zero leaves `direction` unscaled, so no direction in
/// the set is ever the zero vector.
fn minimise_along<F>(
    f: &F,
    line_search: &LineSearch,
    point: &mut [f64],
    direction: &mut [f64],
) -> MathResult<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let minimum = line_search.minimise(f, point, direction)?;
    let step = minimum.x;
    let rescale = step.abs() > MIN_DIRECTION_SCALE;

    for (x, d) in point.iter_mut().zip(direction.iter_mut()) {
        *x += step * *d;
        if rescale {
            *d *= step;
        }
    }
    Ok(minimum.value)
}

/// True when `displacement` is below `ε (1 + |p|)`.
fn is_negligible_displacement(displacement: &[f64], p: &[f64]) -> bool {
    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    norm(displacement) <= f64::EPSILON * (1.0 + norm(p))
}
