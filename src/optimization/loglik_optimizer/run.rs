//! Execution helper that runs an `argmin` trust-region solver on a
//! log-likelihood problem and returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        NewtonOptions, OptimOutcome, ScoredLikelihood, Theta,
        adapter::ArgMinAdapter,
        types::{DEFAULT_MAX_ITER, NewtonState},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run an `argmin` trust-region optimization for a log-likelihood problem.
///
/// This is the shared runner used by both subproblem variants. It wires up:
/// - the user model via [`ArgMinAdapter`],
/// - the chosen `Solver` (trust region with Steihaug or Cauchy subproblem),
/// - initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - a hard iteration cap (trust-region solvers never terminate on their
///   own, so [`DEFAULT_MAX_ITER`] is installed when the options leave
///   `max_iter` unset),
///   then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Type Parameters
/// - `F`: Your model implementing [`ScoredLikelihood`].
/// - `S`: Any `argmin` solver whose `Problem` is `ArgMinAdapter<'a, F>` and
///   whose state is the crate's [`NewtonState`].
///
/// # Arguments
/// - `theta0`: Initial parameter vector. It is **consumed** and set on the
///   optimizer state via `state.param(theta0)`.
/// - `opts`: Optimizer options (tolerances, verbosity, max iters).
/// - `problem`: An [`ArgMinAdapter`] wrapping the user's model and data.
/// - `solver`: A fully constructed solver from
///   [`build_trust_region_steihaug`](crate::optimization::loglik_optimizer::builders::build_trust_region_steihaug)
///   or
///   [`build_trust_region_cauchy`](crate::optimization::loglik_optimizer::builders::build_trust_region_cauchy).
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and a one-time
/// pre-iteration line logs ℓ(θ₀) and, if available, ||grad|| before the first
/// iteration.
///
/// # Returns
/// An [`OptimOutcome`] containing the best parameter found, best
/// log-likelihood value ℓ(θ̂), the crate-level convergence verdict, iteration
/// count, function-evaluation counts, and the final gradient and step norms
/// when available.
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, solver errors,
///   subproblem failures, etc.) via the crate's `From<argmin::core::Error>`
///   conversion.
/// - Propagates any validation errors encountered when constructing
///   [`OptimOutcome`].
pub fn run_trust_region<'a, F, S>(
    theta0: Theta, opts: &NewtonOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: ScoredLikelihood,
    S: argmin::core::Solver<ArgMinAdapter<'a, F>, NewtonState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    let max_iter = opts.tols.max_iter.unwrap_or(DEFAULT_MAX_ITER);
    optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let step_norm = match (result.get_param(), result.get_prev_param()) {
        (Some(cur), Some(prev)) => {
            let diff = cur - prev;
            Some(diff.dot(&diff).sqrt())
        }
        _ => None,
    };
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
        step_norm,
        &opts.tols,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: ScoredLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
