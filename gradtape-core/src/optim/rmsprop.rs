use std::collections::HashMap;

use log::debug;

use crate::arena::Arena;
use crate::error::TapeError;
use crate::matrix::Matrix;
use crate::nn::Module;
use crate::optim::grad_clipping::clip_grad_value;

/// Hyperparameters that stay fixed for the lifetime of a solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Decay of the running mean of squared gradients.
    pub decay_rate: f64,
    /// Added under the square root to keep the step finite.
    pub smooth_eps: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            decay_rate: 0.999,
            smooth_eps: 1e-8,
        }
    }
}

impl SolverConfig {
    pub fn new(decay_rate: f64, smooth_eps: f64) -> Result<Self, TapeError> {
        if !(0.0..=1.0).contains(&decay_rate) {
            return Err(TapeError::ConfigurationError(format!(
                "decay_rate must be in [0.0, 1.0], got {}",
                decay_rate
            )));
        }
        if smooth_eps.is_nan() || smooth_eps <= 0.0 {
            return Err(TapeError::ConfigurationError(format!(
                "smooth_eps must be positive, got {}",
                smooth_eps
            )));
        }
        Ok(SolverConfig {
            decay_rate,
            smooth_eps,
        })
    }
}

/// Outcome of one [`RmsPropSolver::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverStats {
    /// `clipped / total`, or `0.0` when no gradient was seen.
    pub ratio_clipped: f64,
    pub clipped: usize,
    pub total: usize,
}

/// RMSprop with element-wise gradient clipping and L2 weight decay.
///
/// The solver keeps one running cache of squared gradients per parameter name. Caches
/// are created lazily, zero-filled, the first time a name is seen and persist across
/// steps, so a model must keep its parameter names stable.
#[derive(Debug, Default)]
pub struct RmsPropSolver {
    config: SolverConfig,
    step_cache: HashMap<String, Matrix>,
    iterations: u64,
}

impl RmsPropSolver {
    /// Creates a solver with the default decay rate (0.999) and epsilon (1e-8).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        RmsPropSolver {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The squared-gradient cache kept for parameter `name`, if any step has seen it.
    pub fn cache(&self, name: &str) -> Option<&Matrix> {
        self.step_cache.get(name)
    }

    /// Updates every named parameter of `model` in place and consumes its gradient.
    ///
    /// Per element, with `g` the accumulated gradient:
    ///
    /// ```text
    /// cache = decay * cache + (1 - decay) * g^2
    /// g     = clamp(g, -clip_value, clip_value)
    /// w    += -step_size * g / sqrt(cache + eps) - l2_regularization * w
    /// g     = 0
    /// ```
    ///
    /// The cache sees the unclipped gradient. Every element counts towards
    /// `SolverStats::total`, whether or not its gradient is zero.
    ///
    /// # Errors
    /// * `ConfigurationError` if `step_size` or `clip_value` is negative (or NaN).
    /// * `ShapeMismatch` if a parameter no longer has the shape of the cache kept
    ///   under its name, or if two parameters share a name but not a shape.
    /// * `InvalidHandle` if the model names a handle missing from `arena`.
    ///
    /// All of these are detected before any parameter, gradient or cache is written.
    pub fn step<M: Module + ?Sized>(
        &mut self,
        model: &M,
        arena: &mut Arena,
        step_size: f64,
        l2_regularization: f64,
        clip_value: f64,
    ) -> Result<SolverStats, TapeError> {
        if step_size.is_nan() || step_size < 0.0 {
            return Err(TapeError::ConfigurationError(format!(
                "step_size must be non-negative, got {}",
                step_size
            )));
        }
        if clip_value.is_nan() || clip_value < 0.0 {
            return Err(TapeError::ConfigurationError(format!(
                "clip_value must be non-negative, got {}",
                clip_value
            )));
        }

        let SolverConfig {
            decay_rate,
            smooth_eps,
        } = self.config;
        let mut clipped = 0usize;
        let mut total = 0usize;

        // Check every handle and cache shape first so a failing step changes nothing.
        let params = model.named_parameters();
        {
            let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
            for (name, id) in &params {
                let shape = arena.get(*id)?.shape();
                let expected = seen
                    .get(name.as_str())
                    .copied()
                    .or_else(|| self.step_cache.get(name).map(Matrix::shape));
                if let Some(expected) = expected {
                    if expected != shape {
                        return Err(TapeError::ShapeMismatch {
                            operation: "rmsprop_step".to_string(),
                            left: shape,
                            right: expected,
                        });
                    }
                }
                seen.insert(name.as_str(), shape);
            }
        }

        for (name, id) in params {
            let param = arena.get_mut(id)?;
            let cache = self
                .step_cache
                .entry(name)
                .or_insert_with(|| Matrix::zeros(param.rows(), param.cols()));

            let (w, dw) = param.buffers_mut();
            for ((wi, gi), ci) in w.iter_mut().zip(dw.iter_mut()).zip(cache.w_mut().iter_mut()) {
                *ci = *ci * decay_rate + (1.0 - decay_rate) * *gi * *gi;
                let (g, was_clipped) = clip_grad_value(*gi, clip_value);
                if was_clipped {
                    clipped += 1;
                }
                total += 1;
                *wi += -step_size * g / (*ci + smooth_eps).sqrt() - l2_regularization * *wi;
                *gi = 0.0;
            }
        }

        self.iterations += 1;
        let ratio_clipped = if total == 0 {
            0.0
        } else {
            clipped as f64 / total as f64
        };
        debug!(
            "RmsPropSolver: step {} updated {} elements, {} clipped (ratio {:.4})",
            self.iterations, total, clipped, ratio_clipped
        );
        Ok(SolverStats {
            ratio_clipped,
            clipped,
            total,
        })
    }
}

#[cfg(test)]
#[path = "rmsprop_test.rs"]
mod tests;
