use crate::error::TapeError;
use crate::matrix::Matrix;
use crate::ops::check_same_shape;
use crate::rng::NormalSampler;

/// Element-wise gaussian sample: `out[i] ~ N(m[i], std[i]^2)`.
///
/// This operation has no backward rule. Gradients never flow through the noise, which
/// is how Bayesian layers keep their sampling step out of the chain rule.
///
/// # Errors
/// `ShapeMismatch` tagged `"gauss"` if `m` and `std` differ in shape.
pub fn gauss_op(m: &Matrix, std: &Matrix, sampler: &mut NormalSampler) -> Result<Matrix, TapeError> {
    check_same_shape("gauss", m, std)?;
    let mut out = Matrix::zeros(m.rows(), m.cols());
    for ((o, &mu), &sd) in out.w_mut().iter_mut().zip(m.w()).zip(std.w()) {
        *o = sampler.sample(mu, sd);
    }
    Ok(out)
}
