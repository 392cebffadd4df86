/// Clamps a single gradient element to `[-clip_value, clip_value]`.
///
/// Returns the clamped value and whether clamping changed it. A `clip_value` of zero
/// clips every non-zero gradient to zero.
pub fn clip_grad_value(grad: f64, clip_value: f64) -> (f64, bool) {
    if grad > clip_value {
        (clip_value, true)
    } else if grad < -clip_value {
        (-clip_value, true)
    } else {
        (grad, false)
    }
}
