use approx::assert_relative_eq;
use gradtape_core::autograd::grad_check::check_grad;
use gradtape_core::{
    Arena, Graph, Matrix, MatrixId, Module, NormalSampler, RmsPropSolver, SolverConfig, TapeError,
};

mod common;
use common::{init_logger, insert_matrix, NamedParams};

const INPUTS: [[f64; 2]; 4] = [[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [-1.0, 0.5]];

fn target(x: &[f64; 2]) -> f64 {
    0.5 * x[0] - 0.3 * x[1] + 0.2
}

/// Runs one epoch over `INPUTS`, accumulating gradients of the mean squared error.
/// Returns the loss.
fn epoch(
    graph: &mut Graph,
    arena: &mut Arena,
    data: MatrixId,
    weight: MatrixId,
    bias: MatrixId,
) -> Result<f64, TapeError> {
    let mark = arena.checkpoint();
    let mut loss = 0.0;
    for (row, x) in INPUTS.iter().enumerate() {
        graph.memorize_operation_sequence(true);
        let input = graph.row_pluck(arena, data, row)?;
        let wx = graph.mul(arena, weight, input)?;
        let out = graph.add(arena, wx, bias)?;

        let err = arena.get(out)?.w()[0] - target(x);
        loss += 0.5 * err * err / INPUTS.len() as f64;
        arena.get_mut(out)?.dw_mut()[0] = err / INPUTS.len() as f64;

        graph.backward(arena)?;
        graph.forget_current_sequence();
    }
    arena.rewind(mark);
    Ok(loss)
}

#[test]
fn test_linear_regression_converges_with_rmsprop() -> Result<(), TapeError> {
    init_logger();
    let mut arena = Arena::new();
    let weight = arena.insert(Matrix::zeros(1, 2));
    let bias = arena.insert(Matrix::zeros(1, 1));
    let data = insert_matrix(
        &mut arena,
        INPUTS.len(),
        2,
        INPUTS.iter().flat_map(|x| x.iter().copied()).collect(),
    );
    let model = NamedParams(vec![("W".to_string(), weight), ("b".to_string(), bias)]);
    let mut graph = Graph::new();
    let mut solver = RmsPropSolver::with_config(SolverConfig::new(0.9, 1e-8)?);

    let initial = epoch(&mut graph, &mut arena, data, weight, bias)?;
    model.zero_grad(&mut arena)?;
    let mut last = initial;
    for _ in 0..500 {
        last = epoch(&mut graph, &mut arena, data, weight, bias)?;
        let stats = solver.step(&model, &mut arena, 0.01, 0.0, 5.0)?;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.clipped, 0);
    }

    assert!(last < initial * 0.1, "loss {} did not drop from {}", last, initial);
    assert_relative_eq!(arena[weight].w()[0], 0.5, epsilon = 0.05);
    assert_relative_eq!(arena[weight].w()[1], -0.3, epsilon = 0.05);
    assert_relative_eq!(arena[bias].w()[0], 0.2, epsilon = 0.05);
    // Intermediates were rewound every epoch.
    assert_eq!(arena.len(), 3);
    Ok(())
}

#[test]
fn test_plain_gradient_descent_through_module_update() -> Result<(), TapeError> {
    init_logger();
    let mut arena = Arena::new();
    let weight = arena.insert(Matrix::zeros(1, 2));
    let bias = arena.insert(Matrix::zeros(1, 1));
    let data = insert_matrix(
        &mut arena,
        INPUTS.len(),
        2,
        INPUTS.iter().flat_map(|x| x.iter().copied()).collect(),
    );
    let model = NamedParams(vec![("W".to_string(), weight), ("b".to_string(), bias)]);
    let mut graph = Graph::new();

    let initial = epoch(&mut graph, &mut arena, data, weight, bias)?;
    model.zero_grad(&mut arena)?;
    let mut last = initial;
    for _ in 0..300 {
        last = epoch(&mut graph, &mut arena, data, weight, bias)?;
        model.update(&mut arena, 0.5)?;
    }
    assert!(last < initial * 0.1, "loss {} did not drop from {}", last, initial);
    Ok(())
}

#[test]
fn test_unrolled_recurrence_gradients_match_finite_differences() {
    init_logger();
    let mut sampler = NormalSampler::seeded(11);
    let wh = Matrix::random(3, 3, 0.0, 0.5, &mut sampler);
    let wx = Matrix::random(3, 2, 0.0, 0.5, &mut sampler);
    let xs = Matrix::random(4, 2, 0.0, 1.0, &mut sampler);
    let h0 = Matrix::zeros(3, 1);

    // h_t = tanh(Wh h_{t-1} + Wx x_t); Wh and Wx fan in from every time step.
    let unrolled = |g: &mut Graph, a: &mut Arena, ids: &[MatrixId]| -> Result<MatrixId, TapeError> {
        let (wh, wx, xs) = (ids[0], ids[1], ids[2]);
        let mut h = ids[3];
        for t in 0..4 {
            let x = g.row_pluck(a, xs, t)?;
            let hh = g.mul(a, wh, h)?;
            let hx = g.mul(a, wx, x)?;
            let pre = g.add(a, hh, hx)?;
            h = g.tanh(a, pre)?;
        }
        Ok(h)
    };

    let result = check_grad(unrolled, &[wh, wx, xs, h0], &[1.0, -0.5, 2.0], 1e-6, 1e-5, 1e-4);
    assert!(result.is_ok(), "gradient check failed: {:?}", result);
}

#[test]
fn test_trained_parameters_survive_json_round_trip() -> Result<(), TapeError> {
    let mut sampler = NormalSampler::seeded(5);
    let mut arena = Arena::new();
    let w = arena.insert(Matrix::random(2, 3, 0.0, 0.08, &mut sampler));
    arena[w].dw_mut().fill(0.25);

    let json = arena[w].to_json()?;
    let restored = Matrix::from_json(&json)?;
    assert_eq!(restored, arena[w]);
    assert!(restored.dw().iter().all(|&g| g == 0.0));
    Ok(())
}
