//! # Training a feed-forward network on XOR
//!
//! A 2-8-1 network (`tanh` hidden layer, `sig` output) learns XOR with the
//! [`RmsPropSolver`]. Each epoch:
//!
//! 1. records the forward pass of every sample on the [`Graph`],
//! 2. writes the squared-error gradient into the output's `dw`,
//! 3. replays the tape and forgets it,
//! 4. rewinds the arena to drop the per-sample intermediates,
//!
//! and then lets the solver consume the accumulated gradients.
//!
//! Run with `RUST_LOG=debug cargo run --example xor_feedforward` to see the solver's
//! per-step log lines.

use gradtape_core::{Arena, Graph, Matrix, MatrixId, Module, NormalSampler, RmsPropSolver, TapeError};

const SAMPLES: [([f64; 2], f64); 4] = [([0.0, 0.0], 0.0), ([0.0, 1.0], 1.0), ([1.0, 0.0], 1.0), ([1.0, 1.0], 0.0)];

struct FeedForward {
    wh: MatrixId,
    bh: MatrixId,
    wo: MatrixId,
    bo: MatrixId,
}

impl FeedForward {
    fn new(arena: &mut Arena, sampler: &mut NormalSampler, hidden: usize) -> Self {
        FeedForward {
            wh: arena.insert(Matrix::random(hidden, 2, 0.0, 0.5, sampler)),
            bh: arena.insert(Matrix::zeros(hidden, 1)),
            wo: arena.insert(Matrix::random(1, hidden, 0.0, 0.5, sampler)),
            bo: arena.insert(Matrix::zeros(1, 1)),
        }
    }

    fn forward(&self, graph: &mut Graph, arena: &mut Arena, x: MatrixId) -> Result<MatrixId, TapeError> {
        let h = graph.mul(arena, self.wh, x)?;
        let h = graph.add(arena, h, self.bh)?;
        let h = graph.tanh(arena, h)?;
        let o = graph.mul(arena, self.wo, h)?;
        let o = graph.add(arena, o, self.bo)?;
        graph.sig(arena, o)
    }
}

impl Module for FeedForward {
    fn named_parameters(&self) -> Vec<(String, MatrixId)> {
        vec![
            ("hidden.Wh".to_string(), self.wh),
            ("hidden.bh".to_string(), self.bh),
            ("output.Wo".to_string(), self.wo),
            ("output.bo".to_string(), self.bo),
        ]
    }
}

fn main() -> Result<(), TapeError> {
    let _ = env_logger::builder().try_init();

    let mut sampler = NormalSampler::seeded(42);
    let mut arena = Arena::new();
    let net = FeedForward::new(&mut arena, &mut sampler, 8);
    let inputs: Vec<MatrixId> = SAMPLES
        .iter()
        .map(|(x, _)| Matrix::from_vec(2, 1, x.to_vec()).map(|m| arena.insert(m)))
        .collect::<Result<_, _>>()?;
    let mark = arena.checkpoint();

    let mut graph = Graph::new();
    let mut solver = RmsPropSolver::new();

    for epoch in 0..=2000 {
        let mut loss = 0.0;
        for (&x, (_, y)) in inputs.iter().zip(SAMPLES.iter()) {
            graph.memorize_operation_sequence(true);
            let out = net.forward(&mut graph, &mut arena, x)?;
            let err = arena.get(out)?.w()[0] - y;
            loss += 0.5 * err * err;
            arena.get_mut(out)?.dw_mut()[0] = err;
            graph.backward(&mut arena)?;
            graph.forget_current_sequence();
            arena.rewind(mark);
        }
        let stats = solver.step(&net, &mut arena, 0.01, 1e-6, 5.0)?;
        if epoch % 200 == 0 {
            println!(
                "epoch {:4}  loss {:.6}  clipped {:.2}%",
                epoch,
                loss,
                stats.ratio_clipped * 100.0
            );
        }
    }

    graph.memorize_operation_sequence(false);
    for (&x, ([a, b], y)) in inputs.iter().zip(SAMPLES.iter()) {
        let out = net.forward(&mut graph, &mut arena, x)?;
        println!("{} xor {} = {:.3} (expected {})", a, b, arena.get(out)?.w()[0], y);
        arena.rewind(mark);
    }

    println!("output layer: {}", arena.get(net.wo)?.to_json()?);
    Ok(())
}
