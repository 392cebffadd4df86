use gradtape_core::{Arena, Matrix, MatrixId, Module};

/// Installs a test logger once per test binary; later calls are no-ops.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn insert_matrix(arena: &mut Arena, rows: usize, cols: usize, w: Vec<f64>) -> MatrixId {
    arena.insert(Matrix::from_vec(rows, cols, w).expect("Test matrix creation failed"))
}

/// A model whose parameters are listed explicitly.
#[allow(dead_code)]
pub struct NamedParams(pub Vec<(String, MatrixId)>);

impl Module for NamedParams {
    fn named_parameters(&self) -> Vec<(String, MatrixId)> {
        self.0.clone()
    }
}
