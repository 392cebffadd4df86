use super::{Matrix, MatrixRecord};
use crate::error::TapeError;
use crate::rng::NormalSampler;
use approx::assert_relative_eq;

fn create_test_matrix() -> Matrix {
    Matrix::from_vec(2, 4, vec![1.0, 4.0, 6.0, 10.0, 2.0, 7.0, 5.0, 3.0]).unwrap()
}

#[test]
fn test_zeros_has_matching_buffers() {
    let m = Matrix::zeros(3, 2);
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.len(), 6);
    assert_eq!(m.w().len(), m.dw().len());
    assert!(m.w().iter().chain(m.dw()).all(|&x| x == 0.0));
}

#[test]
fn test_from_vec_rejects_wrong_length() {
    let err = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(
        err,
        TapeError::MatrixCreationError {
            data_len: 3,
            shape: (2, 2)
        }
    );
}

#[test]
fn test_get_and_set_row_major() {
    let mut m = create_test_matrix();
    assert_eq!(m.get(0, 3).unwrap(), 10.0);
    assert_eq!(m.get(1, 0).unwrap(), 2.0);

    m.set(1, 2, -1.5).unwrap();
    assert_eq!(m.w()[6], -1.5);
    assert_eq!(m.dw()[6], 0.0);
}

#[test]
fn test_get_set_out_of_bounds() {
    let mut m = create_test_matrix();
    assert!(matches!(m.get(2, 0), Err(TapeError::IndexOutOfBounds { .. })));
    assert!(matches!(m.set(0, 4, 1.0), Err(TapeError::IndexOutOfBounds { .. })));
    // (1, 4) would wrap into row 2; rejected as well.
    match m.get(1, 4) {
        Err(TapeError::IndexOutOfBounds { index, shape }) => {
            assert_eq!(index, (1, 4));
            assert_eq!(shape, (2, 4));
        }
        other => panic!("Expected IndexOutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_get_set_huge_indices() {
    let mut m = Matrix::zeros(2, 4);
    assert_eq!(
        m.get(usize::MAX, 0),
        Err(TapeError::IndexOutOfBounds {
            index: (usize::MAX, 0),
            shape: (2, 4)
        })
    );
    assert!(matches!(m.set(1, usize::MAX, 1.0), Err(TapeError::IndexOutOfBounds { .. })));
    assert!(matches!(m.get(usize::MAX / 2, usize::MAX), Err(TapeError::IndexOutOfBounds { .. })));
}

#[test]
fn test_set_from_overwrites_prefix_and_keeps_grads() {
    let mut m = create_test_matrix();
    m.dw_mut()[0] = 3.0;
    m.set_from(&[9.0, 8.0]).unwrap();
    assert_eq!(&m.w()[..3], &[9.0, 8.0, 6.0]);
    assert_eq!(m.dw()[0], 3.0);

    let too_long = vec![0.0; 9];
    assert!(m.set_from(&too_long).is_err());
    assert_eq!(m.w()[0], 9.0, "failed set_from must not write anything");
}

#[test]
fn test_set_column() {
    let mut m = Matrix::zeros(3, 2);
    let column = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
    m.set_column(&column, 1).unwrap();
    assert_eq!(m.w(), &[0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
}

#[test]
fn test_set_column_errors() {
    let mut m = Matrix::zeros(3, 2);
    let short = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
    assert!(matches!(m.set_column(&short, 0), Err(TapeError::ShapeMismatch { .. })));

    let column = Matrix::zeros(3, 1);
    assert!(matches!(m.set_column(&column, 2), Err(TapeError::IndexOutOfBounds { .. })));
}

#[test]
fn test_equals_ignores_gradients() {
    let a = create_test_matrix();
    let mut b = create_test_matrix();
    b.dw_mut()[3] = 1.0;
    assert!(a.equals(&b));
    assert_eq!(a, b);

    let c = Matrix::from_vec(4, 2, a.w().to_vec()).unwrap();
    assert!(!a.equals(&c), "same values but different shape");

    b.set(0, 0, 0.5).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_update_skips_untouched_entries() {
    let mut m = Matrix::from_vec(1, 3, vec![1.0, 1.0, 1.0]).unwrap();
    m.dw_mut().copy_from_slice(&[0.5, 0.0, -2.0]);
    m.update(0.1);
    assert_relative_eq!(m.w()[0], 0.95);
    assert_eq!(m.w()[1], 1.0);
    assert_relative_eq!(m.w()[2], 1.2);
    assert!(m.dw().iter().all(|&g| g == 0.0));
}

#[test]
fn test_record_round_trip_zeroes_grads() {
    let mut m = create_test_matrix();
    m.dw_mut()[1] = 4.0;
    let record = m.to_record();
    assert_eq!(record.rows, 2);
    assert_eq!(record.cols, 4);

    let restored = Matrix::from_record(record).unwrap();
    assert_eq!(restored, m);
    assert!(restored.dw().iter().all(|&g| g == 0.0));
}

#[test]
fn test_from_record_rejects_bad_length() {
    let record = MatrixRecord {
        rows: 2,
        cols: 2,
        w: vec![1.0],
    };
    assert!(matches!(
        Matrix::try_from(record),
        Err(TapeError::MatrixCreationError { .. })
    ));
}

#[test]
fn test_json_format() {
    let m = Matrix::from_vec(1, 2, vec![0.5, -1.0]).unwrap();
    let json = m.to_json().unwrap();
    assert_eq!(json, r#"{"rows":1,"cols":2,"w":[0.5,-1.0]}"#);
    assert_eq!(Matrix::from_json(&json).unwrap(), m);
}

#[test]
fn test_json_accepts_legacy_keys() {
    let m = Matrix::from_json(r#"{"n":2,"d":1,"w":[3.0,4.0]}"#).unwrap();
    assert_eq!(m.shape(), (2, 1));
    assert_eq!(m.w(), &[3.0, 4.0]);
}

#[test]
fn test_json_malformed() {
    assert!(matches!(
        Matrix::from_json("{\"rows\":1}"),
        Err(TapeError::SerializationError(_))
    ));
}

#[test]
fn test_random_is_reproducible() {
    let a = Matrix::random(3, 3, 0.0, 0.1, &mut NormalSampler::seeded(5));
    let b = Matrix::random(3, 3, 0.0, 0.1, &mut NormalSampler::seeded(5));
    assert_eq!(a, b);
    assert!(a.w().iter().any(|&x| x != 0.0));
    assert!(a.dw().iter().all(|&g| g == 0.0));
}
