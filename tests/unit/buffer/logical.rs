use super::*;
use crate::buffer::capacity::MAX_ELEMENTS;

#[test]
fn alloc_zero_fills_and_hides_padding() {
    let buf = alloc(7).unwrap();
    assert_eq!(buf.len(), 7);
    assert!(!buf.is_empty());
    assert_eq!(buf.capacity(), 16);
    assert_eq!(buf.side(), 4);
    assert_eq!(buf.as_slice(), &[0.0; 7]);
    assert_eq!(buf.storage().len(), 16);
}

#[test]
fn alloc_boundaries() {
    assert!(alloc(MAX_ELEMENTS).is_ok());
    assert!(matches!(
        alloc(MAX_ELEMENTS + 1),
        Err(ComputeError::CapacityExceeded { .. })
    ));
    assert!(matches!(
        alloc(0),
        Err(ComputeError::CapacityExceeded { requested: 0, .. })
    ));
}

#[test]
fn fill_from_writes_a_prefix() {
    let mut buf = alloc(5).unwrap();
    buf.fill_from(&[1.0, 2.0]).unwrap();
    assert_eq!(buf.as_slice(), &[1.0, 2.0, 0.0, 0.0, 0.0]);
    buf.as_mut_slice()[4] = 9.0;
    assert_eq!(buf.to_vec(), vec![1.0, 2.0, 0.0, 0.0, 9.0]);
}

#[test]
fn fill_from_rejects_overlong_input() {
    let mut buf = alloc(2).unwrap();
    let err = buf.fill_from(&[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(
        err,
        ComputeError::FillOverflow {
            given: 3,
            length: 2
        }
    ));
    assert_eq!(
        err.to_string(),
        "capacity error: 3 values do not fit a buffer of length 2"
    );
    assert_eq!(buf.as_slice(), &[0.0, 0.0]);
}

#[test]
fn commit_storage_requires_full_capacity() {
    let mut buf = alloc(3).unwrap();
    assert!(buf.commit_storage(&[1.0; 3]).is_err());
    assert_eq!(buf.as_slice(), &[0.0; 3]);
    buf.commit_storage(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0]);
}
