//! Tests for `NonResumableBlock`.

use super::NonResumableBlock;

#[test]
fn block_length_and_display_line() {
  let b = NonResumableBlock::new(3..6, false);
  assert_eq!(b.len(), 3);
  assert!(!b.is_empty());
  assert_eq!(b.first_display_line(), 4);
}

#[test]
fn trailing_flag_is_preserved() {
  let b = NonResumableBlock::new(10..11, true);
  assert!(b.is_trailing);
  assert_eq!(b.len(), 1);
}
