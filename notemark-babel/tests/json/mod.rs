//! Block JSON boundary tests

mod boundary;
