//! Governing equations.

mod saint_venant;

pub use saint_venant::{AREA_EPS, SaintVenant1D};
