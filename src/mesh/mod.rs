//! Spatial discretization of the channel axis.

mod grid1d;

pub use grid1d::{ChannelEnd, Grid1D};
