//! Momentum source terms.
//!
//! Source terms enter the momentum update of the Lax scheme:
//!
//! Q_new = ... + dt * S
//!
//! with S = g A (S0 - Sf) for a prismatic channel:
//! - [`BedSlope`]: gravity along the bed, g A S0
//! - [`ManningFriction`]: bed resistance, -g A Sf

mod bed_slope;
mod friction;

pub use bed_slope::BedSlope;
pub use friction::ManningFriction;

/// Local flow quantities a source term may depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SourceContext {
    /// Flow area A
    pub area: f64,
    /// Discharge Q
    pub discharge: f64,
    /// Hydraulic radius R
    pub hydraulic_radius: f64,
    /// Node position x
    pub position: f64,
    /// Current time t
    pub time: f64,
}

/// A contribution to the right-hand side of the momentum equation.
pub trait SourceTerm: Send + Sync {
    /// Momentum source per unit length at one node (m³/s²).
    fn evaluate(&self, ctx: &SourceContext) -> f64;

    /// Name of this source term for logging.
    fn name(&self) -> &'static str;
}

/// Owned collection of source terms, summed at each node.
#[derive(Default)]
pub struct SourceSet {
    sources: Vec<Box<dyn SourceTerm>>,
}

impl SourceSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bed slope and Manning friction of a channel.
    pub fn for_channel(g: f64, bed_slope: f64, manning_n: f64) -> Self {
        let mut set = Self::new();
        if bed_slope != 0.0 {
            set.push(Box::new(BedSlope::new(g, bed_slope)));
        }
        if manning_n > 0.0 {
            set.push(Box::new(ManningFriction::new(g, manning_n)));
        }
        set
    }

    /// Add a source term.
    pub fn push(&mut self, source: Box<dyn SourceTerm>) {
        self.sources.push(source);
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no term is present (the momentum source is identically zero).
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the contained terms, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl SourceTerm for SourceSet {
    fn evaluate(&self, ctx: &SourceContext) -> f64 {
        self.sources.iter().map(|s| s.evaluate(ctx)).sum()
    }

    fn name(&self) -> &'static str {
        "combined"
    }
}

impl std::fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
