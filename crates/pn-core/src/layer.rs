//! Contact layers and the per-person sex attribute.

/// A named contact context.  Each person carries an independent contact set
/// per layer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    Household,
    School,
    Workplace,
    /// Filled by downstream simulators; always empty after assembly.
    Community,
    /// Long-term-care facilities.  Only present when facilities are enabled.
    Ltcf,
}

impl Layer {
    /// Every layer, in storage order.
    pub const ALL: [Layer; 5] = [
        Layer::Household,
        Layer::School,
        Layer::Workplace,
        Layer::Community,
        Layer::Ltcf,
    ];

    /// Position of this layer in [`Layer::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short key used by downstream simulators (`H`, `S`, `W`, `C`, `LTCF`).
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Household => "H",
            Layer::School    => "S",
            Layer::Workplace => "W",
            Layer::Community => "C",
            Layer::Ltcf      => "LTCF",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male   => "male",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
