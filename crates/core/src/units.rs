//! Distance unit conversion table.
//!
//! All internal computation (haversine, edge weights, spanning-tree
//! distances) is carried in kilometres; [`Unit`] converts a final result to
//! whatever the caller asked for. The factors are fixed, not configurable —
//! callers needing other units convert downstream.

/// A unit a distance can be expressed in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Unit {
    #[default]
    Km,
    M,
    Mi,
    Ft,
}

impl Unit {
    /// Multiplier applied to a kilometre quantity to express it in `self`.
    #[inline]
    pub fn from_km_factor(self) -> f64 {
        match self {
            Unit::Km => 1.0,
            Unit::M => 1000.0,
            Unit::Mi => 0.621_371,
            Unit::Ft => 3280.84,
        }
    }

    /// Convert a quantity already expressed in kilometres into `self`.
    #[inline]
    pub fn convert_from_km(self, km: f64) -> f64 {
        km * self.from_km_factor()
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "km" => Ok(Unit::Km),
            "m" => Ok(Unit::M),
            "mi" => Ok(Unit::Mi),
            "ft" => Ok(Unit::Ft),
            other => Err(format!("unknown unit '{other}' (expected km, m, mi, ft)")),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Unit::Km => "km",
            Unit::M => "m",
            Unit::Mi => "mi",
            Unit::Ft => "ft",
        };
        f.write_str(s)
    }
}
