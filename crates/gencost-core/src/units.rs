//! Compile-time unit safety for power quantities.
//!
//! Grid element tables and cost declarations are stated in kW/kvar while the
//! OPF solver works in MW/Mvar. Mixing the two is the classic source of
//! thousand-fold cost errors, so bounds crossing that boundary are carried in
//! newtypes and converted explicitly.
//!
//! All types use `#[repr(transparent)]` and have the same layout as `f64`.
//!
//! ```
//! use gencost_core::units::{Kilowatts, Megawatts};
//!
//! let p = Kilowatts(2500.0);
//! assert_eq!(p.to_megawatts(), Megawatts(2.5));
//! assert_eq!(Megawatts(2.5).to_kilowatts(), p);
//! ```

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

const KILO: f64 = 1e3;

/// Negation, display and raw access for a unit newtype
macro_rules! impl_power_unit {
    ($type:ty, $symbol:literal) => {
        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.4} {}", self.0, $symbol)
            }
        }

        impl $type {
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// False for the infinite bounds of unconstrained elements
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

/// Active power in kilowatts (kW), the unit of grid element tables
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_power_unit!(Kilowatts, "kW");

/// Active power in megawatts (MW), the unit of the solver's generator array
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_power_unit!(Megawatts, "MW");

/// Reactive power in kilovolt-amperes reactive (kvar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovars(pub f64);

impl_power_unit!(Kilovars, "kvar");

/// Reactive power in megavolt-amperes reactive (Mvar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megavars(pub f64);

impl_power_unit!(Megavars, "Mvar");

impl Kilowatts {
    #[inline]
    pub fn to_megawatts(self) -> Megawatts {
        Megawatts(self.0 / KILO)
    }
}

impl Megawatts {
    #[inline]
    pub fn to_kilowatts(self) -> Kilowatts {
        Kilowatts(self.0 * KILO)
    }
}

impl Kilovars {
    #[inline]
    pub fn to_megavars(self) -> Megavars {
        Megavars(self.0 / KILO)
    }
}

impl Megavars {
    #[inline]
    pub fn to_kilovars(self) -> Kilovars {
        Kilovars(self.0 * KILO)
    }
}

/// Power unit in which cost declarations are stated.
///
/// Coefficients are "currency per unit" (`c1`) and "currency per unit²"
/// (`c2`); segment bounds are in the same unit. The solver always works per
/// MW, so compilation scales by [`PowerUnit::per_megawatt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUnit {
    /// kW / kvar (currency per kW, currency per kW²)
    #[default]
    #[serde(alias = "kilowatt")]
    Kw,
    /// MW / Mvar (currency per MW, currency per MW²)
    #[serde(alias = "megawatt")]
    Mw,
}

impl PowerUnit {
    /// How many of this unit make up one MW
    #[inline]
    pub fn per_megawatt(self) -> f64 {
        match self {
            PowerUnit::Kw => KILO,
            PowerUnit::Mw => 1.0,
        }
    }
}

impl fmt::Display for PowerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerUnit::Kw => write!(f, "kW"),
            PowerUnit::Mw => write!(f, "MW"),
        }
    }
}
