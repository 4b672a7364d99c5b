//! Liberty unit systems.
//!
//! Every quantity is carried internally in a canonical unit (ns, pF, mW) and
//! converted to the unit selected by the [`Process`](crate::process::Process)
//! only when a view is written. The three quantity classes are independent.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedUnitError;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Ns,
    Ps,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapUnit {
    #[default]
    Pf,
    Ff,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUnit {
    #[default]
    Uw,
    Nw,
}

impl TimeUnit {
    #[inline]
    pub fn from_ns(self, ns: f64) -> f64 {
        match self {
            TimeUnit::Ns => ns,
            TimeUnit::Ps => ns * 1e3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
        }
    }
}

impl CapUnit {
    #[inline]
    pub fn from_pf(self, pf: f64) -> f64 {
        match self {
            CapUnit::Pf => pf,
            CapUnit::Ff => pf * 1e3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapUnit::Pf => "pf",
            CapUnit::Ff => "ff",
        }
    }
}

impl PowerUnit {
    /// Liberty has no milliwatt option, so both choices scale up.
    #[inline]
    pub fn from_mw(self, mw: f64) -> f64 {
        match self {
            PowerUnit::Uw => mw * 1e3,
            PowerUnit::Nw => mw * 1e6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUnit::Uw => "uw",
            PowerUnit::Nw => "nw",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = UnsupportedUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ns" => Ok(TimeUnit::Ns),
            "ps" => Ok(TimeUnit::Ps),
            _ => Err(UnsupportedUnitError {
                quantity: "time",
                unit: s.to_string(),
                expected: "ns, ps",
            }),
        }
    }
}

impl FromStr for CapUnit {
    type Err = UnsupportedUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pf" => Ok(CapUnit::Pf),
            "ff" => Ok(CapUnit::Ff),
            _ => Err(UnsupportedUnitError {
                quantity: "capacitance",
                unit: s.to_string(),
                expected: "pf, ff",
            }),
        }
    }
}

impl FromStr for PowerUnit {
    type Err = UnsupportedUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uw" => Ok(PowerUnit::Uw),
            "nw" => Ok(PowerUnit::Nw),
            _ => Err(UnsupportedUnitError {
                quantity: "power",
                unit: s.to_string(),
                expected: "uw, nw",
            }),
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for CapUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for PowerUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use paste::paste;

    use super::*;

    macro_rules! unit_scale_test {
        ($ty:ident, $from:ident, $unit:ident, $factor:expr) => {
            paste! {
                #[test]
                fn [<test_ $ty:snake _ $unit:snake _scale>]() {
                    for x in [0.0, 0.002, 0.3, 0.5, 0.8, 2.0, 40.0] {
                        assert_relative_eq!($ty::$unit.$from(x), x * $factor);
                    }
                }
            }
        };
    }

    unit_scale_test!(TimeUnit, from_ns, Ns, 1.0);
    unit_scale_test!(TimeUnit, from_ns, Ps, 1000.0);
    unit_scale_test!(CapUnit, from_pf, Pf, 1.0);
    unit_scale_test!(CapUnit, from_pf, Ff, 1000.0);
    unit_scale_test!(PowerUnit, from_mw, Uw, 1000.0);
    unit_scale_test!(PowerUnit, from_mw, Nw, 1_000_000.0);

    #[test]
    fn test_parse_round_trips_display() {
        for unit in [TimeUnit::Ns, TimeUnit::Ps] {
            assert_eq!(unit.to_string().parse::<TimeUnit>().unwrap(), unit);
        }
        for unit in [CapUnit::Pf, CapUnit::Ff] {
            assert_eq!(unit.to_string().parse::<CapUnit>().unwrap(), unit);
        }
        for unit in [PowerUnit::Uw, PowerUnit::Nw] {
            assert_eq!(unit.to_string().parse::<PowerUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_unknown_units_rejected() {
        for s in ["us", "NS", "s", "", " ns"] {
            let err = s.parse::<TimeUnit>().unwrap_err();
            assert_eq!(err.quantity, "time");
            assert_eq!(err.unit, s);
        }
        for s in ["nf", "PF", "f"] {
            assert_eq!(s.parse::<CapUnit>().unwrap_err().quantity, "capacitance");
        }
        for s in ["mw", "w", "UW", "pw"] {
            assert_eq!(s.parse::<PowerUnit>().unwrap_err().quantity, "power");
        }
    }

    #[test]
    fn test_quantities_do_not_share_parsers() {
        assert!("pf".parse::<TimeUnit>().is_err());
        assert!("ns".parse::<PowerUnit>().is_err());
        assert!("uw".parse::<CapUnit>().is_err());
    }
}
