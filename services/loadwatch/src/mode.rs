//! Charge mode values understood by the controller

use serde::{Deserialize, Serialize};

use crate::error::LoadwatchError;

/// Operating mode of the charge controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeMode {
    /// Charging disabled
    Off,
    /// Charge at full power immediately
    Now,
    /// Guaranteed minimum charge, topped up from PV surplus
    MinPv,
    /// Charge from PV surplus only
    Pv,
}

impl std::fmt::Display for ChargeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeMode::Off => write!(f, "off"),
            ChargeMode::Now => write!(f, "now"),
            ChargeMode::MinPv => write!(f, "minpv"),
            ChargeMode::Pv => write!(f, "pv"),
        }
    }
}

impl std::str::FromStr for ChargeMode {
    type Err = LoadwatchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "off" => Ok(ChargeMode::Off),
            "now" => Ok(ChargeMode::Now),
            "minpv" => Ok(ChargeMode::MinPv),
            "pv" => Ok(ChargeMode::Pv),
            _ => Err(LoadwatchError::UnknownMode(s.to_string())),
        }
    }
}
