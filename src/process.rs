use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ConfigurationError, Result};
use crate::units::{CapUnit, PowerUnit, TimeUnit};

pub const KEY_TECH_NM: &str = "tech_nm";
pub const KEY_METAL_PREFIX: &str = "metalPrefix";
pub const KEY_PIN_WIDTH_NM: &str = "pinWidth_nm";
pub const KEY_PIN_PITCH_NM: &str = "pinPitch_nm";
pub const KEY_VOLTAGE: &str = "voltage";
pub const KEY_SNAP_WIDTH_NM: &str = "snapWidth_nm";
pub const KEY_SNAP_HEIGHT_NM: &str = "snapHeight_nm";
pub const KEY_FLIP_PINS: &str = "flipPins";
pub const KEY_TIME_UNIT: &str = "libertyTimeUnit";
pub const KEY_CAP_UNIT: &str = "libertyCapUnit";
pub const KEY_POWER_UNIT: &str = "libertyPowerUnit";

/// Technology parameters shared by every memory generated in one run.
///
/// Constructed once from the configuration and then handed out behind an
/// [`Arc`](std::sync::Arc); there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    tech_nm: i64,
    metal_prefix: String,
    pin_width_nm: i64,
    pin_pitch_nm: i64,
    voltage: String,

    snap_width_nm: i64,
    snap_height_nm: i64,
    flip_pins: bool,

    time_unit: TimeUnit,
    cap_unit: CapUnit,
    power_unit: PowerUnit,

    tech_um: f64,
    pin_width_um: f64,
    pin_pitch_um: f64,
}

impl Process {
    pub fn from_config(map: &Map<String, Value>) -> Result<Self> {
        let tech_nm = required_int(map, KEY_TECH_NM)?;
        let metal_prefix = required_string(map, KEY_METAL_PREFIX)?;
        let pin_width_nm = required_int(map, KEY_PIN_WIDTH_NM)?;
        let pin_pitch_nm = required_int(map, KEY_PIN_PITCH_NM)?;
        let voltage = required_string(map, KEY_VOLTAGE)?;

        let snap_width_nm = optional_int(map, KEY_SNAP_WIDTH_NM)?.unwrap_or(1);
        let snap_height_nm = optional_int(map, KEY_SNAP_HEIGHT_NM)?.unwrap_or(1);
        let flip_pins = optional_bool(map, KEY_FLIP_PINS)?.unwrap_or(false);

        let time_unit = match optional_string(map, KEY_TIME_UNIT)? {
            Some(s) => s.parse()?,
            None => TimeUnit::default(),
        };
        let cap_unit = match optional_string(map, KEY_CAP_UNIT)? {
            Some(s) => s.parse()?,
            None => CapUnit::default(),
        };
        let power_unit = match optional_string(map, KEY_POWER_UNIT)? {
            Some(s) => s.parse()?,
            None => PowerUnit::default(),
        };

        Ok(Self {
            tech_nm,
            metal_prefix,
            pin_width_nm,
            pin_pitch_nm,
            voltage,
            snap_width_nm,
            snap_height_nm,
            flip_pins,
            time_unit,
            cap_unit,
            power_unit,
            tech_um: tech_nm as f64 / 1000.0,
            pin_width_um: pin_width_nm as f64 / 1000.0,
            pin_pitch_um: pin_pitch_nm as f64 / 1000.0,
        })
    }

    #[inline]
    pub fn tech_nm(&self) -> i64 {
        self.tech_nm
    }

    #[inline]
    pub fn metal_prefix(&self) -> &str {
        &self.metal_prefix
    }

    #[inline]
    pub fn pin_width_nm(&self) -> i64 {
        self.pin_width_nm
    }

    #[inline]
    pub fn pin_pitch_nm(&self) -> i64 {
        self.pin_pitch_nm
    }

    /// Nominal supply voltage, exactly as written in the configuration.
    #[inline]
    pub fn voltage(&self) -> &str {
        &self.voltage
    }

    #[inline]
    pub fn snap_width_nm(&self) -> i64 {
        self.snap_width_nm
    }

    #[inline]
    pub fn snap_height_nm(&self) -> i64 {
        self.snap_height_nm
    }

    #[inline]
    pub fn flip_pins(&self) -> bool {
        self.flip_pins
    }

    #[inline]
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    #[inline]
    pub fn cap_unit(&self) -> CapUnit {
        self.cap_unit
    }

    #[inline]
    pub fn power_unit(&self) -> PowerUnit {
        self.power_unit
    }

    #[inline]
    pub fn tech_um(&self) -> f64 {
        self.tech_um
    }

    #[inline]
    pub fn pin_width_um(&self) -> f64 {
        self.pin_width_um
    }

    #[inline]
    pub fn pin_pitch_um(&self) -> f64 {
        self.pin_pitch_um
    }
}

fn invalid(key: &'static str, value: &Value, expected: &'static str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        key,
        value: value.to_string(),
        expected,
    }
}

fn optional_int(map: &Map<String, Value>, key: &'static str) -> Result<Option<i64>> {
    let value = match map.get(key) {
        Some(v) => v,
        None => return Ok(None),
    };
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(i) => Ok(Some(i)),
        None => Err(invalid(key, value, "an integer").into()),
    }
}

fn required_int(map: &Map<String, Value>, key: &'static str) -> Result<i64> {
    optional_int(map, key)?.ok_or_else(|| ConfigurationError::MissingKey(key).into())
}

fn optional_string(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(v) => Err(invalid(key, v, "a string").into()),
    }
}

fn required_string(map: &Map<String, Value>, key: &'static str) -> Result<String> {
    optional_string(map, key)?.ok_or_else(|| ConfigurationError::MissingKey(key).into())
}

fn optional_bool(map: &Map<String, Value>, key: &'static str) -> Result<Option<bool>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(v) => Err(invalid(key, v, "a boolean").into()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_relative_eq;
    use serde_json::json;

    use super::*;
    use crate::error::Error;

    pub(crate) fn process_config() -> Map<String, Value> {
        match json!({
            "tech_nm": 45,
            "metalPrefix": "metal",
            "pinWidth_nm": 70,
            "pinPitch_nm": 140,
            "voltage": "1.1",
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_required_keys_and_defaults() {
        let process = Process::from_config(&process_config()).unwrap();
        assert_eq!(process.tech_nm(), 45);
        assert_eq!(process.metal_prefix(), "metal");
        assert_eq!(process.voltage(), "1.1");
        assert_eq!(process.snap_width_nm(), 1);
        assert_eq!(process.snap_height_nm(), 1);
        assert!(!process.flip_pins());
        assert_eq!(process.time_unit(), TimeUnit::Ns);
        assert_eq!(process.cap_unit(), CapUnit::Pf);
        assert_eq!(process.power_unit(), PowerUnit::Uw);
        assert_relative_eq!(process.tech_um(), 0.045);
        assert_relative_eq!(process.pin_width_um(), 0.07);
        assert_relative_eq!(process.pin_pitch_um(), 0.14);
    }

    #[test]
    fn test_optional_keys() {
        let mut cfg = process_config();
        cfg.insert(KEY_SNAP_WIDTH_NM.into(), json!(190));
        cfg.insert(KEY_SNAP_HEIGHT_NM.into(), json!("1400"));
        cfg.insert(KEY_FLIP_PINS.into(), json!("true"));
        cfg.insert(KEY_TIME_UNIT.into(), json!("ps"));
        cfg.insert(KEY_CAP_UNIT.into(), json!("ff"));
        cfg.insert(KEY_POWER_UNIT.into(), json!("nw"));
        let process = Process::from_config(&cfg).unwrap();
        assert_eq!(process.snap_width_nm(), 190);
        assert_eq!(process.snap_height_nm(), 1400);
        assert!(process.flip_pins());
        assert_eq!(process.time_unit(), TimeUnit::Ps);
        assert_eq!(process.cap_unit(), CapUnit::Ff);
        assert_eq!(process.power_unit(), PowerUnit::Nw);
    }

    #[test]
    fn test_numeric_voltage_is_kept_textually() {
        let mut cfg = process_config();
        cfg.insert(KEY_VOLTAGE.into(), json!(0.9));
        let process = Process::from_config(&cfg).unwrap();
        assert_eq!(process.voltage(), "0.9");
    }

    #[test]
    fn test_missing_required_key() {
        for key in [
            KEY_TECH_NM,
            KEY_METAL_PREFIX,
            KEY_PIN_WIDTH_NM,
            KEY_PIN_PITCH_NM,
            KEY_VOLTAGE,
        ] {
            let mut cfg = process_config();
            cfg.remove(key);
            match Process::from_config(&cfg) {
                Err(Error::Configuration(ConfigurationError::MissingKey(k))) => assert_eq!(k, key),
                other => panic!("expected missing key {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_uncoercible_value() {
        let mut cfg = process_config();
        cfg.insert(KEY_TECH_NM.into(), json!("forty-five"));
        assert!(matches!(
            Process::from_config(&cfg),
            Err(Error::Configuration(ConfigurationError::InvalidValue {
                key: KEY_TECH_NM,
                ..
            }))
        ));

        let mut cfg = process_config();
        cfg.insert(KEY_PIN_PITCH_NM.into(), json!(140.5));
        assert!(matches!(
            Process::from_config(&cfg),
            Err(Error::Configuration(ConfigurationError::InvalidValue { .. }))
        ));

        let mut cfg = process_config();
        cfg.insert(KEY_METAL_PREFIX.into(), json!(["metal"]));
        assert!(matches!(
            Process::from_config(&cfg),
            Err(Error::Configuration(ConfigurationError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_unknown_unit_is_not_defaulted() {
        for (key, unit) in [
            (KEY_TIME_UNIT, "us"),
            (KEY_CAP_UNIT, "nf"),
            (KEY_POWER_UNIT, "mw"),
        ] {
            let mut cfg = process_config();
            cfg.insert(key.into(), json!(unit));
            match Process::from_config(&cfg) {
                Err(Error::UnsupportedUnit(e)) => assert_eq!(e.unit, unit),
                other => panic!("expected unsupported unit for {key}, got {other:?}"),
            }
        }
    }
}
