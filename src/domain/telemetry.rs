// Telemetry domain models
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

pub const WAITING_FOR_DATA: &str = "WAITING_FOR_DATA";

/// Power is reported either as a number or as a preformatted string.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerReading {
    Number(f64),
    Text(String),
}

impl fmt::Display for PowerReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerReading::Number(value) => write!(f, "{}", value),
            PowerReading::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub actual_voltage: Option<f64>,
    pub actual_current: Option<f64>,
    pub power: Option<PowerReading>,
    pub polarity: Option<String>,
    pub timestamp: f64,
}

/// Raw body of `GET /api/data`.
///
/// Fields are kept as raw JSON: the sample is opaque apart from `status`
/// and `timestamp`, so an oddly typed field never rejects the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPayload {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub actual_voltage: Option<Value>,
    #[serde(default)]
    pub actual_current: Option<Value>,
    #[serde(default)]
    pub power: Option<Value>,
    #[serde(default)]
    pub polarity: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataReading {
    Waiting,
    Invalid,
    Sample(TelemetrySample),
}

impl DataPayload {
    pub fn classify(self) -> DataReading {
        if self.status.as_ref().and_then(Value::as_str) == Some(WAITING_FOR_DATA) {
            return DataReading::Waiting;
        }

        let Some(timestamp) = self.timestamp.as_ref().and_then(truthy_timestamp) else {
            return DataReading::Invalid;
        };

        DataReading::Sample(TelemetrySample {
            actual_voltage: self.actual_voltage.as_ref().and_then(lenient_number),
            actual_current: self.actual_current.as_ref().and_then(lenient_number),
            power: self.power.as_ref().and_then(power_reading),
            polarity: self.polarity.as_ref().and_then(scalar_text),
            timestamp,
        })
    }
}

// Zero, NaN, null and non-numeric values do not count as a timestamp.
fn truthy_timestamp(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|ts| *ts != 0.0 && !ts.is_nan())
}

/// Numbers, and strings holding a number, e.g. `"12.5"`.
fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn power_reading(value: &Value) -> Option<PowerReading> {
    match value {
        Value::Number(number) => number.as_f64().map(PowerReading::Number),
        other => scalar_text(other).map(PowerReading::Text),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
