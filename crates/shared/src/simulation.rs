//! `GET /response` on the simulation service.
//!
//! Until the simulation has reported anything the service answers with an
//! empty `response` (an empty string in the reference deployment). That is
//! a "not ready yet" signal, not an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Path of the simulation status endpoint.
pub const SIMULATION_STATUS_PATH: &str = "/response";

/// The latest report the simulation pushed to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Result string in the simulation's delimited format
    pub message: String,
    /// Comma-space separated prefab names
    pub available_prefabs: String,
    /// Comma-space separated scene object names
    pub current_objects: String,
}

/// Read a status body.
///
/// Returns `Ok(None)` when the simulation has not reported yet (`response`
/// absent, null, an empty string or an empty object).
pub fn parse_simulation_status(body: Value) -> Result<Option<SimulationReport>, ProtocolError> {
    let Value::Object(mut body) = body else {
        return Err(ProtocolError::malformed("status body is not an object"));
    };

    match body.remove("response") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::Object(o)) if o.is_empty() => Ok(None),
        Some(report @ Value::Object(_)) => Ok(Some(serde_json::from_value(report)?)),
        Some(other) => Err(ProtocolError::malformed(format!(
            "unexpected response value: {}",
            other
        ))),
    }
}
