use serde_json::Value;
use thiserror::Error;

use crate::messages::{ActionCommand, Control, ControlState, MeetAction, StatusUpdate};

/// Schema violation in a decoded message. Carries the offending field so
/// callers can log something actionable. Validation never panics and never
/// raises past its `Result`; callers branch explicitly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be a string")]
    NotAString { field: &'static str },
    #[error("field `{field}` has unsupported value `{value}`")]
    UnsupportedValue { field: &'static str, value: String },
}

fn string_field<'a>(
    obj: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match obj.get(field) {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::NotAString { field }),
    }
}

/// Checks a decoded object against the Command schema.
pub fn validate_command(value: &Value) -> Result<ActionCommand, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;
    let name = string_field(obj, "action")?;
    let action = MeetAction::parse(name).ok_or_else(|| ValidationError::UnsupportedValue {
        field: "action",
        value: name.to_string(),
    })?;
    Ok(ActionCommand { action })
}

/// Checks a decoded object against the StatusUpdate schema.
pub fn validate_status(value: &Value) -> Result<StatusUpdate, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let status = string_field(obj, "status")?;
    if status != "update" {
        return Err(ValidationError::UnsupportedValue {
            field: "status",
            value: status.to_string(),
        });
    }

    let name = string_field(obj, "control")?;
    let control = Control::parse(name).ok_or_else(|| ValidationError::UnsupportedValue {
        field: "control",
        value: name.to_string(),
    })?;

    let state = match string_field(obj, "state")? {
        "on" => ControlState::On,
        "off" => ControlState::Off,
        other => {
            return Err(ValidationError::UnsupportedValue {
                field: "state",
                value: other.to_string(),
            })
        }
    };

    Ok(StatusUpdate::new(control, state))
}
