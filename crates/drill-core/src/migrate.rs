//! Line payload migration chain.
//!
//! Payload versions are upgraded by a linear chain of pure `Value -> Value`
//! steps keyed by the source version, applied until the current version is
//! reached:
//!
//! ```text
//! v1 (no `v` field) --V1ToV2--> v2 (current)
//! ```
//!
//! A payload without a `v` field is v1.

use serde_json::{Map, Value, json};

use crate::enums::QualityMark;
use crate::errors::CoreError;
use crate::payload::CURRENT_VERSION;

/// One upgrade step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// `game_comments` becomes `root_comments`, `responses` becomes
    /// `answers`, each move's `move` becomes `uci`, and integer `nag`s become
    /// symbolic `mark`s (`0` and non-quality NAGs become `null`).
    V1ToV2,
}

impl Migration {
    /// The step that upgrades payloads of `version`, if any.
    #[must_use]
    pub const fn from_version(version: u32) -> Option<Self> {
        match version {
            1 => Some(Self::V1ToV2),
            _ => None,
        }
    }

    /// Version produced by this step.
    #[must_use]
    pub const fn target(self) -> u32 {
        match self {
            Self::V1ToV2 => 2,
        }
    }

    /// Apply the step.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the input does not have the shape of
    /// the source version.
    pub fn apply(self, value: Value) -> Result<Value, CoreError> {
        match self {
            Self::V1ToV2 => v1_to_v2(value),
        }
    }
}

/// Version of a raw payload. Missing `v` means v1.
#[must_use]
pub fn version_of(value: &Value) -> u32 {
    value
        .get("v")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
}

/// Upgrade a raw payload to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns `CoreError::UnsupportedVersion` for versions newer than the
/// current one or without a migration step, and `CoreError::Validation` if a
/// step rejects its input.
pub fn upgrade(mut value: Value) -> Result<Value, CoreError> {
    loop {
        let version = version_of(&value);
        if version == CURRENT_VERSION {
            return Ok(value);
        }
        if version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }
        let step = Migration::from_version(version).ok_or(CoreError::UnsupportedVersion(version))?;
        value = step.apply(value)?;
        debug_assert_eq!(version_of(&value), step.target());
    }
}

fn v1_to_v2(value: Value) -> Result<Value, CoreError> {
    let Value::Object(mut obj) = value else {
        return Err(CoreError::Validation("v1 payload is not an object".into()));
    };

    let fen = take_string(&mut obj, "fen")?;
    let root_comments = obj.remove("game_comments").unwrap_or_else(|| json!([]));
    let moves = v1_moves(obj.remove("moves"), "moves")?;
    let answers = v1_moves(obj.remove("responses"), "responses")?;

    Ok(json!({
        "v": 2,
        "fen": fen,
        "root_comments": root_comments,
        "moves": moves,
        "answers": answers,
    }))
}

fn v1_moves(value: Option<Value>, field: &str) -> Result<Vec<Value>, CoreError> {
    let Some(Value::Array(items)) = value else {
        return Err(CoreError::Validation(format!("v1 payload: '{field}' is not an array")));
    };

    items
        .into_iter()
        .map(|item| {
            let Value::Object(mut m) = item else {
                return Err(CoreError::Validation(format!(
                    "v1 payload: '{field}' entry is not an object"
                )));
            };
            let uci = take_string(&mut m, "move")?;
            let comments = m.remove("comments").unwrap_or_else(|| json!([]));
            let mark = m
                .get("nag")
                .and_then(Value::as_u64)
                .and_then(|n| u8::try_from(n).ok())
                .and_then(QualityMark::from_nag)
                .map(QualityMark::as_str);
            Ok(json!({
                "uci": uci,
                "san": null,
                "comments": comments,
                "mark": mark,
            }))
        })
        .collect()
}

fn take_string(obj: &mut Map<String, Value>, key: &str) -> Result<String, CoreError> {
    match obj.remove(key) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(CoreError::Validation(format!("v1 payload: missing string '{key}'"))),
    }
}
