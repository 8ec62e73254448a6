//! # Built-in Transforms
//!
//! The transform library a configuration file can name in `[[kaster]]`
//! tables. Each transform reads its inputs by position and writes its
//! results to the declared outputs in order.
//!
//! | method                  | inputs      | outputs                  |
//! |-------------------------|-------------|--------------------------|
//! | `pose_to_position`      | pose        | x, y, z                  |
//! | `pose_to_posz`          | pose        | z                        |
//! | `pose_and_rpy_to_posxy` | pose, rpy   | x, y, roll               |
//! | `number`                | any         | the value as a float     |
//! | `list_components`       | list        | one output per component |
//! | `ned_to_xyz`            | NED list    | `[north, east, -down]`   |

use kast_core::{Frame, Params, TransformError, TransformRegistry, Value};

/// Registry holding every built-in transform.
#[must_use]
pub fn builtin_registry() -> TransformRegistry {
    TransformRegistry::new()
        .with("pose_to_position", pose_to_position)
        .with("pose_to_posz", pose_to_posz)
        .with("pose_and_rpy_to_posxy", pose_and_rpy_to_posxy)
        .with("number", number)
        .with("list_components", list_components)
        .with("ned_to_xyz", ned_to_xyz)
}

// =============================================================================
// HELPERS
// =============================================================================

/// The input at `index` in declared order.
fn input<'a>(params: &Params<'a>, index: usize) -> Result<(&'a str, &'a Value), TransformError> {
    params
        .inputs()
        .nth(index)
        .ok_or_else(|| TransformError::MissingParameter(format!("input #{}", index + 1)))
}

/// Numeric components of a list value.
///
/// Accepts a real list or its text form (`"[0.0, 1.5, -2]"`).
fn components(name: &str, value: &Value) -> Result<Vec<f64>, TransformError> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| TransformError::invalid(name, format!("'{}' is not a number", item)))
            })
            .collect(),
        Value::Text(text) => text
            .trim()
            .trim_matches(['[', ']'])
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| TransformError::invalid(name, format!("'{}' is not a number", part.trim())))
            })
            .collect(),
        other => Err(TransformError::invalid(
            name,
            format!("expected a list, found {}", other.kind()),
        )),
    }
}

/// The first `n` components, or an error naming how many were needed.
fn leading(name: &str, value: &Value, n: usize) -> Result<Vec<f64>, TransformError> {
    let mut parts = components(name, value)?;
    if parts.len() < n {
        return Err(TransformError::invalid(
            name,
            format!("expected at least {} components, found {}", n, parts.len()),
        ));
    }
    parts.truncate(n);
    Ok(parts)
}

/// Pair results with the declared outputs.
fn emit(params: &Params<'_>, values: Vec<Value>) -> Result<Frame, TransformError> {
    let outputs = params.outputs();
    if outputs.len() != values.len() {
        return Err(TransformError::Failed(format!(
            "produces {} values but {} outputs are declared",
            values.len(),
            outputs.len()
        )));
    }
    Ok(outputs.iter().cloned().zip(values).collect())
}

fn floats(values: Vec<f64>) -> Vec<Value> {
    values.into_iter().map(Value::Float).collect()
}

// =============================================================================
// TRANSFORMS
// =============================================================================

/// `[x, y, z, ...]` → x, y, z.
pub fn pose_to_position(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (name, pose) = input(params, 0)?;
    emit(params, floats(leading(name, pose, 3)?))
}

/// `[x, y, z, ...]` → z.
pub fn pose_to_posz(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (name, pose) = input(params, 0)?;
    let z = leading(name, pose, 3)?[2];
    emit(params, vec![Value::Float(z)])
}

/// Pose and roll/pitch/yaw → x, y, roll.
pub fn pose_and_rpy_to_posxy(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (pose_name, pose) = input(params, 0)?;
    let (rpy_name, rpy) = input(params, 1)?;

    let xy = leading(pose_name, pose, 2)?;
    let roll = leading(rpy_name, rpy, 1)?;
    emit(params, vec![Value::Float(xy[0]), Value::Float(xy[1]), Value::Float(roll[0])])
}

/// A single input as a float.
pub fn number(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (name, _) = input(params, 0)?;
    emit(params, vec![Value::Float(params.number(name)?)])
}

/// Spread a list across the declared outputs.
pub fn list_components(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (name, list) = input(params, 0)?;
    emit(params, floats(leading(name, list, params.outputs().len())?))
}

/// North/east/down position → x/y/z list (down flips sign).
pub fn ned_to_xyz(params: &Params<'_>) -> Result<Frame, TransformError> {
    let (name, ned) = input(params, 0)?;
    let ned = leading(name, ned, 3)?;
    emit(params, vec![Value::from(vec![ned[0], ned[1], -ned[2]])])
}

// =============================================================================
// TESTS
// =============================================================================
