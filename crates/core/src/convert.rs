use serde::{Deserialize, Serialize};

/// Fixed scalar linking the base (left) field to the scaled (right) field.
pub const RATIO: f64 = 1.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

pub fn to_right(x: f64) -> f64 {
    (x / RATIO).round()
}

pub fn to_left(y: f64) -> f64 {
    (y * RATIO).round()
}

/// Value of the field opposite to `side` when `side` holds `value`.
pub fn convert(side: Side, value: f64) -> f64 {
    match side {
        Side::Left => to_right(value),
        Side::Right => to_left(value),
    }
}

// f64's Display never uses exponent notation and drops a zero fraction,
// which is exactly what the fields and the clipboard want.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    value.to_string()
}
