//! Domain value types.

mod curve_label;
mod date;

pub use curve_label::CurveLabel;
pub use date::Date;
