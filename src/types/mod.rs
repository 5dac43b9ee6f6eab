mod convert;
mod logical;

pub use convert::{MyFrom, convert_decimal_to_bytes};
pub use logical::{LogicalType, TimeUnit, DecimalPhysical, ReflectLogicalType};
