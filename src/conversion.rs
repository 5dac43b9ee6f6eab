//! Widening/narrowing, decimal rescaling and time-unit rounding shared by
//! the shredder (write side) and the assembler (read side). Grounded on the
//! teacher's `MyFrom<T>` conversions plus `datatypes/numeric.rs`'s decimal
//! rescaling, generalized from one-directional Postgres-to-Parquet copies
//! into the two-directional policy the read path also needs.

use rust_decimal::Decimal;

use crate::config::RoundingMode;
use crate::error::{CoreError, CoreResult};

/// Widens `v` losslessly. Never fails - only called where the target type's
/// range is provably a superset of the source's (`INT32 -> INT64`, `FLOAT32
/// -> FLOAT64`, ...).
pub trait Widen<T> {
	fn widen(v: T) -> Self;
}

macro_rules! widen {
	($from:ty => $to:ty) => {
		impl Widen<$from> for $to {
			fn widen(v: $from) -> Self { v as $to }
		}
	};
}

widen!(i8 => i16);
widen!(i8 => i32);
widen!(i8 => i64);
widen!(i16 => i32);
widen!(i16 => i64);
widen!(i32 => i64);
widen!(f32 => f64);

/// Narrows `v` into `Self`, returning `None` if the value does not fit -
/// the caller decides (via `ReaderConfig::fail_on_narrowing`) whether that
/// becomes `NarrowingConversion` or a silent truncation.
pub trait TryNarrow<T>: Sized {
	fn try_narrow(v: T) -> Option<Self>;
}

macro_rules! narrow {
	($from:ty => $to:ty) => {
		impl TryNarrow<$from> for $to {
			fn try_narrow(v: $from) -> Option<Self> {
				let truncated = v as $to;
				if truncated as $from == v { Some(truncated) } else { None }
			}
		}
	};
}

narrow!(i64 => i32);
narrow!(i64 => i16);
narrow!(i64 => i8);
narrow!(i32 => i16);
narrow!(i32 => i8);
narrow!(i16 => i8);
narrow!(f64 => f32);

pub fn narrow_or_truncate<T: Copy, U: TryNarrow<T>>(
	column: &str, v: T, fail_on_narrowing: bool, truncate: impl Fn(T) -> U,
) -> CoreResult<U> {
	match U::try_narrow(v) {
		Some(narrowed) => Ok(narrowed),
		None if fail_on_narrowing => Err(CoreError::NarrowingConversion(column.to_string())),
		None => Ok(truncate(v)),
	}
}

/// Rescales `value` to `target_scale`, applying `rounding` when information
/// would otherwise be lost. `rounding == None` behaves like
/// `RoundingMode::Reject`: any lossy rescale fails `InvalidRescaling`.
pub fn rescale_decimal(
	field: &str, value: Decimal, target_scale: u32, target_precision: u32, rounding: Option<RoundingMode>,
) -> CoreResult<Decimal> {
	let mut rescaled = value;
	let loses_information = value.scale() > target_scale;

	if loses_information {
		match rounding.unwrap_or(RoundingMode::Reject) {
			RoundingMode::Reject => return Err(CoreError::InvalidRescaling { field: field.to_string(), target_scale: target_scale as i32 }),
			RoundingMode::Truncate => rescaled = rescaled.trunc_with_scale(target_scale),
			RoundingMode::HalfUp => rescaled = rescaled.round_dp_with_strategy(target_scale, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
			RoundingMode::HalfEven => rescaled = rescaled.round_dp_with_strategy(target_scale, rust_decimal::RoundingStrategy::MidpointNearestEven),
		}
	} else {
		rescaled.rescale(target_scale);
	}

	let digits = rescaled.mantissa().unsigned_abs().to_string().len() as u32;
	if digits > target_precision {
		return Err(CoreError::InvalidPrecision { field: field.to_string(), target_precision });
	}

	Ok(rescaled)
}

/// Time values are stored at a single resolution (`TimeUnit`); converting
/// from a higher resolution truncates toward the epoch, from a lower
/// resolution is exact.
pub fn rescale_time_unit(value_in_source_unit: i64, source_units_per_target_unit: i64) -> i64 {
	if source_units_per_target_unit >= 1 {
		value_in_source_unit.div_euclid(source_units_per_target_unit)
	} else {
		value_in_source_unit * (1 / source_units_per_target_unit).max(1)
	}
}

/// `STRING <-> ENUM` interop is by name: both logical types are backed by
/// the same BYTE_ARRAY encoding, so this is a pure relabeling with no byte
/// transformation.
pub fn enum_name_to_string(name: String) -> String { name }
pub fn string_to_enum_name(s: String) -> String { s }

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn narrow_detects_overflow() {
		assert_eq!(i32::try_narrow(42i64), Some(42));
		assert_eq!(i32::try_narrow(i64::MAX), None);
	}

	#[test]
	fn rescale_rejects_without_rounding_mode() {
		let v = Decimal::new(12345, 3); // 12.345
		let err = rescale_decimal("price", v, 2, 10, None).unwrap_err();
		assert!(matches!(err, CoreError::InvalidRescaling { .. }));
	}

	#[test]
	fn rescale_truncates_when_allowed() {
		let v = Decimal::new(12345, 3); // 12.345
		let out = rescale_decimal("price", v, 2, 10, Some(RoundingMode::Truncate)).unwrap();
		assert_eq!(out, Decimal::new(1234, 2));
	}

	#[test]
	fn time_unit_rescale_truncates_toward_epoch() {
		assert_eq!(rescale_time_unit(1_500, 1_000), 1); // micros -> millis-ish ratio
		assert_eq!(rescale_time_unit(-1_500, 1_000), -2);
	}
}
