use std::ops::Sub;

use parquet::data_type::{ByteArray, FixedLenByteArray};
use rust_decimal::Decimal;

/// Narrow, lossless (or explicitly-rounded) conversions from a Rust field
/// value to the physical Rust type a leaf appender buffers. Kept from the
/// teacher's `MyFrom<T>` trait almost verbatim; the impls below are rebased
/// off the closed logical-type set instead of Postgres wire types.
pub trait MyFrom<T> {
	fn my_from(t: T) -> Self;
}

impl<T> MyFrom<T> for T {
	fn my_from(t: T) -> Self {
		t
	}
}

impl MyFrom<i32> for i64 {
	fn my_from(t: i32) -> Self {
		t as i64
	}
}

impl MyFrom<i16> for i32 {
	fn my_from(t: i16) -> Self {
		t as i32
	}
}

impl MyFrom<i8> for i32 {
	fn my_from(t: i8) -> Self {
		t as i32
	}
}

impl MyFrom<u32> for i32 {
	fn my_from(t: u32) -> Self {
		t as i32
	}
}

impl MyFrom<bool> for i32 {
	fn my_from(t: bool) -> Self {
		t as i32
	}
}

impl MyFrom<Vec<u8>> for ByteArray {
	fn my_from(t: Vec<u8>) -> Self {
		ByteArray::from(t)
	}
}

impl MyFrom<String> for ByteArray {
	fn my_from(t: String) -> Self {
		ByteArray::from(t.into_bytes())
	}
}

impl MyFrom<&str> for ByteArray {
	fn my_from(t: &str) -> Self {
		ByteArray::from(t)
	}
}

impl MyFrom<chrono::DateTime<chrono::Utc>> for i64 {
	/// `TIMESTAMP(MICROS, isAdjustedToUTC=true)` - absolute instant.
	fn my_from(t: chrono::DateTime<chrono::Utc>) -> Self {
		t.timestamp_micros()
	}
}

impl MyFrom<chrono::NaiveDateTime> for i64 {
	/// `TIMESTAMP(MICROS, isAdjustedToUTC=false)` - local, unzoned datetime.
	fn my_from(t: chrono::NaiveDateTime) -> Self {
		t.and_utc().timestamp_micros()
	}
}

impl MyFrom<chrono::NaiveDate> for i32 {
	fn my_from(t: chrono::NaiveDate) -> Self {
		t.sub(chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days() as i32
	}
}

impl MyFrom<chrono::NaiveTime> for i64 {
	fn my_from(t: chrono::NaiveTime) -> Self {
		t.signed_duration_since(chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap()).num_microseconds().unwrap()
	}
}

impl MyFrom<uuid::Uuid> for FixedLenByteArray {
	fn my_from(t: uuid::Uuid) -> Self {
		FixedLenByteArray::from(t.as_bytes().to_vec())
	}
}

/// Copies `value`'s two's-complement big-endian representation into `out`,
/// returning the number of bytes written. `value` must already be at the
/// field's target scale - the caller rescales (and enforces the configured
/// rounding/precision policy) before calling this. Mirrors the teacher's
/// `convert_decimal_to_bytes` byte-packing, rebased onto `rust_decimal::Decimal`
/// instead of `pg_bigdecimal::PgNumeric`.
pub fn convert_decimal_to_bytes(value: &Decimal, out: &mut [u8]) -> Option<usize> {
	let unscaled = value.mantissa();
	let sign_byte = if unscaled < 0 { 0xffu8 } else { 0x00u8 };
	let bytes = unscaled.to_be_bytes();

	if out.len() < bytes.len() {
		// fixed-width output narrower than i128 needs - only fits if the
		// leading bytes are all sign-extension.
		let extra = bytes.len() - out.len();
		if bytes[..extra].iter().any(|&b| b != sign_byte) {
			return None;
		}
		out.copy_from_slice(&bytes[extra..]);
	} else {
		let pad = out.len() - bytes.len();
		out[..pad].fill(sign_byte);
		out[pad..].copy_from_slice(&bytes);
	}

	Some(out.len())
}
