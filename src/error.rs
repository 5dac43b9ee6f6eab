//! Error taxonomy for the schema builder, shredder and assembler.
//!
//! Every fallible entry point in this crate returns [`CoreError`]; nothing in the
//! shredding or assembly hot path swallows an error or retries internally. Once a
//! [`CoreError`] escapes a writer or reader, that writer/reader must be discarded
//! (it does not attempt to repair its internal state).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
	// --- schema-construction errors ---
	#[error("cyclic type detected while building schema for `{type_name}`")]
	CyclicType { type_name: String },

	#[error("field `{field}` has an open generic type with no concrete leaf type")]
	OpenGeneric { field: String },

	#[error("consecutive nested lists are not representable under the ONE_LEVEL list convention (field `{field}`)")]
	ConsecutiveLists { field: String },

	#[error("decimal out of range: precision={precision}, scale={scale} (expected 1 <= precision <= 38, 0 <= scale <= precision)")]
	DecimalOutOfRange { precision: u32, scale: i32 },

	#[error("unsupported logical type for field `{field}`: {reason}")]
	UnsupportedLogicalType { field: String, reason: String },

	// --- shredding errors ---
	#[error("required field `{field}` received a null value")]
	RequiredFieldNull { field: String },

	#[error("invalid record: {0}")]
	InvalidRecord(String),

	#[error("cannot rescale decimal value of field `{field}` to scale {target_scale} without a configured rounding mode")]
	InvalidRescaling { field: String, target_scale: i32 },

	#[error("rescaled decimal value for field `{field}` would exceed the configured precision {target_precision}")]
	InvalidPrecision { field: String, target_precision: u32 },

	#[error("unsupported value for field `{field}`: {reason}")]
	UnsupportedValue { field: String, reason: String },

	// --- assembly errors ---
	#[error("missing column `{0}`")]
	MissingColumn(String),

	#[error("unexpected null read into non-nullable primitive column `{0}`")]
	NullIntoPrimitive(String),

	#[error("narrowing conversion rejected for column `{0}`")]
	NarrowingConversion(String),

	#[error("value out of range for column `{0}`")]
	ValueOutOfRange(String),

	// --- ambient/internal ---
	#[error("{0}")]
	Internal(String),

	#[error(transparent)]
	Parquet(#[from] parquet::errors::ParquetError),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<String> for CoreError {
	fn from(s: String) -> Self {
		CoreError::Internal(s)
	}
}

impl From<&str> for CoreError {
	fn from(s: &str) -> Self {
		CoreError::Internal(s.to_string())
	}
}
