use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::NamingStrategy;
use crate::types::TimeUnit;

/// THREE-LEVEL is the default (element nullability + empty/null distinction
/// both representable); ONE/TWO are kept for interop with legacy readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListConvention {
	One,
	Two,
	Three,
}

impl Default for ListConvention {
	fn default() -> Self { ListConvention::Three }
}

impl Serialize for NamingStrategy {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(match self {
			NamingStrategy::Identity => "identity",
			NamingStrategy::SnakeCase => "snake_case",
		})
	}
}

impl<'de> Deserialize<'de> for NamingStrategy {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		match s.as_str() {
			"identity" => Ok(NamingStrategy::Identity),
			"snake_case" => Ok(NamingStrategy::SnakeCase),
			other => Err(serde::de::Error::unknown_variant(other, &["identity", "snake_case"])),
		}
	}
}

/// Rounding applied when a value's native scale exceeds the configured
/// DECIMAL scale for its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
	HalfUp,
	HalfEven,
	Truncate,
	Reject,
}

impl Default for RoundingMode {
	fn default() -> Self { RoundingMode::HalfEven }
}

/// Knobs affecting how a write-model is built and how a file is produced.
/// Shaped after (not copied from) the teacher's `SchemaSettings` +
/// `WriterSettings`, extended with the ambient fields a deployed writer
/// typically exposes (compression, row group sizing), `Serialize`d the way
/// a persistence config struct is in the rest of this stack so it can be
/// loaded from a file or environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
	pub level_convention: ListConvention,
	pub column_naming: NamingStrategy,
	pub default_time_unit: TimeUnit,
	pub default_decimal_precision: u32,
	pub default_decimal_scale: u32,
	pub decimal_rounding: RoundingMode,
	pub extra_metadata: HashMap<String, String>,
	pub compression: CompressionConfig,
	pub row_group_byte_limit: usize,
	pub row_group_row_limit: usize,
}

impl Default for WriterConfig {
	fn default() -> Self {
		WriterConfig {
			level_convention: ListConvention::default(),
			column_naming: NamingStrategy::Identity,
			default_time_unit: TimeUnit::Micros,
			default_decimal_precision: 38,
			default_decimal_scale: 18,
			decimal_rounding: RoundingMode::HalfEven,
			extra_metadata: HashMap::new(),
			compression: CompressionConfig::default(),
			row_group_byte_limit: 128 * 1024 * 1024,
			row_group_row_limit: 1_000_000,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "algorithm")]
pub enum CompressionConfig {
	None,
	Snappy,
	Gzip { level: i32 },
	Zstd { level: i32 },
	Brotli { level: i32 },
	Lz4,
}

impl Default for CompressionConfig {
	fn default() -> Self { CompressionConfig::Zstd { level: 3 } }
}

impl CompressionConfig {
	pub fn to_parquet(self) -> parquet::errors::Result<parquet::basic::Compression> {
		use parquet::basic::{BrotliLevel, Compression, GzipLevel, ZstdLevel};
		Ok(match self {
			CompressionConfig::None => Compression::UNCOMPRESSED,
			CompressionConfig::Snappy => Compression::SNAPPY,
			CompressionConfig::Lz4 => Compression::LZ4,
			CompressionConfig::Gzip { level } => Compression::GZIP(GzipLevel::try_new(level as u32)?),
			CompressionConfig::Zstd { level } => Compression::ZSTD(ZstdLevel::try_new(level)?),
			CompressionConfig::Brotli { level } => Compression::BROTLI(BrotliLevel::try_new(level as u32)?),
		})
	}
}

impl TimeUnit {
	pub fn serde_name(self) -> &'static str {
		match self {
			TimeUnit::Millis => "millis",
			TimeUnit::Micros => "micros",
			TimeUnit::Nanos => "nanos",
		}
	}
}

impl Serialize for TimeUnit {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.serde_name())
	}
}

impl<'de> Deserialize<'de> for TimeUnit {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		match s.as_str() {
			"millis" => Ok(TimeUnit::Millis),
			"micros" => Ok(TimeUnit::Micros),
			"nanos" => Ok(TimeUnit::Nanos),
			other => Err(serde::de::Error::unknown_variant(other, &["millis", "micros", "nanos"])),
		}
	}
}

/// Knobs affecting how a reader assembles records back out of a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
	/// Number of rows pulled into memory per batch while assembling records.
	pub batch_size: usize,
	pub field_matching: NamingStrategy,
	/// Strict vs. null-filling when a field has no matching column.
	pub fail_on_missing_column: bool,
	/// Whether null read into a non-nullable primitive target fails or yields a default.
	pub fail_on_null_for_primitives: bool,
	/// Whether a narrowing conversion (e.g. INT64 -> i32) fails or silently truncates.
	pub fail_on_narrowing: bool,
}

impl Default for ReaderConfig {
	fn default() -> Self {
		ReaderConfig {
			batch_size: 1024,
			field_matching: NamingStrategy::Identity,
			fail_on_missing_column: true,
			fail_on_null_for_primitives: true,
			fail_on_narrowing: true,
		}
	}
}
