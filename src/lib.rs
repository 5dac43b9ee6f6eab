//! Reflective object-to-columnar mapper for the Parquet file format.
//!
//! Two halves mirror each other through a shared set of leaf-level
//! concepts (definition level, repetition level, logical type):
//!
//! - [`appenders`] + [`schema`] build a *write model* out of a Rust type:
//!   a `parquet::schema::types::Type` tree paired with a
//!   [`appenders::ColumnAppender`] tree that shreds values into column
//!   chunks ([`writer`]).
//! - [`reader`] builds the inverse *read model*: an
//!   [`reader::Assembler`] tree that reassembles column chunks back into
//!   Rust values.
//!
//! [`types`] holds the closed set of logical types both models speak, and
//! [`config`] holds the knobs ([`config::WriterConfig`],
//! [`config::ReaderConfig`]) that steer list encoding, decimal rounding,
//! compression and field-matching strategy.

pub mod appenders;
pub mod config;
pub mod conversion;
pub mod error;
pub mod level_index;
pub mod model;
pub mod reader;
pub mod schema;
pub mod types;
pub mod writer;

pub use error::{CoreError, CoreResult};
pub use types::{LogicalType, ReflectLogicalType, TimeUnit};

/// Implemented by the derive macro (and usable by hand) for any struct that
/// can be shredded into Parquet columns.
///
/// `build_fields` produces this type's own fields against an
/// already-positioned [`schema::SchemaCursor`] - this is what lets a nested
/// record field compose into its parent's group via [`schema::group_field`]
/// without building a second, disconnected root. `build_schema` is the
/// entry point for a standalone top-level record: it opens a fresh cursor,
/// wraps the fields in one root group, and returns the write model a
/// [`writer::Writer`] drives directly.
pub trait ParquetRecordWrite: Clone + Sized + 'static {
	fn build_fields(
		cursor: &schema::SchemaCursor, config: &config::WriterConfig,
	) -> CoreResult<Vec<schema::FieldResult<Self>>>;

	fn build_schema(
		column_name: &str, config: &config::WriterConfig,
	) -> CoreResult<(parquet::schema::types::Type, appenders::DynColumnAppender<Self>)> {
		let mut cursor = schema::SchemaCursor::root(config.column_naming);
		cursor.enter_type::<Self>()?;
		let fields = Self::build_fields(&cursor, config)?;
		cursor.exit_type();
		schema::group_field(&cursor, column_name, None, false, schema::required(|v: &Self| v.clone()), fields)
	}
}

pub use parquet_reflect_derive::ParquetRecord;
