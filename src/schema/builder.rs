use std::sync::Arc;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{BoolType, ByteArray, DoubleType, FixedLenByteArray, FloatType, Int32Type, Int64Type};
use parquet::schema::types::Type as ParquetType;

use crate::appenders::{
	Accessor, ArrayColumnAppender, ByteArrayColumnAppender, ColumnAppender, ColumnAppenderBase,
	DynColumnAppender, DynamicMergedAppender, FieldAppender, FixedByteArrayColumnAppender,
	GenericColumnAppender, MapColumnAppender, RealMemorySize,
};
use crate::config::{ListConvention, RoundingMode};
use crate::conversion::rescale_decimal;
use crate::error::{CoreError, CoreResult};
use crate::types::{convert_decimal_to_bytes, DecimalPhysical, LogicalType, MyFrom, TimeUnit};

use super::naming::NamingStrategy;

/// Per-field bookkeeping threaded through a recursive schema-build walk:
/// the running `(max_definition, max_repetition)` pair and the dotted path
/// used for error messages and cycle detection. The Rust analogue of the
/// teacher's `ColumnInfo::nest()`/`ColumnInfo::as_array()`, freed of any
/// Postgres-specific fields.
#[derive(Debug, Clone)]
pub struct SchemaCursor {
	path: Vec<String>,
	definition_level: i16,
	repetition_level: i16,
	naming: NamingStrategy,
	type_stack: Vec<&'static str>,
}

impl SchemaCursor {
	pub fn root(naming: NamingStrategy) -> Self {
		SchemaCursor { path: Vec::new(), definition_level: 0, repetition_level: 0, naming, type_stack: Vec::new() }
	}

	pub fn definition_level(&self) -> i16 { self.definition_level }
	pub fn repetition_level(&self) -> i16 { self.repetition_level }

	pub fn full_name(&self) -> String { self.path.join("/") }

	fn nested(&self, raw_name: &str, alias: Option<&str>) -> Self {
		let name = alias.map(str::to_string).unwrap_or_else(|| self.naming.apply(raw_name));
		let mut path = self.path.clone();
		path.push(name);
		SchemaCursor { path, definition_level: self.definition_level + 1, repetition_level: self.repetition_level, naming: self.naming, type_stack: self.type_stack.clone() }
	}

	fn repeated(&self) -> Self {
		SchemaCursor { repetition_level: self.repetition_level + 1, ..self.clone() }
	}

	fn field_name(&self) -> &str {
		self.path.last().map(String::as_str).unwrap_or("root")
	}

	/// Pushes `T` onto the construction stack, failing `CyclicType` if `T`
	/// already appears on it. The derive macro calls this once per nested
	/// group/list/map it expands so a self-referential record type is caught
	/// at schema-build time rather than overflowing the stack.
	pub fn enter_type<T: ?Sized>(&mut self) -> CoreResult<()> {
		let name = std::any::type_name::<T>();
		if self.type_stack.contains(&name) {
			return Err(CoreError::CyclicType { type_name: name.to_string() });
		}
		self.type_stack.push(name);
		Ok(())
	}

	pub fn exit_type(&mut self) {
		self.type_stack.pop();
	}

	/// Cursor a nested group/list/map field's own children are built against
	/// - the same transform `group_field`/`list_field`/`map_field` apply to
	/// their `cursor` argument internally. Generated code (the derive macro)
	/// uses this to build child `FieldResult`s before handing them to one of
	/// those combinators, so both sides land on the same `(dl, rl)` pair.
	pub fn enter_field(&self, raw_name: &str, alias: Option<&str>) -> Self {
		self.nested(raw_name, alias)
	}

	/// Cursor one list element or one map entry's fields are built against.
	pub fn enter_repeated_field(&self, raw_name: &str, alias: Option<&str>) -> Self {
		self.nested(raw_name, alias).repeated()
	}
}

/// Result of building one node of the write model: the `parquet` schema
/// fragment for this field plus the appender that shreds values of `R` into
/// it. `R` is the *parent* record type - the accessor that produced this
/// field's value has already been folded in via `FieldAppender`.
pub type FieldResult<R> = (ParquetType, DynColumnAppender<R>);

fn primitive_field<R, V, TPq, F>(
	cursor: &SchemaCursor,
	raw_name: &str,
	alias: Option<&str>,
	nullable: bool,
	accessor: Accessor<R, V>,
	physical: PhysicalType,
	logical: Option<parquet::basic::LogicalType>,
	converted: ConvertedType,
	length: i32,
	precision_scale: Option<(u32, u32)>,
	convert: F,
) -> CoreResult<FieldResult<R>>
	where V: Clone + 'static, R: 'static,
		  TPq: parquet::data_type::DataType, TPq::T: Clone + RealMemorySize,
		  F: Fn(V) -> CoreResult<TPq::T> + 'static {
	let c = cursor.nested(raw_name, alias);
	let dl = c.definition_level + nullable as i16;

	let mut builder = ParquetType::primitive_type_builder(c.field_name(), physical)
		.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
		.with_converted_type(converted)
		.with_length(length);
	if let Some((p, s)) = precision_scale {
		builder = builder.with_precision(p as i32).with_scale(s as i32);
	}
	let schema = builder.with_logical_type(logical).build()
		.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

	let leaf = GenericColumnAppender::<V, TPq, F>::new(dl, c.repetition_level, convert);
	let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, leaf));

	Ok((schema, appender))
}

macro_rules! simple_field {
	($fn_name:ident, $pq:ty, $physical:expr, $logical:expr, $converted:expr) => {
		pub fn $fn_name<R: 'static, V: Clone + MyFrom<V> + 'static>(
			cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, V>,
		) -> CoreResult<FieldResult<R>>
			where <$pq as parquet::data_type::DataType>::T: MyFrom<V> {
			primitive_field::<R, V, $pq, _>(cursor, raw_name, alias, nullable, accessor, $physical, $logical, $converted, -1, None, |v| Ok(MyFrom::my_from(v)))
		}
	};
}

simple_field!(bool_field, BoolType, PhysicalType::BOOLEAN, None, ConvertedType::NONE);
simple_field!(int32_field, Int32Type, PhysicalType::INT32, None, ConvertedType::NONE);
simple_field!(int64_field, Int64Type, PhysicalType::INT64, None, ConvertedType::NONE);
simple_field!(float32_field, FloatType, PhysicalType::FLOAT, None, ConvertedType::NONE);
simple_field!(float64_field, DoubleType, PhysicalType::DOUBLE, None, ConvertedType::NONE);

pub fn date_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, chrono::NaiveDate>) -> CoreResult<FieldResult<R>> {
	primitive_field::<R, _, Int32Type, _>(cursor, raw_name, alias, nullable, accessor, PhysicalType::INT32, Some(parquet::basic::LogicalType::Date), ConvertedType::DATE, -1, None, |v| Ok(MyFrom::my_from(v)))
}

fn time_unit_micros_logical(unit: TimeUnit, is_adjusted_to_utc: bool) -> parquet::basic::LogicalType {
	let tu = match unit {
		TimeUnit::Millis => parquet::format::TimeUnit::MILLIS(parquet::format::MilliSeconds {}),
		TimeUnit::Micros => parquet::format::TimeUnit::MICROS(parquet::format::MicroSeconds {}),
		TimeUnit::Nanos => parquet::format::TimeUnit::NANOS(parquet::format::NanoSeconds {}),
	};
	parquet::basic::LogicalType::Timestamp { is_adjusted_to_u_t_c: is_adjusted_to_utc, unit: tu }
}

pub fn timestamp_utc_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, unit: TimeUnit, accessor: Accessor<R, chrono::DateTime<chrono::Utc>>) -> CoreResult<FieldResult<R>> {
	primitive_field::<R, _, Int64Type, _>(cursor, raw_name, alias, nullable, accessor, PhysicalType::INT64, Some(time_unit_micros_logical(unit, true)), ConvertedType::NONE, -1, None, |v| Ok(v.timestamp_micros()))
}

pub fn timestamp_local_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, unit: TimeUnit, accessor: Accessor<R, chrono::NaiveDateTime>) -> CoreResult<FieldResult<R>> {
	primitive_field::<R, _, Int64Type, _>(cursor, raw_name, alias, nullable, accessor, PhysicalType::INT64, Some(time_unit_micros_logical(unit, false)), ConvertedType::NONE, -1, None, |v| Ok(MyFrom::my_from(v)))
}

pub fn string_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, String>) -> CoreResult<FieldResult<R>> {
	byte_array_field(cursor, raw_name, alias, nullable, Some(parquet::basic::LogicalType::String), ConvertedType::UTF8, accessor, |v| ByteArray::my_from(v))
}

pub fn json_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, Vec<u8>>) -> CoreResult<FieldResult<R>> {
	byte_array_field(cursor, raw_name, alias, nullable, Some(parquet::basic::LogicalType::Json), ConvertedType::JSON, accessor, |v| ByteArray::my_from(v))
}

pub fn bson_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, Vec<u8>>) -> CoreResult<FieldResult<R>> {
	byte_array_field(cursor, raw_name, alias, nullable, Some(parquet::basic::LogicalType::Bson), ConvertedType::BSON, accessor, |v| ByteArray::my_from(v))
}

pub fn enum_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, String>) -> CoreResult<FieldResult<R>> {
	byte_array_field(cursor, raw_name, alias, nullable, Some(parquet::basic::LogicalType::Enum), ConvertedType::ENUM, accessor, |v| ByteArray::my_from(v))
}

pub fn bytes_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, Vec<u8>>) -> CoreResult<FieldResult<R>> {
	byte_array_field(cursor, raw_name, alias, nullable, None, ConvertedType::NONE, accessor, |v| ByteArray::my_from(v))
}

fn byte_array_field<R: 'static, V: Clone + 'static>(
	cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool,
	logical: Option<parquet::basic::LogicalType>, converted: ConvertedType,
	accessor: Accessor<R, V>, convert: impl Fn(V) -> ByteArray + 'static + Copy,
) -> CoreResult<FieldResult<R>> {
	let c = cursor.nested(raw_name, alias);
	let dl = c.definition_level + nullable as i16;

	let schema = ParquetType::primitive_type_builder(c.field_name(), PhysicalType::BYTE_ARRAY)
		.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
		.with_converted_type(converted)
		.with_logical_type(logical)
		.build()
		.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

	let leaf = ByteArrayColumnAppender::<V, _>::new(dl, c.repetition_level, move |v: &V, buf: &mut Vec<u8>| {
		let arr = convert(v.clone());
		let bytes: &[u8] = arr.data();
		buf.extend_from_slice(bytes);
		Some(bytes.len())
	});
	let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, leaf));

	Ok((schema, appender))
}

pub fn uuid_field<R: 'static>(cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, accessor: Accessor<R, uuid::Uuid>) -> CoreResult<FieldResult<R>> {
	let c = cursor.nested(raw_name, alias);
	let dl = c.definition_level + nullable as i16;

	let schema = ParquetType::primitive_type_builder(c.field_name(), PhysicalType::FIXED_LEN_BYTE_ARRAY)
		.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
		.with_length(16)
		.with_logical_type(Some(parquet::basic::LogicalType::Uuid))
		.build()
		.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

	let leaf = FixedByteArrayColumnAppender::<uuid::Uuid, _>::new(dl, c.repetition_level, 16, |v: &uuid::Uuid, out: &mut [u8]| {
		out.copy_from_slice(v.as_bytes());
		Ok(Some(16))
	});
	let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, leaf));

	Ok((schema, appender))
}

/// `DECIMAL(precision, scale)`, backed by INT32/INT64/fixed-binary depending
/// on `precision` per data-model invariant 4. A lossy rescale (source scale
/// greater than `scale`) is routed through `conversion::rescale_decimal`
/// under `rounding` rather than truncated silently; absent an explicit
/// rounding mode the caller should pass `RoundingMode::Reject`, which fails
/// the write with `InvalidRescaling`.
pub fn decimal_field<R: 'static>(
	cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool,
	precision: u32, scale: u32, rounding: RoundingMode, accessor: Accessor<R, rust_decimal::Decimal>,
) -> CoreResult<FieldResult<R>> {
	if precision == 0 || precision > 38 || scale > precision {
		return Err(CoreError::DecimalOutOfRange { precision, scale: scale as i32 });
	}
	let logical = Some(parquet::basic::LogicalType::Decimal { scale: scale as i32, precision: precision as i32 });
	let field_name = raw_name.to_string();

	match LogicalType::decimal_physical_width(precision) {
		DecimalPhysical::Int32 => {
			let field_name = field_name.clone();
			primitive_field::<R, _, Int32Type, _>(cursor, raw_name, alias, nullable, accessor, PhysicalType::INT32, logical, ConvertedType::DECIMAL, -1, Some((precision, scale)), move |v: rust_decimal::Decimal| {
				Ok(rescale_decimal(&field_name, v, scale, precision, Some(rounding))?.mantissa() as i32)
			})
		},
		DecimalPhysical::Int64 => {
			let field_name = field_name.clone();
			primitive_field::<R, _, Int64Type, _>(cursor, raw_name, alias, nullable, accessor, PhysicalType::INT64, logical, ConvertedType::DECIMAL, -1, Some((precision, scale)), move |v: rust_decimal::Decimal| {
				Ok(rescale_decimal(&field_name, v, scale, precision, Some(rounding))?.mantissa() as i64)
			})
		},
		DecimalPhysical::FixedBinary(width) => {
			let c = cursor.nested(raw_name, alias);
			let dl = c.definition_level + nullable as i16;
			let schema = ParquetType::primitive_type_builder(c.field_name(), PhysicalType::FIXED_LEN_BYTE_ARRAY)
				.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
				.with_length(width as i32)
				.with_precision(precision as i32)
				.with_scale(scale as i32)
				.with_logical_type(logical)
				.build()
				.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

			let leaf = FixedByteArrayColumnAppender::<rust_decimal::Decimal, _>::new(dl, c.repetition_level, width, move |v: &rust_decimal::Decimal, out: &mut [u8]| {
				let rescaled = rescale_decimal(&field_name, *v, scale, precision, Some(rounding))?;
				Ok(convert_decimal_to_bytes(&rescaled, out))
			});
			let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, leaf));
			Ok((schema, appender))
		}
	}
}

/// Composes `fields` (already-built child `FieldResult<V>`s) into one GROUP
/// node, then plugs the whole group under `R` via `accessor` - shredder
/// rules 3/4.
pub fn group_field<R: 'static, V: Clone + 'static>(
	cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool,
	accessor: Accessor<R, V>, fields: Vec<FieldResult<V>>,
) -> CoreResult<FieldResult<R>> {
	let c = cursor.nested(raw_name, alias);
	let dl = c.definition_level + nullable as i16;

	let (appenders, types): (Vec<_>, Vec<_>) = fields.into_iter().unzip();
	let schema = ParquetType::group_type_builder(c.field_name())
		.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
		.with_fields(types.into_iter().map(Arc::new).collect())
		.build()
		.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

	let merged = DynamicMergedAppender::new(appenders, dl, c.repetition_level);
	let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, merged));

	Ok((schema, appender))
}

fn type_is_list(t: &ParquetType) -> bool {
	matches!(t, ParquetType::GroupType { basic_info, .. } if basic_info.logical_type() == Some(parquet::basic::LogicalType::List))
}

/// Builds a LIST field under the configured `convention`. THREE-LEVEL
/// (default): `optional group F (LIST) { repeated group list { optional
/// <element> element } }`, element nullability and empty/null distinction
/// both representable. TWO-LEVEL drops the `list` indirection group -
/// `optional group F (LIST) { repeated <element> element }` - and elements
/// are never nullable. ONE-LEVEL drops `F` entirely: the element's own type
/// (renamed to `F`, forced REPEATED) replaces it directly, so an empty list
/// is indistinguishable from a null list, and a list-of-list is not
/// representable at all (rejected as `ConsecutiveLists`).
///
/// `element` is the already-built `FieldResult` for one list item (its own
/// schema Type's repetition is ignored outside ONE-LEVEL; only the appender
/// matters there - the wrapping group structure is synthesized here).
pub fn list_field<R: 'static, V: Clone + 'static, Item: Clone + 'static>(
	cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool, allow_element_null: bool,
	accessor: Accessor<R, V>, element: FieldResult<Item>, convention: ListConvention,
) -> CoreResult<FieldResult<R>>
	where V: IntoIterator<Item = Item> + Clone {
	let c = cursor.nested(raw_name, alias);
	let (element_appender, element_type) = element;

	match convention {
		ListConvention::Three => {
			let dl = c.definition_level + nullable as i16;
			let list_c = c.repeated();

			let element_type = clone_type_as(&element_type, "element", if allow_element_null { Repetition::OPTIONAL } else { Repetition::REQUIRED });

			let list_group = ParquetType::group_type_builder("list")
				.with_repetition(Repetition::REPEATED)
				.with_fields(vec![Arc::new(element_type)])
				.build()
				.map_err(|e| CoreError::Internal(format!("could not build list schema for `{}`: {}", c.full_name(), e)))?;

			let schema = ParquetType::group_type_builder(c.field_name())
				.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
				.with_logical_type(Some(parquet::basic::LogicalType::List))
				.with_fields(vec![Arc::new(list_group)])
				.build()
				.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

			debug_assert_eq!(element_appender.max_dl(), dl + 1 + allow_element_null as i16);
			debug_assert_eq!(element_appender.max_rl(), list_c.repetition_level);

			let array = ArrayColumnAppender::new(element_appender, nullable, allow_element_null, dl, c.repetition_level);
			let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, array));
			Ok((schema, appender))
		},
		ListConvention::Two => {
			let dl = c.definition_level + nullable as i16;
			let element_type = clone_type_as(&element_type, "element", Repetition::REPEATED);

			let schema = ParquetType::group_type_builder(c.field_name())
				.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
				.with_logical_type(Some(parquet::basic::LogicalType::List))
				.with_fields(vec![Arc::new(element_type)])
				.build()
				.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

			debug_assert_eq!(element_appender.max_dl(), dl + 1);
			debug_assert_eq!(element_appender.max_rl(), c.repetition_level + 1);

			let array = ArrayColumnAppender::new(element_appender, nullable, false, dl, c.repetition_level);
			let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, array));
			Ok((schema, appender))
		},
		ListConvention::One => {
			if type_is_list(&element_type) {
				return Err(CoreError::ConsecutiveLists { field: c.full_name() });
			}
			let dl = c.definition_level;
			let schema = clone_type_as(&element_type, c.field_name(), Repetition::REPEATED);

			debug_assert_eq!(element_appender.max_dl(), dl + 1);
			debug_assert_eq!(element_appender.max_rl(), c.repetition_level + 1);

			let array = ArrayColumnAppender::new(element_appender, false, false, dl, c.repetition_level);
			let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, array));
			Ok((schema, appender))
		},
	}
}

/// Builds a MAP field: `optional group F (MAP) { repeated group key_value {
/// required key; optional value } }`. `key`/`value` are the already-built
/// `FieldResult`s for one entry (invariant 2: the key field is forced
/// REQUIRED regardless of how it was built).
pub fn map_field<R: 'static, V: Clone + 'static, K: Clone + 'static, Val: Clone + 'static>(
	cursor: &SchemaCursor, raw_name: &str, alias: Option<&str>, nullable: bool,
	accessor: Accessor<R, V>, key: FieldResult<K>, value: FieldResult<Val>,
) -> CoreResult<FieldResult<R>>
	where V: IntoIterator<Item = (Option<K>, Option<Val>)> + Clone {
	let c = cursor.nested(raw_name, alias);
	let dl = c.definition_level + nullable as i16;

	let (key_appender, key_type) = key;
	let (value_appender, value_type) = value;
	let key_type = clone_type_as(&key_type, "key", Repetition::REQUIRED);
	let value_type = clone_type_as(&value_type, "value", Repetition::OPTIONAL);

	let key_value_group = ParquetType::group_type_builder("key_value")
		.with_repetition(Repetition::REPEATED)
		.with_fields(vec![Arc::new(key_type), Arc::new(value_type)])
		.build()
		.map_err(|e| CoreError::Internal(format!("could not build map schema for `{}`: {}", c.full_name(), e)))?;

	let schema = ParquetType::group_type_builder(c.field_name())
		.with_repetition(if nullable { Repetition::OPTIONAL } else { Repetition::REQUIRED })
		.with_logical_type(Some(parquet::basic::LogicalType::Map))
		.with_fields(vec![Arc::new(key_value_group)])
		.build()
		.map_err(|e| CoreError::Internal(format!("could not build schema for `{}`: {}", c.full_name(), e)))?;

	let map_appender = MapColumnAppender::new(key_appender, value_appender, nullable, dl, c.repetition_level);
	let appender: DynColumnAppender<R> = Box::new(FieldAppender::new(c.full_name(), accessor, map_appender));

	Ok((schema, appender))
}

fn clone_type_as(t: &ParquetType, name: &str, repetition: Repetition) -> ParquetType {
	match t {
		ParquetType::PrimitiveType { basic_info, physical_type, type_length, scale, precision } => {
			let mut b = ParquetType::primitive_type_builder(name, *physical_type)
				.with_repetition(repetition)
				.with_converted_type(basic_info.converted_type());
			if *type_length >= 0 { b = b.with_length(*type_length); }
			if *precision > 0 { b = b.with_precision(*precision); }
			if *scale > 0 { b = b.with_scale(*scale); }
			b.with_logical_type(basic_info.logical_type()).build().unwrap()
		},
		ParquetType::GroupType { basic_info, fields } => {
			ParquetType::group_type_builder(name)
				.with_repetition(repetition)
				.with_logical_type(basic_info.logical_type())
				.with_fields(fields.clone())
				.build()
				.unwrap()
		}
	}
}

/// Placeholder accessor builder used by tests and the explicit write-model
/// path: `field(|r| r.foo.clone())` without the `Option`-returning ceremony
/// a required field's accessor otherwise needs.
pub fn required<R, V: Clone>(f: impl Fn(&R) -> V + Send + Sync + 'static) -> Accessor<R, V> {
	Arc::new(move |r| Some(f(r)))
}

pub fn optional<R, V: Clone>(f: impl Fn(&R) -> Option<V> + Send + Sync + 'static) -> Accessor<R, V> {
	Arc::new(f)
}
