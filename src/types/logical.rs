/// Resolution a TIME/TIMESTAMP column is stored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
	Millis,
	Micros,
	Nanos,
}

/// The closed set of leaf and composite logical types a field can resolve to.
/// `LogicalType::from_rust_type` is not a runtime function - Rust has no
/// runtime type introspection - it is realized as the `ReflectLogicalType`
/// trait below, whose impls the derive macro walks at compile time, one
/// resolution per field instead of one per process.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalType {
	Boolean,
	Int8,
	Int16,
	Int32,
	Int64,
	Float32,
	Float64,
	String,
	Enum,
	Json,
	Bson,
	Bytes,
	Uuid,
	Decimal { precision: u32, scale: u32 },
	Geometry,
	Geography,
	Variant,
	Date,
	Time { unit: TimeUnit, is_adjusted_to_utc: bool },
	Timestamp { unit: TimeUnit, is_adjusted_to_utc: bool },
	Group(Vec<(String, LogicalType, bool)>),
	List(Box<LogicalType>),
	Set(Box<LogicalType>),
	Map(Box<LogicalType>, Box<LogicalType>),
}

impl LogicalType {
	pub fn string() -> Self { LogicalType::String }
	pub fn json() -> Self { LogicalType::Json }
	pub fn bson() -> Self { LogicalType::Bson }
	pub fn enum_of() -> Self { LogicalType::Enum }
	pub fn bytes() -> Self { LogicalType::Bytes }
	pub fn uuid() -> Self { LogicalType::Uuid }
	pub fn geometry() -> Self { LogicalType::Geometry }
	pub fn geography() -> Self { LogicalType::Geography }
	pub fn variant() -> Self { LogicalType::Variant }
	pub fn date() -> Self { LogicalType::Date }

	pub fn decimal(precision: u32, scale: u32) -> crate::error::CoreResult<Self> {
		if precision == 0 || precision > 38 || scale > precision {
			return Err(crate::error::CoreError::DecimalOutOfRange { precision, scale: scale as i32 });
		}
		Ok(LogicalType::Decimal { precision, scale })
	}

	pub fn timestamp(unit: TimeUnit, is_adjusted_to_utc: bool) -> Self {
		LogicalType::Timestamp { unit, is_adjusted_to_utc }
	}

	pub fn time(unit: TimeUnit, is_adjusted_to_utc: bool) -> Self {
		LogicalType::Time { unit, is_adjusted_to_utc }
	}

	pub fn list_of(element: LogicalType) -> Self {
		LogicalType::List(Box::new(element))
	}

	pub fn set_of(element: LogicalType) -> Self {
		LogicalType::Set(Box::new(element))
	}

	pub fn map_of(key: LogicalType, value: LogicalType) -> Self {
		LogicalType::Map(Box::new(key), Box::new(value))
	}

	pub fn group(fields: Vec<(String, LogicalType, bool)>) -> Self {
		LogicalType::Group(fields)
	}

	/// Physical backing DECIMAL is given on a fixed (precision, scale), per
	/// data-model invariant 4.
	pub fn decimal_physical_width(precision: u32) -> DecimalPhysical {
		if precision <= 9 {
			DecimalPhysical::Int32
		} else if precision <= 18 {
			DecimalPhysical::Int64
		} else {
			DecimalPhysical::FixedBinary(Self::decimal_byte_width(precision))
		}
	}

	fn decimal_byte_width(precision: u32) -> usize {
		// smallest byte width whose two's-complement range covers `precision`
		// decimal digits, matching the teacher's sizing for DECIMAL(p,s).
		let mut width = 1usize;
		while (width * 8 - 1) < (precision as usize * 10 / 3 + 1) {
			width += 1;
		}
		width
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalPhysical {
	Int32,
	Int64,
	FixedBinary(usize),
}

/// Implemented by every Rust type the derive macro is able to resolve to a
/// `LogicalType` without extra field annotations. Annotated overrides
/// (`#[parquet(json)]`, `#[parquet(decimal(p, s))]`, ...) bypass this trait
/// and construct a `LogicalType` directly via the builder API.
pub trait ReflectLogicalType {
	fn reflect_logical_type() -> LogicalType;
}

macro_rules! reflect_primitive {
	($t:ty, $variant:expr) => {
		impl ReflectLogicalType for $t {
			fn reflect_logical_type() -> LogicalType { $variant }
		}
	};
}

reflect_primitive!(bool, LogicalType::Boolean);
reflect_primitive!(i8, LogicalType::Int8);
reflect_primitive!(i16, LogicalType::Int16);
reflect_primitive!(i32, LogicalType::Int32);
reflect_primitive!(i64, LogicalType::Int64);
reflect_primitive!(f32, LogicalType::Float32);
reflect_primitive!(f64, LogicalType::Float64);
reflect_primitive!(String, LogicalType::String);
reflect_primitive!(uuid::Uuid, LogicalType::Uuid);
reflect_primitive!(Vec<u8>, LogicalType::Bytes);
reflect_primitive!(chrono::NaiveDate, LogicalType::Date);
reflect_primitive!(chrono::NaiveDateTime, LogicalType::Timestamp { unit: TimeUnit::Micros, is_adjusted_to_utc: false });

impl<T: ReflectLogicalType> ReflectLogicalType for Vec<T> {
	fn reflect_logical_type() -> LogicalType {
		LogicalType::list_of(T::reflect_logical_type())
	}
}

impl<K: ReflectLogicalType, V: ReflectLogicalType> ReflectLogicalType for std::collections::HashMap<K, V> {
	fn reflect_logical_type() -> LogicalType {
		LogicalType::map_of(K::reflect_logical_type(), V::reflect_logical_type())
	}
}
