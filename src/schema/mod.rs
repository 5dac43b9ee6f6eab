mod builder;
mod naming;

pub use builder::{
	bool_field, bytes_field, date_field, decimal_field, enum_field, float32_field, float64_field,
	group_field, int32_field, int64_field, json_field, bson_field, list_field, map_field, optional,
	required, string_field, timestamp_local_field, timestamp_utc_field, uuid_field, FieldResult,
	SchemaCursor,
};
pub use crate::appenders::Accessor;
pub use naming::NamingStrategy;
