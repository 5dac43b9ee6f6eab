//! Checks the derived schema's textual shape against the canonical LIST/MAP
//! forms SPEC_FULL.md's schema-emission section calls for, via the
//! `parquet` crate's own pretty-printer (`print_schema`).

use std::collections::HashMap;

use parquet_reflect::config::WriterConfig;
use parquet_reflect::{ParquetRecord, ParquetRecordWrite};

fn print_schema<R: ParquetRecordWrite>(name: &str) -> String {
	let config = WriterConfig::default();
	let (schema, _) = R::build_schema(name, &config).expect("build schema");
	let mut buf = Vec::new();
	parquet::schema::printer::print_schema(&mut buf, &schema);
	String::from_utf8(buf).expect("utf8 schema text")
}

#[derive(Clone, ParquetRecord)]
struct Contact {
	id: i64,
	emails: Vec<String>,
}

#[test]
fn list_field_prints_three_level_convention() {
	let text = print_schema::<Contact>("contact");
	assert!(text.contains("emails"), "schema should name the list field:\n{text}");
	assert!(text.contains("LIST"), "list field should carry the LIST converted/logical type:\n{text}");
	assert!(text.contains("list"), "THREE-LEVEL convention wraps a repeated `list` group:\n{text}");
	assert!(text.contains("element"), "THREE-LEVEL convention names the item field `element`:\n{text}");
}

#[derive(Clone, ParquetRecord)]
struct Inventory {
	warehouse: String,
	stock: HashMap<String, i32>,
}

#[test]
fn map_field_prints_key_value_convention() {
	let text = print_schema::<Inventory>("inventory");
	assert!(text.contains("stock"), "schema should name the map field:\n{text}");
	assert!(text.contains("MAP"), "map field should carry the MAP converted/logical type:\n{text}");
	assert!(text.contains("key_value"), "MAP convention wraps a repeated `key_value` group:\n{text}");
}

#[derive(Clone, ParquetRecord)]
struct Profile {
	id: i64,
	nickname: Option<String>,
}

#[test]
fn optional_scalar_field_is_marked_optional() {
	let text = print_schema::<Profile>("profile");
	assert!(text.contains("optional") && text.contains("nickname"), "nullable field should print as optional:\n{text}");
	assert!(text.contains("required") && text.contains("id"), "non-nullable field should print as required:\n{text}");
}
