//! End-to-end writer tests: derive a record type, write it to a real
//! temp-directory file, reopen it with the `parquet` crate directly and
//! check what landed on disk. Grounded on the richer-ambient-stack
//! example's `record_persist` writer test (`tests/writer.rs`): a temp
//! folder, a `begin()/record()/end()`-shaped write loop (here
//! `write_row`), then `flush()`/`close()`.
//!
//! The back half of this file reads rows back through the crate's own
//! `reader::Assembler` tree instead of stopping at raw row counts, the same
//! hand-wiring `main.rs`'s `build_order_summary_assembler` demonstrates:
//! column readers and `(max_dl, max_rl)` come off the row group's own
//! metadata, not recomputed independently.

use std::fs::File;
use std::sync::Arc;

use parquet::data_type::Int32Type;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, RowGroupReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type as ParquetType;
use parquet_reflect::config::{ListConvention, ReaderConfig, WriterConfig};
use parquet_reflect::error::CoreError;
use parquet_reflect::reader::{
	Assembler, AssemblerCons, AssemblerNil, GroupAssembler, LeafAssembler, LeafColumnReader, ListAssembler,
	OptionalGroup, RecordReader, RequiredLeaf, RequiredList,
};
use parquet_reflect::schema::{self, NamingStrategy, SchemaCursor};
use parquet_reflect::writer::{Writer, WriterSettings};
use parquet_reflect::{ParquetRecord, ParquetRecordWrite};

#[derive(Clone, ParquetRecord)]
struct Reading {
	sensor_id: i64,
	value: f64,
	label: String,
}

fn row_count(path: &std::path::Path) -> i64 {
	let file = File::open(path).expect("reopen written file");
	let reader = SerializedFileReader::new(file).expect("open file reader");
	(0..reader.num_row_groups())
		.map(|i| reader.get_row_group(i).expect("row group").metadata().num_rows())
		.sum()
}

#[test]
fn writes_expected_row_count() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("readings.parquet");

	let config = WriterConfig::default();
	let (schema, appender) = Reading::build_schema("reading", &config).expect("build schema");
	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	for i in 0..25i64 {
		writer
			.write_row(Reading { sensor_id: i, value: i as f64 * 1.5, label: format!("sensor-{i}") })
			.expect("write row");
	}
	let stats = writer.close().expect("close writer");

	assert_eq!(stats.rows, 25);
	assert_eq!(row_count(&path), 25);
}

#[derive(Clone, ParquetRecord)]
struct Contact {
	id: i64,
	note: Option<String>,
	tags: Vec<String>,
}

#[test]
fn writes_optional_and_list_fields_without_row_loss() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("contacts.parquet");

	let config = WriterConfig::default();
	let (schema, appender) = Contact::build_schema("contact", &config).expect("build schema");
	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	writer.write_row(Contact { id: 1, note: None, tags: vec![] }).expect("write row 1");
	writer
		.write_row(Contact { id: 2, note: Some("vip".to_string()), tags: vec!["a".to_string(), "b".to_string()] })
		.expect("write row 2");
	let stats = writer.close().expect("close writer");

	assert_eq!(stats.rows, 2);
	assert_eq!(row_count(&path), 2);
}

#[derive(Clone, ParquetRecord)]
struct PriceBook {
	symbol: String,
	#[parquet(decimal(precision = 10, scale = 4))]
	price: rust_decimal::Decimal,
}

#[test]
fn writes_decimal_field_at_requested_scale() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("prices.parquet");

	let config = WriterConfig::default();
	let (schema, appender) = PriceBook::build_schema("price_book", &config).expect("build schema");
	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	writer
		.write_row(PriceBook { symbol: "ABC".to_string(), price: rust_decimal::Decimal::new(123_4567, 4) })
		.expect("write row");
	let stats = writer.close().expect("close writer");

	assert_eq!(stats.rows, 1);
	assert_eq!(row_count(&path), 1);
}

fn open_row_group_reader(path: &std::path::Path) -> SerializedFileReader<File> {
	let file = File::open(path).expect("reopen written file");
	SerializedFileReader::new(file).expect("open file reader")
}

#[derive(Clone, ParquetRecord)]
struct Address {
	city: String,
	zip: i32,
}

#[derive(Clone, ParquetRecord)]
struct Person {
	id: i64,
	address: Option<Address>,
}

#[derive(Clone, Debug, PartialEq)]
struct PersonOut {
	id: i64,
	address: Option<(String, i32)>,
}

/// Column indices and `(max_dl, max_rl)` come straight off the row group's
/// own metadata, the same way `main.rs`'s `build_order_summary_assembler`
/// reads them back - nothing here is recomputed independently of what the
/// writer actually produced.
fn build_person_assembler(
	rg: &mut dyn RowGroupReader, config: &ReaderConfig,
) -> parquet_reflect::CoreResult<Box<dyn Assembler<PersonOut>>> {
	let columns = rg.metadata().columns().to_vec();

	let id_descr = columns[0].column_descr();
	let id_reader = LeafColumnReader::<parquet::data_type::Int64Type>::new(
		rg.get_column_reader(0)?, id_descr.max_def_level(), id_descr.max_rep_level(), config.batch_size,
	)?;
	let id_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(id_reader), id_descr.max_def_level(), |v: i64| v), "id");

	let city_descr = columns[1].column_descr();
	let city_reader = LeafColumnReader::<parquet::data_type::ByteArrayType>::new(
		rg.get_column_reader(1)?, city_descr.max_def_level(), city_descr.max_rep_level(), config.batch_size,
	)?;
	let city_asm = RequiredLeaf::new(
		LeafAssembler::new(Box::new(city_reader), city_descr.max_def_level(), |v: parquet::data_type::ByteArray| {
			String::from_utf8_lossy(v.data()).into_owned()
		}),
		"address.city",
	);

	let zip_descr = columns[2].column_descr();
	let zip_reader = LeafColumnReader::<Int32Type>::new(
		rg.get_column_reader(2)?, zip_descr.max_def_level(), zip_descr.max_rep_level(), config.batch_size,
	)?;
	let zip_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(zip_reader), zip_descr.max_def_level(), |v: i32| v), "address.zip");

	let address_chain = AssemblerCons::new(city_asm, AssemblerCons::new(zip_asm, AssemblerNil));
	let address_group = GroupAssembler::new(address_chain, |(city, (zip, ()))| (city, zip));
	// the group's own presence dl coincides with its first leaf's max_dl here
	// because every field inside `Address` is required (no further dl is
	// consumed below the group boundary).
	let address_asm = OptionalGroup::new(address_group, city_descr.max_def_level());

	let chain = AssemblerCons::new(id_asm, AssemblerCons::new(address_asm, AssemblerNil));
	Ok(Box::new(GroupAssembler::new(chain, |(id, (address, ()))| PersonOut { id, address })))
}

#[test]
fn nested_null_group_round_trips() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("people.parquet");

	let config = WriterConfig::default();
	let (schema, appender) = Person::build_schema("person", &config).expect("build schema");
	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	writer.write_row(Person { id: 1, address: None }).expect("write row 1");
	writer
		.write_row(Person { id: 2, address: Some(Address { city: "Prague".to_string(), zip: 11000 }) })
		.expect("write row 2");
	writer.close().expect("close writer");

	let file_reader = open_row_group_reader(&path);
	let mut reader =
		RecordReader::new(&file_reader, build_person_assembler, ReaderConfig::default()).expect("open record reader");

	let mut rows = Vec::new();
	while let Some(row) = reader.next_record().expect("read row") {
		rows.push(row);
	}

	assert_eq!(
		rows,
		vec![
			PersonOut { id: 1, address: None },
			PersonOut { id: 2, address: Some(("Prague".to_string(), 11000)) },
		]
	);
}

#[derive(Clone)]
struct Thing {
	id: i64,
	scores: Vec<Option<i32>>,
}

/// Built through the explicit `schema::` builder functions directly rather
/// than the derive macro - `Vec<Option<T>>` list elements (as opposed to a
/// field-level `nullable_element` flag on a `Vec<T>`) aren't a shape the
/// derive's syntax-driven dispatch produces, but the underlying `list_field`
/// happily shreds them once the element's own `FieldResult` is built with a
/// nullable accessor.
fn build_thing_schema(config: &WriterConfig) -> parquet_reflect::CoreResult<(ParquetType, parquet_reflect::appenders::DynColumnAppender<Thing>)> {
	let cursor = SchemaCursor::root(config.column_naming);

	let id_field = schema::int64_field(&cursor, "id", None, false, schema::required(|v: &Thing| v.id))?;

	let elem_cursor = cursor.enter_repeated_field("scores", None);
	let element = schema::int32_field(&elem_cursor, "element", None, true, schema::optional(|v: &Option<i32>| v.clone()))?;
	let scores_field = schema::list_field(
		&cursor, "scores", None, false, true,
		schema::required(|v: &Thing| v.scores.clone()),
		element, ListConvention::Three,
	)?;

	schema::group_field(&cursor, "thing", None, false, schema::required(|v: &Thing| v.clone()), vec![id_field, scores_field])
}

fn build_thing_assembler(
	rg: &mut dyn RowGroupReader, config: &ReaderConfig, list_dl: i16, list_rl: i16,
) -> parquet_reflect::CoreResult<Box<dyn Assembler<Thing>>> {
	let columns = rg.metadata().columns().to_vec();

	let id_descr = columns[0].column_descr();
	let id_reader = LeafColumnReader::<parquet::data_type::Int64Type>::new(
		rg.get_column_reader(0)?, id_descr.max_def_level(), id_descr.max_rep_level(), config.batch_size,
	)?;
	let id_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(id_reader), id_descr.max_def_level(), |v: i64| v), "id");

	let elem_descr = columns[1].column_descr();
	let elem_reader = LeafColumnReader::<Int32Type>::new(
		rg.get_column_reader(1)?, elem_descr.max_def_level(), elem_descr.max_rep_level(), config.batch_size,
	)?;
	let elem_asm = LeafAssembler::new(Box::new(elem_reader), elem_descr.max_def_level(), |v: i32| v);
	let list_asm = ListAssembler::new(elem_asm, list_dl, list_rl);
	let scores_asm = RequiredList::new(list_asm, "scores");

	let chain = AssemblerCons::new(id_asm, AssemblerCons::new(scores_asm, AssemblerNil));
	Ok(Box::new(GroupAssembler::new(chain, |(id, (scores, ()))| Thing { id, scores })))
}

#[test]
fn list_with_null_element_round_trips() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("things.parquet");

	let config = WriterConfig::default();
	let (schema, appender) = build_thing_schema(&config).expect("build schema");

	// same (dl, rl) pair `list_field`'s THREE-LEVEL arm derives internally
	// for a required list field, recovered from the cursor rather than
	// hand-guessed, so the assembler below can't silently drift from what
	// the writer actually produced.
	let scores_cursor = SchemaCursor::root(config.column_naming).enter_field("scores", None);
	let list_dl = scores_cursor.definition_level();
	let list_rl = scores_cursor.repetition_level();

	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	writer.write_row(Thing { id: 1, scores: vec![Some(10), None, Some(30)] }).expect("write row 1");
	writer.write_row(Thing { id: 2, scores: vec![] }).expect("write row 2");
	writer.write_row(Thing { id: 3, scores: vec![None] }).expect("write row 3");
	writer.close().expect("close writer");

	let file_reader = open_row_group_reader(&path);
	let build_root = move |rg: &mut dyn RowGroupReader, rc: &ReaderConfig| build_thing_assembler(rg, rc, list_dl, list_rl);
	let mut reader = RecordReader::new(&file_reader, build_root, ReaderConfig::default()).expect("open record reader");

	let mut rows = Vec::new();
	while let Some(row) = reader.next_record().expect("read row") {
		rows.push((row.id, row.scores));
	}

	assert_eq!(
		rows,
		vec![
			(1, vec![Some(10), None, Some(30)]),
			(2, vec![]),
			(3, vec![None]),
		]
	);
}

/// Built through the explicit `schema::` builder functions directly, like
/// `Thing` above - `map_field` takes already-shredded key/value `FieldResult`s
/// rather than deriving them from a collection's element type, so there's no
/// derive-macro syntax that produces this shape directly.
#[derive(Clone)]
struct Entries {
	id: i64,
	attrs: Vec<(Option<String>, Option<i32>)>,
}

#[test]
fn map_null_key_fails_with_invalid_record() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("entries.parquet");

	let config = WriterConfig::default();
	let cursor = SchemaCursor::root(config.column_naming);

	let entry_cursor = cursor.enter_repeated_field("attrs", None);
	let key = schema::string_field(&entry_cursor, "key", None, false, schema::required(|k: &String| k.clone())).expect("key field");
	let value = schema::int32_field(&entry_cursor, "value", None, true, schema::required(|v: &i32| *v)).expect("value field");

	let attrs_field = schema::map_field(
		&cursor, "attrs", None, false,
		schema::required(|v: &Entries| v.attrs.clone()),
		key, value,
	)
	.expect("map field");
	let id_field = schema::int64_field(&cursor, "id", None, false, schema::required(|v: &Entries| v.id)).expect("id field");
	let (schema_type, appender) = schema::group_field(
		&cursor, "entries", None, false, schema::required(|v: &Entries| v.clone()),
		vec![id_field, attrs_field],
	)
	.expect("group field");

	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema_type), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	let err = writer
		.write_row(Entries { id: 1, attrs: vec![(None, Some(1))] })
		.expect_err("null map key must be rejected");

	assert!(matches!(err, CoreError::InvalidRecord(_)), "expected InvalidRecord, got {err:?}");
}

use std::collections::BTreeSet;

#[derive(Clone, ParquetRecord)]
struct Tags {
	id: i64,
	labels: BTreeSet<i32>,
}

fn build_tags_assembler(
	rg: &mut dyn RowGroupReader, config: &ReaderConfig, list_dl: i16, list_rl: i16,
) -> parquet_reflect::CoreResult<Box<dyn Assembler<Tags>>> {
	let columns = rg.metadata().columns().to_vec();

	let id_descr = columns[0].column_descr();
	let id_reader = LeafColumnReader::<parquet::data_type::Int64Type>::new(
		rg.get_column_reader(0)?, id_descr.max_def_level(), id_descr.max_rep_level(), config.batch_size,
	)?;
	let id_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(id_reader), id_descr.max_def_level(), |v: i64| v), "id");

	let elem_descr = columns[1].column_descr();
	let elem_reader = LeafColumnReader::<Int32Type>::new(
		rg.get_column_reader(1)?, elem_descr.max_def_level(), elem_descr.max_rep_level(), config.batch_size,
	)?;
	let elem_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(elem_reader), elem_descr.max_def_level(), |v: i32| v), "labels.element");
	let list_asm = ListAssembler::new(elem_asm, list_dl, list_rl);
	let labels_asm = RequiredList::new(list_asm, "labels");

	let chain = AssemblerCons::new(id_asm, AssemblerCons::new(labels_asm, AssemblerNil));
	Ok(Box::new(GroupAssembler::new(chain, |(id, (labels, ()))| Tags { id, labels: labels.into_iter().collect() })))
}

#[test]
fn set_round_trips_as_list() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("tags.parquet");

	let config = WriterConfig::default();
	let (schema, appender) = Tags::build_schema("tags", &config).expect("build schema");

	if let ParquetType::GroupType { fields, .. } = &schema {
		let labels = fields.iter().find(|f| f.name() == "labels").expect("labels field in schema");
		assert_eq!(labels.get_basic_info().logical_type(), Some(parquet::basic::LogicalType::List), "SET must shred as LIST");
	} else {
		panic!("expected a group schema for the record root");
	}

	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	writer.write_row(Tags { id: 1, labels: BTreeSet::from([3, 1, 2]) }).expect("write row 1");
	writer.write_row(Tags { id: 2, labels: BTreeSet::new() }).expect("write row 2");
	writer.close().expect("close writer");

	let scores_cursor = SchemaCursor::root(config.column_naming).enter_field("labels", None);
	let list_dl = scores_cursor.definition_level();
	let list_rl = scores_cursor.repetition_level();

	let file_reader = open_row_group_reader(&path);
	let build_root = move |rg: &mut dyn RowGroupReader, rc: &ReaderConfig| build_tags_assembler(rg, rc, list_dl, list_rl);
	let mut reader = RecordReader::new(&file_reader, build_root, ReaderConfig::default()).expect("open record reader");

	let mut rows = Vec::new();
	while let Some(row) = reader.next_record().expect("read row") {
		rows.push(row);
	}

	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].id, 1);
	assert_eq!(rows[0].labels, BTreeSet::from([1, 2, 3]));
	assert_eq!(rows[1].id, 2);
	assert_eq!(rows[1].labels, BTreeSet::new());
}

#[derive(Clone, ParquetRecord)]
struct SensorReading {
	sensorId: i64,
	placedAt: i32,
}

#[test]
#[allow(non_snake_case)]
fn snake_case_naming_round_trips_by_column_order() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("sensor_readings.parquet");

	let mut config = WriterConfig::default();
	config.column_naming = NamingStrategy::SnakeCase;
	let (schema, appender) = SensorReading::build_schema("sensor_reading", &config).expect("build schema");

	if let ParquetType::GroupType { fields, .. } = &schema {
		let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
		assert_eq!(names, vec!["sensor_id", "placed_at"], "column_naming must rename each field to snake_case");
	} else {
		panic!("expected a group schema for the record root");
	}

	let props = Arc::new(WriterProperties::builder().build());
	let file = File::create(&path).expect("create file");
	let file_writer = SerializedFileWriter::new(file, Arc::new(schema), props).expect("open file writer");
	let mut writer = Writer::new(file_writer, appender, WriterSettings::default()).expect("open writer");

	writer.write_row(SensorReading { sensorId: 7, placedAt: 42 }).expect("write row 1");
	writer.write_row(SensorReading { sensorId: 8, placedAt: 43 }).expect("write row 2");
	let stats = writer.close().expect("close writer");

	assert_eq!(stats.rows, 2);
	assert_eq!(row_count(&path), 2);

	// naming only ever affects the on-disk column name, never column order
	// or values - read the two required columns back by index the same way
	// `build_order_summary_assembler` does, and check the values landed
	// untouched.
	let file_reader = open_row_group_reader(&path);
	let build_root = |rg: &mut dyn RowGroupReader, config: &ReaderConfig| -> parquet_reflect::CoreResult<Box<dyn Assembler<(i64, i32)>>> {
		let columns = rg.metadata().columns().to_vec();

		let id_descr = columns[0].column_descr();
		let id_reader = LeafColumnReader::<parquet::data_type::Int64Type>::new(
			rg.get_column_reader(0)?, id_descr.max_def_level(), id_descr.max_rep_level(), config.batch_size,
		)?;
		let id_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(id_reader), id_descr.max_def_level(), |v: i64| v), "sensor_id");

		let ts_descr = columns[1].column_descr();
		let ts_reader = LeafColumnReader::<Int32Type>::new(
			rg.get_column_reader(1)?, ts_descr.max_def_level(), ts_descr.max_rep_level(), config.batch_size,
		)?;
		let ts_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(ts_reader), ts_descr.max_def_level(), |v: i32| v), "placed_at");

		let chain = AssemblerCons::new(id_asm, AssemblerCons::new(ts_asm, AssemblerNil));
		Ok(Box::new(GroupAssembler::new(chain, |(id, (ts, ()))| (id, ts))))
	};
	let mut reader = RecordReader::new(&file_reader, build_root, ReaderConfig::default()).expect("open record reader");

	let mut rows = Vec::new();
	while let Some(row) = reader.next_record().expect("read row") {
		rows.push(row);
	}

	assert_eq!(rows, vec![(7, 42), (8, 43)]);
}
