//! Small demo CLI exercising the `parquet_reflect` library: builds a write
//! model for a sample record type via `#[derive(ParquetRecord)]`, shreds a
//! handful of rows into a Parquet file, then reads them back and prints
//! them out. Not a generic ETL tool - see the teacher
//! (`pg2parquet`) for that; this binary exists so the library has a
//! runnable example of its own public API.

use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use parquet::data_type::{ByteArray, ByteArrayType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{RowGroupReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet_reflect::config::{CompressionConfig, ReaderConfig, WriterConfig};
use parquet_reflect::reader::{
	Assembler, AssemblerCons, AssemblerNil, GroupAssembler, LeafAssembler, LeafColumnReader, RecordReader,
	RequiredLeaf,
};
use parquet_reflect::writer::{Writer, WriterSettings};
use parquet_reflect::{CoreResult, ParquetRecord, ParquetRecordWrite};
use tracing_subscriber::EnvFilter;

#[cfg(not(any(target_family = "windows", target_arch = "riscv64")))]
use jemallocator::Jemalloc;

#[cfg(not(any(target_family = "windows", target_arch = "riscv64")))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Clone, ParquetRecord)]
struct Order {
	id: i64,
	customer_name: String,
	placed_at: chrono::DateTime<chrono::Utc>,
	#[parquet(decimal(precision = 12, scale = 2))]
	total: rust_decimal::Decimal,
	notes: Option<String>,
	tags: Vec<String>,
	line_item_counts: HashMap<String, i32>,
}

/// What `read_command` reconstructs: a projection onto `Order`'s two
/// required scalar columns, assembled by hand to show the `reader` API
/// without needing a read-side derive (the macro only generates the write
/// model - see `ParquetRecordWrite`).
#[derive(Clone, Debug)]
struct OrderSummary {
	id: i64,
	customer_name: String,
}

/// Builds the assembler tree for one row group's `id`/`customer_name`
/// columns. Column indices and `(max_dl, max_rl)` come straight from the
/// row group's own metadata rather than being recomputed by hand, the same
/// way `parquetinfo::print_parquet_info` (in the teacher) reads them back.
fn build_order_summary_assembler(
	rg: &mut dyn RowGroupReader, config: &ReaderConfig,
) -> CoreResult<Box<dyn Assembler<OrderSummary>>> {
	let columns = rg.metadata().columns().to_vec();

	let id_descr = columns[0].column_descr();
	let id_reader = LeafColumnReader::<Int64Type>::new(
		rg.get_column_reader(0)?,
		id_descr.max_def_level(),
		id_descr.max_rep_level(),
		config.batch_size,
	)?;
	let id_asm = RequiredLeaf::new(LeafAssembler::new(Box::new(id_reader), id_descr.max_def_level(), |v: i64| v), "id");

	let name_descr = columns[1].column_descr();
	let name_reader = LeafColumnReader::<ByteArrayType>::new(
		rg.get_column_reader(1)?,
		name_descr.max_def_level(),
		name_descr.max_rep_level(),
		config.batch_size,
	)?;
	let name_asm = RequiredLeaf::new(
		LeafAssembler::new(Box::new(name_reader), name_descr.max_def_level(), |v: ByteArray| {
			String::from_utf8_lossy(v.data()).into_owned()
		}),
		"customer_name",
	);

	let chain = AssemblerCons::new(id_asm, AssemblerCons::new(name_asm, AssemblerNil));
	Ok(Box::new(GroupAssembler::new(chain, |(id, (customer_name, ()))| OrderSummary { id, customer_name })))
}

fn sample_orders() -> Vec<Order> {
	vec![
		Order {
			id: 1,
			customer_name: "Alvin Sato".to_string(),
			placed_at: chrono::Utc::now(),
			total: rust_decimal::Decimal::new(12999, 2),
			notes: None,
			tags: vec!["priority".to_string()],
			line_item_counts: HashMap::from([("widget".to_string(), 3)]),
		},
		Order {
			id: 2,
			customer_name: "Beatrix Nolan".to_string(),
			placed_at: chrono::Utc::now(),
			total: rust_decimal::Decimal::new(499, 2),
			notes: Some("gift wrap".to_string()),
			tags: vec![],
			line_item_counts: HashMap::new(),
		},
	]
}

#[derive(Parser, Debug)]
#[command(name = "parquet-reflect-demo")]
#[command(bin_name = "parquet-reflect-demo")]
struct Cli {
	#[command(subcommand)]
	command: DemoCommand,
}

#[derive(Subcommand, Debug)]
enum DemoCommand {
	/// Writes the built-in sample dataset to a Parquet file.
	Write(WriteArgs),
	/// Reads a Parquet file written by `write` back and prints each row.
	Read(ReadArgs),
	/// Prints the schema the sample record type builds, without writing a file.
	Schema,
}

#[derive(clap::Args, Debug)]
struct WriteArgs {
	/// Path to the output file. Overwritten if it already exists.
	#[arg(long, short = 'o')]
	output_file: PathBuf,
	/// Compression applied to the output file.
	#[arg(long, value_enum, default_value_t = CliCompression::Zstd)]
	compression: CliCompression,
}

#[derive(clap::Args, Debug)]
struct ReadArgs {
	input_file: PathBuf,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum CliCompression {
	None,
	Snappy,
	Gzip,
	Zstd,
	Brotli,
	Lz4,
}

impl From<CliCompression> for CompressionConfig {
	fn from(c: CliCompression) -> Self {
		match c {
			CliCompression::None => CompressionConfig::None,
			CliCompression::Snappy => CompressionConfig::Snappy,
			CliCompression::Gzip => CompressionConfig::Gzip { level: 6 },
			CliCompression::Zstd => CompressionConfig::Zstd { level: 3 },
			CliCompression::Brotli => CompressionConfig::Brotli { level: 3 },
			CliCompression::Lz4 => CompressionConfig::Lz4,
		}
	}
}

fn handle_result<T, E: ToString>(r: Result<T, E>) -> T {
	match r {
		Ok(v) => v,
		Err(e) => {
			eprintln!("error: {}", e.to_string());
			process::exit(1);
		},
	}
}

fn write_command(args: WriteArgs) {
	let writer_config = WriterConfig { compression: args.compression.into(), ..WriterConfig::default() };

	let (schema, appender) = handle_result(Order::build_schema("order", &writer_config));

	let compression = handle_result(writer_config.compression.to_parquet());
	let props = Arc::new(
		WriterProperties::builder()
			.set_compression(compression)
			.set_created_by(format!("parquet-reflect-demo {}", env!("CARGO_PKG_VERSION")))
			.build(),
	);

	let file = handle_result(File::create(&args.output_file));
	let file_writer = handle_result(SerializedFileWriter::new(file, Arc::new(schema), props));

	let mut writer = handle_result(Writer::new(file_writer, appender, WriterSettings::default()));
	for order in sample_orders() {
		handle_result(writer.write_row(order));
	}
	let stats = handle_result(writer.close());

	tracing::info!(rows = stats.rows, groups = stats.groups, bytes_out = stats.bytes_out, "wrote sample dataset");
}

fn schema_command() {
	let writer_config = WriterConfig::default();
	let (schema, _) = handle_result(Order::build_schema("order", &writer_config));
	println!("{:#?}", schema);
}

fn read_command(args: ReadArgs) {
	let file = handle_result(File::open(&args.input_file));
	let file_reader = handle_result(SerializedFileReader::new(file));

	let mut reader = handle_result(RecordReader::new(
		&file_reader,
		build_order_summary_assembler,
		ReaderConfig::default(),
	));

	let mut count = 0usize;
	while let Some(row) = handle_result(reader.next_record()) {
		println!("{:>4}  {}", row.id, row.customer_name);
		count += 1;
	}
	println!("read {} row(s)", count);
}

fn main() {
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

	let default_hook = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |x| {
		default_hook(x);
		eprintln!();
		eprintln!("parquet-reflect-demo crashed; please include the backtrace above when reporting this.");
	}));

	let cli = Cli::parse();
	match cli.command {
		DemoCommand::Write(args) => write_command(args),
		DemoCommand::Read(args) => read_command(args),
		DemoCommand::Schema => schema_command(),
	}
}
