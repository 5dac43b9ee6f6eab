use std::{borrow::Cow, cell::RefCell, io::Write, mem, sync::Arc};

use parquet::file::writer::SerializedFileWriter;
use tracing::{debug, info};

use crate::{
	appenders::{new_dynamic_serialized_writer, Arcell, DynColumnAppender},
	error::{CoreError, CoreResult},
	level_index::LevelIndexList,
};

#[derive(Debug, Clone, Default)]
pub struct WriterStats {
	pub rows: usize,
	pub bytes: usize,
	pub bytes_out: usize,
	pub groups: usize,
}

#[derive(Debug, Clone)]
pub struct WriterSettings {
	pub row_group_byte_limit: usize,
	pub row_group_row_limit: usize,
}

impl Default for WriterSettings {
	fn default() -> Self {
		WriterSettings {
			row_group_byte_limit: 128 * 1024 * 1024,
			row_group_row_limit: 1_000_000,
		}
	}
}

/// Drives one Parquet file end to end: buffers shredded columns for a row
/// group, flushes when either limit in `WriterSettings` is hit, and exposes
/// rolling throughput stats via `tracing` instead of the teacher's raw
/// `eprintln!` progress bar. Grounded on the teacher's `ParquetRowWriter`
/// lifecycle (`flush_group`/`write_row`/`close`), generalized from
/// `Arc<postgres::Row>` to an arbitrary record type `R`.
pub struct Writer<R, W: Write + Send> {
	writer: SerializedFileWriter<W>,
	appender: DynColumnAppender<R>,
	stats: WriterStats,
	last_timestep_stats: WriterStats,
	last_timestep_time: std::time::Instant,
	start_time: std::time::Instant,
	last_log_time: std::time::Instant,
	settings: WriterSettings,
	current_group_bytes: usize,
	current_group_rows: usize,
}

impl<R, W: Write + Send> Writer<R, W> {
	pub fn new(
		writer: SerializedFileWriter<W>,
		appender: DynColumnAppender<R>,
		settings: WriterSettings,
	) -> CoreResult<Self> {
		let start_time = std::time::Instant::now();
		Ok(Writer {
			writer,
			appender,
			stats: WriterStats::default(),
			last_timestep_stats: WriterStats::default(),
			last_timestep_time: start_time,
			last_log_time: start_time,
			start_time,
			settings,
			current_group_bytes: 0,
			current_group_rows: 0,
		})
	}

	fn flush_group(&mut self) -> CoreResult<()> {
		if self.current_group_rows == 0 {
			return Ok(());
		}

		let row_group_writer = self.writer.next_row_group()
			.map_err(|e| CoreError::Internal(format!("error creating row group: {}", e)))?;
		let row_group_writer: Arcell<_> = Arc::new(RefCell::new(Some(row_group_writer)));
		let mut dyn_writer = new_dynamic_serialized_writer(row_group_writer.clone());

		self.appender.write_columns(0, dyn_writer.as_mut())?;

		mem::drop(dyn_writer);
		let taken = RefCell::new(None);
		row_group_writer.swap(&taken);
		let row_group_writer = taken.into_inner().unwrap();
		let metadata = row_group_writer.close()
			.map_err(|e| CoreError::Internal(format!("error closing row group: {}", e)))?;

		self.stats.groups += 1;
		self.stats.bytes_out += metadata.compressed_size() as usize;
		self.current_group_bytes = 0;
		self.current_group_rows = 0;

		debug!(group = self.stats.groups, rows = self.stats.rows, "flushed row group");

		Ok(())
	}

	pub fn write_row(&mut self, row: R) -> CoreResult<()> {
		let lvl = LevelIndexList::new_i(self.stats.rows);
		let bytes = self.appender.copy_value(&lvl, Cow::Owned(row))?;

		self.current_group_bytes += bytes;
		self.current_group_rows += 1;
		self.stats.bytes += bytes;
		self.stats.rows += 1;

		if self.current_group_bytes >= self.settings.row_group_byte_limit
			|| self.current_group_rows >= self.settings.row_group_row_limit {
			self.flush_group()?;
		}

		if self.stats.rows % 4096 == 0 {
			self.log_progress();
		}

		Ok(())
	}

	fn log_progress(&mut self) {
		let now = std::time::Instant::now();
		if now.duration_since(self.last_log_time) < std::time::Duration::from_millis(300) {
			return;
		}
		let block_elapsed = now.duration_since(self.last_timestep_time);
		let block_rows = self.stats.rows - self.last_timestep_stats.rows;

		info!(
			rows = self.stats.rows,
			mib_raw = self.stats.bytes / 1024 / 1024,
			mib_parquet = self.stats.bytes_out / 1024 / 1024,
			groups = self.stats.groups,
			rows_per_s = format!("{:.0}", block_rows as f64 / block_elapsed.as_secs_f64()),
			"writer progress"
		);
		self.last_log_time = now;

		if block_elapsed > std::time::Duration::from_secs(60) {
			self.last_timestep_stats = self.stats.clone();
			self.last_timestep_time = now;
		}
	}

	pub fn stats(&self) -> WriterStats { self.stats.clone() }

	pub fn close(mut self) -> CoreResult<WriterStats> {
		self.flush_group()?;

		info!(
			rows = self.stats.rows,
			mib_raw = self.stats.bytes / 1024 / 1024,
			mib_parquet = self.stats.bytes_out / 1024 / 1024,
			groups = self.stats.groups,
			"writer finished"
		);

		self.writer.close().map_err(|e| CoreError::Internal(e.to_string()))?;

		Ok(self.stats)
	}
}
