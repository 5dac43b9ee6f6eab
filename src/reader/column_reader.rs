use parquet::column::reader::{get_typed_column_reader, ColumnReader};
use parquet::data_type::DataType;

use crate::error::{CoreError, CoreResult};

/// Batched reader over one physical column's `(value, definition_level,
/// repetition_level)` triples, with a one-triple lookahead so assemblers can
/// decide "does this belong to the row I'm building" before consuming it.
/// The read-side mirror of `GenericColumnAppender`'s buffered write: instead
/// of accumulating a row group's worth of values to flush, it pulls one
/// batch at a time from the `parquet` crate's typed column reader.
pub struct LeafColumnReader<TPq: DataType> {
	reader: parquet::column::reader::ColumnReaderImpl<TPq>,
	max_dl: i16,
	max_rl: i16,
	batch_size: usize,
	values: Vec<TPq::T>,
	def_levels: Vec<i16>,
	rep_levels: Vec<i16>,
	pos: usize,
	filled: usize,
	exhausted: bool,
}

impl<TPq: DataType> LeafColumnReader<TPq> {
	pub fn new(reader: ColumnReader, max_dl: i16, max_rl: i16, batch_size: usize) -> CoreResult<Self> {
		let reader = get_typed_column_reader::<TPq>(reader);
		Ok(LeafColumnReader {
			reader,
			max_dl,
			max_rl,
			batch_size,
			values: Vec::new(),
			def_levels: Vec::new(),
			rep_levels: Vec::new(),
			pos: 0,
			filled: 0,
			exhausted: false,
		})
	}

	fn fill(&mut self) -> CoreResult<()> {
		if self.pos < self.filled || self.exhausted {
			return Ok(());
		}

		self.values.resize(self.batch_size, TPq::T::default());
		self.def_levels.resize(self.batch_size, 0);
		self.rep_levels.resize(self.batch_size, 0);

		let def_out = if self.max_dl > 0 { Some(self.def_levels.as_mut_slice()) } else { None };
		let rep_out = if self.max_rl > 0 { Some(self.rep_levels.as_mut_slice()) } else { None };

		let (values_read, _levels_read) = self.reader
			.read_records(self.batch_size, def_out, rep_out, &mut self.values)
			.map_err(CoreError::Parquet)?;

		if self.max_dl == 0 {
			self.def_levels[..self.batch_size].fill(self.max_dl);
		}
		if self.max_rl == 0 {
			self.rep_levels[..self.batch_size].fill(0);
		}

		self.pos = 0;
		self.filled = self.batch_size.min(self.def_levels.iter().take(self.batch_size).count());
		if values_read == 0 && self.filled == 0 {
			self.exhausted = true;
			self.filled = 0;
		}
		Ok(())
	}

	/// Looks at the next triple without consuming it.
	pub fn peek(&mut self) -> CoreResult<Option<(i16, i16)>> {
		self.fill()?;
		if self.pos >= self.filled {
			return Ok(None);
		}
		Ok(Some((self.def_levels[self.pos], self.rep_levels[self.pos])))
	}

	/// Consumes and returns the next triple's value (only meaningful when
	/// `definition_level == max_dl`; callers must check `peek()` first).
	pub fn consume(&mut self) -> CoreResult<(TPq::T, i16, i16)> {
		self.fill()?;
		if self.pos >= self.filled {
			return Err(CoreError::Internal("read past end of column".to_string()));
		}
		let v = self.values[self.pos].clone();
		let d = self.def_levels[self.pos];
		let r = self.rep_levels[self.pos];
		self.pos += 1;
		Ok((v, d, r))
	}

	pub fn max_dl(&self) -> i16 { self.max_dl }
	pub fn max_rl(&self) -> i16 { self.max_rl }
}
