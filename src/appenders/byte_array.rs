use std::marker::PhantomData;
use std::borrow::Cow;

use bytes::Bytes;
use parquet::data_type::{ByteArray, ByteArrayType};

use crate::{error::{CoreError, CoreResult}, level_index::{LevelIndexState, LevelIndexList}};

use super::{ColumnAppenderBase, ColumnAppender, DynamicSerializedWriter};

/// Leaf appender for variable-length BYTE_ARRAY columns (STRING, JSON, BSON,
/// ENUM, BYTES, GEOMETRY, GEOGRAPHY, variable-width DECIMAL). Values are
/// copied into one contiguous buffer with per-value offsets rather than
/// allocating a `Vec<u8>` per row, then sliced out as zero-copy `Bytes` views
/// on flush.
pub struct ByteArrayColumnAppender<TPg, FCopyTo: Fn(&TPg, &mut Vec<u8>) -> Option<usize>> {
	max_dl: i16,
	max_rl: i16,
	byte_buffer: Vec<u8>,
	offsets: Vec<usize>,
	dls: Vec<i16>,
	rls: Vec<i16>,
	repetition_index: LevelIndexState,
	conversion: FCopyTo,
	_dummy: PhantomData<TPg>,
}

impl<TPg, FCopyTo: Fn(&TPg, &mut Vec<u8>) -> Option<usize>> ByteArrayColumnAppender<TPg, FCopyTo> {
	pub fn new(max_dl: i16, max_rl: i16, f_copy: FCopyTo) -> Self {
		if max_dl < 0 || max_rl < 0 {
			panic!("Cannot create {} with max_dl={}, max_rl={}", std::any::type_name::<Self>(), max_dl, max_rl);
		}
		ByteArrayColumnAppender {
			max_dl, max_rl,
			byte_buffer: Vec::new(),
			offsets: Vec::new(),
			_dummy: PhantomData,
			dls: Vec::new(),
			rls: Vec::new(),
			repetition_index: LevelIndexState::new(max_rl),
			conversion: f_copy,
		}
	}

	pub fn append(&mut self, repetition_index: &LevelIndexList, value: &TPg) -> usize {
		let index = self.byte_buffer.len();
		if let Some(len) = (self.conversion)(value, &mut self.byte_buffer) {
			debug_assert_eq!(index + len, self.byte_buffer.len());
			self.offsets.push(index);

			if self.max_dl > 0 {
				self.dls.push(self.max_dl);
			}
			if self.max_rl > 0 {
				let rl = self.repetition_index.copy_and_diff(repetition_index);
				self.rls.push(rl);
			}

			len + 2 * (self.max_dl > 0) as usize + 2 * (self.max_rl > 0) as usize
		} else {
			self.write_null_inner(repetition_index, self.max_dl - 1)
		}
	}

	fn write_null_inner(&mut self, repetition_index: &LevelIndexList, level: i16) -> usize {
		debug_assert!(level < self.max_dl);

		self.dls.push(level);
		if self.max_rl > 0 {
			let rl = self.repetition_index.copy_and_diff(repetition_index);
			self.rls.push(rl);
			4
		} else {
			2
		}
	}

	fn write_column(&mut self, writer: &mut parquet::file::writer::SerializedColumnWriter) -> parquet::errors::Result<()> {
		let dls = if self.max_dl > 0 { Some(self.dls.as_slice()) } else { None };
		let rls = if self.max_rl > 0 { Some(self.rls.as_slice()) } else { None };

		let writer_t = writer.typed::<ByteArrayType>();

		if self.offsets.is_empty() {
			assert_eq!(0, self.byte_buffer.len());
			writer_t.write_batch(&[], dls, rls)?;
			self.dls.clear();
			self.rls.clear();
			return Ok(());
		}

		let mut byte_array = Vec::new();
		std::mem::swap(&mut self.byte_buffer, &mut byte_array);
		let byte_array = Bytes::from(byte_array);

		let mut column: Vec<ByteArray> = vec![ByteArray::new(); self.offsets.len()];
		for ((&offset, &next), out) in self.offsets.iter().zip(self.offsets.iter().skip(1)).zip(column.iter_mut()) {
			let b: Bytes = byte_array.slice(offset..next);
			*out = ByteArray::from(b);
		}
		column[self.offsets.len() - 1] = ByteArray::from(byte_array.slice(*self.offsets.last().unwrap()..));

		let _num_written = writer_t.write_batch(&column, dls, rls)?;
		std::mem::drop(column);

		self.offsets.clear();
		assert_eq!(0, self.byte_buffer.len());
		self.dls.clear();
		self.rls.clear();

		Ok(())
	}
}

impl<TPg: Clone, FCopyTo: Fn(&TPg, &mut Vec<u8>) -> Option<usize>> ColumnAppenderBase for ByteArrayColumnAppender<TPg, FCopyTo> {

	fn write_columns<'b>(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()> {
		let mut error = None;
		let c = next_col.next_column(&mut |mut column| {
			let result = self.write_column(&mut column);
			let error1 = result.err();
			let result2 = column.close();

			error = error1.or(result2.err());
		}).map_err(|e| CoreError::Internal(format!("Could not create column[{}]: {}", column_i, e)))?;

		if let Some(error) = error {
			return Err(CoreError::Internal(format!("Couldn't write data of column[{}]: {}", column_i, error)));
		}

		if !c {
			return Err(CoreError::Internal("Not enough columns".to_string()));
		}

		Ok(())
	}

	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize> {
		Ok(self.write_null_inner(repetition_index, level))
	}

	fn max_dl(&self) -> i16 { self.max_dl }
	fn max_rl(&self) -> i16 { self.max_rl }
}

impl<TPg: Clone, FCopyTo: Fn(&TPg, &mut Vec<u8>) -> Option<usize>> ColumnAppender<TPg> for ByteArrayColumnAppender<TPg, FCopyTo> {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<TPg>) -> CoreResult<usize> {
		Ok(self.append(repetition_index, value.as_ref()))
	}
}
