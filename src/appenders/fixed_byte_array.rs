use std::marker::PhantomData;
use std::borrow::Cow;

use bytes::Bytes;
use parquet::data_type::{ByteArray, FixedLenByteArray, FixedLenByteArrayType};

use crate::{error::{CoreError, CoreResult}, level_index::{LevelIndexList, LevelIndexState}};

use super::{ColumnAppenderBase, ColumnAppender, DynamicSerializedWriter};

/// Leaf appender for FIXED_LEN_BYTE_ARRAY columns of a known constant width
/// (UUID's 16 bytes, the Parquet INTERVAL encoding's 12 bytes, fixed-precision
/// DECIMAL backed by binary rather than INT32/INT64).
pub struct FixedByteArrayColumnAppender<TPg, FCopyTo: Fn(&TPg, &mut [u8]) -> CoreResult<Option<usize>>> {
	max_dl: i16,
	max_rl: i16,
	length: usize,
	byte_buffer: Vec<u8>,
	dls: Vec<i16>,
	rls: Vec<i16>,
	repetition_index: LevelIndexState,
	conversion: FCopyTo,
	_dummy: PhantomData<TPg>,
}

impl<TPg, FCopyTo: Fn(&TPg, &mut [u8]) -> CoreResult<Option<usize>>> FixedByteArrayColumnAppender<TPg, FCopyTo> {
	pub fn new(max_dl: i16, max_rl: i16, length: usize, f_copy: FCopyTo) -> Self {
		if max_dl < 0 || max_rl < 0 {
			panic!("Cannot create {} with max_dl={}, max_rl={}", std::any::type_name::<Self>(), max_dl, max_rl);
		}
		FixedByteArrayColumnAppender {
			max_dl, max_rl,
			byte_buffer: Vec::new(),
			length,
			_dummy: PhantomData,
			dls: Vec::new(),
			rls: Vec::new(),
			repetition_index: LevelIndexState::new(max_rl),
			conversion: f_copy,
		}
	}

	pub fn append(&mut self, repetition_index: &LevelIndexList, value: &TPg) -> CoreResult<usize> {
		let index = self.byte_buffer.len();
		Ok(if let Some(len) = (self.conversion)(value, vec_tail(&mut self.byte_buffer, self.length))? {
			debug_assert_eq!(index + len, self.byte_buffer.len());

			if self.max_dl > 0 {
				self.dls.push(self.max_dl);
			}
			if self.max_rl > 0 {
				let rl = self.repetition_index.copy_and_diff(repetition_index);
				self.rls.push(rl);
			}

			len + 2 * (self.max_dl > 0) as usize + 2 * (self.max_rl > 0) as usize
		} else {
			self.byte_buffer.truncate(index);
			self.write_null_inner(repetition_index, self.max_dl - 1)
		})
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

		let writer_t = writer.typed::<FixedLenByteArrayType>();

		if self.byte_buffer.is_empty() {
			writer_t.write_batch(&[], dls, rls)?;
			self.dls.clear();
			self.rls.clear();
			return Ok(());
		}

		let mut byte_array = Vec::new();
		std::mem::swap(&mut self.byte_buffer, &mut byte_array);
		let byte_array = Bytes::from(byte_array);

		let mut column: Vec<FixedLenByteArray> = vec![FixedLenByteArray::default(); byte_array.len() / self.length];
		for (i, out) in column.iter_mut().enumerate() {
			let b: Bytes = byte_array.slice(i * self.length..(i + 1) * self.length);
			*out = FixedLenByteArray::from(ByteArray::from(b));
		}

		let _num_written = writer_t.write_batch(&column, dls, rls)?;
		std::mem::drop((column, byte_array));

		assert_eq!(0, self.byte_buffer.len());
		self.dls.clear();
		self.rls.clear();

		Ok(())
	}
}

/// Reserves `length` extra zero bytes at the end of `buf` and returns a
/// mutable view over just that tail, so a conversion closure can fill a
/// fixed-width slot in place without knowing the buffer's existing length.
fn vec_tail(buf: &mut Vec<u8>, length: usize) -> &mut [u8] {
	let start = buf.len();
	buf.resize(start + length, 0);
	&mut buf[start..]
}

impl<TPg: Clone, FCopyTo: Fn(&TPg, &mut [u8]) -> CoreResult<Option<usize>>> ColumnAppenderBase for FixedByteArrayColumnAppender<TPg, FCopyTo> {

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

impl<TPg: Clone, FCopyTo: Fn(&TPg, &mut [u8]) -> CoreResult<Option<usize>>> ColumnAppender<TPg> for FixedByteArrayColumnAppender<TPg, FCopyTo> {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<TPg>) -> CoreResult<usize> {
		self.append(repetition_index, value.as_ref())
	}
}
