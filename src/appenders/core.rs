use std::{borrow::Cow, sync::Arc, cell::RefCell, io::Write};

use parquet::file::writer::{SerializedColumnWriter, SerializedRowGroupWriter};

use crate::{error::CoreResult, level_index::LevelIndexList};

/// Operations every node of the appender tree supports regardless of the value
/// type it shreds: null propagation down to its leaves and writing accumulated
/// column buffers out once a row group is full.
pub trait ColumnAppenderBase {
	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize>;

	fn write_columns<'b>(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()>;

	fn max_dl(&self) -> i16;
	fn max_rl(&self) -> i16;
}

/// A node of the shredder tree that knows how to emit `(value, r, d)` triples
/// for one Rust value type `T`. Implementors range from a single primitive
/// column (`GenericColumnAppender`) to a whole nested group (`DynamicMergedAppender`).
pub trait ColumnAppender<T: Clone>: ColumnAppenderBase {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<T>) -> CoreResult<usize>;

	/// Default entry point for optional fields (shredder rules 1/2): present
	/// values are forwarded, absent ones are turned into a null write at one
	/// definition level below this appender's ceiling.
	fn copy_value_opt(&mut self, repetition_index: &LevelIndexList, value: Cow<Option<T>>) -> CoreResult<usize> {
		match value {
			Cow::Owned(Some(value)) => self.copy_value(repetition_index, Cow::<T>::Owned(value)),
			Cow::Borrowed(Some(value)) => self.copy_value(repetition_index, Cow::Borrowed(value)),
			Cow::Owned(None) | Cow::Borrowed(None) => {
				assert_ne!(self.max_dl(), 0, "copy_value_opt called with None on a required appender; required-leaf nullness must be checked by the caller so it can raise RequiredFieldNull");
				self.write_null(repetition_index, self.max_dl() - 1)
			},
		}
	}
}

pub type DynColumnAppender<T> = Box<dyn ColumnAppender<T>>;

impl<T> ColumnAppenderBase for DynColumnAppender<T> {
	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize> {
		self.as_mut().write_null(repetition_index, level)
	}

	fn write_columns<'b>(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()> {
		self.as_mut().write_columns(column_i, next_col)
	}

	fn max_dl(&self) -> i16 {
		self.as_ref().max_dl()
	}

	fn max_rl(&self) -> i16 {
		self.as_ref().max_rl()
	}
}

impl<T: Clone> ColumnAppender<T> for DynColumnAppender<T> {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<T>) -> CoreResult<usize> {
		self.as_mut().copy_value(repetition_index, value)
	}
}

pub type Arcell<T> = Arc<RefCell<T>>;

/// Helper trait that lets a tree of appenders pull the next physical column
/// writer out of the row group without each node knowing the row group's
/// lifetime parameter.
pub trait DynamicSerializedWriter {
	fn next_column(&mut self, callback: &mut dyn FnMut(SerializedColumnWriter<'_>)) -> parquet::errors::Result<bool>;
}
struct DynamicSerializedWriterImpl<'a, W: Write> {
	writer: Arcell<Option<SerializedRowGroupWriter<'a, W>>>
}
impl<'a, W: Write> DynamicSerializedWriter for DynamicSerializedWriterImpl<'a, W> {
	fn next_column(&mut self, callback: &mut dyn FnMut(SerializedColumnWriter<'_>)) -> parquet::errors::Result<bool> {
		let mut writer = self.writer.borrow_mut();
		let writer2 = writer.as_mut().unwrap();
		let col = writer2.next_column()?;
		match col {
			None => Ok(false),
			Some(col) => {
				callback(col);
				Ok(true)
			}
		}
	}
}

pub fn new_dynamic_serialized_writer<'a, W: Write>(writer: Arcell<Option<SerializedRowGroupWriter<'a, W>>>) -> Box<dyn DynamicSerializedWriter + 'a> {
	Box::new(DynamicSerializedWriterImpl::<'a, W> { writer })
}
