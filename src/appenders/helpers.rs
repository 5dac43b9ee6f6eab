use std::{borrow::Cow, marker::PhantomData, sync::Arc};

use crate::{error::CoreResult, level_index::LevelIndexList};

use super::{ColumnAppender, ColumnAppenderBase, DynamicSerializedWriter};

/// Adapts an appender of `T2` into one accepting `T1`, by running every value
/// through `f` first. Used to plug a primitive appender under a field whose
/// Rust type needs a cheap reshape before it matches the appender's input
/// type (e.g. an enum variant name vs. its underlying string).
pub struct PreprocessAppender<T1: Clone, T2: Clone, Appender2: ColumnAppender<T2>, F: Fn(Cow<T1>) -> Cow<T2>> {
	appender: Appender2,
	f: F,
	_dummy: PhantomData<(T1, T2)>
}
impl<T1: Clone, T2: Clone, Appender2: ColumnAppender<T2>, F: Fn(Cow<T1>) -> Cow<T2>> PreprocessAppender<T1, T2, Appender2, F> {
	pub fn new(appender: Appender2, f: F) -> Self {
		PreprocessAppender { appender, f, _dummy: PhantomData }
	}
}
impl<T1: Clone, T2: Clone, Appender2: ColumnAppender<T2>, F: Fn(Cow<T1>) -> Cow<T2>> ColumnAppenderBase for PreprocessAppender<T1, T2, Appender2, F> {
	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize> {
		self.appender.write_null(repetition_index, level)
	}

	fn write_columns<'b>(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()> {
		self.appender.write_columns(column_i, next_col)
	}

	fn max_dl(&self) -> i16 {
		self.appender.max_dl()
	}

	fn max_rl(&self) -> i16 {
		self.appender.max_rl()
	}
}
impl<T1: Clone, T2: Clone, Appender2: ColumnAppender<T2>, F: Fn(Cow<T1>) -> Cow<T2>> ColumnAppender<T1> for PreprocessAppender<T1, T2, Appender2, F> {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<T1>) -> CoreResult<usize> {
		self.appender.copy_value(repetition_index, (self.f)(value))
	}
}
pub trait PreprocessExt<T2: Clone, Appender2: ColumnAppender<T2>> {
	fn preprocess<T1: Clone, F: Fn(Cow<T1>) -> Cow<T2>>(self, f: F) -> PreprocessAppender<T1, T2, Appender2, F>;
}
impl<T2: Clone, Appender2: ColumnAppender<T2>> PreprocessExt<T2, Appender2> for Appender2 {
	fn preprocess<T1: Clone, F: Fn(Cow<T1>) -> Cow<T2>>(self, f: F) -> PreprocessAppender<T1, T2, Appender2, F> {
		PreprocessAppender::new(self, f)
	}
}

/// Wraps an appender that expects `Arc<T>` so it can be driven by owned `T`
/// values, cloning into a fresh `Arc` on each row. Useful when a nested group's
/// own children want to share one parent value by reference rather than each
/// re-cloning it from the field accessor.
pub struct RcWrapperAppender<T, TInner: ColumnAppender<Arc<T>>> {
	pub inner: TInner,
	pub dummy: PhantomData<T>
}
impl<T, TInner: ColumnAppender<Arc<T>>> RcWrapperAppender<T, TInner> {
	pub fn new(inner: TInner) -> Self {
		Self { inner, dummy: PhantomData }
	}
}
impl<T, TInner: ColumnAppender<Arc<T>>> ColumnAppenderBase for RcWrapperAppender<T, TInner> {
	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize> {
		self.inner.write_null(repetition_index, level)
	}

	fn write_columns<'b>(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()> {
		self.inner.write_columns(column_i, next_col)
	}

	fn max_dl(&self) -> i16 { self.inner.max_dl() }

	fn max_rl(&self) -> i16 { self.inner.max_rl() }
}
impl<T: Clone, TInner: ColumnAppender<Arc<T>>> ColumnAppender<T> for RcWrapperAppender<T, TInner> {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<T>) -> CoreResult<usize> {
		let arc = Arc::new(value.into_owned());
		let cow = Cow::Owned(arc);
		self.inner.copy_value(repetition_index, cow)
	}
}
