use std::{marker::PhantomData, sync::Arc, borrow::Cow};

use crate::{error::{CoreError, CoreResult}, level_index::LevelIndexList};

use super::{ColumnAppender, ColumnAppenderBase, DynamicSerializedWriter};

/// A field-accessor closure: extracts this leaf/group/list/map's value out of
/// its parent record. The Rust analogue of a reflective row-column lookup -
/// here the lookup is a compiled closure captured once at write-model
/// construction instead of a runtime column-index dereference.
pub type Accessor<R, V> = Arc<dyn Fn(&R) -> Option<V> + Send + Sync>;

/// Plugs one field of parent record `R` into an appender built for the
/// field's own value type `V`. This is the single adapter used for leaves,
/// nested groups, lists and maps alike: whatever `V` is (a primitive, a
/// `Vec<T>`, an `Arc<SubGroup>`, a `HashMap<K, W>`), the accessor returns
/// `Option<V>` and the inner appender already knows how to shred a `V`.
pub struct FieldAppender<R, V: Clone, TInner: ColumnAppender<V>> {
	name: String,
	accessor: Accessor<R, V>,
	appender: TInner,
	_dummy: PhantomData<R>,
}

impl<R, V: Clone, TInner: ColumnAppender<V>> FieldAppender<R, V, TInner> {
	pub fn new(name: impl Into<String>, accessor: Accessor<R, V>, appender: TInner) -> Self {
		FieldAppender { name: name.into(), accessor, appender, _dummy: PhantomData }
	}
}

impl<R, V: Clone, TInner: ColumnAppender<V>> ColumnAppenderBase for FieldAppender<R, V, TInner> {
	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize> {
		self.appender.write_null(repetition_index, level)
	}

	fn write_columns(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()> {
		self.appender.write_columns(column_i, next_col)
	}

	fn max_dl(&self) -> i16 { self.appender.max_dl() }
	fn max_rl(&self) -> i16 { self.appender.max_rl() }
}

impl<R, V: Clone, TInner: ColumnAppender<V>> ColumnAppender<R> for FieldAppender<R, V, TInner> {
	fn copy_value(&mut self, repetition_index: &LevelIndexList, value: Cow<R>) -> CoreResult<usize> {
		let extracted = (self.accessor)(value.as_ref());

		if self.appender.max_dl() == 0 {
			// shredder rule 1: a required leaf/group/list seeing null fails
			// the whole write instead of silently writing an empty value
			match extracted {
				None => Err(CoreError::RequiredFieldNull { field: self.name.clone() }),
				Some(v) => self.appender.copy_value(repetition_index, Cow::Owned(v)),
			}
		} else {
			// shredder rule 2: optional leaf/group/list, null is representable
			self.appender.copy_value_opt(repetition_index, Cow::Owned(extracted))
		}
	}
}
