use std::borrow::Cow;

use crate::{error::{CoreError, CoreResult}, level_index::LevelIndexList};

use super::{ColumnAppender, ColumnAppenderBase, DynamicSerializedWriter};

/// Shreds a MAP field as the fixed `repeated group key_value { required key;
/// optional value }` encoding (shredder rule 9). Built by analogy with
/// `ArrayColumnAppender`: a MAP is a LIST of key/value pairs, with two inner
/// appenders sharing the same repetition index instead of one.
pub struct MapColumnAppender<K: Clone, V: Clone, KInner: ColumnAppender<K>, VInner: ColumnAppender<V>> {
	key: KInner,
	value: VInner,
	dl: i16,
	rl: i16,
	allow_null: bool,
	_dummy: std::marker::PhantomData<(K, V)>,
}

impl<K: Clone, V: Clone, KInner: ColumnAppender<K>, VInner: ColumnAppender<V>> MapColumnAppender<K, V, KInner, VInner> {
	pub fn new(key: KInner, value: VInner, allow_null: bool, dl: i16, rl: i16) -> Self {
		if key.max_rl() != rl + 1 || value.max_rl() != rl + 1 {
			panic!("Cannot create {}, key/value repetition levels must be one more than map's own rl={}", std::any::type_name::<Self>(), rl);
		}
		if key.max_dl() != dl + 1 {
			panic!("Cannot create {}, key definition level {} must be map's dl+1 ({})", std::any::type_name::<Self>(), key.max_dl(), dl + 1);
		}
		if value.max_dl() != dl + 2 {
			panic!("Cannot create {}, value definition level {} must be map's dl+2 ({})", std::any::type_name::<Self>(), value.max_dl(), dl + 2);
		}
		if dl < allow_null as i16 {
			panic!("Cannot create {}, definition level {} must be positive", std::any::type_name::<Self>(), dl);
		}

		MapColumnAppender { key, value, dl, rl, allow_null, _dummy: std::marker::PhantomData }
	}
}

impl<K: Clone, V: Clone, KInner: ColumnAppender<K>, VInner: ColumnAppender<V>> ColumnAppenderBase for MapColumnAppender<K, V, KInner, VInner> {
	fn write_null(&mut self, repetition_index: &LevelIndexList, level: i16) -> CoreResult<usize> {
		assert!(level <= self.dl);
		let nested_ri = repetition_index.new_child();
		let a = self.key.write_null(&nested_ri, level)?;
		let b = self.value.write_null(&nested_ri, level)?;
		Ok(a + b)
	}

	fn max_dl(&self) -> i16 { self.dl }
	fn max_rl(&self) -> i16 { self.rl }

	fn write_columns<'b>(&mut self, column_i: usize, next_col: &mut dyn DynamicSerializedWriter) -> CoreResult<()> {
		self.key.write_columns(column_i, next_col)?;
		self.value.write_columns(column_i + 1, next_col)
	}
}

/// Shredded as a sequence of `(key, value)` pairs; `key == None` triggers
/// `InvalidRecord` (map keys are required, invariant 2).
impl<K, V, KInner, VInner, M, TItem> ColumnAppender<M> for MapColumnAppender<K, V, KInner, VInner>
	where K: Clone, V: Clone, KInner: ColumnAppender<K>, VInner: ColumnAppender<V>,
		  M: IntoIterator<Item = TItem> + Clone,
		  TItem: Into<(Option<K>, Option<V>)> {

	fn copy_value(&mut self, repetition_index: &LevelIndexList, map: Cow<M>) -> CoreResult<usize> {
		let mut bytes_written = 0;
		let mut nested_ri = repetition_index.new_child();

		for item in map.into_owned().into_iter() {
			let (key, value): (Option<K>, Option<V>) = item.into();
			let key = key.ok_or_else(|| CoreError::InvalidRecord("map key must not be null".to_string()))?;

			bytes_written += self.key.copy_value(&nested_ri, Cow::Owned(key))?;
			bytes_written += self.value.copy_value_opt(&nested_ri, Cow::Owned(value))?;
			nested_ri.inc();
		}

		if nested_ri.index == 0 {
			// empty map is written as null at DL=1, same rule as empty list (rule 6)
			bytes_written += self.key.write_null(&nested_ri, self.dl)?;
			bytes_written += self.value.write_null(&nested_ri, self.dl)?;
		}
		Ok(bytes_written)
	}

	fn copy_value_opt(&mut self, repetition_index: &LevelIndexList, value: Cow<Option<M>>) -> CoreResult<usize> {
		match value {
			Cow::Owned(Some(value)) => self.copy_value(repetition_index, Cow::<M>::Owned(value)),
			Cow::Borrowed(Some(value)) => self.copy_value(repetition_index, Cow::Borrowed(value)),
			Cow::Owned(None) | Cow::Borrowed(None) => {
				let nested_ri = repetition_index.new_child();
				let a = self.key.write_null(&nested_ri, self.dl - self.allow_null as i16)?;
				let b = self.value.write_null(&nested_ri, self.dl - self.allow_null as i16)?;
				Ok(a + b)
			},
		}
	}
}
