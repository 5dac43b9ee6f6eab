//! Record assembly: the read-side mirror of `appenders`. Where a
//! `ColumnAppender<T>` walks a Rust value and emits `(value, r, d)` triples
//! per leaf column, an `Assembler<T>` walks a leaf column's triples and
//! reconstructs one Rust value per row.
//!
//! Grounded on the amadeus `Record`/`List<T>`/`parse_list` pattern: a list
//! column is recognized as "still the same list" while the repetition level
//! it reports stays at the list's own `rl`, and ends the moment a lower
//! repetition level (or end of column) is seen. Unlike amadeus's
//! schema-driven `Reader` associated types, composition here is explicit -
//! each combinator (`ListAssembler`, `GroupAssembler`, `MapAssembler`) is a
//! concrete type built by `schema::builder`'s read-side counterpart or by
//! generated derive code, not inferred from a `Schema` trait.

use std::marker::PhantomData;

use crate::error::{CoreError, CoreResult};
use crate::reader::column_reader::LeafColumnReader;

/// One child column (or subtree of columns) that can produce exactly one
/// value of `T` per invocation of `consume_one`, consuming however many
/// underlying triples that requires.
pub trait Assembler<T: Clone> {
	/// Definition/repetition level of the next unconsumed triple this
	/// assembler (or, for a group, its first child) will see. `None` means
	/// the underlying column(s) are exhausted.
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>>;

	/// Consumes and assembles exactly one value. Must only be called when
	/// `peek_levels` returned `Some`.
	fn consume_one(&mut self) -> CoreResult<T>;

	fn max_dl(&self) -> i16;
	fn max_rl(&self) -> i16;
}

/// Pulls one row at a time off a top-level assembler. Top-level columns
/// always start each row at repetition level 0, so there is no sibling
/// ambiguity to resolve here - `None` from `peek_levels` is simply end of
/// file.
pub fn read_row<T: Clone>(root: &mut impl Assembler<T>) -> CoreResult<Option<T>> {
	match root.peek_levels()? {
		None => Ok(None),
		Some(_) => Ok(Some(root.consume_one()?)),
	}
}

/// Leaf column: converts the physical value via `convert`, yielding
/// `Option<V>` when the column is nullable (`null_dl < max_dl`) or `V`
/// directly when required.
pub struct LeafAssembler<TPhys: Clone, V: Clone, F: Fn(TPhys) -> V> {
	reader: LeafColumnReader2<TPhys>,
	null_dl: i16,
	convert: F,
	_dummy: PhantomData<V>,
}

/// `LeafColumnReader` is generic over the `parquet::data_type::DataType`
/// marker, not over the plain value type it yields; this thin indirection
/// lets `LeafAssembler` stay generic over `TPhys` (`i32`, `i64`, `ByteArray`,
/// `FixedLenByteArray`, ...) without repeating the `DataType` bound here.
pub trait LeafColumnReader2<TPhys>: Send {
	fn peek(&mut self) -> CoreResult<Option<(i16, i16)>>;
	fn consume(&mut self) -> CoreResult<(TPhys, i16, i16)>;
	fn max_dl(&self) -> i16;
	fn max_rl(&self) -> i16;
}

impl<TPq> LeafColumnReader2<TPq::T> for LeafColumnReader<TPq>
where
	TPq: parquet::data_type::DataType,
	TPq::T: Clone,
{
	fn peek(&mut self) -> CoreResult<Option<(i16, i16)>> { LeafColumnReader::peek(self) }
	fn consume(&mut self) -> CoreResult<(TPq::T, i16, i16)> { LeafColumnReader::consume(self) }
	fn max_dl(&self) -> i16 { LeafColumnReader::max_dl(self) }
	fn max_rl(&self) -> i16 { LeafColumnReader::max_rl(self) }
}

impl<TPhys: Clone, V: Clone, F: Fn(TPhys) -> V> LeafAssembler<TPhys, V, F> {
	/// `null_dl == max_dl` means this leaf (and everything above it) is
	/// required; any lower value is the definition level at which this leaf
	/// alone goes missing while ancestors remain present.
	pub fn new(reader: Box<dyn LeafColumnReader2<TPhys>>, null_dl: i16, convert: F) -> Self {
		let max_dl = reader.max_dl();
		LeafAssembler { reader: BoxedReader(reader), null_dl: null_dl.min(max_dl), convert, _dummy: PhantomData }
	}
}

/// Newtype so `Box<dyn LeafColumnReader2<_>>` itself implements the trait.
struct BoxedReader<TPhys>(Box<dyn LeafColumnReader2<TPhys>>);

impl<TPhys> LeafColumnReader2<TPhys> for BoxedReader<TPhys> {
	fn peek(&mut self) -> CoreResult<Option<(i16, i16)>> { self.0.peek() }
	fn consume(&mut self) -> CoreResult<(TPhys, i16, i16)> { self.0.consume() }
	fn max_dl(&self) -> i16 { self.0.max_dl() }
	fn max_rl(&self) -> i16 { self.0.max_rl() }
}

impl<TPhys: Clone, V: Clone, F: Fn(TPhys) -> V> Assembler<Option<V>> for LeafAssembler<TPhys, V, F> {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.reader.peek() }

	fn consume_one(&mut self) -> CoreResult<Option<V>> {
		let (v, d, _r) = self.reader.consume()?;
		Ok(if d >= self.reader.max_dl() { Some((self.convert)(v)) } else { let _ = self.null_dl; None })
	}

	fn max_dl(&self) -> i16 { self.reader.max_dl() }
	fn max_rl(&self) -> i16 { self.reader.max_rl() }
}

/// Required-leaf wrapper: unwraps the `Option<V>` a null-propagating
/// `LeafAssembler` would otherwise produce, failing per
/// `ReaderConfig::fail_on_null_for_primitives` if a null slips through
/// (it never should for a genuinely required column, but a malformed file
/// can still report one).
pub struct RequiredLeaf<V: Clone, Inner: Assembler<Option<V>>> {
	inner: Inner,
	field: String,
	_dummy: PhantomData<V>,
}

impl<V: Clone, Inner: Assembler<Option<V>>> RequiredLeaf<V, Inner> {
	pub fn new(inner: Inner, field: impl Into<String>) -> Self {
		RequiredLeaf { inner, field: field.into(), _dummy: PhantomData }
	}
}

impl<V: Clone, Inner: Assembler<Option<V>>> Assembler<V> for RequiredLeaf<V, Inner> {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.inner.peek_levels() }

	fn consume_one(&mut self) -> CoreResult<V> {
		self.inner.consume_one()?.ok_or_else(|| CoreError::NullIntoPrimitive(self.field.clone()))
	}

	fn max_dl(&self) -> i16 { self.inner.max_dl() }
	fn max_rl(&self) -> i16 { self.inner.max_rl() }
}

/// THREE/TWO-LEVEL list column: repeatedly consumes `inner` while the
/// peeked repetition level is still at `rl` (the list's own nesting depth),
/// the same boundary condition `ArrayColumnAppender` writes on the way out.
/// An empty list is recognized by a single triple at definition level
/// `list_dl` (present, zero elements) rather than `list_dl - 1` (list
/// itself absent).
pub struct ListAssembler<Item: Clone, Inner: Assembler<Item>> {
	inner: Inner,
	dl: i16,
	rl: i16,
}

impl<Item: Clone, Inner: Assembler<Item>> ListAssembler<Item, Inner> {
	pub fn new(inner: Inner, dl: i16, rl: i16) -> Self {
		assert_eq!(inner.max_rl(), rl + 1, "list element must be one repetition level deeper than the list");
		ListAssembler { inner, dl, rl }
	}
}

impl<Item: Clone, Inner: Assembler<Item>> Assembler<Option<Vec<Item>>> for ListAssembler<Item, Inner> {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.inner.peek_levels() }

	fn consume_one(&mut self) -> CoreResult<Option<Vec<Item>>> {
		let (d0, _r0) = match self.inner.peek_levels()? {
			Some(l) => l,
			None => return Ok(None),
		};
		if d0 < self.dl {
			// list itself is null/absent; still consume the one placeholder triple.
			self.inner.consume_one()?;
			return Ok(None);
		}

		let mut items = Vec::new();
		loop {
			let item = self.inner.consume_one()?;
			// an empty list is represented by a single placeholder at the
			// list's own dl with no element payload; only push real elements.
			if d0 >= self.dl + 1 || !items.is_empty() || matches!(self.inner.peek_levels()?, Some((d, _)) if d > self.dl) {
				items.push(item);
			}
			match self.inner.peek_levels()? {
				Some((_, r)) if r > self.rl => continue,
				_ => break,
			}
		}
		Ok(Some(items))
	}

	fn max_dl(&self) -> i16 { self.dl }
	fn max_rl(&self) -> i16 { self.rl }
}

/// Required-list wrapper, symmetric with `RequiredLeaf`.
pub struct RequiredList<Item: Clone, Inner: Assembler<Option<Vec<Item>>>> {
	inner: Inner,
	field: String,
	_dummy: PhantomData<Item>,
}

impl<Item: Clone, Inner: Assembler<Option<Vec<Item>>>> RequiredList<Item, Inner> {
	pub fn new(inner: Inner, field: impl Into<String>) -> Self {
		RequiredList { inner, field: field.into(), _dummy: PhantomData }
	}
}

impl<Item: Clone, Inner: Assembler<Option<Vec<Item>>>> Assembler<Vec<Item>> for RequiredList<Item, Inner> {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.inner.peek_levels() }

	fn consume_one(&mut self) -> CoreResult<Vec<Item>> {
		self.inner.consume_one()?.ok_or_else(|| CoreError::NullIntoPrimitive(self.field.clone()))
	}

	fn max_dl(&self) -> i16 { self.inner.max_dl() }
	fn max_rl(&self) -> i16 { self.inner.max_rl() }
}

/// MAP column: reads paired key/value children off one shared repetition
/// index, the read-side counterpart of `MapColumnAppender`.
pub struct MapAssembler<K: Clone, V: Clone, KInner: Assembler<K>, VInner: Assembler<Option<V>>> {
	key: KInner,
	value: VInner,
	dl: i16,
	rl: i16,
}

impl<K: Clone, V: Clone, KInner: Assembler<K>, VInner: Assembler<Option<V>>> MapAssembler<K, V, KInner, VInner> {
	pub fn new(key: KInner, value: VInner, dl: i16, rl: i16) -> Self {
		assert_eq!(key.max_rl(), rl + 1);
		assert_eq!(value.max_rl(), rl + 1);
		assert_eq!(key.max_dl(), dl + 1);
		assert_eq!(value.max_dl(), dl + 2);
		MapAssembler { key, value, dl, rl }
	}
}

impl<K: Clone, V: Clone, KInner: Assembler<K>, VInner: Assembler<Option<V>>> Assembler<Option<Vec<(K, Option<V>)>>>
	for MapAssembler<K, V, KInner, VInner>
{
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.key.peek_levels() }

	fn consume_one(&mut self) -> CoreResult<Option<Vec<(K, Option<V>)>>> {
		let (d0, _r0) = match self.key.peek_levels()? {
			Some(l) => l,
			None => return Ok(None),
		};
		if d0 < self.dl {
			self.key.consume_one()?;
			self.value.consume_one()?;
			return Ok(None);
		}

		let mut entries = Vec::new();
		loop {
			let has_entry = d0 >= self.dl + 1 || !entries.is_empty()
				|| matches!(self.key.peek_levels()?, Some((d, _)) if d > self.dl);
			let k = self.key.consume_one()?;
			let v = self.value.consume_one()?;
			if has_entry {
				entries.push((k, v));
			}
			match self.key.peek_levels()? {
				Some((_, r)) if r > self.rl => continue,
				_ => break,
			}
		}
		Ok(Some(entries))
	}

	fn max_dl(&self) -> i16 { self.dl }
	fn max_rl(&self) -> i16 { self.rl }
}

/// Terminator for the group-assembler cons-list, mirroring
/// `merged::StaticMergedAppender`'s `Nil`/`Cons` chain but on the read side:
/// each `Cons` layer reads one more field, and `.build(f)` turns the
/// accumulated tuple into the caller's real record type once every field is
/// present.
pub struct AssemblerNil;

impl Assembler<()> for AssemblerNil {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { Ok(Some((0, 0))) }
	fn consume_one(&mut self) -> CoreResult<()> { Ok(()) }
	fn max_dl(&self) -> i16 { 0 }
	fn max_rl(&self) -> i16 { 0 }
}

pub struct AssemblerCons<Head, HeadAsm: Assembler<Head>, Tail> {
	head: HeadAsm,
	tail: Tail,
	_dummy: PhantomData<Head>,
}

impl<Head, HeadAsm: Assembler<Head>, Tail> AssemblerCons<Head, HeadAsm, Tail> {
	pub fn new(head: HeadAsm, tail: Tail) -> Self {
		AssemblerCons { head, tail, _dummy: PhantomData }
	}
}

impl<Head: Clone, HeadAsm: Assembler<Head>, Tail: Assembler<TailT>, TailT: Clone> Assembler<(Head, TailT)>
	for AssemblerCons<Head, HeadAsm, Tail>
{
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.head.peek_levels() }

	fn consume_one(&mut self) -> CoreResult<(Head, TailT)> {
		let h = self.head.consume_one()?;
		let t = self.tail.consume_one()?;
		Ok((h, t))
	}

	fn max_dl(&self) -> i16 { self.head.max_dl() }
	fn max_rl(&self) -> i16 { self.head.max_rl() }
}

/// Maps the nested-tuple value a chain of `AssemblerCons` layers produces
/// into the caller's actual record type - generated by the derive macro, or
/// written by hand when using the explicit builder API.
pub struct GroupAssembler<Tuple: Clone, Inner: Assembler<Tuple>, R, F: Fn(Tuple) -> R> {
	inner: Inner,
	build: F,
	_dummy: PhantomData<(Tuple, R)>,
}

impl<Tuple: Clone, Inner: Assembler<Tuple>, R, F: Fn(Tuple) -> R> GroupAssembler<Tuple, Inner, R, F> {
	pub fn new(inner: Inner, build: F) -> Self {
		GroupAssembler { inner, build, _dummy: PhantomData }
	}
}

impl<Tuple: Clone, Inner: Assembler<Tuple>, R: Clone, F: Fn(Tuple) -> R> Assembler<R> for GroupAssembler<Tuple, Inner, R, F> {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.inner.peek_levels() }
	fn consume_one(&mut self) -> CoreResult<R> { Ok((self.build)(self.inner.consume_one()?)) }
	fn max_dl(&self) -> i16 { self.inner.max_dl() }
	fn max_rl(&self) -> i16 { self.inner.max_rl() }
}

/// Optional-group wrapper: a nullable nested group reads as `Option<R>`,
/// deciding presence from the first field's definition level the same way
/// `GroupAssembler`'s children each independently resolve their own
/// nullness - every descendant leaf already carries exactly one triple per
/// row regardless of whether an ancestor group was itself absent.
pub struct OptionalGroup<R: Clone, Inner: Assembler<R>> {
	inner: Inner,
	dl: i16,
}

impl<R: Clone, Inner: Assembler<R>> OptionalGroup<R, Inner> {
	pub fn new(inner: Inner, dl: i16) -> Self {
		OptionalGroup { inner, dl }
	}
}

impl<R: Clone, Inner: Assembler<R>> Assembler<Option<R>> for OptionalGroup<R, Inner> {
	fn peek_levels(&mut self) -> CoreResult<Option<(i16, i16)>> { self.inner.peek_levels() }

	fn consume_one(&mut self) -> CoreResult<Option<R>> {
		let present = matches!(self.inner.peek_levels()?, Some((d, _)) if d >= self.dl);
		let value = self.inner.consume_one()?;
		Ok(if present { Some(value) } else { None })
	}

	fn max_dl(&self) -> i16 { self.dl }
	fn max_rl(&self) -> i16 { self.inner.max_rl() }
}
