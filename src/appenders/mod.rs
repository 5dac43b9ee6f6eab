mod core;
mod generic;
mod real_memory_size;
mod array;
mod merged;
mod helpers;
mod byte_array;
mod fixed_byte_array;
mod field;
mod map;

pub use self::core::*;
pub use generic::GenericColumnAppender;
pub use array::{ArrayColumnAppender, Nullable};
pub use real_memory_size::RealMemorySize;
pub use merged::{DynamicMergedAppender, StaticMergedAppender, DynRowAppender, new_static_merged_appender};
pub use helpers::{PreprocessAppender, PreprocessExt, RcWrapperAppender};
pub use byte_array::ByteArrayColumnAppender;
pub use fixed_byte_array::FixedByteArrayColumnAppender;
pub use field::{Accessor, FieldAppender};
pub use map::MapColumnAppender;
