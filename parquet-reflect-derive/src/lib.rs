//! Derives `parquet_reflect::ParquetRecordWrite` for a struct with named
//! fields, generating the same shape of code the teacher's
//! `record_persist_derive::persist_derive` hand-rolls for `Persistable`:
//! one schema/appender-building expression per field, folded into a single
//! function body. Where that macro dispatches purely on a `Persistable`
//! trait implemented for every field type (including structs, via this
//! same derive), this one dispatches on field-type *syntax* instead - Vec,
//! HashMap, Option and a closed list of scalar type names each map to one
//! of `schema::builder`'s explicit field functions, and anything else is
//! assumed to itself derive `ParquetRecordWrite` and is composed via
//! `group_field`. Syntax-driven dispatch avoids a blanket trait impl that
//! would conflict with the concrete scalar impls under Rust's orphan rules
//! (`Vec<u8>` is an instance of `Vec<T>`, so a generic "any Vec is a list"
//! rule and a concrete "Vec<u8> is bytes" rule cannot both exist as trait
//! impls without overlapping).

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, Lit, Meta, NestedMeta, PathArguments, Type};

#[proc_macro_derive(ParquetRecord, attributes(parquet))]
pub fn derive_parquet_record(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	let name = &input.ident;

	let fields = match &input.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(fields) => &fields.named,
			_ => {
				return syn::Error::new_spanned(&input, "ParquetRecord only supports structs with named fields")
					.to_compile_error()
					.into();
			},
		},
		_ => {
			return syn::Error::new_spanned(&input, "ParquetRecord only supports structs")
				.to_compile_error()
				.into();
		},
	};

	let mut field_exprs = Vec::new();
	for field in fields.iter() {
		let attrs = match FieldAttrs::parse(&field.attrs) {
			Ok(a) => a,
			Err(e) => return e.to_compile_error().into(),
		};
		if attrs.skip {
			continue;
		}
		let field_ident = field.ident.as_ref().expect("named field");
		let raw_name = field_ident.to_string();
		let accessor = quote_spanned! {field.span()=>
			::parquet_reflect::schema::required(|v: &#name| v.#field_ident.clone())
		};
		let expr = build_field_expr(&field.ty, &raw_name, &attrs, &accessor, name);
		field_exprs.push(expr);
	}

	let expanded = quote! {
		impl ::parquet_reflect::ParquetRecordWrite for #name {
			fn build_fields(
				cursor: &::parquet_reflect::schema::SchemaCursor,
				config: &::parquet_reflect::config::WriterConfig,
			) -> ::parquet_reflect::CoreResult<Vec<::parquet_reflect::schema::FieldResult<Self>>> {
				Ok(vec![
					#(#field_exprs?,)*
				])
			}
		}
	};

	TokenStream::from(expanded)
}

struct FieldAttrs {
	skip: bool,
	rename: Option<String>,
	as_enum: bool,
	as_json: bool,
	as_bson: bool,
	time_unit: Option<String>,
	decimal: Option<(u32, u32)>,
	decimal_rounding: Option<String>,
	nullable_element: bool,
}

impl FieldAttrs {
	fn empty() -> Self {
		FieldAttrs {
			skip: false,
			rename: None,
			as_enum: false,
			as_json: false,
			as_bson: false,
			time_unit: None,
			decimal: None,
			decimal_rounding: None,
			nullable_element: false,
		}
	}

	fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
		let mut out = FieldAttrs::empty();
		for attr in attrs {
			if !attr.path.is_ident("parquet") {
				continue;
			}
			let meta = attr.parse_meta()?;
			let list = match meta {
				Meta::List(l) => l,
				_ => continue,
			};
			for nested in list.nested {
				match nested {
					NestedMeta::Meta(Meta::Path(p)) if p.is_ident("skip") => out.skip = true,
					NestedMeta::Meta(Meta::Path(p)) if p.is_ident("enum") => out.as_enum = true,
					NestedMeta::Meta(Meta::Path(p)) if p.is_ident("json") => out.as_json = true,
					NestedMeta::Meta(Meta::Path(p)) if p.is_ident("bson") => out.as_bson = true,
					NestedMeta::Meta(Meta::Path(p)) if p.is_ident("nullable_element") => out.nullable_element = true,
					NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("rename") => {
						if let Lit::Str(s) = nv.lit {
							out.rename = Some(s.value());
						}
					},
					NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("time_unit") => {
						if let Lit::Str(s) = nv.lit {
							out.time_unit = Some(s.value());
						}
					},
					NestedMeta::Meta(Meta::List(l)) if l.path.is_ident("decimal") => {
						let mut precision = None;
						let mut scale = None;
						for inner in l.nested {
							if let NestedMeta::Meta(Meta::NameValue(nv)) = inner {
								if let Lit::Int(i) = &nv.lit {
									let v: u32 = i.base10_parse()?;
									if nv.path.is_ident("precision") { precision = Some(v); }
									if nv.path.is_ident("scale") { scale = Some(v); }
								}
								if nv.path.is_ident("rounding") {
									if let Lit::Str(s) = &nv.lit {
										out.decimal_rounding = Some(s.value());
									}
								}
							}
						}
						out.decimal = Some((precision.unwrap_or(38), scale.unwrap_or(0)));
					},
					_ => {},
				}
			}
		}
		Ok(out)
	}
}

/// Recursively builds the expression for one field (or one list
/// element / map key / map value, when called from within the `Vec`/
/// `HashMap` branches below). `accessor` is an already-built
/// `Accessor<Parent, FieldTy>` expression.
fn build_field_expr(ty: &Type, raw_name: &str, attrs: &FieldAttrs, accessor: &TokenStream2, _parent_ty: &syn::Ident) -> TokenStream2 {
	if let Some(inner) = unwrap_single_generic(ty, "Option") {
		let inner_accessor = quote! {
			{
				let outer = #accessor;
				let f = ::std::sync::Arc::new(move |r: &_| (outer)(r).flatten());
				f
			}
		};
		return build_field_expr_nullable(inner, raw_name, attrs, &inner_accessor, true);
	}

	build_field_expr_nullable(ty, raw_name, attrs, accessor, false)
}

fn build_field_expr_nullable(ty: &Type, raw_name: &str, attrs: &FieldAttrs, accessor: &TokenStream2, nullable: bool) -> TokenStream2 {
	let alias = match &attrs.rename {
		Some(r) => quote! { Some(#r) },
		None => quote! { None },
	};

	let type_name = last_segment_name(ty);

	if type_name.as_deref() == Some("Decimal") {
		let (p, s) = match attrs.decimal {
			Some((p, s)) => (quote! { #p }, quote! { #s }),
			None => (quote! { config.default_decimal_precision }, quote! { config.default_decimal_scale }),
		};
		let rounding = rounding_tokens(attrs);
		return quote! {
			::parquet_reflect::schema::decimal_field(cursor, #raw_name, #alias, #nullable, #p, #s, #rounding, #accessor)
		};
	}

	if attrs.as_enum {
		return quote! { ::parquet_reflect::schema::enum_field(cursor, #raw_name, #alias, #nullable, #accessor) };
	}
	if attrs.as_json {
		return quote! { ::parquet_reflect::schema::json_field(cursor, #raw_name, #alias, #nullable, #accessor) };
	}
	if attrs.as_bson {
		return quote! { ::parquet_reflect::schema::bson_field(cursor, #raw_name, #alias, #nullable, #accessor) };
	}

	if let Some(t) = &type_name {
		match t.as_str() {
			"bool" => return quote! { ::parquet_reflect::schema::bool_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"i8" | "i16" | "i32" => return quote! { ::parquet_reflect::schema::int32_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"i64" | "isize" => return quote! { ::parquet_reflect::schema::int64_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"f32" => return quote! { ::parquet_reflect::schema::float32_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"f64" => return quote! { ::parquet_reflect::schema::float64_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"String" => return quote! { ::parquet_reflect::schema::string_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"Uuid" => return quote! { ::parquet_reflect::schema::uuid_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"NaiveDate" => return quote! { ::parquet_reflect::schema::date_field(cursor, #raw_name, #alias, #nullable, #accessor) },
			"NaiveDateTime" => {
				let unit = time_unit_tokens(attrs);
				return quote! { ::parquet_reflect::schema::timestamp_local_field(cursor, #raw_name, #alias, #nullable, #unit, #accessor) };
			},
			"DateTime" => {
				let unit = time_unit_tokens(attrs);
				return quote! { ::parquet_reflect::schema::timestamp_utc_field(cursor, #raw_name, #alias, #nullable, #unit, #accessor) };
			},
			"Vec" => {
				if let Some(elem_ty) = unwrap_single_generic(ty, "Vec") {
					if last_segment_name(elem_ty).as_deref() == Some("u8") && !attrs.as_json && !attrs.as_bson {
						return quote! { ::parquet_reflect::schema::bytes_field(cursor, #raw_name, #alias, #nullable, #accessor) };
					}
					return list_like_field_expr(elem_ty, raw_name, &alias, nullable, attrs, accessor);
				}
			},
			// SET is shredded exactly as LIST - the core makes no ordering
			// guarantee beyond "all elements of a given set appear
			// contiguously for a given parent row".
			"HashSet" => {
				if let Some(elem_ty) = unwrap_single_generic(ty, "HashSet") {
					return list_like_field_expr(elem_ty, raw_name, &alias, nullable, attrs, accessor);
				}
			},
			"BTreeSet" => {
				if let Some(elem_ty) = unwrap_single_generic(ty, "BTreeSet") {
					return list_like_field_expr(elem_ty, raw_name, &alias, nullable, attrs, accessor);
				}
			},
			"HashMap" => {
				if let Some((key_ty, val_ty)) = unwrap_map_generics(ty) {
					let entry_cursor = quote! { cursor.enter_repeated_field(#raw_name, #alias) };
					let key_accessor = quote! { ::parquet_reflect::schema::required(|k: &#key_ty| k.clone()) };
					let val_accessor = quote! { ::parquet_reflect::schema::required(|v: &#val_ty| v.clone()) };
					let no_attrs = FieldAttrs::empty();
					let key_expr = build_field_expr_nullable(key_ty, "key", &no_attrs, &key_accessor, false);
					let val_expr = build_field_expr_nullable(val_ty, "value", &no_attrs, &val_accessor, true);
					return quote! {
						{
							let entry_cursor = #entry_cursor;
							let key = (|cursor: &::parquet_reflect::schema::SchemaCursor, config: &::parquet_reflect::config::WriterConfig| #key_expr)(&entry_cursor, config)?;
							let value = (|cursor: &::parquet_reflect::schema::SchemaCursor, config: &::parquet_reflect::config::WriterConfig| #val_expr)(&entry_cursor, config)?;
							let entries_accessor: ::parquet_reflect::schema::Accessor<_, ::std::vec::Vec<(::std::option::Option<#key_ty>, ::std::option::Option<#val_ty>)>> = {
								let outer = #accessor;
								::std::sync::Arc::new(move |r| (outer)(r).map(|m: ::std::collections::HashMap<#key_ty, #val_ty>| {
									m.into_iter().map(|(k, v)| (::std::option::Option::Some(k), ::std::option::Option::Some(v))).collect()
								}))
							};
							::parquet_reflect::schema::map_field(cursor, #raw_name, #alias, #nullable, entries_accessor, key, value)
						}
					};
				}
			},
			_ => {},
		}
	}

	// Fallthrough: assume a nested record type deriving `ParquetRecord` itself.
	quote! {
		{
			let nested_cursor = cursor.enter_field(#raw_name, #alias);
			let nested_fields = <#ty as ::parquet_reflect::ParquetRecordWrite>::build_fields(&nested_cursor, config)?;
			::parquet_reflect::schema::group_field(cursor, #raw_name, #alias, #nullable, #accessor, nested_fields)
		}
	}
}

/// Shared codegen for `Vec<T>`/`HashSet<T>`/`BTreeSet<T>` fields - all three
/// shred through `schema::list_field`, since a Rust collection's own
/// `IntoIterator<Item = T>` is all the array appender needs. Element
/// nullability only applies under the THREE-LEVEL convention (TWO/ONE-LEVEL
/// have no slot for it), so the effective flag - and whether the element
/// itself was built as nullable - is resolved from `config.level_convention`
/// at write time, not at macro-expansion time.
fn list_like_field_expr(elem_ty: &Type, raw_name: &str, alias: &TokenStream2, nullable: bool, attrs: &FieldAttrs, accessor: &TokenStream2) -> TokenStream2 {
	let elem_cursor = quote! { cursor.enter_repeated_field(#raw_name, #alias) };
	let elem_accessor = quote! {
		::parquet_reflect::schema::required(|v: &#elem_ty| v.clone())
	};
	let no_attrs = FieldAttrs::empty();
	let wants_nullable_element = attrs.nullable_element;
	let elem_expr_nullable = build_field_expr_nullable(elem_ty, "element", &no_attrs, &elem_accessor, true);
	let elem_expr_required = build_field_expr_nullable(elem_ty, "element", &no_attrs, &elem_accessor, false);
	quote! {
		{
			let element_cursor = #elem_cursor;
			let allow_element_null = #wants_nullable_element && config.level_convention == ::parquet_reflect::config::ListConvention::Three;
			let element = if allow_element_null {
				(|cursor: &::parquet_reflect::schema::SchemaCursor, config: &::parquet_reflect::config::WriterConfig| #elem_expr_nullable)(&element_cursor, config)?
			} else {
				(|cursor: &::parquet_reflect::schema::SchemaCursor, config: &::parquet_reflect::config::WriterConfig| #elem_expr_required)(&element_cursor, config)?
			};
			::parquet_reflect::schema::list_field(cursor, #raw_name, #alias, #nullable, allow_element_null, #accessor, element, config.level_convention)
		}
	}
}

fn rounding_tokens(attrs: &FieldAttrs) -> TokenStream2 {
	match attrs.decimal_rounding.as_deref() {
		Some("half_up") => quote! { ::parquet_reflect::config::RoundingMode::HalfUp },
		Some("half_even") => quote! { ::parquet_reflect::config::RoundingMode::HalfEven },
		Some("truncate") => quote! { ::parquet_reflect::config::RoundingMode::Truncate },
		Some("reject") => quote! { ::parquet_reflect::config::RoundingMode::Reject },
		Some(other) => {
			let msg = format!("unknown decimal rounding `{}`, expected half_up/half_even/truncate/reject", other);
			quote! { compile_error!(#msg) }
		},
		None => quote! { config.decimal_rounding },
	}
}

fn time_unit_tokens(attrs: &FieldAttrs) -> TokenStream2 {
	match attrs.time_unit.as_deref() {
		Some("millis") => quote! { ::parquet_reflect::TimeUnit::Millis },
		Some("nanos") => quote! { ::parquet_reflect::TimeUnit::Nanos },
		Some("micros") | None => quote! { ::parquet_reflect::TimeUnit::Micros },
		Some(other) => {
			let msg = format!("unknown time_unit `{}`, expected millis/micros/nanos", other);
			quote! { compile_error!(#msg) }
		},
	}
}

fn last_segment_name(ty: &Type) -> Option<String> {
	match ty {
		Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
		_ => None,
	}
}

fn unwrap_single_generic<'a>(ty: &'a Type, name: &str) -> Option<&'a Type> {
	let Type::Path(p) = ty else { return None };
	let seg = p.path.segments.last()?;
	if seg.ident != name {
		return None;
	}
	let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
	args.args.iter().find_map(|a| match a {
		GenericArgument::Type(t) => Some(t),
		_ => None,
	})
}

fn unwrap_map_generics(ty: &Type) -> Option<(&Type, &Type)> {
	let Type::Path(p) = ty else { return None };
	let seg = p.path.segments.last()?;
	if seg.ident != "HashMap" {
		return None;
	}
	let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
	let mut types = args.args.iter().filter_map(|a| match a {
		GenericArgument::Type(t) => Some(t),
		_ => None,
	});
	Some((types.next()?, types.next()?))
}
