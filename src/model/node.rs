use crate::types::LogicalType;

/// A shape-only description of one write-model node, independent of the
/// concrete Rust types the derive macro or explicit builder used to produce
/// it. The shredder never looks at this tree - it only exists so tooling
/// (schema printers, `main.rs`'s demo CLI, diagnostics) has something to
/// render without threading the appenders' generic parameters around.
#[derive(Debug, Clone)]
pub enum Node {
	Leaf { name: String, logical_type: LogicalType, nullable: bool },
	Group { name: String, nullable: bool, fields: Vec<Node> },
	List { name: String, nullable: bool, allow_element_null: bool, element: Box<Node> },
	Map { name: String, nullable: bool, key: Box<Node>, value: Box<Node> },
}

impl Node {
	pub fn name(&self) -> &str {
		match self {
			Node::Leaf { name, .. } => name,
			Node::Group { name, .. } => name,
			Node::List { name, .. } => name,
			Node::Map { name, .. } => name,
		}
	}

	pub fn pretty_print(&self, indent: usize) -> String {
		let pad = "  ".repeat(indent);
		match self {
			Node::Leaf { name, logical_type, nullable } => {
				format!("{pad}{name}: {logical_type:?}{}", if *nullable { "?" } else { "" })
			},
			Node::Group { name, nullable, fields } => {
				let body = fields.iter().map(|f| f.pretty_print(indent + 1)).collect::<Vec<_>>().join("\n");
				format!("{pad}{name}{}:\n{body}", if *nullable { "?" } else { "" })
			},
			Node::List { name, nullable, element, .. } => {
				format!("{pad}{name}{}: [\n{}\n{pad}]", if *nullable { "?" } else { "" }, element.pretty_print(indent + 1))
			},
			Node::Map { name, nullable, key, value } => {
				format!("{pad}{name}{}: {{\n{}\n{}\n{pad}}}", if *nullable { "?" } else { "" }, key.pretty_print(indent + 1), value.pretty_print(indent + 1))
			},
		}
	}
}
