//! Go import-section parser built on tree-sitter
//!
//! Only the package clause and the import declarations that follow it are
//! inspected. Tree-sitter recovers from syntax errors, so a broken function
//! body further down does not prevent reading the imports; errors inside the
//! import section itself are reported.

use std::path::Path;

use gobuild_core::{BuildError, BuildResult};
use tree_sitter::{Node, Parser};

/// One `import` spec as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit package name, `.` or `_`, if any.
    pub name: Option<String>,
    /// Unquoted import path.
    pub path: String,
    /// 1-based source line.
    pub line: usize,
}

/// Reusable Go parser.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> BuildResult<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| BuildError::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse the import section of `source`. `path` is only used in errors.
    pub fn parse_imports(&mut self, path: &Path, source: &str) -> BuildResult<Vec<ImportSpec>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| BuildError::parse(path, 1, "parser produced no syntax tree"))?;

        let root = tree.root_node();
        let bytes = source.as_bytes();
        let mut imports = Vec::new();
        let mut saw_package = false;

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "comment" => {}
                "package_clause" if !saw_package => {
                    if node.has_error() {
                        return Err(error_at(path, node, "malformed package clause"));
                    }
                    saw_package = true;
                }
                _ if !saw_package => {
                    return Err(error_at(path, node, "expected 'package' clause"));
                }
                "import_declaration" => {
                    if node.has_error() {
                        let at = first_error(node).unwrap_or(node);
                        return Err(error_at(path, at, "malformed import declaration"));
                    }
                    collect_specs(path, node, bytes, &mut imports)?;
                }
                // First declaration past the imports ends the section.
                "function_declaration" | "method_declaration" | "const_declaration"
                | "var_declaration" | "type_declaration" => break,
                "ERROR" => {
                    if is_stray_import(text(node, bytes)) {
                        return Err(error_at(path, node, "malformed import declaration"));
                    }
                    break;
                }
                // Only declarations may follow the imports; a leftover
                // literal or statement here is part of a broken import.
                _ => {
                    return Err(error_at(path, node, "unexpected text in import section"));
                }
            }
        }

        if !saw_package {
            return Err(BuildError::parse(path, 1, "expected 'package' clause"));
        }

        tracing::trace!("{}: {} import(s)", path.display(), imports.len());
        Ok(imports)
    }
}

fn is_stray_import(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with("import") || text.starts_with('"') || text.starts_with('`')
}

fn collect_specs(
    path: &Path,
    declaration: Node,
    source: &[u8],
    imports: &mut Vec<ImportSpec>,
) -> BuildResult<()> {
    let mut cursor = declaration.walk();
    for child in declaration.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => imports.push(import_spec(path, child, source)?),
            "import_spec_list" => {
                let mut list_cursor = child.walk();
                for spec in child.named_children(&mut list_cursor) {
                    if spec.kind() == "import_spec" {
                        imports.push(import_spec(path, spec, source)?);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn import_spec(path: &Path, spec: Node, source: &[u8]) -> BuildResult<ImportSpec> {
    let literal = spec
        .child_by_field_name("path")
        .ok_or_else(|| error_at(path, spec, "import spec without a path"))?;

    let import_path = unquote(text(literal, source))
        .ok_or_else(|| error_at(path, literal, "invalid import path literal"))?;

    Ok(ImportSpec {
        name: spec
            .child_by_field_name("name")
            .map(|name| text(name, source).to_string()),
        path: import_path,
        line: literal.start_position().row + 1,
    })
}

/// Decode a Go string literal: raw (`` `..` ``) or interpreted (`".."`).
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Some(raw.replace('\r', ""));
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            '\\' => '\\',
            '"' => '"',
            'x' => ascii(radix_value(&mut chars, 2, 16)?)?,
            'u' => char::from_u32(radix_value(&mut chars, 4, 16)?)?,
            'U' => char::from_u32(radix_value(&mut chars, 8, 16)?)?,
            first @ '0'..='7' => {
                let rest = radix_value(&mut chars, 2, 8)?;
                ascii(first.to_digit(8)? * 64 + rest)?
            }
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

fn radix_value(chars: &mut std::str::Chars<'_>, digits: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}

// Byte escapes above 0x7f would not form valid UTF-8 on their own.
fn ascii(value: u32) -> Option<char> {
    (value < 0x80).then(|| char::from(value as u8))
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn error_at(path: &Path, node: Node, message: &str) -> BuildError {
    BuildError::parse(path, node.start_position().row + 1, message)
}
