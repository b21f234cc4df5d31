//! Nested line buffers for building indented source text.
//!
//! Printers assemble a tree of lines, spacers, and indented groups, and the
//! whole tree collapses to text in one pass. Blank lines between sections are
//! placed by [`space_between`] so empty sections never leave stray gaps.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lines {
    Line(String),
    /// A blank separator line, never indented.
    Spacer,
    Indent(Vec<Lines>),
}

pub fn line(text: impl Into<String>) -> Lines {
    Lines::Line(text.into())
}

pub fn indent(lines: Vec<Lines>) -> Lines {
    Lines::Indent(lines)
}

pub fn format_lines(lines: &[Lines]) -> String {
    format_lines_with_spaces(4, lines)
}

pub fn format_lines_with_spaces(spaces_per_indent: usize, lines: &[Lines]) -> String {
    let mut output = String::new();
    write_indented(&mut output, 0, spaces_per_indent, lines);
    output
}

fn write_indented(output: &mut String, level: usize, spaces: usize, lines: &[Lines]) {
    for entry in lines {
        match entry {
            Lines::Line(text) => {
                for _ in 0..level * spaces {
                    output.push(' ');
                }
                let _ = writeln!(output, "{text}");
            }
            Lines::Spacer => output.push('\n'),
            Lines::Indent(nested) => write_indented(output, level + 1, spaces, nested),
        }
    }
}

/// Concatenates groups with a blank line between each, skipping empty groups.
pub fn space_between<I>(groups: I) -> Vec<Lines>
where
    I: IntoIterator<Item = Vec<Lines>>,
{
    let mut result = Vec::new();
    for group in groups {
        if group.is_empty() {
            continue;
        }
        if !result.is_empty() {
            result.push(Lines::Spacer);
        }
        result.extend(group);
    }
    result
}
