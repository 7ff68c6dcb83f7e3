//! Stack-based printer for [`crate::ir::FormatIR`].
//!
//! Adapted from the teacher's `snow-fmt::printer`: the algorithm (measure
//! a `Group`'s flat width, decide flat vs. broken, walk a work stack) is
//! unchanged. The one real difference is indentation: block bodies are
//! indented with tab characters (one per nesting level) rather than a
//! configurable run of spaces, per the canonical-emitter contract.

use crate::ir::FormatIR;

/// Configuration for the canonical printer's output.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// The string repeated once per nesting level at an `Indent` boundary.
    pub indent_unit: String,
    /// Maximum line width before groups break. Default: 100.
    pub max_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_unit: "\t".to_string(), max_width: 100 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

#[derive(Debug)]
struct PrintCmd<'a> {
    level: usize,
    mode: Mode,
    ir: &'a FormatIR,
}

/// Render a `FormatIR` tree as a string respecting the given config.
pub fn print(ir: &FormatIR, config: &FormatConfig) -> String {
    let mut out = String::new();
    let mut col: usize = 0;
    let mut stack: Vec<PrintCmd> = vec![PrintCmd { level: 0, mode: Mode::Break, ir }];

    while let Some(cmd) = stack.pop() {
        match cmd.ir {
            FormatIR::Empty => {}

            FormatIR::Text(s) => {
                out.push_str(s);
                col += s.chars().count();
            }

            FormatIR::Space => match cmd.mode {
                Mode::Flat => {
                    out.push(' ');
                    col += 1;
                }
                Mode::Break => {
                    out.push('\n');
                    push_indent(&mut out, config, cmd.level);
                    col = cmd.level;
                }
            },

            FormatIR::Hardline => {
                out.push('\n');
                push_indent(&mut out, config, cmd.level);
                col = cmd.level;
            }

            FormatIR::Indent(child) => {
                stack.push(PrintCmd { level: cmd.level + 1, mode: cmd.mode, ir: child });
            }

            FormatIR::Group(child) => {
                let flat_width = measure_flat(child);
                let mode = if col + flat_width <= config.max_width { Mode::Flat } else { Mode::Break };
                stack.push(PrintCmd { level: cmd.level, mode, ir: child });
            }

            FormatIR::IfBreak { flat, broken } => {
                let child = match cmd.mode {
                    Mode::Flat => flat,
                    Mode::Break => broken,
                };
                stack.push(PrintCmd { level: cmd.level, mode: cmd.mode, ir: child });
            }

            FormatIR::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push(PrintCmd { level: cmd.level, mode: cmd.mode, ir: part });
                }
            }
        }
    }

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn push_indent(out: &mut String, config: &FormatConfig, level: usize) {
    for _ in 0..level {
        out.push_str(&config.indent_unit);
    }
}

/// Width of `ir` rendered flat; `usize::MAX` if it contains a `Hardline`
/// (which forces a break and so can never fit on one line).
fn measure_flat(ir: &FormatIR) -> usize {
    match ir {
        FormatIR::Empty => 0,
        FormatIR::Text(s) => s.chars().count(),
        FormatIR::Space => 1,
        FormatIR::Hardline => usize::MAX,
        FormatIR::Indent(child) => measure_flat(child),
        FormatIR::Group(child) => measure_flat(child),
        FormatIR::IfBreak { flat, .. } => measure_flat(flat),
        FormatIR::Concat(parts) => {
            let mut total: usize = 0;
            for part in parts {
                let w = measure_flat(part);
                if w == usize::MAX {
                    return usize::MAX;
                }
                total = total.saturating_add(w);
                if total == usize::MAX {
                    return usize::MAX;
                }
            }
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;

    #[test]
    fn group_fits_renders_flat() {
        let ir = group(concat(vec![text("a"), space(), text("b")]));
        assert_eq!(print(&ir, &FormatConfig::default()), "a b\n");
    }

    #[test]
    fn hardline_always_breaks() {
        let ir = concat(vec![text("a"), hardline(), text("b")]);
        assert_eq!(print(&ir, &FormatConfig::default()), "a\nb\n");
    }

    #[test]
    fn indent_uses_tabs() {
        let ir = concat(vec![text("si x {"), indent(concat(vec![hardline(), text("y")])), hardline(), text("}")]);
        assert_eq!(print(&ir, &FormatConfig::default()), "si x {\n\ty\n}\n");
    }

    #[test]
    fn nested_indent_repeats_tab_per_level() {
        let ir = concat(vec![
            text("a"),
            indent(concat(vec![hardline(), text("b"), indent(concat(vec![hardline(), text("c")]))])),
        ]);
        assert_eq!(print(&ir, &FormatConfig::default()), "a\n\tb\n\t\tc\n");
    }

    #[test]
    fn empty_produces_nothing() {
        let ir = concat(vec![text("a"), FormatIR::Empty, text("b")]);
        assert_eq!(print(&ir, &FormatConfig::default()), "ab\n");
    }
}
