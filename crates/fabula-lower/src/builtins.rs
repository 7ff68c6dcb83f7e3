//! Static tables driving the lowering emitter's builtin rewrites (spec
//! §4.5 points 5 and 6), mirroring the shape of the teacher's
//! `snow_codegen::codegen::intrinsics` dispatch table -- here keyed on
//! surface-language method/property names instead of Snow intrinsics.

/// How a recognized `obj.method(args)` call site is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRewrite {
    /// `len(obj)` -- the method becomes a free function wrapping the
    /// receiver, discarding any args.
    FreeFunctionOfReceiver(&'static str),
    /// `obj.append(args…)` -- same method name, same call shape.
    SameNameMethod(&'static str),
    /// `sep.join(obj)` -- receiver and first arg swap roles.
    ReceiverJoinsArg,
    /// `x in obj` -- a single-arg call becomes an infix membership test.
    Containment,
    /// `obj[a:b]` / `obj[a:]` -- one or two args become a slice.
    Slice,
}

/// The method-name -> rewrite table (spec §4.5 point 5).
pub const METHOD_REWRITES: &[(&str, MethodRewrite)] = &[
    ("appende", MethodRewrite::SameNameMethod("append")),
    ("adde", MethodRewrite::SameNameMethod("add")),
    ("coniunge", MethodRewrite::ReceiverJoinsArg),
    ("continet", MethodRewrite::Containment),
    ("initium", MethodRewrite::SameNameMethod("startswith")),
    ("finis", MethodRewrite::SameNameMethod("endswith")),
    ("maiuscula", MethodRewrite::SameNameMethod("upper")),
    ("minuscula", MethodRewrite::SameNameMethod("lower")),
    ("recide", MethodRewrite::SameNameMethod("strip")),
    ("divide", MethodRewrite::SameNameMethod("split")),
    ("muta", MethodRewrite::SameNameMethod("replace")),
    ("sectio", MethodRewrite::Slice),
    ("longitudo", MethodRewrite::FreeFunctionOfReceiver("len")),
];

pub fn method_rewrite(name: &str) -> Option<MethodRewrite> {
    METHOD_REWRITES.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
}

/// A bare-property pseudo-method (spec §4.5 point 6): `obj.name` with no
/// call parens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRewrite {
    /// `len(obj)`.
    Len,
    /// `obj[0]`.
    First,
    /// `obj[-1]`.
    Last,
}

pub fn property_rewrite(name: &str) -> Option<PropertyRewrite> {
    match name {
        "longitudo" => Some(PropertyRewrite::Len),
        "primus" => Some(PropertyRewrite::First),
        "ultimus" => Some(PropertyRewrite::Last),
        _ => None,
    }
}

/// Identifiers that collide with a reserved word in the host language;
/// an identifier in this set is suffixed with `_` on emission.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "self",
];

/// Render a Fabula identifier as a Python-safe one, escaping a clash
/// with a reserved word the way `PEP 8` recommends: a trailing
/// underscore.
pub fn py_ident(name: &str) -> String {
    if PYTHON_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_keyword_collision() {
        assert_eq!(py_ident("class"), "class_");
        assert_eq!(py_ident("valor"), "valor");
    }

    #[test]
    fn finds_known_rewrites() {
        assert_eq!(method_rewrite("appende"), Some(MethodRewrite::SameNameMethod("append")));
        assert_eq!(method_rewrite("sectio"), Some(MethodRewrite::Slice));
        assert_eq!(method_rewrite("inexistens"), None);
    }

    #[test]
    fn finds_pseudo_properties() {
        assert_eq!(property_rewrite("longitudo"), Some(PropertyRewrite::Len));
        assert_eq!(property_rewrite("primus"), Some(PropertyRewrite::First));
        assert_eq!(property_rewrite("campus"), None);
    }
}
