//! `{NAME}` placeholder substitution.
//!
//! A placeholder is a brace pair around one or more ASCII letters, digits or
//! underscores. Bound placeholders are replaced at every occurrence; unbound
//! ones, empty braces and any other brace text are copied through untouched.
//! Substituted text is never scanned again.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

pub fn render(template: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match placeholder_name(after_open).and_then(|name| Some((name, bindings.get(name)?))) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after_open[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

fn placeholder_name(text: &str) -> Option<&str> {
    let close = text.find('}')?;
    let name = &text[..close];
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    valid.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_occurrence() {
        let bindings = Bindings::new().with("name", "Foo");
        assert_eq!(
            render("struct {name}; impl {name} {}", &bindings),
            "struct Foo; impl Foo {}"
        );
    }

    #[test]
    fn leaves_other_text_byte_identical() {
        let template = "fn init(&self) {}\n{ let x = 1; }\n\t{name}é";
        let rendered = render(template, &Bindings::new().with("name", "Foo"));
        assert_eq!(rendered, "fn init(&self) {}\n{ let x = 1; }\n\tFooé");
    }

    #[test]
    fn unbound_placeholders_stay_verbatim() {
        let rendered = render("{known}-{unknown}", &Bindings::new().with("known", "k"));
        assert_eq!(rendered, "k-{unknown}");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let bindings: Bindings = [("a", "{b}"), ("b", "nope")].into_iter().collect();
        assert_eq!(render("{a}", &bindings), "{b}");
    }

    #[test]
    fn placeholder_inside_a_block_is_found() {
        let rendered = render("{ {NAME} }", &Bindings::new().with("NAME", "X"));
        assert_eq!(rendered, "{ X }");
    }

    #[test]
    fn unterminated_brace_is_copied() {
        assert_eq!(render("open {NAME", &Bindings::new().with("NAME", "X")), "open {NAME");
    }

    #[test]
    fn render_is_deterministic() {
        let bindings = Bindings::new().with("name", "Foo");
        let template = "{name}{name}{other}";
        assert_eq!(render(template, &bindings), render(template, &bindings));
    }
}
