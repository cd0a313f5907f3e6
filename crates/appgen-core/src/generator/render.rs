//! Overlay file rendering

use tera::{Context, Tera};
use tracing::warn;

/// Render one overlay file against `context`.
///
/// Binary (non-UTF-8) files and files without template markers are returned unchanged.
/// Rendering errors, such as a reference to an unknown variable, never abort the copy:
/// the raw contents are kept and a warning is logged.
///
/// The fallback covers the whole file. A file with one unresolved token keeps every
/// other token unrendered too, so a partially substituted file is never written.
pub fn render_file(path: &str, contents: &[u8], context: &Context) -> Vec<u8> {
    let Ok(text) = std::str::from_utf8(contents) else {
        return contents.to_vec();
    };

    if !has_template_markers(text) {
        return contents.to_vec();
    }

    match Tera::one_off(text, context, false) {
        Ok(rendered) => rendered.into_bytes(),
        Err(e) => {
            warn!(file = path, error = %describe(&e), "failed to render, copying raw contents");
            contents.to_vec()
        }
    }
}

fn has_template_markers(text: &str) -> bool {
    text.contains("{{") || text.contains("{%") || text.contains("{#")
}

/// Tera nests the useful message in the error source chain
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = std::error::Error::source(inner);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        let mut context = Context::new();
        context.insert("appName", "myapp");
        context.insert("jsModule", &Option::<String>::None);
        context
    }

    #[test]
    fn test_substitutes_variables() {
        let out = render_file("README.md", b"# {{ appName }}\n", &context());
        assert_eq!(out, b"# myapp\n");
    }

    #[test]
    fn test_conditionals_on_declined_slot() {
        let out = render_file(
            "index.js",
            b"{% if jsModule %}bundle{% else %}plain{% endif %}",
            &context(),
        );
        assert_eq!(out, b"plain");
    }

    #[test]
    fn test_unresolved_variable_keeps_raw_contents() {
        let raw = b"{{ missingSlot }} stays";
        assert_eq!(render_file("x.txt", raw, &context()), raw);
    }

    #[test]
    fn test_unresolved_variable_keeps_whole_file_raw() {
        let raw = b"name: {{ appName }}\nauthor: {{ appAuthor }}\n";
        assert_eq!(render_file("package.yml", raw, &context()), raw);
    }

    #[test]
    fn test_binary_passthrough() {
        let raw = [0x89, b'P', b'N', b'G', 0xff, 0xfe, b'{', b'{'];
        assert_eq!(render_file("logo.png", &raw, &context()), raw);
    }

    #[test]
    fn test_plain_text_untouched() {
        let raw = b"{>\"layouts/master\" /}\n{<body}{/body}";
        assert_eq!(render_file("index.dust", raw, &context()), raw);
    }
}
