/// Escape HTML special characters.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Fischer" & 'Tal'</b>"#),
            "&lt;b&gt;&quot;Fischer&quot; &amp; &#x27;Tal&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape("Nf3!?"), "Nf3!?");
    }
}
