// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Fund code → file stem. Keeps ASCII alphanumerics, `-` and `_`.
pub fn sanitize_fund_filename(code: &str) -> String {
    let out: String = code
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .collect();
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("fund") } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ws_collapses_and_trims() {
        assert_eq!(normalize_ws("  a \t\n b  "), "a b");
    }

    #[test]
    fn entities() {
        assert_eq!(normalize_entities("A&nbsp;&amp;&nbsp;B"), "A & B");
    }

    #[test]
    fn fund_filename() {
        assert_eq!(sanitize_fund_filename("HGLG11"), "HGLG11");
        assert_eq!(sanitize_fund_filename("../x y"), "xy");
        assert_eq!(sanitize_fund_filename("/"), "fund");
    }
}
