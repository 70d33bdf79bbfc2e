//! Cleanup for text fields in the Israel MOT feed. Stop and agency names come
//! with doubled quotes, no-break spaces, and ASCII stand-ins for Hebrew
//! geresh/gershayim, sometimes on the wrong side of the word thanks to bad RTL
//! editors upstream.

const GERESH: char = '\u{05f3}';
const GERSHAYIM: char = '\u{05f4}';

fn is_hebrew_letter(c: char) -> bool {
    // The alef-tav block, including final forms
    ('\u{05d0}'..='\u{05ea}').contains(&c)
}

pub fn fix_name(s: &str) -> String {
    let s = s.replace("''", "\"");
    // one occurrence of this in the wild (גן טכנולוגי/א''''ס הפועל)
    let s = s.replace("\"\"", "\"");
    let s = s.replace('\u{a0}', " ");
    let s = s.trim();
    if s.is_empty() {
        return String::new();
    }

    // Collapse runs of spaces
    let mut chars: Vec<char> = Vec::with_capacity(s.len());
    for c in s.chars() {
        if c == ' ' && chars.last() == Some(&' ') {
            continue;
        }
        chars.push(c);
    }

    // A double-quote between Hebrew letters is really gershayim
    for i in 1..chars.len().saturating_sub(1) {
        if chars[i] == '"' && is_hebrew_letter(chars[i - 1]) && is_hebrew_letter(chars[i + 1]) {
            chars[i] = GERSHAYIM;
        }
    }

    // Sometimes the geresh lands on the wrong side of the word, probably bad
    // RTL support in their GUI
    if chars[0] == '\'' {
        chars.remove(0);
        chars.push('\'');
    }

    // An apostrophe after a Hebrew letter is really a geresh
    for i in 1..chars.len() {
        if chars[i] == '\'' && is_hebrew_letter(chars[i - 1]) {
            chars[i] = GERESH;
        }
    }

    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(fix_name("Tel Aviv - Savidor"), "Tel Aviv - Savidor");
        assert_eq!(fix_name(""), "");
    }

    #[test]
    fn whitespace_cleanup() {
        assert_eq!(fix_name("  Haifa   Center \u{a0} "), "Haifa Center");
    }

    #[test]
    fn doubled_quotes() {
        assert_eq!(fix_name("a''b"), "a\"b");
    }

    #[test]
    fn gershayim_between_hebrew_letters() {
        assert_eq!(fix_name("ת\"א"), "ת\u{05f4}א");
        // Quote not surrounded by Hebrew stays as-is
        assert_eq!(fix_name("say \"hi\""), "say \"hi\"");
    }

    #[test]
    fn geresh_after_hebrew_letter() {
        assert_eq!(fix_name("ז'בוטינסקי"), "ז\u{05f3}בוטינסקי");
    }

    #[test]
    fn leading_apostrophe_moves_to_end() {
        assert_eq!(fix_name("'ז"), "ז\u{05f3}");
    }
}
