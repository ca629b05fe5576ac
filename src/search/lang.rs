/// True when the text contains Japanese/CJK script and should be translated
/// before querying English-language sources.
pub fn is_target_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}' |
            '\u{30A0}'..='\u{30FF}' |
            '\u{4E00}'..='\u{9FFF}' |
            '\u{3400}'..='\u{4DBF}'
        )
    })
}
