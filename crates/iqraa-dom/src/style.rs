//! Inline `style` attribute editing.

/// Return `style` with `property` set to `value`.
///
/// Existing declarations keep their order; a previous declaration of the same
/// property is replaced in place, otherwise the new one is appended.
pub(crate) fn with_property(style: &str, property: &str, value: &str) -> String {
    let mut declarations: Vec<String> = Vec::new();
    let mut replaced = false;

    for decl in style.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        let name = decl.split(':').next().unwrap_or_default().trim();
        if name.eq_ignore_ascii_case(property) {
            declarations.push(format!("{property}: {value}"));
            replaced = true;
        } else {
            declarations.push(decl.to_owned());
        }
    }

    if !replaced {
        declarations.push(format!("{property}: {value}"));
    }

    declarations.join("; ")
}
