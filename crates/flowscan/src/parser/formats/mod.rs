/// Field locators for `show conn detail` blocks

pub mod scan;
pub mod template;

pub use scan::ScanLocator;
pub use template::TemplateLocator;

/// Flag text with whitespace collapsed, so both locators agree on it.
pub(crate) fn normalize_flags<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ")
}
