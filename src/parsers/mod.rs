pub mod html;
pub mod text;


use serde::{Deserialize, Serialize};

/// Selector for every element kind that takes part in search, in one pass so
/// matches come back in document order
pub const SEARCHABLE_SELECTOR: &str = "a.btn, button.toggle-btn, a.sub-link, h2.page-title";

/// The kinds of page element a search can match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// `h2.page-title`, navigates to the page itself
    PageTitle,
    /// `button.toggle-btn`, navigates to the page holding the group
    ToggleButton,
    /// `a.btn`
    PrimaryAction,
    /// `a.sub-link`
    SecondaryLink,
}

impl ElementKind {
    /// Classifies an element by tag name and class list
    pub fn classify<'a>(tag: &str, mut classes: impl Iterator<Item = &'a str>) -> Option<Self> {
        match tag {
            "h2" => classes.any(|c| c == "page-title").then_some(ElementKind::PageTitle),
            "button" => classes
                .any(|c| c == "toggle-btn")
                .then_some(ElementKind::ToggleButton),
            "a" => {
                let classes: Vec<&str> = classes.collect();
                if classes.contains(&"btn") {
                    Some(ElementKind::PrimaryAction)
                } else if classes.contains(&"sub-link") {
                    Some(ElementKind::SecondaryLink)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Whether the navigation target comes from the element's own `href`
    pub fn links_out(&self) -> bool {
        matches!(self, ElementKind::PrimaryAction | ElementKind::SecondaryLink)
    }

    /// Label options used when reading this kind's visible text
    pub fn label_options(&self) -> text::LabelOptions {
        text::LabelOptions {
            strip_marker: true,
            strip_disclosure: matches!(self, ElementKind::ToggleButton),
        }
    }
}
