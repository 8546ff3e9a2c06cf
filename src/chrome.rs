//! Incidental page chrome: the footer year and the entrance reveal.

use chrono::Datelike;
use std::time::Duration;

/// When the page heading starts its entrance
pub const HEADING_DELAY: Duration = Duration::from_millis(100);
/// When the first button starts its entrance
pub const BUTTONS_DELAY: Duration = Duration::from_millis(200);
/// Gap between successive buttons
pub const BUTTON_STAGGER: Duration = Duration::from_millis(55);

/// The current local year
pub fn footer_year() -> i32 {
    chrono::Local::now().year()
}

/// Text for the footer's year element. `None` if the page has no such element.
pub fn footer_year_text(element: Option<&str>) -> Option<String> {
    footer_year_text_for(element, footer_year())
}

fn footer_year_text_for(element: Option<&str>, year: i32) -> Option<String> {
    match element {
        Some(_) => Some(year.to_string()),
        None => {
            ::log::warn!("Footer year element not found");
            None
        }
    }
}

/// Element revealed by the entrance animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrance {
    Heading,
    Button(usize),
}

/// Start offsets of the staggered reveal, heading first
pub fn entrance_schedule(has_heading: bool, buttons: usize) -> Vec<(Entrance, Duration)> {
    let heading = has_heading.then_some((Entrance::Heading, HEADING_DELAY));
    heading
        .into_iter()
        .chain((0..buttons).map(|i| (Entrance::Button(i), BUTTONS_DELAY + BUTTON_STAGGER * i as u32)))
        .collect()
}
