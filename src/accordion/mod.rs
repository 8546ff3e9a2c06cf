//! Accordion groups: explicit open/closed state per trigger/panel pair,
//! exclusivity within a container, and animated heights.

pub mod animation;

use crate::config::{PanelGeometry, SiteConfig};
use crate::parsers::html::{self, DiscoveredGroup};
use animation::{HeightAnimation, Motion, TransitionEnd};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// Observable state of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Supplies the natural (unclamped) content height of a group's panel
pub trait Measure {
    fn natural_height(&self, group: GroupId) -> f64;
}

impl<F> Measure for F
where
    F: Fn(GroupId) -> f64,
{
    fn natural_height(&self, group: GroupId) -> f64 {
        self(group)
    }
}

/// Estimates panel height from the number of items it holds
#[derive(Debug, Clone)]
pub struct ItemCountMeasure {
    counts: Vec<usize>,
    geometry: PanelGeometry,
}

impl ItemCountMeasure {
    pub fn new(counts: Vec<usize>, geometry: PanelGeometry) -> Self {
        Self { counts, geometry }
    }

    pub fn from_discovered(groups: &[DiscoveredGroup], geometry: PanelGeometry) -> Self {
        Self::new(groups.iter().map(|g| g.item_count).collect(), geometry)
    }
}

impl Measure for ItemCountMeasure {
    fn natural_height(&self, group: GroupId) -> f64 {
        match self.counts.get(group.0) {
            Some(0) | None => 0.0,
            Some(&n) => n as f64 * self.geometry.row_height_px + self.geometry.padding_px,
        }
    }
}

/// One trigger and its collapsible panel
#[derive(Debug, Clone)]
pub struct ToggleGroup {
    pub id: GroupId,
    pub label: String,
    /// Groups sharing a container are mutually exclusive
    pub container: Option<usize>,
    animation: HeightAnimation,
}

impl ToggleGroup {
    pub fn state(&self) -> GroupState {
        match self.animation.motion() {
            Motion::Collapsed => GroupState::Closed,
            Motion::Expanding { .. } => GroupState::Opening,
            Motion::Expanded { .. } => GroupState::Open,
            Motion::Collapsing { .. } => GroupState::Closing,
        }
    }

    pub fn height(&self) -> f64 {
        self.animation.height()
    }

    pub fn motion(&self) -> Motion {
        self.animation.motion()
    }

    /// The "active" flag: set while open or opening
    pub fn is_active(&self) -> bool {
        self.animation.is_open()
    }
}

#[derive(Debug, Clone)]
pub struct AccordionController {
    groups: Vec<ToggleGroup>,
    transition: Duration,
    threshold: f64,
}

impl AccordionController {
    pub fn new(transition: Duration, threshold: f64) -> Self {
        Self {
            groups: Vec::new(),
            transition,
            threshold,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.transition(), config.empty_threshold_px)
    }

    /// Controller for the groups in `page`, with a measure estimating their
    /// heights from item counts
    pub fn from_html(config: &SiteConfig, page: &str) -> (Self, ItemCountMeasure) {
        let mut controller = Self::from_config(config);
        let found = controller.discover(page);
        let measure = ItemCountMeasure::from_discovered(&found, config.panel);
        (controller, measure)
    }

    /// Register every valid group found in `page`. All start closed.
    pub fn discover(&mut self, page: &str) -> Vec<DiscoveredGroup> {
        let found = html::discover_groups(page);
        for group in &found {
            self.add_group(&group.label, group.container);
        }
        ::log::info!("Accordion set up with {} groups", self.groups.len());
        found
    }

    pub fn add_group(&mut self, label: &str, container: Option<usize>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(ToggleGroup {
            id,
            label: label.to_string(),
            container,
            animation: HeightAnimation::new(self.transition, self.threshold),
        });
        id
    }

    pub fn groups(&self) -> &[ToggleGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&ToggleGroup> {
        self.groups.get(id.0)
    }

    pub fn state(&self, id: GroupId) -> Option<GroupState> {
        self.group(id).map(ToggleGroup::state)
    }

    pub fn height(&self, id: GroupId) -> Option<f64> {
        self.group(id).map(ToggleGroup::height)
    }

    /// Groups currently open or opening
    pub fn open_groups(&self) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|g| g.is_active())
            .map(|g| g.id)
            .collect()
    }

    /// Click on a group's trigger. Returns the group's new state.
    ///
    /// Opening a group first closes every other active group in the same container.
    pub fn toggle(&mut self, id: GroupId, measure: &impl Measure) -> Option<GroupState> {
        let Some(group) = self.groups.get(id.0) else {
            ::log::warn!("Toggle for unknown group {:?}", id);
            return None;
        };

        if group.is_active() {
            self.close(id, measure);
        } else {
            if let Some(container) = group.container {
                let others: Vec<GroupId> = self
                    .groups
                    .iter()
                    .filter(|g| g.id != id && g.container == Some(container) && g.is_active())
                    .map(|g| g.id)
                    .collect();
                for other in others {
                    ::log::debug!("Closing {:?} to open {:?}", other, id);
                    self.close(other, measure);
                }
            }
            self.open(id, measure);
        }

        self.state(id)
    }

    fn open(&mut self, id: GroupId, measure: &impl Measure) {
        let natural = measure.natural_height(id);
        let group = &mut self.groups[id.0];
        group.animation.expand(natural);
        ::log::trace!("Opening {:?} ({:?}) to {}px", id, group.label, natural);
    }

    fn close(&mut self, id: GroupId, measure: &impl Measure) {
        let group = &mut self.groups[id.0];
        // At auto height the rendered height is whatever the content measures now
        let measured = match group.animation.motion() {
            Motion::Expanded { auto: true, .. } => measure.natural_height(id),
            _ => group.animation.height(),
        };
        group.animation.collapse_from(measured);
        ::log::trace!("Closing {:?} from {}px", id, measured);
    }

    /// Advance every animation by one frame.
    ///
    /// Completed openings are released to auto height; the completions are returned.
    pub fn tick(&mut self, dt: Duration) -> Vec<(GroupId, TransitionEnd)> {
        let mut ended = Vec::new();
        for group in &mut self.groups {
            if let Some(end) = group.animation.tick(dt) {
                group.animation.relax(end);
                ended.push((group.id, end));
            }
        }
        ended
    }

    /// Deliver a transition completion observed by the host.
    /// Stale completions (superseded transitions) are ignored.
    pub fn on_transition_end(&mut self, id: GroupId, end: TransitionEnd) -> bool {
        self.groups
            .get_mut(id.0)
            .is_some_and(|g| g.animation.relax(end))
    }

    /// Re-measure open panels after a viewport resize, without animating
    pub fn on_resize(&mut self, measure: &impl Measure) {
        for group in &mut self.groups {
            match group.animation.motion() {
                Motion::Expanding { .. } | Motion::Expanded { .. } => {
                    let natural = measure.natural_height(group.id);
                    group.animation.snap_open(natural, true);
                }
                Motion::Collapsing { .. } => group.animation.snap_closed(),
                Motion::Collapsed => {}
            }
        }
    }
}
