//! Timeline layout: slots, lanes and the render window.
//!
//! Every distinct timestamp string gets a slot in first-occurrence order,
//! and slots are evenly spaced along the track regardless of how far apart
//! their instants are. Lanes keep nearby boxes from overlapping: each record
//! takes the lowest lane not already used by a record placed too close to it
//! within a bounded look-back, and records sharing a timestamp string always
//! conflict. Once every lane is taken the record falls back to
//! `index % lane_count` and overlap is accepted.
//!
//! All coordinates are abstract layout units. The terminal front-end scales
//! them down to cells.

use std::collections::HashMap;

/// Geometry constants for a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineParams {
    /// Distance between adjacent slots.
    pub spacing: u64,
    /// Offset of slot 0 from the start of the track.
    pub left_padding: u64,
    /// Two records closer than this in the same lane conflict.
    pub min_separation: u64,
    pub lane_count: usize,
    /// How many preceding records are checked for lane conflicts.
    pub lookback: usize,
    /// Extra slots rendered on each side of the viewport.
    pub buffer_slots: u64,
}

impl Default for TimelineParams {
    fn default() -> Self {
        Self {
            spacing: 200,
            left_padding: 200,
            min_separation: 140,
            lane_count: 5,
            lookback: 50,
            buffer_slots: 50,
        }
    }
}

/// Half-open range of record indices to hand to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
}

impl VisibleWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Slot and lane of every record in one view, computed in a single batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineLayout {
    params: TimelineParams,
    slots: Vec<usize>,
    lanes: Vec<usize>,
    slot_count: usize,
}

impl TimelineLayout {
    /// Lay out records whose timestamp strings are given in view order.
    pub fn compute<'a, I>(timestamps: I, params: TimelineParams) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut slot_of: HashMap<&'a str, usize> = HashMap::new();
        let slots: Vec<usize> = timestamps
            .into_iter()
            .map(|ts| {
                let next = slot_of.len();
                *slot_of.entry(ts).or_insert(next)
            })
            .collect();
        let slot_count = slot_of.len();
        let lanes = assign_lanes(&slots, &params);

        tracing::debug!(
            records = slots.len(),
            slots = slot_count,
            lanes_used = lanes.iter().max().map_or(0, |l| l + 1),
            "timeline layout computed"
        );

        Self {
            params,
            slots,
            lanes,
            slot_count,
        }
    }

    pub fn params(&self) -> &TimelineParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of distinct timestamp strings.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn slot_of(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied()
    }

    pub fn lane_of(&self, index: usize) -> Option<usize> {
        self.lanes.get(index).copied()
    }

    /// Track coordinate of the record at `index`.
    pub fn pixel_of(&self, index: usize) -> Option<u64> {
        self.slot_of(index).map(|slot| self.slot_pixel(slot))
    }

    fn slot_pixel(&self, slot: usize) -> u64 {
        self.params.left_padding + slot as u64 * self.params.spacing
    }

    /// Full track length for a given viewport: room for every slot, and never
    /// shorter than two viewports.
    pub fn track_width(&self, viewport: u64) -> u64 {
        let content = self.slot_count as u64 * self.params.spacing + self.params.left_padding;
        content.max(viewport.saturating_mul(2))
    }

    /// Fractional position of the record along the track, in `[0, 1]`.
    pub fn position_of(&self, index: usize, viewport: u64) -> Option<f64> {
        let pixel = self.pixel_of(index)?;
        let width = self.track_width(viewport);
        if width == 0 {
            return Some(0.0);
        }
        Some(pixel as f64 / width as f64)
    }

    /// Records to render for a scroll offset and viewport, with
    /// `buffer_slots` worth of margin on each side.
    ///
    /// `start` is the first record at or past the buffered start, `end` one
    /// past the last record at or before the buffered end. When no record
    /// satisfies a bound the window extends to that end of the list.
    pub fn visible_window(&self, scroll_offset: u64, viewport: u64) -> VisibleWindow {
        let n = self.slots.len();
        let buffer = self.params.buffer_slots * self.params.spacing;
        let lo = scroll_offset.saturating_sub(buffer);
        let hi = scroll_offset.saturating_add(viewport).saturating_add(buffer);

        let start = (0..n)
            .find(|&i| self.slot_pixel(self.slots[i]) >= lo)
            .unwrap_or(0);
        let end = (0..n)
            .rev()
            .find(|&i| self.slot_pixel(self.slots[i]) <= hi)
            .map_or(n, |i| i + 1);

        VisibleWindow {
            start,
            end: end.max(start),
        }
    }

    /// Scroll offset that centres the record at `index` in the viewport.
    pub fn scroll_offset_for(&self, index: usize, viewport: u64) -> Option<u64> {
        self.pixel_of(index)
            .map(|pixel| pixel.saturating_sub(viewport / 2))
    }

    /// Largest scroll offset that still shows track content.
    pub fn max_scroll_offset(&self, viewport: u64) -> u64 {
        self.track_width(viewport).saturating_sub(viewport)
    }
}

fn assign_lanes(slots: &[usize], params: &TimelineParams) -> Vec<usize> {
    let lane_count = params.lane_count.max(1);
    let mut lanes = Vec::with_capacity(slots.len());
    let mut taken = vec![false; lane_count];

    for (i, &slot) in slots.iter().enumerate() {
        taken.fill(false);
        let position = slot as u64 * params.spacing;

        for j in i.saturating_sub(params.lookback)..i {
            let other = slots[j];
            let distance = position.abs_diff(other as u64 * params.spacing);
            if other == slot || distance < params.min_separation {
                taken[lanes[j]] = true;
            }
        }

        let lane = taken.iter().position(|t| !t).unwrap_or(i % lane_count);
        lanes.push(lane);
    }

    lanes
}
