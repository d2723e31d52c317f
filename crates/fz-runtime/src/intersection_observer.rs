//! Intersection Observer API
//!
//! Observe element visibility and intersection with the viewport.
//! Entries are produced when an element's threshold index changes, and
//! always on the first check after `observe`.

use std::collections::BTreeMap;

use fz_dom::{DOMRect, NodeId};

use crate::{ControllerId, RuntimeError};

/// Observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// `rootMargin`, resolved per side. Percentages are relative to the root
/// width (left/right) or height (top/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    top: Length,
    right: Length,
    bottom: Length,
    left: Length,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Length {
    Px(f64),
    Percent(f64),
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl Length {
    fn parse(token: &str) -> Option<Self> {
        if let Some(px) = token.strip_suffix("px") {
            px.parse().ok().map(Length::Px)
        } else if let Some(pct) = token.strip_suffix('%') {
            pct.parse().ok().map(Length::Percent)
        } else {
            // Only a bare zero is allowed without a unit
            token.parse::<f64>().ok().filter(|v| *v == 0.0).map(Length::Px)
        }
    }

    fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl RootMargin {
    /// Parse CSS margin shorthand (1–4 values, `px` or `%`)
    pub fn parse(text: &str) -> Result<Self, RuntimeError> {
        let invalid = || RuntimeError::InvalidRootMargin(text.to_string());
        let values = text
            .split_whitespace()
            .map(Length::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(invalid()),
        };
        Ok(Self { top, right, bottom, left })
    }

    /// Grow (or shrink, for negative margins) the root bounds
    pub fn apply(&self, root: DOMRect) -> DOMRect {
        let top = self.top.resolve(root.height);
        let right = self.right.resolve(root.width);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        DOMRect::from_xywh(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

/// Intersection observer options
#[derive(Debug, Clone)]
pub struct IntersectionObserverOptions {
    pub root_margin: RootMargin,
    /// Ratios that trigger callbacks, ascending
    pub thresholds: Vec<f64>,
}

impl IntersectionObserverOptions {
    pub fn new(root_margin: &str, thresholds: &[f64]) -> Result<Self, RuntimeError> {
        let mut thresholds = thresholds.to_vec();
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }
        thresholds.sort_by(f64::total_cmp);
        Ok(Self {
            root_margin: RootMargin::parse(root_margin)?,
            thresholds,
        })
    }
}

impl Default for IntersectionObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            thresholds: vec![0.0],
        }
    }
}

/// Intersection observer entry
#[derive(Debug, Clone)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: f64,
}

/// Intersection observer
#[derive(Debug)]
pub struct IntersectionObserver {
    id: ObserverId,
    owner: ControllerId,
    options: IntersectionObserverOptions,
    /// Last threshold index per target, `None` until first checked
    observed: BTreeMap<NodeId, Option<usize>>,
    pending_entries: Vec<IntersectionObserverEntry>,
}

impl IntersectionObserver {
    fn new(id: ObserverId, owner: ControllerId, options: IntersectionObserverOptions) -> Self {
        Self {
            id,
            owner,
            options,
            observed: BTreeMap::new(),
            pending_entries: Vec::new(),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn owner(&self) -> ControllerId {
        self.owner
    }

    /// Observe an element (no-op if already observed)
    pub fn observe(&mut self, target: NodeId) {
        self.observed.entry(target).or_insert(None);
    }

    /// Stop observing
    pub fn unobserve(&mut self, target: NodeId) {
        self.observed.remove(&target);
        self.pending_entries.retain(|e| e.target != target);
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.pending_entries.clear();
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observed.contains_key(&target)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    fn threshold_index(&self, intersecting: bool, ratio: f64) -> usize {
        if !intersecting {
            return 0;
        }
        self.options
            .thresholds
            .iter()
            .position(|&t| t > ratio)
            .unwrap_or(self.options.thresholds.len())
    }

    /// Check intersections. `client_rect` maps a target to its box in
    /// viewport coordinates; targets without a box are skipped.
    pub fn check_intersections(
        &mut self,
        viewport: DOMRect,
        client_rect: impl Fn(NodeId) -> Option<DOMRect>,
        time: f64,
    ) {
        let root_bounds = self.options.root_margin.apply(viewport);
        let targets: Vec<NodeId> = self.observed.keys().copied().collect();

        for target in targets {
            let Some(rect) = client_rect(target) else {
                continue;
            };
            let intersection = rect.intersect(&root_bounds);
            let intersecting = intersection.is_some();
            let ratio = match intersection {
                Some(hit) if rect.area() > 0.0 => hit.area() / rect.area(),
                Some(_) => 1.0,
                None => 0.0,
            };
            let index = self.threshold_index(intersecting, ratio);

            let last = self.observed.get(&target).copied().flatten();
            if last == Some(index) {
                continue;
            }
            self.observed.insert(target, Some(index));
            self.pending_entries.push(IntersectionObserverEntry {
                target,
                bounding_client_rect: rect,
                intersection_rect: intersection.unwrap_or_default(),
                root_bounds,
                intersection_ratio: ratio,
                is_intersecting: intersecting,
                time,
            });
        }
    }

    /// Take pending entries
    pub fn take_entries(&mut self) -> Vec<IntersectionObserverEntry> {
        std::mem::take(&mut self.pending_entries)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_entries.is_empty()
    }
}

/// Intersection observer manager
#[derive(Debug, Default)]
pub struct IntersectionObserverManager {
    observers: Vec<IntersectionObserver>,
    next_id: u64,
}

impl IntersectionObserverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create observer
    pub fn create(&mut self, owner: ControllerId, options: IntersectionObserverOptions) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(IntersectionObserver::new(id, owner, options));
        id
    }

    pub fn get(&self, id: ObserverId) -> Option<&IntersectionObserver> {
        self.observers.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObserverId) -> Option<&mut IntersectionObserver> {
        self.observers.iter_mut().find(|o| o.id() == id)
    }

    pub fn remove(&mut self, id: ObserverId) {
        self.observers.retain(|o| o.id() != id);
    }

    /// Check every observer and collect the entries to deliver
    pub fn process(
        &mut self,
        viewport: DOMRect,
        client_rect: impl Fn(NodeId) -> Option<DOMRect>,
        time: f64,
    ) -> Vec<(ControllerId, ObserverId, Vec<IntersectionObserverEntry>)> {
        let mut results = Vec::new();
        for observer in &mut self.observers {
            observer.check_intersections(viewport, &client_rect, time);
            if observer.has_pending() {
                results.push((observer.owner(), observer.id(), observer.take_entries()));
            }
        }
        results
    }
}
