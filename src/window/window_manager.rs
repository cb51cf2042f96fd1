use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::events::{SubscriptionId, WindowEvent};
use super::{Owner, WindowEntry, WindowError, WindowId, WindowOptions};
use crate::config::LayoutConfig;
use crate::layout::{
    DockSlot, PanelRect, PositionDescriptor, PositionOptions, TargetRect, apply_parent_anchor,
    clip_to_target, default_position_for_slot, normalize, reapply_update, resolve_rect,
    resolve_slot_conflict, translate,
};

type Listener<C, S> = Box<dyn FnMut(&mut WindowManager<C, S>, &WindowEvent<C, S>)>;

/// Owns every registered panel, its slot, its place in the z-order and the
/// positions remembered for panels that were closed away from home.
///
/// All operations are synchronous. Unknown ids are ignored everywhere
/// except [`WindowManager::add`], where a duplicate id is the one hard
/// error.
pub struct WindowManager<C, S = ()> {
    config: LayoutConfig,
    windows: BTreeMap<WindowId, WindowEntry<C, S>>,
    // bottom to top
    z_order: Vec<WindowId>,
    position_cache: BTreeMap<WindowId, PositionDescriptor>,
    listeners: Vec<(SubscriptionId, Listener<C, S>)>,
    subscriptions: BTreeSet<SubscriptionId>,
    // events raised while listeners run are queued and drained by the
    // outermost dispatch
    pending_events: VecDeque<WindowEvent<C, S>>,
    dispatching: bool,
    next_subscription: u64,
    next_window_seq: usize,
}

impl<C, S> Default for WindowManager<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> WindowManager<C, S> {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            windows: BTreeMap::new(),
            z_order: Vec::new(),
            position_cache: BTreeMap::new(),
            listeners: Vec::new(),
            subscriptions: BTreeSet::new(),
            pending_events: VecDeque::new(),
            dispatching: false,
            next_subscription: 0,
            next_window_seq: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn get(&self, id: &str) -> Option<&WindowEntry<C, S>> {
        self.windows.get(id)
    }

    /// Mutable access for the caller-owned `content` and `state`.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut WindowEntry<C, S>> {
        self.windows.get_mut(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.windows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Registered ids, bottom to top.
    pub fn ids(&self) -> &[WindowId] {
        &self.z_order
    }

    /// Entries in draw order, bottom to top.
    pub fn entries(&self) -> impl Iterator<Item = &WindowEntry<C, S>> + '_ {
        self.z_order.iter().filter_map(|id| self.windows.get(id))
    }

    pub fn z_index(&self, id: &str) -> Option<usize> {
        self.z_order.iter().position(|z| z.as_str() == id)
    }

    /// Current occupant of an exclusive slot.
    pub fn occupant(&self, slot: DockSlot) -> Option<&WindowId> {
        self.windows
            .values()
            .find(|window| window.slot == slot)
            .map(|window| &window.id)
    }

    pub fn cached_position(&self, id: &str) -> Option<&PositionDescriptor> {
        self.position_cache.get(id)
    }

    pub fn is_shifted(&self, id: &str) -> bool {
        self.windows.get(id).is_some_and(|window| window.shifted)
    }

    /// Position of `id` clipped against `target`, ready to render.
    pub fn clipped_position(
        &self,
        id: &str,
        target: Option<&TargetRect>,
    ) -> Option<PositionDescriptor> {
        let window = self.windows.get(id)?;
        Some(clip_to_target(
            &window.position,
            target,
            &self.config,
            window.shifted,
        ))
    }

    /// Pixel box of `id` after clipping.
    pub fn resolved_rect(&self, id: &str, target: Option<&TargetRect>) -> Option<PanelRect> {
        let clipped = self.clipped_position(id, target)?;
        resolve_rect(&clipped, target, &self.config)
    }

    /// Register a panel.
    ///
    /// An occupant of the requested exclusive slot is removed first, with
    /// its own "removed" event. A cached position for the id wins over the
    /// slot default and is consumed; if it is not the slot's default the
    /// panel opens detached instead.
    pub fn add(
        &mut self,
        options: WindowOptions<C, S>,
        owner: Owner,
    ) -> Result<WindowId, WindowError> {
        let WindowOptions {
            id,
            slot,
            position,
            parent_id,
            target,
            content,
            state,
        } = options;
        let id = match id {
            Some(id) => id,
            None => self.generate_id(),
        };
        if self.windows.contains_key(&id) {
            tracing::debug!(window_id = %id, "rejected duplicate window id");
            return Err(WindowError::DuplicateId(id));
        }

        let parent_id = parent_id.filter(|parent| {
            let known = self.windows.contains_key(parent);
            if !known {
                tracing::debug!(window_id = %id, parent = %parent, "parent not registered");
            }
            known
        });
        let requested = if parent_id.is_some() {
            DockSlot::Detached
        } else {
            slot.unwrap_or_default()
        };
        if requested.is_exclusive() && position.is_some() {
            tracing::debug!(window_id = %id, slot = ?requested, "ignoring position for docked window");
        }
        let home_position = (requested == DockSlot::Detached).then(|| {
            self.detached_home(position, parent_id.as_ref(), target.as_ref())
        });

        let initial_home = home_position.unwrap_or_else(|| self.slot_default(requested, id.as_str()));
        let slot = match self.position_cache.get(&id) {
            Some(cached) if *cached != initial_home => DockSlot::Detached,
            _ => requested,
        };

        let occupants = self
            .windows
            .values()
            .map(|window| (window.id.clone(), window.slot));
        if let Some(evicted) = resolve_slot_conflict(slot, occupants) {
            tracing::debug!(window_id = %evicted, slot = ?slot, "evicting slot occupant");
            self.remove(evicted.as_str());
            if self.windows.contains_key(&id) {
                return Err(WindowError::DuplicateId(id));
            }
        }

        let position = match self.position_cache.remove(&id) {
            Some(cached) => {
                tracing::debug!(window_id = %id, "restored cached position");
                cached
            }
            None => home_position.unwrap_or_else(|| self.slot_default(requested, id.as_str())),
        };
        let shifted = slot == DockSlot::DynamicLeft && self.static_occupied_except(id.as_str());

        tracing::debug!(window_id = %id, slot = ?slot, owner = ?owner, "opened window");
        self.windows.insert(
            id.clone(),
            WindowEntry {
                id: id.clone(),
                owner,
                slot,
                home_slot: requested,
                position,
                home_position,
                parent_id,
                shifted,
                content,
                state,
            },
        );
        self.z_order.push(id.clone());
        self.sync_static_shift();
        self.emit(WindowEvent::Added(id.clone()));
        Ok(id)
    }

    /// Unregister a panel and its children. Returns `false` for unknown ids.
    ///
    /// A panel closed away from its home position has that position cached
    /// under its id for the next `add`.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.windows.contains_key(id) {
            return false;
        }
        let children: Vec<WindowId> = self
            .windows
            .values()
            .filter(|window| window.parent_id.as_ref().is_some_and(|p| p.as_str() == id))
            .map(|window| window.id.clone())
            .collect();
        for child in children {
            self.remove(child.as_str());
        }

        let Some(entry) = self.windows.remove(id) else {
            return false;
        };
        self.z_order.retain(|z| z.as_str() != id);
        if entry.position != self.home_position(&entry) {
            tracing::debug!(window_id = %entry.id, "caching window position");
            self.position_cache.insert(entry.id.clone(), entry.position);
        }
        tracing::debug!(window_id = %entry.id, slot = ?entry.slot, "closing window");
        if entry.slot == DockSlot::Static {
            self.sync_static_shift();
        }
        self.emit(WindowEvent::Removed(entry));
        true
    }

    /// Apply a position update, keeping each field's unit.
    ///
    /// Anything other than the slot's own default detaches the panel.
    pub fn set_position(
        &mut self,
        id: &str,
        update: &PositionOptions,
        target: Option<&TargetRect>,
    ) {
        let Some(window) = self.windows.get(id) else {
            return;
        };
        let next = reapply_update(&window.position, update, target, &self.config);
        let previous_slot = window.slot;
        let changed = next != window.position;
        let detach =
            previous_slot != DockSlot::Detached && next != self.slot_default(previous_slot, id);

        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        window.position = next;
        if detach {
            window.slot = DockSlot::Detached;
            window.shifted = false;
        }
        let window_id = window.id.clone();

        if detach {
            tracing::debug!(window_id = %window_id, from = ?previous_slot, "detached window");
            if previous_slot == DockSlot::Static {
                self.sync_static_shift();
            }
        }
        if changed {
            self.emit(WindowEvent::PositionChanged {
                id: window_id.clone(),
                position: next,
            });
        }
        if detach {
            self.emit(WindowEvent::SlotChanged {
                id: window_id,
                previous: previous_slot,
                slot: DockSlot::Detached,
            });
        }
    }

    /// Move a panel by a pixel delta, as a drag handler does every frame.
    pub fn move_by(&mut self, id: &str, dx: f64, dy: f64, target: Option<&TargetRect>) {
        let Some(window) = self.windows.get(id) else {
            return;
        };
        let update = translate(&window.position, dx, dy, target);
        self.set_position(id, &update, target);
    }

    pub fn bring_to_front(&mut self, id: &str) {
        let Some(pos) = self.z_order.iter().position(|z| z.as_str() == id) else {
            return;
        };
        if pos + 1 == self.z_order.len() {
            return;
        }
        let item = self.z_order.remove(pos);
        self.z_order.push(item.clone());
        self.emit(WindowEvent::BroughtToFront(item));
    }

    /// Return a panel to its home slot and position and forget any cached
    /// position. Whoever holds that slot now is evicted.
    pub fn pin(&mut self, id: &str) {
        let Some(window) = self.windows.get(id) else {
            return;
        };
        let home_slot = window.home_slot;
        let others = self
            .windows
            .values()
            .filter(|window| window.id.as_str() != id)
            .map(|window| (window.id.clone(), window.slot));
        if let Some(evicted) = resolve_slot_conflict(home_slot, others) {
            tracing::debug!(window_id = %evicted, slot = ?home_slot, "evicting slot occupant");
            self.remove(evicted.as_str());
        }

        let Some(window) = self.windows.get(id) else {
            return;
        };
        let home = self.home_position(window);
        let previous_slot = window.slot;
        let moved = window.position != home;
        let shifted = home_slot == DockSlot::DynamicLeft && self.static_occupied_except(id);
        self.position_cache.remove(id);

        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        window.slot = home_slot;
        window.position = home;
        window.shifted = shifted;
        let window_id = window.id.clone();
        tracing::debug!(window_id = %window_id, slot = ?home_slot, "pinned window");

        self.sync_static_shift();
        if moved {
            self.emit(WindowEvent::PositionChanged {
                id: window_id.clone(),
                position: home,
            });
        }
        if previous_slot != home_slot {
            self.emit(WindowEvent::SlotChanged {
                id: window_id,
                previous: previous_slot,
                slot: home_slot,
            });
        }
    }

    /// Remove every panel registered by `owner`. Returns how many went.
    pub fn remove_owner(&mut self, owner: &Owner) -> usize {
        let ids: Vec<WindowId> = self
            .entries()
            .filter(|window| window.owner == *owner)
            .map(|window| window.id.clone())
            .collect();
        tracing::debug!(owner = ?owner, count = ids.len(), "removing owner windows");
        let mut removed = 0;
        for id in ids {
            if self.remove(id.as_str()) {
                removed += 1;
            }
        }
        removed
    }

    /// Remove all panels, one "removed" event each. Cached positions and
    /// subscriptions survive.
    pub fn clear(&mut self) {
        let ids = self.z_order.clone();
        for id in ids {
            self.remove(id.as_str());
        }
    }

    /// Remove all panels, forget cached positions and drop every listener.
    pub fn destroy(&mut self) {
        self.clear();
        self.position_cache.clear();
        self.subscriptions.clear();
        self.listeners.clear();
        self.pending_events.clear();
    }

    /// Register a listener. It may call back into the manager; events that
    /// raises are delivered after the current one.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowManager<C, S>, &WindowEvent<C, S>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.subscriptions.insert(id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if !self.subscriptions.remove(&id) {
            return false;
        }
        // during a dispatch the listener lives outside `self.listeners`;
        // it is pruned when the dispatch ends
        self.listeners.retain(|(sid, _)| *sid != id);
        true
    }

    fn emit(&mut self, event: WindowEvent<C, S>) {
        self.pending_events.push_back(event);
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        let mut listeners = std::mem::take(&mut self.listeners);
        while let Some(event) = self.pending_events.pop_front() {
            for (id, listener) in listeners.iter_mut() {
                if self.subscriptions.contains(id) {
                    listener(self, &event);
                }
            }
        }
        // listeners subscribed mid-dispatch were pushed onto the emptied vec
        listeners.append(&mut self.listeners);
        listeners.retain(|(id, _)| self.subscriptions.contains(id));
        self.listeners = listeners;
        self.dispatching = false;
    }

    fn generate_id(&mut self) -> WindowId {
        loop {
            let id = WindowId::new(format!("window-{}", self.next_window_seq));
            self.next_window_seq = self.next_window_seq.saturating_add(1);
            if !self.windows.contains_key(&id) {
                return id;
            }
        }
    }

    fn static_occupied_except(&self, id: &str) -> bool {
        self.windows
            .values()
            .any(|window| window.slot == DockSlot::Static && window.id.as_str() != id)
    }

    fn slot_default(&self, slot: DockSlot, id: &str) -> PositionDescriptor {
        default_position_for_slot(slot, self.static_occupied_except(id), &self.config)
    }

    /// Where `pin` sends a panel: its home slot's default, or for panels
    /// opened detached, the position they were opened at.
    fn home_position(&self, window: &WindowEntry<C, S>) -> PositionDescriptor {
        match (window.home_slot, window.home_position) {
            (DockSlot::Detached, Some(position)) => position,
            (slot, _) => self.slot_default(slot, window.id.as_str()),
        }
    }

    fn detached_home(
        &self,
        position: Option<PositionOptions>,
        parent_id: Option<&WindowId>,
        target: Option<&TargetRect>,
    ) -> PositionDescriptor {
        let mut raw = position.unwrap_or_default();
        if let Some(parent) = parent_id.and_then(|id| self.windows.get(id)) {
            apply_parent_anchor(&mut raw, target, &parent.position, &self.config);
        }
        if raw == PositionOptions::default() {
            default_position_for_slot(DockSlot::Detached, false, &self.config)
        } else {
            normalize(&raw, &self.config)
        }
    }

    /// Keep the `DynamicLeft` occupant's anchor in step with whether a
    /// `Static` panel is open.
    fn sync_static_shift(&mut self) {
        let occupied = self.occupant(DockSlot::Static).is_some();
        let Some(left_id) = self.occupant(DockSlot::DynamicLeft).cloned() else {
            return;
        };
        let position = default_position_for_slot(DockSlot::DynamicLeft, occupied, &self.config);
        let Some(window) = self.windows.get_mut(&left_id) else {
            return;
        };
        if window.shifted == occupied {
            return;
        }
        window.shifted = occupied;
        window.position = position;
        tracing::debug!(window_id = %left_id, shifted = occupied, "re-anchored dynamic left window");
        self.emit(WindowEvent::PositionChanged {
            id: left_id,
            position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Length;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Manager = WindowManager<()>;

    fn opts(id: &str) -> WindowOptions<()> {
        WindowOptions::new(()).id(id)
    }

    fn docked(id: &str, slot: DockSlot) -> WindowOptions<()> {
        opts(id).slot(slot)
    }

    fn record(wm: &mut Manager) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        wm.subscribe(move |_, event| {
            let line = match event {
                WindowEvent::Added(id) => format!("added {id}"),
                WindowEvent::Removed(entry) => format!("removed {}", entry.id()),
                WindowEvent::PositionChanged { id, .. } => format!("moved {id}"),
                WindowEvent::SlotChanged { id, slot, .. } => format!("slot {id} {slot}"),
                WindowEvent::BroughtToFront(id) => format!("front {id}"),
            };
            sink.borrow_mut().push(line);
        });
        log
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut wm = Manager::new();
        wm.add(opts("window-0"), Owner::Host).expect("add");
        let a = wm.add(WindowOptions::new(()), Owner::Host).expect("add");
        let b = wm.add(WindowOptions::new(()), Owner::Host).expect("add");
        assert_ne!(a, b);
        assert_ne!(a.as_str(), "window-0");
        assert_eq!(wm.len(), 3);
    }

    #[test]
    fn duplicate_id_leaves_existing_entry_alone() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicRight), Owner::Host)
            .expect("add");
        let err = wm
            .add(docked("a", DockSlot::Static), Owner::extension("other"))
            .unwrap_err();
        assert_eq!(err, WindowError::DuplicateId(WindowId::new("a")));
        let entry = wm.get("a").expect("still registered");
        assert_eq!(entry.slot(), DockSlot::DynamicRight);
        assert_eq!(entry.owner(), &Owner::Host);
        assert_eq!(wm.len(), 1);
    }

    #[test]
    fn eviction_fires_before_insertion() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        let log = record(&mut wm);
        wm.add(docked("c", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        assert!(!wm.has("a"));
        assert!(wm.has("c"));
        assert_eq!(*log.borrow(), vec!["removed a", "added c"]);
    }

    #[test]
    fn detached_panels_coexist() {
        let mut wm = Manager::new();
        for id in ["a", "b", "c"] {
            wm.add(opts(id), Owner::Host).expect("add");
        }
        assert_eq!(wm.len(), 3);
        assert_eq!(wm.ids().len(), 3);
        assert_eq!(wm.occupant(DockSlot::Static), None);
    }

    #[test]
    fn static_shifts_dynamic_left_and_back() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        wm.add(docked("b", DockSlot::Static), Owner::Host)
            .expect("add");
        assert_eq!(wm.get("a").unwrap().position().left.to_string(), "320px");
        assert!(wm.is_shifted("a"));

        wm.remove("b");
        assert_eq!(wm.get("a").unwrap().position().left, Length::Px(0.0));
        assert!(!wm.is_shifted("a"));
        // back at its default: nothing is cached on removal
        wm.remove("a");
        assert!(wm.cached_position("a").is_none());
    }

    #[test]
    fn dynamic_left_opens_shifted_next_to_static() {
        let mut wm = Manager::new();
        wm.add(docked("s", DockSlot::Static), Owner::Host)
            .expect("add");
        wm.add(docked("l", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        assert_eq!(wm.get("l").unwrap().position().left, Length::Px(320.0));
        assert!(wm.is_shifted("l"));
    }

    #[test]
    fn detaching_static_releases_shift() {
        let mut wm = Manager::new();
        wm.add(docked("l", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        wm.add(docked("s", DockSlot::Static), Owner::Host)
            .expect("add");
        wm.set_position("s", &PositionOptions::new().left(600).top(100), None);
        assert_eq!(wm.get("s").unwrap().slot(), DockSlot::Detached);
        assert_eq!(wm.get("l").unwrap().position().left, Length::Px(0.0));
    }

    #[test]
    fn reposition_detaches_and_emits() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        let log = record(&mut wm);
        wm.set_position("a", &PositionOptions::new().left(500).top(40), None);
        let entry = wm.get("a").unwrap();
        assert_eq!(entry.slot(), DockSlot::Detached);
        assert_eq!(entry.home_slot(), DockSlot::DynamicLeft);
        assert_eq!(entry.position().left, Length::Px(500.0));
        assert_eq!(*log.borrow(), vec!["moved a", "slot a detached"]);
    }

    #[test]
    fn zero_move_keeps_docked_slot() {
        let mut wm = Manager::new();
        wm.add(docked("r", DockSlot::DynamicRight), Owner::Host)
            .expect("add");
        let before = *wm.get("r").unwrap().position();
        wm.move_by("r", 0.0, 0.0, None);
        let entry = wm.get("r").unwrap();
        assert_eq!(entry.slot(), DockSlot::DynamicRight);
        assert_eq!(*entry.position(), before);
        assert_eq!(entry.position().right.to_string(), "0px");
    }

    #[test]
    fn drag_moves_right_anchored_panel() {
        let mut wm = Manager::new();
        let target = TargetRect::new(0.0, 0.0, 1000.0, 800.0);
        wm.add(docked("r", DockSlot::DynamicRight), Owner::Host)
            .expect("add");
        wm.move_by("r", -30.0, 10.0, Some(&target));
        let entry = wm.get("r").unwrap();
        assert_eq!(entry.slot(), DockSlot::Detached);
        assert_eq!(entry.position().right, Length::Px(30.0));
        assert_eq!(entry.position().top, Length::Px(10.0));
        assert_eq!(entry.position().width, Length::Px(320.0));
    }

    #[test]
    fn cache_restores_and_pin_clears() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        wm.set_position("a", &PositionOptions::new().left(500).top(40), None);
        let moved = *wm.get("a").unwrap().position();
        wm.remove("a");
        assert_eq!(wm.cached_position("a"), Some(&moved));

        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        let entry = wm.get("a").unwrap();
        assert_eq!(*entry.position(), moved);
        assert_eq!(entry.slot(), DockSlot::Detached);
        assert!(wm.cached_position("a").is_none());

        wm.pin("a");
        let entry = wm.get("a").unwrap();
        assert_eq!(entry.slot(), DockSlot::DynamicLeft);
        assert_eq!(entry.position().left, Length::Px(0.0));
        wm.remove("a");
        assert!(wm.cached_position("a").is_none());
        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        assert_eq!(wm.get("a").unwrap().position().left, Length::Px(0.0));
    }

    #[test]
    fn pin_evicts_current_home_occupant() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicRight), Owner::Host)
            .expect("add");
        wm.set_position("a", &PositionOptions::new().right(200), None);
        wm.add(docked("b", DockSlot::DynamicRight), Owner::Host)
            .expect("add");
        assert!(wm.has("a"));
        wm.pin("a");
        assert!(!wm.has("b"));
        assert_eq!(wm.occupant(DockSlot::DynamicRight).map(|id| id.as_str()), Some("a"));
        // b left from its default position: nothing cached
        assert!(wm.cached_position("b").is_none());
    }

    #[test]
    fn pin_detached_panel_returns_to_open_position() {
        let mut wm = Manager::new();
        let start = PositionOptions::new().left(50).top(60);
        wm.add(opts("d").position(start), Owner::Host).expect("add");
        wm.set_position("d", &PositionOptions::new().left(400), None);
        wm.pin("d");
        let entry = wm.get("d").unwrap();
        assert_eq!(entry.position().left, Length::Px(50.0));
        assert_eq!(entry.position().top, Length::Px(60.0));
        assert_eq!(entry.slot(), DockSlot::Detached);
    }

    #[test]
    fn docked_slot_ignores_caller_position() {
        let mut wm = Manager::new();
        wm.add(
            docked("s", DockSlot::Static).position(PositionOptions::new().left(700)),
            Owner::Host,
        )
        .expect("add");
        assert_eq!(wm.get("s").unwrap().position().left, Length::Px(0.0));
    }

    #[test]
    fn bring_to_front_reorders() {
        let mut wm = Manager::new();
        for id in ["a", "b", "c"] {
            wm.add(opts(id), Owner::Host).expect("add");
        }
        let log = record(&mut wm);
        wm.bring_to_front("a");
        wm.bring_to_front("a");
        wm.bring_to_front("zzz");
        let ids: Vec<&str> = wm.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(wm.z_index("a"), Some(2));
        assert_eq!(*log.borrow(), vec!["front a"]);
    }

    #[test]
    fn remove_owner_only_takes_matching_windows() {
        let mut wm = Manager::new();
        wm.add(opts("host"), Owner::Host).expect("add");
        wm.add(opts("draw-1"), Owner::extension("draw"))
            .expect("add");
        wm.add(docked("draw-2", DockSlot::Static), Owner::extension("draw"))
            .expect("add");
        wm.add(opts("measure"), Owner::extension("measure"))
            .expect("add");
        let log = record(&mut wm);
        assert_eq!(wm.remove_owner(&Owner::extension("draw")), 2);
        assert!(wm.has("host"));
        assert!(wm.has("measure"));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn children_follow_parent() {
        let mut wm = Manager::new();
        let target = TargetRect::new(0.0, 0.0, 1200.0, 800.0);
        wm.add(docked("parent", DockSlot::Static), Owner::Host)
            .expect("add");
        wm.add(
            opts("child").parent("parent").target(target),
            Owner::Host,
        )
        .expect("add");
        let child = wm.get("child").unwrap();
        assert_eq!(child.slot(), DockSlot::Detached);
        assert_eq!(child.parent_id().map(|id| id.as_str()), Some("parent"));
        assert_eq!(child.position().left, Length::Px(322.0));
        assert_eq!(child.position().top, Length::Px(0.0));

        let log = record(&mut wm);
        wm.remove("parent");
        assert!(!wm.has("child"));
        assert_eq!(*log.borrow(), vec!["removed child", "removed parent"]);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut wm = Manager::new();
        let log = record(&mut wm);
        assert!(!wm.remove("nope"));
        wm.set_position("nope", &PositionOptions::new().left(1), None);
        wm.move_by("nope", 1.0, 1.0, None);
        wm.bring_to_front("nope");
        wm.pin("nope");
        assert!(wm.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn listener_can_reenter_the_manager() {
        let mut wm = Manager::new();
        wm.add(opts("companion"), Owner::Host).expect("add");
        wm.add(opts("main"), Owner::Host).expect("add");
        wm.subscribe(|wm, event| {
            if let WindowEvent::Removed(entry) = event
                && entry.id().as_str() == "main"
            {
                wm.remove("companion");
            }
        });
        let log = record(&mut wm);
        wm.remove("main");
        assert!(wm.is_empty());
        assert_eq!(*log.borrow(), vec!["removed main", "removed companion"]);
    }

    #[test]
    fn listener_can_reopen_removed_id() {
        let mut wm = Manager::new();
        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        wm.set_position("a", &PositionOptions::new().left(90).top(90), None);
        let reopened = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&reopened);
        wm.subscribe(move |wm, event| {
            let WindowEvent::Removed(entry) = event else {
                return;
            };
            if sink.borrow().is_some() {
                return;
            }
            let id = entry.id().clone();
            wm.add(WindowOptions::new(()).id(id.clone()), Owner::Host)
                .expect("re-add");
            let restored = wm.get(id.as_str()).map(|e| *e.position());
            *sink.borrow_mut() = restored;
        });
        wm.remove("a");
        let restored = reopened.borrow().expect("listener ran");
        assert_eq!(restored.left, Length::Px(90.0));
        assert!(wm.cached_position("a").is_none());
    }

    #[test]
    fn unsubscribe_and_destroy_release_listeners() {
        let mut wm = Manager::new();
        let log = record(&mut wm);
        let extra = wm.subscribe(|_, _| {});
        assert!(wm.unsubscribe(extra));
        assert!(!wm.unsubscribe(extra));

        wm.add(docked("a", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        wm.set_position("a", &PositionOptions::new().left(10).top(10), None);
        log.borrow_mut().clear();
        wm.destroy();
        assert!(wm.is_empty());
        assert!(wm.cached_position("a").is_none());
        assert_eq!(*log.borrow(), vec!["removed a"]);

        wm.add(opts("b"), Owner::Host).expect("add");
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn clear_keeps_cache_and_listeners() {
        let mut wm = Manager::new();
        wm.add(opts("a"), Owner::Host).expect("add");
        wm.set_position("a", &PositionOptions::new().left(10), None);
        let log = record(&mut wm);
        wm.clear();
        assert!(wm.is_empty());
        assert!(wm.cached_position("a").is_some());
        wm.add(opts("b"), Owner::Host).expect("add");
        assert_eq!(*log.borrow(), vec!["removed a", "added b"]);
    }

    #[test]
    fn clipped_position_respects_shift() {
        let mut wm = Manager::new();
        let target = TargetRect::new(0.0, 0.0, 1000.0, 600.0);
        wm.add(docked("l", DockSlot::DynamicLeft), Owner::Host)
            .expect("add");
        wm.add(docked("s", DockSlot::Static), Owner::Host)
            .expect("add");
        let clipped = wm.clipped_position("l", Some(&target)).expect("known id");
        assert_eq!(clipped.max_width, Length::Px(680.0));
        let rect = wm.resolved_rect("l", Some(&target)).expect("resolvable");
        assert_eq!(rect.x, 320.0);
        assert_eq!(rect.width, 320.0);
    }
}
