use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use core::sync::atomic::{AtomicU8, Ordering};

use windowing::{
    Align, ItemKey, KeyCacheKey, OnChangeCallback, Rect, Virtualizer, VirtualizerOptions,
};

use crate::options::Hooks;
use crate::{
    HostError, HostOptions, Scheduler, ScrollBehavior, ScrollToRequest, TaskId, Unsubscribe,
};

const CHANGE_NONE: u8 = 0;
const CHANGE_ASYNC: u8 = 1;
const CHANGE_SYNC: u8 = 2;

/// A framework-neutral controller that wires a [`windowing::Virtualizer`] to a host scroll
/// container.
///
/// It owns the observer subscriptions, the `is_scrolling` idle timer and the deferred second
/// pass of `scroll_to_index`, and performs every scroll write the virtualizer asks for.
///
/// Adapters drive it by calling:
/// - `mount()` once the scroll container exists, and `will_update()` after each host render
/// - `measure_element(index, &element)` for rendered items
/// - `scroll_to_index` / `scroll_to_offset` for programmatic scrolling
///
/// Teardown happens exactly once, either through [`Self::teardown`] or on drop.
pub struct Controller<S, E, K = ItemKey>
where
    S: Clone + PartialEq + 'static,
    E: 'static,
    K: KeyCacheKey + 'static,
{
    shared: Rc<Shared<S, E, K>>,
}

struct Shared<S, E, K> {
    v: RefCell<Virtualizer<K>>,
    rt: RefCell<Runtime<S, K>>,
    hooks: Hooks<S, E>,
    scheduler: Rc<dyn Scheduler>,
    changed: Arc<AtomicU8>,
}

struct Runtime<S, K> {
    element: Option<S>,
    unsubscribes: Vec<Unsubscribe>,
    // The immediate observer callbacks fired while subscribing are not user scrolls.
    attaching: bool,
    idle_timer: Option<TaskId>,
    pending_frame: Option<TaskId>,
    user_on_change: Option<OnChangeCallback<K>>,
    torn_down: bool,
}

fn change_tracker<K: 'static>(
    changed: &Arc<AtomicU8>,
    user: Option<OnChangeCallback<K>>,
) -> OnChangeCallback<K> {
    let changed = Arc::clone(changed);
    Arc::new(move |v: &Virtualizer<K>, sync: bool| {
        let state = if sync { CHANGE_SYNC } else { CHANGE_ASYNC };
        changed.fetch_max(state, Ordering::AcqRel);
        if let Some(user) = &user {
            user(v, sync);
        }
    })
}

impl<S, E, K> Controller<S, E, K>
where
    S: Clone + PartialEq + 'static,
    E: 'static,
    K: KeyCacheKey + 'static,
{
    /// Validates the host callbacks and builds the virtualizer. Nothing is observed until
    /// [`Self::mount`].
    ///
    /// A `VirtualizerOptions::on_change` callback is still honoured; it runs while the
    /// virtualizer is borrowed and must not call back into the controller. Use
    /// `HostOptions::on_change` for that.
    pub fn new(
        options: HostOptions<S, E, K>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, HostError> {
        let (mut virtualizer, hooks) = options.into_parts()?;
        vdebug!(
            count = virtualizer.count,
            enabled = virtualizer.enabled,
            "Controller::new"
        );

        let changed = Arc::new(AtomicU8::new(CHANGE_NONE));
        let user_on_change = virtualizer.on_change.take();
        virtualizer.on_change = Some(change_tracker(&changed, user_on_change.clone()));

        let shared = Rc::new(Shared {
            v: RefCell::new(Virtualizer::new(virtualizer)),
            rt: RefCell::new(Runtime {
                element: None,
                unsubscribes: Vec::new(),
                attaching: false,
                idle_timer: None,
                pending_frame: None,
                user_on_change,
                torn_down: false,
            }),
            hooks,
            scheduler,
            changed,
        });
        Ok(Self { shared })
    }

    /// Read access to the virtualizer, e.g. to render `virtual_items()`.
    ///
    /// Drop the guard before calling any other controller method.
    pub fn virtualizer(&self) -> Ref<'_, Virtualizer<K>> {
        self.shared.v.borrow()
    }

    /// Runs `f` against the virtualizer, then reports changes to `HostOptions::on_change`.
    ///
    /// Scroll corrections returned by calls made inside `f` are not written to the container;
    /// use the controller's own methods for those.
    pub fn update<R>(&self, f: impl FnOnce(&mut Virtualizer<K>) -> R) -> Result<R, HostError> {
        self.shared.ensure_live()?;
        let out = f(&mut self.shared.v.borrow_mut());
        self.shared.flush_change();
        Ok(out)
    }

    pub fn element(&self) -> Option<S> {
        self.shared.rt.borrow().element.clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.rt.borrow().torn_down
    }

    /// Subscribes to the current scroll element.
    pub fn mount(&self) -> Result<(), HostError> {
        vdebug!("Controller::mount");
        self.will_update()
    }

    /// Re-reads `get_scroll_element` and re-subscribes when the element changed.
    ///
    /// While the virtualizer is disabled no element is observed; the first call after
    /// re-enabling subscribes again and picks up fresh geometry.
    pub fn will_update(&self) -> Result<(), HostError> {
        self.shared.ensure_live()?;
        let enabled = self.shared.v.borrow().enabled();
        let next = if enabled {
            (self.shared.hooks.get_scroll_element)()
        } else {
            None
        };
        if self.shared.rt.borrow().element == next {
            return Ok(());
        }
        self.shared.detach();
        if let Some(element) = next {
            self.shared.attach(element);
        }
        self.shared.flush_change();
        Ok(())
    }

    /// Replaces the virtualizer options atomically.
    ///
    /// Disabling detaches from the scroll element; call [`Self::will_update`] after
    /// re-enabling to observe it again.
    pub fn set_options(&self, mut options: VirtualizerOptions<K>) -> Result<(), HostError> {
        self.shared.ensure_live()?;
        let user = options.on_change.take();
        options.on_change = Some(change_tracker(&self.shared.changed, user.clone()));
        self.shared.rt.borrow_mut().user_on_change = user;
        let enabled = options.enabled;
        self.shared.v.borrow_mut().set_options(options);
        if !enabled {
            self.shared.cancel_pending_frame();
            self.shared.detach();
        }
        self.shared.flush_change();
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(
        &self,
        f: impl FnOnce(&mut VirtualizerOptions<K>),
    ) -> Result<(), HostError> {
        self.shared.ensure_live()?;
        let mut next = self.shared.v.borrow().options().clone();
        next.on_change = self.shared.rt.borrow().user_on_change.clone();
        f(&mut next);
        self.set_options(next)
    }

    /// Measures a rendered item through `measure_element` and records its size.
    ///
    /// Returns the anti-jump scroll write, which has already been performed.
    pub fn measure_element(&self, index: usize, element: &E) -> Result<Option<f64>, HostError> {
        self.shared.ensure_live()?;
        let measure = self
            .shared
            .hooks
            .measure_element
            .clone()
            .ok_or(HostError::MissingCallback("measure_element"))?;
        let horizontal = self.shared.v.borrow().options().horizontal;
        let size = measure(element, horizontal);
        self.measure(index, size)
    }

    /// Records a size the host measured itself.
    pub fn measure(&self, index: usize, size: f64) -> Result<Option<f64>, HostError> {
        self.shared.ensure_live()?;
        let (before, write) = {
            let mut v = self.shared.v.borrow_mut();
            let before = v.scroll_offset();
            (before, v.measure(index, size))
        };
        if let Some(offset) = write {
            self.shared
                .write_scroll(offset, offset - before, ScrollBehavior::Auto);
        }
        self.shared.flush_change();
        Ok(write)
    }

    /// Scrolls to an offset and writes it to the container. Returns the applied offset.
    pub fn scroll_to_offset(
        &self,
        offset: f64,
        align: Align,
        behavior: ScrollBehavior,
    ) -> Result<f64, HostError> {
        self.shared.ensure_live()?;
        self.shared.cancel_pending_frame();
        let applied = self.shared.v.borrow_mut().scroll_to_offset(offset, align);
        self.shared.write_scroll(applied, 0.0, behavior);
        self.shared.flush_change();
        Ok(applied)
    }

    /// Scrolls to an index, writes the offset immediately and schedules one correction pass
    /// for the next frame. A newer request replaces a pending pass.
    pub fn scroll_to_index(
        &self,
        index: usize,
        align: Align,
        behavior: ScrollBehavior,
    ) -> Result<f64, HostError> {
        self.shared.ensure_live()?;
        let applied = self.shared.v.borrow_mut().scroll_to_index(index, align);
        vtrace!(index, applied, "Controller::scroll_to_index");
        self.shared.write_scroll(applied, 0.0, behavior);
        self.shared.schedule_second_pass(behavior);
        self.shared.flush_change();
        Ok(applied)
    }

    /// Unsubscribes the observers and cancels pending timers.
    ///
    /// Runs at most once; returns `false` when the controller was already torn down.
    pub fn teardown(&self) -> bool {
        let (unsubscribes, tasks) = {
            let mut rt = self.shared.rt.borrow_mut();
            if rt.torn_down {
                return false;
            }
            rt.torn_down = true;
            rt.element = None;
            (
                core::mem::take(&mut rt.unsubscribes),
                [rt.idle_timer.take(), rt.pending_frame.take()],
            )
        };
        vdebug!(
            subscriptions = unsubscribes.len(),
            "Controller::teardown"
        );
        for unsubscribe in unsubscribes {
            unsubscribe();
        }
        for id in tasks.into_iter().flatten() {
            self.shared.scheduler.cancel(id);
        }
        true
    }
}

impl<S, E, K> Drop for Controller<S, E, K>
where
    S: Clone + PartialEq + 'static,
    E: 'static,
    K: KeyCacheKey + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<S, E, K> Shared<S, E, K>
where
    S: Clone + PartialEq + 'static,
    E: 'static,
    K: KeyCacheKey + 'static,
{
    fn ensure_live(&self) -> Result<(), HostError> {
        if self.rt.borrow().torn_down {
            return Err(HostError::TornDown);
        }
        Ok(())
    }

    fn attach(self: &Rc<Self>, element: S) {
        vdebug!("attaching scroll element");
        {
            let mut rt = self.rt.borrow_mut();
            rt.element = Some(element.clone());
            rt.attaching = true;
        }

        let weak = Rc::downgrade(self);
        let unsubscribe_rect = (self.hooks.observe_element_rect)(
            &element,
            Box::new(move |rect| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_rect(rect);
                }
            }),
        );
        let weak = Rc::downgrade(self);
        let unsubscribe_offset = (self.hooks.observe_element_offset)(
            &element,
            Box::new(move |offset| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_offset(offset);
                }
            }),
        );

        let mut rt = self.rt.borrow_mut();
        rt.attaching = false;
        rt.unsubscribes.push(unsubscribe_rect);
        rt.unsubscribes.push(unsubscribe_offset);
    }

    fn detach(&self) {
        let unsubscribes = {
            let mut rt = self.rt.borrow_mut();
            rt.element = None;
            core::mem::take(&mut rt.unsubscribes)
        };
        for unsubscribe in unsubscribes {
            unsubscribe();
        }
    }

    fn on_rect(&self, rect: Rect) {
        if self.rt.borrow().torn_down {
            return;
        }
        self.v.borrow_mut().set_scroll_rect(rect);
        self.flush_change();
    }

    fn on_offset(self: &Rc<Self>, offset: f64) {
        let attaching = {
            let rt = self.rt.borrow();
            if rt.torn_down {
                return;
            }
            rt.attaching
        };
        if attaching {
            self.v.borrow_mut().set_scroll_offset(offset);
        } else {
            let now_ms = self.scheduler.now_ms();
            self.v
                .borrow_mut()
                .apply_scroll_offset_event(offset, now_ms);
            self.arm_idle_timer();
        }
        self.flush_change();
    }

    fn arm_idle_timer(self: &Rc<Self>) {
        let delay_ms = self.v.borrow().options().is_scrolling_reset_delay_ms;
        let previous = self.rt.borrow_mut().idle_timer.take();
        if let Some(id) = previous {
            self.scheduler.cancel(id);
        }
        let weak = Rc::downgrade(self);
        let id = self.scheduler.set_timeout(
            delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_idle();
                }
            }),
        );
        self.rt.borrow_mut().idle_timer = Some(id);
    }

    fn on_idle(&self) {
        {
            let mut rt = self.rt.borrow_mut();
            rt.idle_timer = None;
            if rt.torn_down {
                return;
            }
        }
        self.v.borrow_mut().set_is_scrolling(false);
        self.flush_change();
    }

    fn cancel_pending_frame(&self) {
        let pending = self.rt.borrow_mut().pending_frame.take();
        if let Some(id) = pending {
            self.scheduler.cancel(id);
        }
    }

    fn schedule_second_pass(self: &Rc<Self>, behavior: ScrollBehavior) {
        self.cancel_pending_frame();
        if !self.v.borrow().has_pending_scroll() {
            return;
        }
        let weak = Rc::downgrade(self);
        let id = self.scheduler.request_frame(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.second_pass(behavior);
            }
        }));
        self.rt.borrow_mut().pending_frame = Some(id);
    }

    fn second_pass(&self, behavior: ScrollBehavior) {
        {
            let mut rt = self.rt.borrow_mut();
            rt.pending_frame = None;
            if rt.torn_down {
                return;
            }
        }
        let corrected = self.v.borrow_mut().resolve_pending_scroll();
        if let Some(offset) = corrected {
            vtrace!(offset, "scroll_to_index second pass");
            self.write_scroll(offset, 0.0, behavior);
        }
        self.flush_change();
    }

    fn write_scroll(&self, offset: f64, adjustment: f64, behavior: ScrollBehavior) {
        let Some(element) = self.rt.borrow().element.clone() else {
            vwarn!(offset, "scroll write without a mounted scroll element");
            return;
        };
        let horizontal = self.v.borrow().options().horizontal;
        (self.hooks.scroll_to_fn)(
            &element,
            ScrollToRequest {
                offset,
                behavior,
                horizontal,
                adjustment,
            },
        );
    }

    fn flush_change(&self) {
        let state = self.changed.swap(CHANGE_NONE, Ordering::AcqRel);
        if state == CHANGE_NONE {
            return;
        }
        if let Some(on_change) = &self.hooks.on_change {
            on_change(state == CHANGE_SYNC);
        }
    }
}
