use alloc::boxed::Box;
use alloc::rc::Rc;

use windowing::{ItemKey, Rect, VirtualizerOptions};

use crate::{
    HostError, MeasureTarget, ScrollTarget, ScrollToRequest, Unsubscribe, element_scroll,
    measure_border_box,
};

/// Returns the current scroll container, if it exists yet.
pub type GetScrollElement<S> = Rc<dyn Fn() -> Option<S>>;

/// Subscribes to viewport size changes. Must invoke the callback once immediately with the
/// current size.
pub type ObserveElementRect<S> = Rc<dyn Fn(&S, Box<dyn FnMut(Rect)>) -> Unsubscribe>;

/// Subscribes to scroll offset changes. Must invoke the callback once immediately with the
/// current offset.
pub type ObserveElementOffset<S> = Rc<dyn Fn(&S, Box<dyn FnMut(f64)>) -> Unsubscribe>;

/// Performs a scroll write on the container.
pub type ScrollToFn<S> = Rc<dyn Fn(&S, ScrollToRequest)>;

/// Reads a rendered item's extent. The second argument is `horizontal`.
pub type MeasureElementFn<E> = Rc<dyn Fn(&E, bool) -> f64>;

/// Called after a controller operation changed the virtualizer's output, with every internal
/// borrow released. The argument is `sync`: flush the re-render before the next paint.
pub type HostChangeCallback = Rc<dyn Fn(bool)>;

/// Configuration for [`crate::Controller`].
///
/// `S` is the host's scroll container handle, compared by `PartialEq` to detect when it was
/// replaced. `E` is the host's rendered item handle.
pub struct HostOptions<S, E, K = ItemKey> {
    pub virtualizer: VirtualizerOptions<K>,
    pub get_scroll_element: Option<GetScrollElement<S>>,
    pub observe_element_rect: Option<ObserveElementRect<S>>,
    pub observe_element_offset: Option<ObserveElementOffset<S>>,
    pub scroll_to_fn: Option<ScrollToFn<S>>,
    pub measure_element: Option<MeasureElementFn<E>>,
    pub on_change: Option<HostChangeCallback>,
}

impl<S, E, K> Clone for HostOptions<S, E, K> {
    fn clone(&self) -> Self {
        Self {
            virtualizer: self.virtualizer.clone(),
            get_scroll_element: self.get_scroll_element.clone(),
            observe_element_rect: self.observe_element_rect.clone(),
            observe_element_offset: self.observe_element_offset.clone(),
            scroll_to_fn: self.scroll_to_fn.clone(),
            measure_element: self.measure_element.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<S, E, K> core::fmt::Debug for HostOptions<S, E, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HostOptions")
            .field("virtualizer", &self.virtualizer)
            .field("get_scroll_element", &self.get_scroll_element.is_some())
            .field("observe_element_rect", &self.observe_element_rect.is_some())
            .field(
                "observe_element_offset",
                &self.observe_element_offset.is_some(),
            )
            .field("scroll_to_fn", &self.scroll_to_fn.is_some())
            .field("measure_element", &self.measure_element.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: 'static, E: 'static, K> HostOptions<S, E, K> {
    pub fn new(virtualizer: VirtualizerOptions<K>) -> Self {
        Self {
            virtualizer,
            get_scroll_element: None,
            observe_element_rect: None,
            observe_element_offset: None,
            scroll_to_fn: None,
            measure_element: None,
            on_change: None,
        }
    }

    pub fn with_get_scroll_element(mut self, f: impl Fn() -> Option<S> + 'static) -> Self {
        self.get_scroll_element = Some(Rc::new(f));
        self
    }

    pub fn with_observe_element_rect(
        mut self,
        f: impl Fn(&S, Box<dyn FnMut(Rect)>) -> Unsubscribe + 'static,
    ) -> Self {
        self.observe_element_rect = Some(Rc::new(f));
        self
    }

    pub fn with_observe_element_offset(
        mut self,
        f: impl Fn(&S, Box<dyn FnMut(f64)>) -> Unsubscribe + 'static,
    ) -> Self {
        self.observe_element_offset = Some(Rc::new(f));
        self
    }

    pub fn with_scroll_to_fn(mut self, f: impl Fn(&S, ScrollToRequest) + 'static) -> Self {
        self.scroll_to_fn = Some(Rc::new(f));
        self
    }

    pub fn with_measure_element(mut self, f: impl Fn(&E, bool) -> f64 + 'static) -> Self {
        self.measure_element = Some(Rc::new(f));
        self
    }

    pub fn with_on_change(mut self, f: Option<impl Fn(bool) + 'static>) -> Self {
        self.on_change = f.map(|f| Rc::new(f) as _);
        self
    }

    /// Checks that every required callback is present.
    ///
    /// `measure_element` is optional here; [`crate::Controller::measure_element`] reports it
    /// missing when called without one.
    pub fn validate(&self) -> Result<(), HostError> {
        if self.get_scroll_element.is_none() {
            return Err(HostError::MissingCallback("get_scroll_element"));
        }
        if self.observe_element_rect.is_none() {
            return Err(HostError::MissingCallback("observe_element_rect"));
        }
        if self.observe_element_offset.is_none() {
            return Err(HostError::MissingCallback("observe_element_offset"));
        }
        if self.scroll_to_fn.is_none() {
            return Err(HostError::MissingCallback("scroll_to_fn"));
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> Result<(VirtualizerOptions<K>, Hooks<S, E>), HostError> {
        let hooks = Hooks {
            get_scroll_element: self
                .get_scroll_element
                .ok_or(HostError::MissingCallback("get_scroll_element"))?,
            observe_element_rect: self
                .observe_element_rect
                .ok_or(HostError::MissingCallback("observe_element_rect"))?,
            observe_element_offset: self
                .observe_element_offset
                .ok_or(HostError::MissingCallback("observe_element_offset"))?,
            scroll_to_fn: self
                .scroll_to_fn
                .ok_or(HostError::MissingCallback("scroll_to_fn"))?,
            measure_element: self.measure_element,
            on_change: self.on_change,
        };
        Ok((self.virtualizer, hooks))
    }
}

impl<S: ScrollTarget + 'static, E: 'static, K> HostOptions<S, E, K> {
    /// Uses [`element_scroll`] as `scroll_to_fn`.
    pub fn with_default_scroll_to_fn(self) -> Self {
        self.with_scroll_to_fn(|el: &S, request| element_scroll(el, request))
    }
}

impl<S: 'static, E: MeasureTarget + 'static, K> HostOptions<S, E, K> {
    /// Uses [`measure_border_box`] as `measure_element`.
    pub fn with_default_measure_element(self) -> Self {
        self.with_measure_element(|el: &E, horizontal| measure_border_box(el, horizontal))
    }
}

/// Validated callbacks, fixed for the controller's lifetime.
pub(crate) struct Hooks<S, E> {
    pub(crate) get_scroll_element: GetScrollElement<S>,
    pub(crate) observe_element_rect: ObserveElementRect<S>,
    pub(crate) observe_element_offset: ObserveElementOffset<S>,
    pub(crate) scroll_to_fn: ScrollToFn<S>,
    pub(crate) measure_element: Option<MeasureElementFn<E>>,
    pub(crate) on_change: Option<HostChangeCallback>,
}
