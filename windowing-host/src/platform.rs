//! Contracts between the controller and the host UI toolkit.

use alloc::boxed::Box;

use windowing::Rect;

/// Returned by observer subscriptions. Called exactly once when the controller detaches.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// A deferred unit of work handed to a [`Scheduler`].
pub type Task = Box<dyn FnOnce()>;

/// Identifies a scheduled frame or timeout so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// The host's clock and deferred-callback primitives.
///
/// The controller only ever uses these fire-and-forget: it never blocks waiting on a task.
/// Implementations must not run a task synchronously from inside `request_frame` or
/// `set_timeout`.
pub trait Scheduler {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> u64;
    /// Runs `task` after the next paint.
    fn request_frame(&self, task: Task) -> TaskId;
    fn set_timeout(&self, delay_ms: u64, task: Task) -> TaskId;
    /// Cancels a frame or timeout. Unknown or already fired ids are ignored.
    fn cancel(&self, id: TaskId);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// A scroll position write the host must perform on its scroll container.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToRequest {
    /// Final offset along the virtualized axis.
    pub offset: f64,
    pub behavior: ScrollBehavior,
    pub horizontal: bool,
    /// Anti-jump delta already included in `offset` (`0.0` for explicit scrolls).
    pub adjustment: f64,
}

/// A scroll container that can be moved programmatically.
pub trait ScrollTarget {
    /// Scrolls to the given position. `None` leaves that axis untouched.
    fn scroll_to(&self, left: Option<f64>, top: Option<f64>, behavior: ScrollBehavior);
}

/// An element whose rendered border box can be read.
pub trait MeasureTarget {
    fn border_box_size(&self) -> Rect;
}

/// Default `scroll_to_fn`: writes `request.offset` on the virtualized axis only.
pub fn element_scroll<S: ScrollTarget + ?Sized>(element: &S, request: ScrollToRequest) {
    vtrace!(
        offset = request.offset,
        horizontal = request.horizontal,
        "element_scroll"
    );
    if request.horizontal {
        element.scroll_to(Some(request.offset), None, request.behavior);
    } else {
        element.scroll_to(None, Some(request.offset), request.behavior);
    }
}

/// Default `measure_element`: the border-box extent along the virtualized axis.
pub fn measure_border_box<E: MeasureTarget + ?Sized>(element: &E, horizontal: bool) -> f64 {
    element.border_box_size().main(horizontal)
}
