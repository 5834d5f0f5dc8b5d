use std::cell::{Cell, RefCell};
use std::rc::Rc;

use windowing::{Align, Rect, VirtualizerOptions};
use windowing_host::{
    Controller, HostOptions, MeasureTarget, ScrollBehavior, ScrollTarget, Scheduler, Task,
    TaskId, Unsubscribe,
};

type OffsetListener = Rc<RefCell<Box<dyn FnMut(f64)>>>;

// A scroll container that echoes writes back to its offset listener, like a real one would.
#[derive(Clone, Default)]
struct Element {
    rect: Rect,
    listener: Rc<RefCell<Option<OffsetListener>>>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.listener, &other.listener)
    }
}

impl ScrollTarget for Element {
    fn scroll_to(&self, _left: Option<f64>, top: Option<f64>, _behavior: ScrollBehavior) {
        let Some(top) = top else { return };
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            (&mut *listener.borrow_mut())(top);
        }
    }
}

struct Row(f64);

impl MeasureTarget for Row {
    fn border_box_size(&self) -> Rect {
        Rect::new(320.0, self.0)
    }
}

#[derive(Default)]
struct Loop {
    now: Cell<u64>,
    ids: Cell<u64>,
    queue: RefCell<Vec<(TaskId, u64, Task)>>,
}

impl Loop {
    // Runs everything due by `now + ms`, frames included (they are due "now").
    fn run_for(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
        loop {
            let due = {
                let mut queue = self.queue.borrow_mut();
                let now = self.now.get();
                queue
                    .iter()
                    .position(|(_, at, _)| *at <= now)
                    .map(|i| queue.remove(i))
            };
            let Some((_, _, task)) = due else { break };
            task();
        }
    }

    fn push(&self, at: u64, task: Task) -> TaskId {
        self.ids.set(self.ids.get() + 1);
        let id = TaskId(self.ids.get());
        self.queue.borrow_mut().push((id, at, task));
        id
    }
}

impl Scheduler for Loop {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn request_frame(&self, task: Task) -> TaskId {
        self.push(self.now.get(), task)
    }

    fn set_timeout(&self, delay_ms: u64, task: Task) -> TaskId {
        self.push(self.now.get() + delay_ms, task)
    }

    fn cancel(&self, id: TaskId) {
        self.queue.borrow_mut().retain(|(i, _, _)| *i != id);
    }
}

fn main() {
    // Example: a headless "host" that owns a scroll container, a frame loop and a render step.
    //
    // A real adapter would do the same:
    // - mount() once the container exists, will_update() after each render
    // - measure rendered rows and let the controller write anti-jump corrections
    // - re-render whenever on_change fires
    let element = Element {
        rect: Rect::new(320.0, 480.0),
        ..Element::default()
    };
    let event_loop = Rc::new(Loop::default());
    let renders = Rc::new(Cell::new(0usize));

    let el = element.clone();
    let counter = Rc::clone(&renders);
    let options = HostOptions::new(VirtualizerOptions::new(10_000, |_| 32.0))
        .with_get_scroll_element(move || Some(el.clone()))
        .with_observe_element_rect(|el: &Element, mut cb: Box<dyn FnMut(Rect)>| -> Unsubscribe {
            cb(el.rect);
            Box::new(|| {})
        })
        .with_observe_element_offset(|el: &Element, mut cb: Box<dyn FnMut(f64)>| -> Unsubscribe {
            cb(0.0);
            *el.listener.borrow_mut() = Some(Rc::new(RefCell::new(cb)));
            let listener = Rc::clone(&el.listener);
            Box::new(move || {
                listener.borrow_mut().take();
            })
        })
        .with_default_scroll_to_fn()
        .with_default_measure_element()
        .with_on_change(Some(move |_sync: bool| counter.set(counter.get() + 1)));

    let controller: Controller<Element, Row> =
        match Controller::new(options, event_loop.clone()) {
            Ok(c) => c,
            Err(err) => {
                eprintln!("invalid host options: {err}");
                return;
            }
        };
    if let Err(err) = controller.mount() {
        eprintln!("mount failed: {err}");
        return;
    }

    let target = controller
        .scroll_to_index(5_000, Align::Center, ScrollBehavior::Auto)
        .unwrap_or_default();
    println!("first pass offset={target}");

    // Rows render taller than estimated; the next frame corrects the position.
    let indexes: Vec<usize> = controller.virtualizer().virtual_indexes().collect();
    for index in indexes {
        let _ = controller.measure_element(index, &Row(48.0));
    }
    event_loop.run_for(16);
    println!(
        "after second pass offset={} range={:?}",
        controller.virtualizer().scroll_offset(),
        controller.virtualizer().range()
    );

    event_loop.run_for(200);
    println!(
        "idle: is_scrolling={} renders={}",
        controller.virtualizer().is_scrolling(),
        renders.get()
    );

    controller.teardown();
}
