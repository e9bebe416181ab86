//! Registry lifecycle scenarios
//!
//! Recorder behaviors write into a shared event log so tests can assert the exact
//! dispatch sequence across entities, behaviors and hooks.


use std::cell::RefCell;
use std::rc::Rc;

use crate::ecs::{Behavior, EntityHook, TickContext};
use crate::foundation::math::Mat4;
use crate::input::KeyState;

type EventLog = Rc<RefCell<Vec<String>>>;

fn event_log() -> EventLog {
    Rc::default()
}

fn count(log: &EventLog, event: &str) -> usize {
    log.borrow().iter().filter(|entry| entry.as_str() == event).count()
}

/// Records `<name>:update`, `<name>:input` and `<name>:transform`
struct Recorder {
    name: &'static str,
    order: i32,
    log: EventLog,
}

impl Recorder {
    fn new(name: &'static str, log: &EventLog) -> Self {
        Self { name, order: crate::ecs::DEFAULT_UPDATE_ORDER, log: Rc::clone(log) }
    }

    fn ordered(name: &'static str, order: i32, log: &EventLog) -> Self {
        Self { name, order, log: Rc::clone(log) }
    }

    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, what));
    }
}

impl Behavior for Recorder {
    fn update_order(&self) -> i32 {
        self.order
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>, _delta_time: f32) {
        self.record("update");
    }

    fn process_input(&mut self, _ctx: &mut TickContext<'_>, _keys: &KeyState) {
        self.record("input");
    }

    fn on_world_transform_changed(&mut self, _world_transform: &Mat4) {
        self.record("transform");
    }
}

/// Records `hook:update` and `hook:input`
struct HookRecorder {
    log: EventLog,
}

impl EntityHook for HookRecorder {
    fn update_entity(&mut self, _ctx: &mut TickContext<'_>, _delta_time: f32) {
        self.log.borrow_mut().push("hook:update".to_owned());
    }

    fn entity_input(&mut self, _ctx: &mut TickContext<'_>, _keys: &KeyState) {
        self.log.borrow_mut().push("hook:input".to_owned());
    }
}

/// Runs a closure on every update
struct OnUpdate<F> {
    order: i32,
    action: F,
}

impl<F> OnUpdate<F>
where
    F: FnMut(&mut TickContext<'_>) + 'static,
{
    fn new(action: F) -> Self {
        Self { order: crate::ecs::DEFAULT_UPDATE_ORDER, action }
    }

    fn ordered(order: i32, action: F) -> Self {
        Self { order, action }
    }
}

impl<F> Behavior for OnUpdate<F>
where
    F: FnMut(&mut TickContext<'_>) + 'static,
{
    fn update_order(&self) -> i32 {
        self.order
    }

    fn update(&mut self, ctx: &mut TickContext<'_>, _delta_time: f32) {
        (self.action)(ctx);
    }
}
