use std::rc::Rc;

use crate::bus::{
    EventBus,
    channels::{HORIZONTAL_PAGE_CHANGE, PageChange},
};

/// Horizontal section pager; every index change is published on `horizontalPageChange`.
pub struct HorizontalPager {
    bus: Option<Rc<EventBus>>,
    index: usize,
    total: usize,
}

impl HorizontalPager {
    pub fn new(total: usize, bus: Option<Rc<EventBus>>) -> Self {
        Self {
            bus,
            index: 0,
            total,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.index + 1)
    }

    pub fn prev(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(i) => self.go_to(i),
            None => false,
        }
    }

    /// Jump to `index`; out of range or unchanged is a no-op returning `false`.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total || index == self.index {
            return false;
        }
        let change = PageChange {
            index,
            previous: self.index,
            total: self.total,
        };
        self.index = index;
        if let Some(bus) = &self.bus {
            bus.publish(HORIZONTAL_PAGE_CHANGE, &change);
        }
        true
    }
}
