/// How the allocation benchmark acquires and releases each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocStrategy {
    /// `std::alloc::alloc` / `std::alloc::dealloc`, both explicit.
    Raw,
    /// Raw allocation wrapped afterwards with `Box::from_raw`.
    UniqueNew,
    /// `Box::new`.
    UniqueFactory,
    /// `Rc::from(Box)`: the value is boxed first, then moved into a fresh Rc block.
    SharedNew,
    /// `Rc::new`.
    SharedFactory,
}

impl AllocStrategy {
    pub const ALL: [AllocStrategy; 5] = [
        AllocStrategy::Raw,
        AllocStrategy::UniqueNew,
        AllocStrategy::UniqueFactory,
        AllocStrategy::SharedNew,
        AllocStrategy::SharedFactory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AllocStrategy::Raw => "raw pointer",
            AllocStrategy::UniqueNew => "Box using Box::from_raw",
            AllocStrategy::UniqueFactory => "Box using Box::new",
            AllocStrategy::SharedNew => "Rc using Rc::from(Box)",
            AllocStrategy::SharedFactory => "Rc using Rc::new",
        }
    }

    /// Heap blocks taken per iteration.
    pub fn allocations_per_iteration(self) -> usize {
        match self {
            AllocStrategy::SharedNew => 2,
            _ => 1,
        }
    }
}

/// Which handle the access benchmark reads and writes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessStrategy {
    Raw,
    Unique,
    Shared,
}

impl AccessStrategy {
    pub const ALL: [AccessStrategy; 3] = [
        AccessStrategy::Raw,
        AccessStrategy::Unique,
        AccessStrategy::Shared,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccessStrategy::Raw => "raw pointer",
            AccessStrategy::Unique => "Box",
            AccessStrategy::Shared => "Rc<Cell>",
        }
    }
}
