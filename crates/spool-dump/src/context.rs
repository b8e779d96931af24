//! Access to the running simulation.

use std::rc::Rc;
use std::sync::Arc;

/// What a dump scheduler needs to know about the simulation driving it.
///
/// Passed explicitly into [`DumpScheduler::open`](crate::DumpScheduler::open)
/// instead of being looked up from process-wide state.
pub trait SimulationContext {
    /// Current simulation step. Never decreases.
    fn current_step(&self) -> u64;

    /// Number of execution ranks participating in the simulation.
    fn rank_count(&self) -> u32;
}

impl<T: SimulationContext + ?Sized> SimulationContext for &T {
    fn current_step(&self) -> u64 {
        (**self).current_step()
    }

    fn rank_count(&self) -> u32 {
        (**self).rank_count()
    }
}

impl<T: SimulationContext + ?Sized> SimulationContext for Box<T> {
    fn current_step(&self) -> u64 {
        (**self).current_step()
    }

    fn rank_count(&self) -> u32 {
        (**self).rank_count()
    }
}

impl<T: SimulationContext + ?Sized> SimulationContext for Rc<T> {
    fn current_step(&self) -> u64 {
        (**self).current_step()
    }

    fn rank_count(&self) -> u32 {
        (**self).rank_count()
    }
}

impl<T: SimulationContext + ?Sized> SimulationContext for Arc<T> {
    fn current_step(&self) -> u64 {
        (**self).current_step()
    }

    fn rank_count(&self) -> u32 {
        (**self).rank_count()
    }
}
