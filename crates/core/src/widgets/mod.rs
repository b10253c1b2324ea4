//! State machines behind the interactive page widgets.
//!
//! Rendering lives elsewhere; these types only decide what should be shown.
//! Timer-driven widgets take the current [`std::time::Instant`] as an
//! argument so they can be driven from a real clock or a paused test clock.

pub mod accordion;
pub mod carousel;
pub mod counter;
pub mod modal;

pub use accordion::Accordion;
pub use carousel::{Carousel, CarouselKey, CarouselTiming};
pub use counter::Counter;
pub use modal::{Modal, ModalEvent};
