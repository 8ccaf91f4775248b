//! Application services
//!
//! Concrete service implementations that orchestrate the domain model.
//! Services depend on I/O boundary traits (FileSystem, Selector)
//! but are themselves concrete structs, not traits.

mod catalog;
mod picker;
mod processor;
mod profile;
mod session;

pub use catalog::{builtin_source, CatalogService};
pub use picker::{
    expansion_key, use_expertise, use_location, use_picker, ExpertiseContext, LocationContext,
    PickerRow, TreePicker,
};
pub use processor::{ProcessorAction, ProcessorActions, ProcessorItem, SelectionProcessor};
pub use profile::{ExpertiseRecord, LocationRecord, OnboardingSubmission};
pub use session::{PickerSession, SessionFile, SessionService};
