//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ContentProcessor` - Scans content roots and drives validate/compile
//!   under a single lock

pub mod processor;

pub use processor::{ContentProcessor, ContentRoot, RootOrigin};
