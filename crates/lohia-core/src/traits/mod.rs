//! Trait seams consumed by the service layer.

pub mod notifier;

pub use notifier::{ChangeNotifier, NullNotifier};
