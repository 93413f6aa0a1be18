pub mod category;
pub mod normalize;
pub mod violation;

pub use category::{RULE_PATTERNS, detect_category};
pub use normalize::normalize;
pub use violation::{VehicleCategory, ViolationRecord};
