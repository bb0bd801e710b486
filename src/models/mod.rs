pub mod paper;
pub mod record;
pub mod summary;
pub mod topic;

pub use paper::*;
pub use record::*;
pub use summary::*;
pub use topic::*;
