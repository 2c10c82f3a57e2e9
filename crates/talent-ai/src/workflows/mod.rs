pub mod automation;
pub mod shortlist;
