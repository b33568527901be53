pub mod priority_index;
pub mod recency_list;
pub mod reference_history;

pub use priority_index::PriorityIndex;
pub use recency_list::{RecencyList, SlotId};
pub use reference_history::ReferenceHistory;
