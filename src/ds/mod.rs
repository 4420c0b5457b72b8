pub mod frequency_chain;
pub mod recency_list;
pub mod shard;
pub mod slot_arena;

pub use frequency_chain::FrequencyChain;
pub use recency_list::RecencyList;
pub use shard::ShardSelector;
pub use slot_arena::{SlotArena, SlotId};
