pub mod prelude;

pub mod indexer_cursors;
pub mod participations;
pub mod quests;
pub mod sea_orm_active_enums;
