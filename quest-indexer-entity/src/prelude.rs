pub use super::{
    indexer_cursors::Entity as IndexerCursors, participations::Entity as Participations,
    quests::Entity as Quests,
};
