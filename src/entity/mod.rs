pub mod chat_messages;
pub mod fixtures;
pub mod standings;
pub mod tournament_players;
pub mod tournaments;
pub mod users;

pub use chat_messages::Entity as ChatMessages;
pub use fixtures::Entity as Fixtures;
pub use standings::Entity as Standings;
pub use tournament_players::Entity as TournamentPlayers;
pub use tournaments::Entity as Tournaments;
pub use users::Entity as Users;
