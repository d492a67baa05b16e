//! Infrastructure 層
//!
//! ドメイン層が定義する trait のインメモリ実装。サーバーはこれらを
//! そのまま共有ドキュメントとして公開し、テストは 1 プロセス内で
//! 2 つのセッションを競わせるために使います。

pub mod generator;
pub mod leaderboard;
pub mod room_store;

pub use generator::WordListGenerator;
pub use leaderboard::InMemoryLeaderboard;
pub use room_store::InMemoryRoomStore;
