//! Infrastructure 層
//!
//! ドメイン層の trait をリモートのルームホストに対して実装します。
//! 読み書きは HTTP、購読は WebSocket です。

mod http;
pub mod leaderboard;
pub mod room_store;

pub use http::ApiClient;
pub use leaderboard::RemoteLeaderboard;
pub use room_store::RemoteRoomStore;
