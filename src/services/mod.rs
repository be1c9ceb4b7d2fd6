mod auth;
mod comments;
mod dashboard;
mod likes;
pub mod password;
mod playlists;
mod subscriptions;
pub mod token;
mod tweets;
mod users;
mod videos;

pub use auth::{AuthService, RegisterUser};
pub use comments::CommentService;
pub use dashboard::DashboardService;
pub use likes::{LikeService, LikeTarget, ToggleOutcome as LikeToggleOutcome};
pub use playlists::PlaylistService;
pub use subscriptions::{SubscriptionService, ToggleOutcome as SubscriptionToggleOutcome};
pub use token::TokenService;
pub use tweets::TweetService;
pub use users::UserService;
pub use videos::{CreateVideo, ListVideosParams, VideoService};
