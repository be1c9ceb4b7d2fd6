mod comment;
mod like;
mod playlist;
mod subscription;
mod tweet;
mod user;
mod video;

pub use comment::*;
pub use like::*;
pub use playlist::*;
pub use subscription::*;
pub use tweet::*;
pub use user::*;
pub use video::*;
