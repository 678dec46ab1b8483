//! Data models - stored rows and remote wire shapes

mod comment;
mod remote;

pub use comment::{Comment, CommentStatus, NewComment};
pub use remote::{AuthorInfo, CommentListResponse, RemoteAuthor, RemoteComment, NATIVE_PROVIDER};
