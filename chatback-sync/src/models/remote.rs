use serde::Deserialize;

/// Provider recorded when a non-anonymous author arrives with an
/// explicitly empty provider field
pub const NATIVE_PROVIDER: &str = "native";

/// Top-level shape of the comment-list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CommentListResponse {
    #[serde(default)]
    pub comments: Vec<RemoteComment>,
}

/// One comment as the remote API sends it. Only `id` is required; every
/// other field defaults when absent so a sparse payload still syncs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteComment {
    pub id: i64,
    #[serde(default)]
    pub site_id: i64,
    #[serde(default)]
    pub channel: String,
    /// Remote id of the parent comment; 0 or absent = top-level
    #[serde(default)]
    pub parent_id: i64,
    #[serde(default)]
    pub rating: i64,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub media: String,
    #[serde(default)]
    pub status: String,
    pub author: Option<RemoteAuthor>,
    pub anonym: Option<RemoteAuthor>,
}

/// Author sub-structure, shared by `author` and `anonym`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteAuthor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub www: Option<String>,
    pub avatar: Option<String>,
    pub provider: Option<String>,
}

/// Author fields after mapping, ready for persistence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub www: Option<String>,
    pub avatar: Option<String>,
    pub provider: Option<String>,
}

impl RemoteComment {
    /// Author for persistence. The `anonym` sub-structure is used when
    /// `author` is absent (upstream API convention); when both are absent
    /// every field maps to its empty default.
    pub fn effective_author(&self) -> AuthorInfo {
        match (&self.author, &self.anonym) {
            (Some(author), _) => author.to_info(),
            (None, Some(anonym)) => anonym.to_info(),
            (None, None) => AuthorInfo::default(),
        }
    }
}

impl RemoteAuthor {
    fn to_info(&self) -> AuthorInfo {
        AuthorInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            www: none_when_empty(&self.www),
            avatar: none_when_empty(&self.avatar),
            // An explicitly empty provider means the vendor's own account
            // system; an absent field stays absent
            provider: match &self.provider {
                Some(p) if p.is_empty() => Some(NATIVE_PROVIDER.to_string()),
                Some(p) => Some(p.clone()),
                None => None,
            },
        }
    }
}

fn none_when_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}
