//! Threaded paper comments.
//!
//! A [`Comment`] owns its replies as an ordered list. Updates rebuild the
//! affected path of the tree and return a new list; the input is left as is.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::UserProfile;
use crate::record::{Record, RecordKey};

/// A comment and its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: RecordKey,
    /// Parent comment, for replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
    /// Author profile, filled in by enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    /// Set when the author lookup failed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enrichment_error: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Comment>,
}

impl Comment {
    pub fn new(id: impl Into<RecordKey>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pid: None,
            user_id: None,
            content: Some(content.into()),
            create_at: None,
            user: None,
            enrichment_error: false,
            children: Vec::new(),
        }
    }

    /// Decode a comment tree from a pipeline record.
    pub fn from_record(record: &Record) -> Result<Self> {
        record.decode()
    }

    /// Number of comments in this subtree, this one included.
    pub fn thread_len(&self) -> usize {
        1 + self.children.iter().map(Comment::thread_len).sum::<usize>()
    }

    pub fn find(&self, id: &RecordKey) -> Option<&Comment> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Append `reply` under the comment with id `parent`, anywhere in the forest.
///
/// Returns `None` when no comment has that id.
pub fn insert_reply(comments: &[Comment], parent: &RecordKey, reply: Comment) -> Option<Vec<Comment>> {
    let mut pending = Some(reply);
    let rebuilt = insert_into(comments, parent, &mut pending);
    // The reply is taken exactly when the parent was found.
    if pending.is_none() {
        Some(rebuilt)
    } else {
        None
    }
}

fn insert_into(comments: &[Comment], parent: &RecordKey, pending: &mut Option<Comment>) -> Vec<Comment> {
    comments
        .iter()
        .map(|comment| {
            if pending.is_none() {
                return comment.clone();
            }
            if &comment.id == parent {
                let mut children = comment.children.clone();
                if let Some(mut reply) = pending.take() {
                    reply.pid = Some(parent.clone());
                    children.push(reply);
                }
                return Comment {
                    children,
                    ..comment.clone()
                };
            }
            Comment {
                children: insert_into(&comment.children, parent, pending),
                ..comment.clone()
            }
        })
        .collect()
}

/// Drop the comment with id `target` and its replies.
pub fn remove_comment(comments: &[Comment], target: &RecordKey) -> Vec<Comment> {
    comments
        .iter()
        .filter(|comment| &comment.id != target)
        .map(|comment| Comment {
            children: remove_comment(&comment.children, target),
            ..comment.clone()
        })
        .collect()
}

/// Total number of comments in a forest.
pub fn count_comments(comments: &[Comment]) -> usize {
    comments.iter().map(Comment::thread_len).sum()
}
