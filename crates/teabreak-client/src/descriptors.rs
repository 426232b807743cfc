//! Retrieval descriptors for every list the client shows.

use teabreak_core::{Descriptor, RecordKey};

pub fn all_papers() -> Descriptor {
    Descriptor::post("papers", "/Papers/GetAllPapers")
}

pub fn paper(paper_id: &RecordKey) -> Descriptor {
    Descriptor::get("paper", "/Papers/GetPaperById").with_param("paperId", paper_id.as_str())
}

/// Papers uploaded by one user; the backend pages them as `{records: [...]}`.
pub fn user_papers(user_id: &RecordKey) -> Descriptor {
    Descriptor::get("user_papers", "/Papers/GetUserPaperListByPage")
        .with_param("userId", user_id.as_str())
}

pub fn comments(paper_id: &RecordKey) -> Descriptor {
    Descriptor::get("comments", "/comments/GetAllCommentList").with_param("paperId", paper_id.as_str())
}

pub fn all_users() -> Descriptor {
    Descriptor::get("users", "/Users/GetAllUsers")
}

pub fn reporter_applications() -> Descriptor {
    Descriptor::get("reporter_applications", "/ReporterApply/GetAllRegisterList")
}

pub fn friends() -> Descriptor {
    Descriptor::get("friends", "/friends/GetAllFriendList")
}

pub fn sent_friend_requests() -> Descriptor {
    Descriptor::get("sent_requests", "/friendRequests/GetApplyFriendList")
}

pub fn received_friend_requests() -> Descriptor {
    Descriptor::get("received_requests", "/friendRequests/GetReceivedApplyList")
}

pub fn follows() -> Descriptor {
    Descriptor::get("follows", "/friends/GetAllFollowList")
}
