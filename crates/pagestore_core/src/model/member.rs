//! Member/comment association model.
//!
//! The association row owns optional copies of both sides, so the graph stays
//! a tree and can be copied structurally.

use crate::copy::{CopyContext, CopyResult, DeepCopy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub member_comments: Vec<MemberComment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub message: String,
}

/// Link between a member and a comment, keyed by both ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberComment {
    pub member_id: i64,
    pub comment_id: i64,
    pub member: Option<Box<Member>>,
    pub comment: Option<Comment>,
    pub something: i32,
    pub something_else: Option<String>,
}

impl DeepCopy for Comment {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            Ok(Self {
                comment_id: self.comment_id,
                message: self.message.deep_copy_in(ctx)?,
            })
        })
    }
}

impl DeepCopy for MemberComment {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            Ok(Self {
                member_id: self.member_id,
                comment_id: self.comment_id,
                member: self.member.deep_copy_in(ctx)?,
                comment: self.comment.deep_copy_in(ctx)?,
                something: self.something,
                something_else: self.something_else.deep_copy_in(ctx)?,
            })
        })
    }
}

impl DeepCopy for Member {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            Ok(Self {
                member_id: self.member_id,
                first_name: self.first_name.deep_copy_in(ctx)?,
                last_name: self.last_name.deep_copy_in(ctx)?,
                member_comments: self.member_comments.deep_copy_in(ctx)?,
            })
        })
    }
}
