//! Community board: posts, likes and comment threads.

use std::sync::Arc;

use domains::{Comment, NewComment, NewPost, Post, PostStatus, RecordId, Result, Session};
use serde::Serialize;

use crate::{observe, required, Store};

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub building_id: RecordId,
    pub title: String,
    pub content: String,
}

/// A post with its comments, oldest comment first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostThread {
    pub post: Post,
    pub comments: Vec<Comment>,
}

impl PostThread {
    pub fn like_count(&self) -> usize {
        self.post.likes.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

pub struct CommunityService {
    store: Arc<Store>,
}

impl CommunityService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn publish(&self, session: &Session, draft: PostDraft) -> Result<Post> {
        let title = required("title", &draft.title)?;
        let content = required("content", &draft.content)?;

        let post = observe(
            "community.publish",
            self.store
                .add_post(NewPost {
                    building_id: draft.building_id,
                    user_id: session.user_id.clone(),
                    user_name: session.display_name.clone(),
                    title,
                    content,
                })
                .await,
        )?;
        tracing::info!(post = %post.id, user = %session.user_id, "post published");
        Ok(post)
    }

    /// Active posts, newest first, each with its comment thread.
    pub async fn feed(&self, building: Option<&RecordId>) -> Result<Vec<PostThread>> {
        let posts = observe("community.feed", self.store.list_posts(building).await)?;
        let mut threads = Vec::with_capacity(posts.len());
        for post in posts {
            let comments = observe("community.feed", self.store.list_comments(&post.id).await)?;
            threads.push(PostThread { post, comments });
        }
        Ok(threads)
    }

    /// Case-insensitive match on title or content.
    pub async fn search(&self, building: Option<&RecordId>, term: &str) -> Result<Vec<PostThread>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .feed(building)
            .await?
            .into_iter()
            .filter(|t| {
                t.post.title.to_lowercase().contains(&needle)
                    || t.post.content.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub async fn toggle_like(&self, session: &Session, post: &RecordId) -> Result<Option<Post>> {
        observe(
            "community.toggle_like",
            self.store.toggle_like(post, &session.user_id).await,
        )
    }

    /// Returns `Ok(None)` when the post does not exist or was removed.
    pub async fn comment(
        &self,
        session: &Session,
        post: &RecordId,
        text: &str,
    ) -> Result<Option<Comment>> {
        let content = required("comment", text)?;
        let target = observe("community.comment", self.store.find_post(post).await)?;
        if !target.is_some_and(|p| p.status == PostStatus::Active) {
            return Ok(None);
        }

        let comment = observe(
            "community.comment",
            self.store
                .add_comment(NewComment {
                    post_id: post.clone(),
                    user_id: session.user_id.clone(),
                    user_name: session.display_name.clone(),
                    content,
                })
                .await,
        )?;
        Ok(Some(comment))
    }

    /// Soft delete: the post is kept but no longer listed.
    pub async fn remove(&self, post: &RecordId) -> Result<Option<Post>> {
        observe(
            "community.remove",
            self.store
                .update_post_status(post, PostStatus::Deleted)
                .await,
        )
    }
}
