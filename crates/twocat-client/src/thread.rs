//! Thread assembly.
//!
//! Turns the flat list of a board's posts into a forest of threads. A post
//! whose parent is not among the loaded posts (deleted, or never existed) is
//! shown as a thread of its own. Parent cycles cannot be produced through the
//! client, but a damaged database may contain them: their members are
//! promoted to roots so every post is shown exactly once.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use twocat_shared::types::PostId;
use twocat_store::Post;

#[derive(Debug, PartialEq)]
pub struct ThreadNode {
    pub post: Post,
    pub children: Vec<ThreadNode>,
    orphan: bool,
}

impl ThreadNode {
    fn leaf(post: Post) -> Self {
        Self {
            post,
            children: Vec::new(),
            orphan: false,
        }
    }

    /// A root whose post names a parent that is not on the board. Roots
    /// promoted out of a parent cycle are not orphans.
    pub fn is_orphan(&self) -> bool {
        self.orphan
    }

    /// Number of posts below this node, at any depth.
    pub fn reply_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&ThreadNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

// Reply chains can be arbitrarily deep; tear them down without recursing.
impl Drop for ThreadNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Build the thread forest for one board.
///
/// Roots come newest first; replies under a post come oldest first. Ties on
/// the timestamp are broken by ascending id so the result is deterministic.
pub fn assemble(posts: Vec<Post>) -> Vec<ThreadNode> {
    let keys: HashMap<PostId, DateTime<Utc>> =
        posts.iter().map(|p| (p.id, p.timestamp)).collect();

    let mut children: HashMap<PostId, Vec<PostId>> = HashMap::new();
    let mut roots: Vec<(PostId, bool)> = Vec::new();
    for post in &posts {
        match post.parent_id {
            Some(parent) if parent != post.id && keys.contains_key(&parent) => {
                children.entry(parent).or_default().push(post.id);
            }
            Some(parent) => roots.push((post.id, !keys.contains_key(&parent))),
            None => roots.push((post.id, false)),
        }
    }
    for replies in children.values_mut() {
        replies.sort_by_key(|id| (keys[id], *id));
    }

    let mut pending: HashMap<PostId, Post> = posts.into_iter().map(|p| (p.id, p)).collect();
    let mut forest: Vec<ThreadNode> = Vec::with_capacity(roots.len());
    for (id, orphan) in roots {
        if let Some(mut node) = build(id, &mut pending, &children) {
            node.orphan = orphan;
            forest.push(node);
        }
    }

    // Whatever is left sits on a parent cycle.
    loop {
        let earliest = pending.values().map(|p| (p.timestamp, p.id)).min();
        let Some((_, id)) = earliest else {
            break;
        };
        if let Some(node) = build(id, &mut pending, &children) {
            tracing::warn!(post = %id, "parent cycle detected, promoting post to root");
            forest.push(node);
        }
    }

    forest.sort_by_key(|node| (Reverse(node.post.timestamp), node.post.id));
    forest
}

/// Depth-first build of the subtree under `root` with an explicit stack.
/// Each post is taken out of `pending` exactly once, which also stops cycles.
fn build(
    root: PostId,
    pending: &mut HashMap<PostId, Post>,
    children: &HashMap<PostId, Vec<PostId>>,
) -> Option<ThreadNode> {
    let post = pending.remove(&root)?;
    // Each frame holds a node under construction and its next reply index.
    let mut stack: Vec<(ThreadNode, usize)> = vec![(ThreadNode::leaf(post), 0)];

    loop {
        let (node, next) = stack.last_mut()?;
        let reply = children
            .get(&node.post.id)
            .and_then(|replies| replies.get(*next))
            .copied();

        match reply {
            Some(reply) => {
                *next += 1;
                if let Some(post) = pending.remove(&reply) {
                    stack.push((ThreadNode::leaf(post), 0));
                }
            }
            None => {
                let (done, _) = stack.pop()?;
                match stack.last_mut() {
                    Some((parent, _)) => parent.children.push(done),
                    None => return Some(done),
                }
            }
        }
    }
}

/// Render order: each post followed by its replies, with their depth.
pub fn flatten(forest: &[ThreadNode]) -> Vec<(usize, &Post)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &ThreadNode)> = forest.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        out.push((depth, &node.post));
        stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
    }
    out
}
