//! Pure aggregation over materialized blog collections.
//!
//! These functions never touch the store; they operate on whatever slice the
//! caller has in hand (typically the result of a list operation) and never
//! mutate it.

use crate::store::BlogRecord;

/// Sum of likes across all records. Zero for an empty slice.
pub fn total_likes(blogs: &[BlogRecord]) -> i64 {
    blogs.iter().map(|b| b.likes).sum()
}

/// The record with the strictly greatest like count.
///
/// On a tie the first such record in input order wins. Returns `None` for an
/// empty slice; callers must treat that as "no favorite", not as a zero-likes
/// record.
pub fn favorite_blog(blogs: &[BlogRecord]) -> Option<&BlogRecord> {
    let mut favorite: Option<&BlogRecord> = None;
    for blog in blogs {
        match favorite {
            Some(current) if blog.likes <= current.likes => {}
            _ => favorite = Some(blog),
        }
    }
    favorite
}
