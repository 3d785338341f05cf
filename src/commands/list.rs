//! List posts from the API

use anyhow::Result;

use crate::content::SummaryRecord;
use crate::fetch::{FetchState, ListQuery};
use crate::helpers::slugify;
use crate::BlogFront;

/// Fetch the listing and print it
pub async fn run(front: &BlogFront, query: ListQuery, json: bool) -> Result<()> {
    let fetch = front.posts(query);
    let posts = loaded_posts(fetch.wait().await)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        print!("{}", format_posts(&posts));
    }

    Ok(())
}

/// A missing listing endpoint prints as an empty listing
fn loaded_posts(state: FetchState<Vec<SummaryRecord>>) -> Result<Vec<SummaryRecord>> {
    match state {
        FetchState::Loaded(posts) => Ok(posts),
        FetchState::NotFound => Ok(Vec::new()),
        FetchState::Failed(err) => anyhow::bail!("Failed to fetch posts: {}", err),
        FetchState::Idle | FetchState::Loading => anyhow::bail!("Fetching posts did not finish"),
    }
}

fn format_posts(posts: &[SummaryRecord]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        out.push_str(&format!(
            "  {} - {} [{}] /{}\n",
            post.created_at,
            post.title,
            post.id,
            slugify(&post.title)
        ));
    }
    out
}
