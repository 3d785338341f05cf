//! Show a single post

use anyhow::Result;

use crate::content::DetailRecord;
use crate::fetch::FetchState;
use crate::BlogFront;

/// Fetch one post and print it
pub async fn run(front: &BlogFront, id: &str, json: bool) -> Result<()> {
    let fetch = front.post(id);
    let post = loaded_post(fetch.wait().await, &fetch.resource().id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        println!("{}\n{}\n\n{}", post.title, post.created_at, post.content);
    }

    Ok(())
}

fn loaded_post(state: FetchState<DetailRecord>, id: &str) -> Result<DetailRecord> {
    match state {
        FetchState::Loaded(post) => Ok(post),
        FetchState::NotFound => anyhow::bail!("Post not found: {}", id),
        FetchState::Failed(err) => anyhow::bail!("Failed to fetch post {}: {}", id, err),
        FetchState::Idle | FetchState::Loading => {
            anyhow::bail!("Fetching post {} did not finish", id)
        }
    }
}
